//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;

use crate::domain::{DocumentId, Error, UserEmail};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    EmptyEmail,
    MalformedIdentifier,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::EmptyEmail => "empty_email",
            ErrorCode::MalformedIdentifier => "malformed_identifier",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn empty_email_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must not be empty"))
        .with_code(ErrorCode::EmptyEmail)
}

pub(crate) fn malformed_identifier_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, "malformed identifier")
        .with_value(ErrorCode::MalformedIdentifier, value)
}

pub(crate) fn parse_document_id(value: &str, field: FieldName) -> Result<DocumentId, Error> {
    DocumentId::parse(value).map_err(|_| malformed_identifier_error(field, value))
}

pub(crate) fn parse_email(value: &str, field: FieldName) -> Result<UserEmail, Error> {
    UserEmail::new(value).map_err(|_| empty_email_error(field))
}
