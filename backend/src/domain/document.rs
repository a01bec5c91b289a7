//! Schemaless documents, their identifiers and store acknowledgements.
//!
//! Listings and requests are stored exactly as submitted. The only field the
//! service owns is [`ID_FIELD`], which the store writes on insert.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use uuid::Uuid;

use super::Error;

/// A stored JSON object.
pub type Document = Map<String, Value>;

/// Field holding the store-assigned identifier.
pub const ID_FIELD: &str = "_id";

/// Named collection inside the document store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Donated food items.
    Listings,
    /// Claims made against listings.
    Requests,
}

impl Collection {
    /// Stable storage name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Listings => "listings",
            Self::Requests => "requests",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raised when a path segment or field cannot be parsed as a [`DocumentId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed identifier: {value}")]
pub struct MalformedIdentifier {
    value: String,
}

impl MalformedIdentifier {
    /// The rejected input.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl From<MalformedIdentifier> for Error {
    fn from(err: MalformedIdentifier) -> Self {
        Error::invalid_request("malformed identifier").with_details(json!({
            "code": "malformed_identifier",
            "value": err.value,
        }))
    }
}

/// Opaque document identifier.
///
/// # Examples
/// ```
/// use rfood::domain::DocumentId;
///
/// let id = DocumentId::parse("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
/// assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
/// assert!(DocumentId::parse("64f0c0ffee").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Allocate a fresh identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier received from a client.
    ///
    /// # Errors
    /// Returns [`MalformedIdentifier`] when `raw` is not a valid identifier.
    pub fn parse(raw: &str) -> Result<Self, MalformedIdentifier> {
        Uuid::parse_str(raw.trim())
            .map(Self)
            .map_err(|_| MalformedIdentifier {
                value: raw.to_owned(),
            })
    }

    /// Access the inner UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for DocumentId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl FromStr for DocumentId {
    type Err = MalformedIdentifier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

/// Acknowledgement returned by an insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertAck {
    acknowledged: bool,
    inserted_id: DocumentId,
}

impl InsertAck {
    /// Acknowledge a stored document.
    #[must_use]
    pub fn new(inserted_id: DocumentId) -> Self {
        Self {
            acknowledged: true,
            inserted_id,
        }
    }

    /// Identifier assigned to the new document.
    #[must_use]
    pub fn inserted_id(&self) -> DocumentId {
        self.inserted_id
    }
}

/// Acknowledgement returned by a partial update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAck {
    acknowledged: bool,
    matched_count: u64,
    modified_count: u64,
}

impl UpdateAck {
    /// Acknowledge an update that matched and changed the given counts.
    #[must_use]
    pub fn new(matched_count: u64, modified_count: u64) -> Self {
        Self {
            acknowledged: true,
            matched_count,
            modified_count,
        }
    }

    /// Documents selected by the filter.
    #[must_use]
    pub fn matched_count(&self) -> u64 {
        self.matched_count
    }

    /// Documents whose content actually changed.
    #[must_use]
    pub fn modified_count(&self) -> u64 {
        self.modified_count
    }
}

/// Acknowledgement returned by a delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAck {
    acknowledged: bool,
    deleted_count: u64,
}

impl DeleteAck {
    /// Acknowledge a delete that removed `deleted_count` documents.
    #[must_use]
    pub fn new(deleted_count: u64) -> Self {
        Self {
            acknowledged: true,
            deleted_count,
        }
    }

    /// Documents removed.
    #[must_use]
    pub fn deleted_count(&self) -> u64 {
        self.deleted_count
    }
}

/// Read `document[field]` as a [`DocumentId`].
///
/// # Errors
/// Returns an invalid-request error when the field is missing, not a string,
/// or not a valid identifier.
pub fn id_field(document: &Document, field: &str) -> Result<DocumentId, Error> {
    let raw = document.get(field).and_then(Value::as_str).ok_or_else(|| {
        Error::invalid_request(format!("{field} is required")).with_details(json!({
            "field": field,
            "code": "missing_field",
        }))
    })?;
    DocumentId::parse(raw).map_err(|err| {
        Error::from(err).with_details(json!({
            "field": field,
            "code": "malformed_identifier",
            "value": raw,
        }))
    })
}
