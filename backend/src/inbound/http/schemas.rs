//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework agnostic by not deriving `ToSchema`; the
//! wrappers here mirror them for documentation only.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The session is missing, expired, or belongs to someone else.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// The document store is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[schema(rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct ErrorSchema {
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    #[schema(example = "malformed identifier")]
    message: String,
    /// Correlation identifier, also sent as the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::InsertAck`].
#[derive(ToSchema)]
#[schema(as = crate::domain::InsertAck)]
#[schema(rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct InsertAckSchema {
    #[schema(example = true)]
    acknowledged: bool,
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    inserted_id: String,
}

/// OpenAPI schema for [`crate::domain::UpdateAck`].
#[derive(ToSchema)]
#[schema(as = crate::domain::UpdateAck)]
#[schema(rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct UpdateAckSchema {
    acknowledged: bool,
    matched_count: u64,
    modified_count: u64,
}

/// OpenAPI schema for [`crate::domain::DeleteAck`].
#[derive(ToSchema)]
#[schema(as = crate::domain::DeleteAck)]
#[schema(rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct DeleteAckSchema {
    acknowledged: bool,
    deleted_count: u64,
}
