//! Domain primitives, ports and services.
//!
//! Purpose: describe listings and donation requests independently of HTTP and
//! storage. Handlers talk to the driving ports in [`ports`]; services reach
//! storage through the [`ports::DocumentStore`] driven port.
//!
//! Public surface:
//! - Error / ErrorCode: API error response payload.
//! - TraceId: request correlation identifier.
//! - Document, DocumentId and the store acknowledgements.
//! - UserEmail: session identity.
//! - DocumentListingService / DocumentFoodRequestService: port implementations.

pub mod document;
pub mod error;
pub mod food_requests;
pub mod listings;
pub mod ports;
pub mod trace_id;
pub mod user_email;

pub use self::document::{
    Collection, DeleteAck, Document, DocumentId, ID_FIELD, InsertAck, MalformedIdentifier,
    UpdateAck, id_field,
};
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::food_requests::DocumentFoodRequestService;
pub use self::listings::DocumentListingService;
pub use self::trace_id::TraceId;
pub use self::user_email::{UserEmail, UserEmailValidationError};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use rfood::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::unauthorized("forbidden access"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;

/// Map a store failure onto the client-facing error.
pub(crate) fn map_store_error(error: ports::DocumentStoreError) -> Error {
    match error {
        ports::DocumentStoreError::Connection { message } => {
            Error::service_unavailable(format!("document store unavailable: {message}"))
        }
        ports::DocumentStoreError::Query { message } => {
            Error::internal(format!("document store error: {message}"))
        }
    }
}
