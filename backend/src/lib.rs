//! RFood backend library.
//!
//! Food-donation listings and donation requests served over HTTP, with a
//! cookie session gate in front of the identity-scoped endpoints.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
