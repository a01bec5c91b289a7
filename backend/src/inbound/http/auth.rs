//! Session issuance and revocation.
//!
//! ```text
//! POST /jwt {"email":"donor@example.com"}
//! GET /logout
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_email};

const EMAIL: FieldName = FieldName::new("email");

/// Login body for `POST /jwt`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct LoginRequest {
    #[schema(example = "donor@example.com")]
    pub email: String,
}

/// Body returned by the session endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, utoipa::ToSchema)]
pub struct SessionStatus {
    pub success: bool,
}

impl SessionStatus {
    const OK: Self = Self { success: true };
}

/// Start a five hour session for the given email.
#[utoipa::path(
    post,
    path = "/jwt",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session issued", body = SessionStatus,
            headers(("Set-Cookie" = String, description = "Encrypted session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["session"],
    operation_id = "issueSession",
    security([])
)]
#[post("/jwt")]
pub async fn issue_session(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<SessionStatus>> {
    let email = parse_email(&payload.email, EMAIL)?;
    let expires_at = session.persist_login(&email, state.clock.utc())?;
    info!(%email, %expires_at, "session issued");
    Ok(web::Json(SessionStatus::OK))
}

/// End the session and expire the cookie.
#[utoipa::path(
    get,
    path = "/logout",
    responses(
        (status = 200, description = "Session cleared", body = SessionStatus)
    ),
    tags = ["session"],
    operation_id = "logout",
    security([])
)]
#[get("/logout")]
pub async fn logout(session: SessionContext) -> web::Json<SessionStatus> {
    session.clear();
    web::Json(SessionStatus::OK)
}
