//! Donation request handlers.
//!
//! ```text
//! POST /requestAdd {"food_id":"<listing id>","requester_email":"a@b.c",...}
//! GET /requestedFood/{email}
//! ```

use actix_web::{get, post, web};
use serde::Deserialize;
use tracing::info;

use crate::domain::{Document, InsertAck};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, InsertAckSchema};
use crate::inbound::http::session::SessionEmail;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_email};

#[derive(Debug, Deserialize)]
struct RequesterPath {
    email: String,
}

/// Claim a listing: store the request and withdraw the listing.
#[utoipa::path(
    post,
    path = "/requestAdd",
    request_body(content = Object, description = "Request document; `food_id` names the claimed listing"),
    responses(
        (status = 200, description = "Request stored and listing withdrawn", body = InsertAckSchema),
        (status = 400, description = "Missing or malformed food_id", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["requests"],
    operation_id = "requestAdd",
    security([])
)]
#[post("/requestAdd")]
pub async fn request_add(
    state: web::Data<HttpState>,
    payload: web::Json<Document>,
) -> ApiResult<web::Json<InsertAck>> {
    let ack = state
        .food_requests
        .request_listing(payload.into_inner())
        .await?;
    info!(request_id = %ack.inserted_id(), "donation request recorded");
    Ok(web::Json(ack))
}

/// Requests made by a requester.
///
/// Any live session may read any requester's history.
#[utoipa::path(
    get,
    path = "/requestedFood/{email}",
    params(
        ("email" = String, Path, description = "Requester email")
    ),
    responses(
        (status = 200, description = "Requests", body = [Object]),
        (status = 401, description = "No live session", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["requests"],
    operation_id = "requestedFood",
    security(("SessionCookie" = []))
)]
#[get("/requestedFood/{email}")]
pub async fn requested_food(
    state: web::Data<HttpState>,
    _viewer: SessionEmail,
    path: web::Path<RequesterPath>,
) -> ApiResult<web::Json<Vec<Document>>> {
    let requester = parse_email(&path.email, FieldName::new("email"))?;
    let requests = state.food_requests.list_for_requester(&requester).await?;
    Ok(web::Json(requests))
}
