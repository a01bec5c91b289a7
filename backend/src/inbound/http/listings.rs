//! Listing handlers.
//!
//! ```text
//! POST /addFood {"food_name":"Rice","expired_date":"2025-01-02",...}
//! GET /all-foods?sort=asc&search=rice
//! GET /all
//! GET /food/{id}
//! GET /foods/{email}
//! PATCH /update/{id} {"expired_date":"2025-01-03"}
//! DELETE /delete/{id}
//! ```

use actix_web::{delete, get, patch, post, web};
use serde::Deserialize;
use tracing::info;

use crate::domain::ports::ListingSearch;
use crate::domain::{DeleteAck, Document, InsertAck, UpdateAck};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{
    DeleteAckSchema, ErrorSchema, InsertAckSchema, UpdateAckSchema,
};
use crate::inbound::http::session::SessionEmail;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_document_id, parse_email};

const ID: FieldName = FieldName::new("id");
const EMAIL: FieldName = FieldName::new("email");

/// Query string accepted by `GET /all-foods`.
#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    pub sort: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListingPath {
    id: String,
}

#[derive(Debug, Deserialize)]
struct DonorPath {
    email: String,
}

/// Publish a listing.
#[utoipa::path(
    post,
    path = "/addFood",
    request_body(content = Object, description = "Listing document, stored verbatim"),
    responses(
        (status = 200, description = "Listing stored", body = InsertAckSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "addFood",
    security([])
)]
#[post("/addFood")]
pub async fn add_food(
    state: web::Data<HttpState>,
    payload: web::Json<Document>,
) -> ApiResult<web::Json<InsertAck>> {
    let ack = state.listings.create(payload.into_inner()).await?;
    info!(listing_id = %ack.inserted_id(), "listing published");
    Ok(web::Json(ack))
}

/// Listings filtered by name and ordered by expiry.
#[utoipa::path(
    get,
    path = "/all-foods",
    params(
        ("sort" = Option<String>, Query, description = "`asc` for soonest expiry first; any other value sorts descending"),
        ("search" = Option<String>, Query, description = "Case-insensitive substring of `food_name`")
    ),
    responses(
        (status = 200, description = "Matching listings", body = [Object]),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "searchFoods",
    security([])
)]
#[get("/all-foods")]
pub async fn search_foods(
    state: web::Data<HttpState>,
    query: web::Query<FeedQuery>,
) -> ApiResult<web::Json<Vec<Document>>> {
    let FeedQuery { sort, search } = query.into_inner();
    let search = ListingSearch::from_query(sort.as_deref(), search.as_deref());
    Ok(web::Json(state.listings.search(search).await?))
}

/// Every listing.
#[utoipa::path(
    get,
    path = "/all",
    responses(
        (status = 200, description = "All listings", body = [Object]),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "allFoods",
    security([])
)]
#[get("/all")]
pub async fn all_foods(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Document>>> {
    Ok(web::Json(state.listings.list_all().await?))
}

/// A single listing; the body is `null` when it does not exist.
#[utoipa::path(
    get,
    path = "/food/{id}",
    params(
        ("id" = String, Path, description = "Listing identifier")
    ),
    responses(
        (status = 200, description = "The listing, or null", body = Option<Object>),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "getFood",
    security([])
)]
#[get("/food/{id}")]
pub async fn get_food(
    state: web::Data<HttpState>,
    path: web::Path<ListingPath>,
) -> ApiResult<web::Json<Option<Document>>> {
    let id = parse_document_id(&path.id, ID)?;
    Ok(web::Json(state.listings.get(id).await?))
}

/// Listings donated by the signed-in user.
#[utoipa::path(
    get,
    path = "/foods/{email}",
    params(
        ("email" = String, Path, description = "Donor email; must match the session")
    ),
    responses(
        (status = 200, description = "Donor's listings", body = [Object]),
        (status = 401, description = "No session, or the session belongs to someone else", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "donorFoods",
    security(("SessionCookie" = []))
)]
#[get("/foods/{email}")]
pub async fn donor_foods(
    state: web::Data<HttpState>,
    viewer: SessionEmail,
    path: web::Path<DonorPath>,
) -> ApiResult<web::Json<Vec<Document>>> {
    let donor = parse_email(&path.email, EMAIL)?;
    let listings = state
        .listings
        .list_for_donor(&viewer.into_inner(), &donor)
        .await?;
    Ok(web::Json(listings))
}

/// Merge fields into a listing.
#[utoipa::path(
    patch,
    path = "/update/{id}",
    params(
        ("id" = String, Path, description = "Listing identifier")
    ),
    request_body(content = Object, description = "Fields to set; other fields are kept"),
    responses(
        (status = 200, description = "Update acknowledgement", body = UpdateAckSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "updateFood",
    security([])
)]
#[patch("/update/{id}")]
pub async fn update_food(
    state: web::Data<HttpState>,
    path: web::Path<ListingPath>,
    payload: web::Json<Document>,
) -> ApiResult<web::Json<UpdateAck>> {
    let id = parse_document_id(&path.id, ID)?;
    let ack = state.listings.update(id, payload.into_inner()).await?;
    Ok(web::Json(ack))
}

/// Remove a listing.
#[utoipa::path(
    delete,
    path = "/delete/{id}",
    params(
        ("id" = String, Path, description = "Listing identifier")
    ),
    responses(
        (status = 200, description = "Delete acknowledgement", body = DeleteAckSchema),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "deleteFood",
    security([])
)]
#[delete("/delete/{id}")]
pub async fn delete_food(
    state: web::Data<HttpState>,
    path: web::Path<ListingPath>,
) -> ApiResult<web::Json<DeleteAck>> {
    let id = parse_document_id(&path.id, ID)?;
    let ack = state.listings.delete(id).await?;
    info!(listing_id = %id, deleted = ack.deleted_count(), "listing removed");
    Ok(web::Json(ack))
}

#[cfg(test)]
#[path = "listings_tests.rs"]
mod tests;
