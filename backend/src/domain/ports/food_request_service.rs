//! Driving port for donation requests.

use async_trait::async_trait;

use crate::domain::{Document, Error, InsertAck, UserEmail};

/// Domain use-case port for claiming listings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FoodRequestService: Send + Sync {
    /// Record a request and withdraw the listing named by its `food_id`.
    ///
    /// The two writes are not atomic. When the withdrawal fails the request
    /// stays stored and the error is returned.
    async fn request_listing(&self, request: Document) -> Result<InsertAck, Error>;

    /// Requests made by `requester`.
    async fn list_for_requester(&self, requester: &UserEmail) -> Result<Vec<Document>, Error>;
}
