//! Donation request service.
//!
//! Claiming a listing is two writes: store the request, then delete the
//! listing it names. They are not atomic; a failed delete leaves the listing
//! visible next to its request.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{DocumentFilter, DocumentStore, FindOptions, FoodRequestService};
use crate::domain::{
    Collection, Document, Error, InsertAck, UserEmail, id_field, map_store_error,
};

/// Field naming the listing being claimed.
pub const FOOD_ID_FIELD: &str = "food_id";
/// Field holding the claimant's email.
pub const REQUESTER_EMAIL_FIELD: &str = "requester_email";

/// [`FoodRequestService`] over the `requests` and `listings` collections.
pub struct DocumentFoodRequestService<S: ?Sized = dyn DocumentStore> {
    store: Arc<S>,
}

impl<S: ?Sized> DocumentFoodRequestService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl<S: ?Sized> Clone for DocumentFoodRequestService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

#[async_trait]
impl<S> FoodRequestService for DocumentFoodRequestService<S>
where
    S: DocumentStore + ?Sized,
{
    async fn request_listing(&self, request: Document) -> Result<InsertAck, Error> {
        let listing_id = id_field(&request, FOOD_ID_FIELD)?;

        let ack = self
            .store
            .insert(Collection::Requests, request)
            .await
            .map_err(map_store_error)?;

        let removed = self
            .store
            .delete(Collection::Listings, DocumentFilter::ById(listing_id))
            .await
            .map_err(|err| {
                warn!(
                    request_id = %ack.inserted_id(),
                    %listing_id,
                    error = %err,
                    "request stored but listing was not withdrawn"
                );
                map_store_error(err)
            })?;

        info!(
            request_id = %ack.inserted_id(),
            %listing_id,
            withdrawn = removed.deleted_count(),
            "listing requested"
        );
        Ok(ack)
    }

    async fn list_for_requester(&self, requester: &UserEmail) -> Result<Vec<Document>, Error> {
        self.store
            .find(
                Collection::Requests,
                DocumentFilter::field_equals(REQUESTER_EMAIL_FIELD, requester.as_ref()),
                FindOptions::default(),
            )
            .await
            .map_err(map_store_error)
    }
}
