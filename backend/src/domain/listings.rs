//! Listing service backed by the document store.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{
    DocumentFilter, DocumentStore, FindOptions, ListingSearch, ListingService,
};
use crate::domain::{
    Collection, DeleteAck, Document, DocumentId, Error, InsertAck, UpdateAck, UserEmail,
    map_store_error,
};

/// Listing name searched by the feed.
pub const FOOD_NAME_FIELD: &str = "food_name";
/// Expiry used to order the feed.
pub const EXPIRED_DATE_FIELD: &str = "expired_date";
/// Dotted path of the donor's email inside a listing.
pub const DONOR_EMAIL_PATH: &str = "donor.donor_email";

/// [`ListingService`] over the `listings` collection.
pub struct DocumentListingService<S: ?Sized = dyn DocumentStore> {
    store: Arc<S>,
}

impl<S: ?Sized> DocumentListingService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl<S: ?Sized> Clone for DocumentListingService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

#[async_trait]
impl<S> ListingService for DocumentListingService<S>
where
    S: DocumentStore + ?Sized,
{
    async fn create(&self, listing: Document) -> Result<InsertAck, Error> {
        let ack = self
            .store
            .insert(Collection::Listings, listing)
            .await
            .map_err(map_store_error)?;
        debug!(listing_id = %ack.inserted_id(), "listing created");
        Ok(ack)
    }

    async fn list_all(&self) -> Result<Vec<Document>, Error> {
        self.store
            .find(
                Collection::Listings,
                DocumentFilter::All,
                FindOptions::default(),
            )
            .await
            .map_err(map_store_error)
    }

    async fn search(&self, search: ListingSearch) -> Result<Vec<Document>, Error> {
        let filter = search
            .name
            .map_or(DocumentFilter::All, |needle| {
                DocumentFilter::name_contains(FOOD_NAME_FIELD, needle)
            });
        let options = search
            .order
            .map(|order| FindOptions::sorted_by(EXPIRED_DATE_FIELD, order))
            .unwrap_or_default();
        self.store
            .find(Collection::Listings, filter, options)
            .await
            .map_err(map_store_error)
    }

    async fn get(&self, id: DocumentId) -> Result<Option<Document>, Error> {
        self.store
            .find_one(Collection::Listings, DocumentFilter::ById(id))
            .await
            .map_err(map_store_error)
    }

    async fn list_for_donor(
        &self,
        viewer: &UserEmail,
        donor: &UserEmail,
    ) -> Result<Vec<Document>, Error> {
        if viewer != donor {
            debug!(%viewer, %donor, "donor listing requested by another user");
            return Err(Error::unauthorized("forbidden access"));
        }
        self.store
            .find(
                Collection::Listings,
                DocumentFilter::field_equals(DONOR_EMAIL_PATH, donor.as_ref()),
                FindOptions::default(),
            )
            .await
            .map_err(map_store_error)
    }

    async fn update(&self, id: DocumentId, patch: Document) -> Result<UpdateAck, Error> {
        self.store
            .update(Collection::Listings, DocumentFilter::ById(id), patch)
            .await
            .map_err(map_store_error)
    }

    async fn delete(&self, id: DocumentId) -> Result<DeleteAck, Error> {
        self.store
            .delete(Collection::Listings, DocumentFilter::ById(id))
            .await
            .map_err(map_store_error)
    }
}

#[cfg(test)]
#[path = "listings_tests.rs"]
mod tests;
