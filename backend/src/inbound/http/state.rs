//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data`, so they depend only
//! on domain ports and can be exercised without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{DocumentStore, FoodRequestService, ListingService};
use crate::domain::{DocumentFoodRequestService, DocumentListingService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub listings: Arc<dyn ListingService>,
    pub food_requests: Arc<dyn FoodRequestService>,
    /// Time source for session issuance and expiry.
    pub clock: Arc<dyn Clock>,
}

impl HttpState {
    pub fn new(
        listings: Arc<dyn ListingService>,
        food_requests: Arc<dyn FoodRequestService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            listings,
            food_requests,
            clock,
        }
    }

    /// Wire the document-backed services over one store.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use rfood::inbound::http::state::HttpState;
    /// use rfood::outbound::memory::InMemoryDocumentStore;
    ///
    /// let state = HttpState::from_store(
    ///     Arc::new(InMemoryDocumentStore::new()),
    ///     Arc::new(DefaultClock),
    /// );
    /// let _listings = state.listings.clone();
    /// ```
    pub fn from_store(store: Arc<dyn DocumentStore>, clock: Arc<dyn Clock>) -> Self {
        Self::new(
            Arc::new(DocumentListingService::new(Arc::clone(&store))),
            Arc::new(DocumentFoodRequestService::new(store)),
            clock,
        )
    }
}
