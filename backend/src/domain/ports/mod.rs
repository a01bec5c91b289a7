//! Domain ports for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod document_store;
mod food_request_service;
mod listing_service;

#[cfg(test)]
pub use document_store::MockDocumentStore;
pub use document_store::{
    DocumentFilter, DocumentStore, DocumentStoreError, FindOptions, SortOrder, SortSpec,
};
#[cfg(test)]
pub use food_request_service::MockFoodRequestService;
pub use food_request_service::FoodRequestService;
#[cfg(test)]
pub use listing_service::MockListingService;
pub use listing_service::{ListingSearch, ListingService};
