//! Driving port for food listing use-cases.
//!
//! HTTP handlers call this port; the production implementation lives in
//! [`crate::domain::DocumentListingService`] and reaches storage through the
//! [`super::DocumentStore`] port.

use async_trait::async_trait;

use crate::domain::{
    DeleteAck, Document, DocumentId, Error, InsertAck, UpdateAck, UserEmail,
};

use super::SortOrder;

/// Optional search and ordering applied to the listing feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingSearch {
    /// Case-insensitive substring matched against `food_name`.
    pub name: Option<String>,
    /// Ordering by `expired_date`.
    pub order: Option<SortOrder>,
}

impl ListingSearch {
    /// Interpret raw `sort` and `search` query values.
    ///
    /// Empty values count as absent. `asc` sorts ascending; any other
    /// non-empty `sort` sorts descending.
    ///
    /// # Examples
    /// ```
    /// use rfood::domain::ports::{ListingSearch, SortOrder};
    ///
    /// let search = ListingSearch::from_query(Some("desc"), Some(""));
    /// assert_eq!(search.order, Some(SortOrder::Descending));
    /// assert!(search.name.is_none());
    /// ```
    #[must_use]
    pub fn from_query(sort: Option<&str>, search: Option<&str>) -> Self {
        let order = sort.filter(|s| !s.is_empty()).map(|s| {
            if s == "asc" {
                SortOrder::Ascending
            } else {
                SortOrder::Descending
            }
        });
        let name = search.filter(|s| !s.is_empty()).map(str::to_owned);
        Self { name, order }
    }
}

/// Domain use-case port for listings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingService: Send + Sync {
    /// Store a new listing verbatim.
    async fn create(&self, listing: Document) -> Result<InsertAck, Error>;

    /// Every listing in insertion order.
    async fn list_all(&self) -> Result<Vec<Document>, Error>;

    /// Listings matching `search`.
    async fn search(&self, search: ListingSearch) -> Result<Vec<Document>, Error>;

    /// A single listing, `None` when absent.
    async fn get(&self, id: DocumentId) -> Result<Option<Document>, Error>;

    /// Listings donated by `donor`, visible only to the donor themselves.
    ///
    /// Fails with `unauthorized` (`forbidden access`) when `viewer` differs
    /// from `donor`.
    async fn list_for_donor(
        &self,
        viewer: &UserEmail,
        donor: &UserEmail,
    ) -> Result<Vec<Document>, Error>;

    /// Merge `patch` into the listing.
    async fn update(&self, id: DocumentId, patch: Document) -> Result<UpdateAck, Error>;

    /// Remove the listing.
    async fn delete(&self, id: DocumentId) -> Result<DeleteAck, Error>;
}
