//! Port for the collection-scoped document store.
//!
//! Adapters persist schemaless JSON objects in named collections. The port
//! owns identifier assignment: `insert` writes a fresh [`DocumentId`] into the
//! `_id` field, replacing anything the client sent.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{Collection, DeleteAck, Document, DocumentId, InsertAck, UpdateAck};

use super::define_port_error;

define_port_error! {
    /// Errors raised by document store adapters.
    pub enum DocumentStoreError {
        /// The store could not be reached or a connection was lost.
        Connection { message: String } =>
            "document store connection failed: {message}",
        /// A statement failed or a document could not be (de)serialised.
        Query { message: String } =>
            "document store query failed: {message}",
    }
}

/// Selects documents within a collection.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentFilter {
    /// Every document.
    All,
    /// The document whose `_id` matches.
    ById(DocumentId),
    /// Documents whose value at a dotted `path` equals `value`.
    FieldEquals {
        /// Dotted path such as `donor.donor_email`.
        path: String,
        /// Value compared for JSON equality.
        value: Value,
    },
    /// Documents whose string `field` contains `needle`, ignoring case.
    NameContains {
        /// Top-level field searched.
        field: String,
        /// Substring to look for; matched literally.
        needle: String,
    },
}

impl DocumentFilter {
    /// Equality on a dotted path.
    pub fn field_equals(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::FieldEquals {
            path: path.into(),
            value: value.into(),
        }
    }

    /// Case-insensitive substring match on `field`.
    pub fn name_contains(field: impl Into<String>, needle: impl Into<String>) -> Self {
        Self::NameContains {
            field: field.into(),
            needle: needle.into(),
        }
    }
}

/// Direction applied to a sorted find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Sort key for a find.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }
}

/// Options for [`DocumentStore::find`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindOptions {
    /// Result ordering; insertion order when absent.
    pub sort: Option<SortSpec>,
}

impl FindOptions {
    /// Sort the results by `field` in `order`.
    #[must_use]
    pub fn sorted_by(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            sort: Some(SortSpec::new(field, order)),
        }
    }
}

/// Collection-scoped create/read/update/delete over JSON documents.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Store `document`, assigning it a new identifier.
    async fn insert(
        &self,
        collection: Collection,
        document: Document,
    ) -> Result<InsertAck, DocumentStoreError>;

    /// Every document matching `filter`, ordered per `options`.
    async fn find(
        &self,
        collection: Collection,
        filter: DocumentFilter,
        options: FindOptions,
    ) -> Result<Vec<Document>, DocumentStoreError>;

    /// The first document matching `filter`.
    async fn find_one(
        &self,
        collection: Collection,
        filter: DocumentFilter,
    ) -> Result<Option<Document>, DocumentStoreError>;

    /// Merge the top-level fields of `patch` into the first matching document.
    ///
    /// `_id` in the patch is ignored.
    async fn update(
        &self,
        collection: Collection,
        filter: DocumentFilter,
        patch: Document,
    ) -> Result<UpdateAck, DocumentStoreError>;

    /// Remove at most one document matching `filter`.
    async fn delete(
        &self,
        collection: Collection,
        filter: DocumentFilter,
    ) -> Result<DeleteAck, DocumentStoreError>;

    /// Cheap round trip proving the store is reachable.
    async fn ping(&self) -> Result<(), DocumentStoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn constructors_build_expected_variants() {
        assert_eq!(
            DocumentFilter::field_equals("donor.donor_email", "a@b.c"),
            DocumentFilter::FieldEquals {
                path: "donor.donor_email".into(),
                value: json!("a@b.c"),
            }
        );
        assert_eq!(
            FindOptions::sorted_by("expired_date", SortOrder::Descending).sort,
            Some(SortSpec::new("expired_date", SortOrder::Descending))
        );
        assert!(FindOptions::default().sort.is_none());
    }

    #[rstest]
    fn errors_carry_their_message() {
        let err = DocumentStoreError::connection("pool timed out");
        assert_eq!(
            err.to_string(),
            "document store connection failed: pool timed out"
        );
    }
}
