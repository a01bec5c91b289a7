//! Process-local document store.
//!
//! Used by tests and by development runs without `RFOOD_DATABASE_URL`. Data
//! lives only as long as the process. Ordering follows the document-store
//! rules the HTTP surface promises: missing or `null` values first, then
//! numbers, then strings, with ties kept in insertion order.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::domain::ports::{
    DocumentFilter, DocumentStore, DocumentStoreError, FindOptions, SortOrder,
};
use crate::domain::{
    Collection, DeleteAck, Document, DocumentId, ID_FIELD, InsertAck, UpdateAck,
};

/// In-memory [`DocumentStore`] keyed by collection.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held in `collection`.
    pub async fn len(&self, collection: Collection) -> usize {
        self.collections
            .read()
            .await
            .get(&collection)
            .map_or(0, Vec::len)
    }
}

/// Resolve a dotted `path` inside `document`.
pub(crate) fn lookup<'a>(document: &'a Document, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let first = segments.next()?;
    segments.try_fold(document.get(first)?, |value, segment| {
        value.as_object()?.get(segment)
    })
}

fn matches(document: &Document, filter: &DocumentFilter) -> bool {
    match filter {
        DocumentFilter::All => true,
        DocumentFilter::ById(id) => document
            .get(ID_FIELD)
            .and_then(Value::as_str)
            .is_some_and(|raw| raw == id.to_string()),
        DocumentFilter::FieldEquals { path, value } => lookup(document, path) == Some(value),
        DocumentFilter::NameContains { field, needle } => document
            .get(field)
            .and_then(Value::as_str)
            .is_some_and(|name| name.to_lowercase().contains(&needle.to_lowercase())),
    }
}

fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Number(_)) => 1,
        Some(Value::String(_)) => 2,
        Some(Value::Object(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Bool(_)) => 5,
    }
}

/// Compare two optional field values using document-store ordering.
pub(crate) fn compare_values(left: Option<&Value>, right: Option<&Value>) -> Ordering {
    type_rank(left)
        .cmp(&type_rank(right))
        .then_with(|| match (left, right) {
            (Some(Value::Number(a)), Some(Value::Number(b))) => {
                let a = a.as_f64().unwrap_or_default();
                let b = b.as_f64().unwrap_or_default();
                a.total_cmp(&b)
            }
            (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
            (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
            _ => Ordering::Equal,
        })
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn insert(
        &self,
        collection: Collection,
        mut document: Document,
    ) -> Result<InsertAck, DocumentStoreError> {
        let id = DocumentId::generate();
        document.insert(ID_FIELD.to_owned(), Value::String(id.to_string()));
        self.collections
            .write()
            .await
            .entry(collection)
            .or_default()
            .push(document);
        Ok(InsertAck::new(id))
    }

    async fn find(
        &self,
        collection: Collection,
        filter: DocumentFilter,
        options: FindOptions,
    ) -> Result<Vec<Document>, DocumentStoreError> {
        let guard = self.collections.read().await;
        let mut found: Vec<Document> = guard
            .get(&collection)
            .into_iter()
            .flatten()
            .filter(|doc| matches(doc, &filter))
            .cloned()
            .collect();
        drop(guard);

        if let Some(sort) = options.sort {
            found.sort_by(|a, b| {
                let ordering = compare_values(lookup(a, &sort.field), lookup(b, &sort.field));
                match sort.order {
                    SortOrder::Ascending => ordering,
                    SortOrder::Descending => ordering.reverse(),
                }
            });
        }
        Ok(found)
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: DocumentFilter,
    ) -> Result<Option<Document>, DocumentStoreError> {
        let guard = self.collections.read().await;
        Ok(guard
            .get(&collection)
            .and_then(|docs| docs.iter().find(|doc| matches(doc, &filter)))
            .cloned())
    }

    async fn update(
        &self,
        collection: Collection,
        filter: DocumentFilter,
        patch: Document,
    ) -> Result<UpdateAck, DocumentStoreError> {
        let mut guard = self.collections.write().await;
        let Some(target) = guard
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|doc| matches(doc, &filter)))
        else {
            return Ok(UpdateAck::new(0, 0));
        };

        let mut modified = false;
        for (key, value) in patch {
            if key == ID_FIELD {
                continue;
            }
            if target.get(&key) != Some(&value) {
                target.insert(key, value);
                modified = true;
            }
        }
        Ok(UpdateAck::new(1, u64::from(modified)))
    }

    async fn delete(
        &self,
        collection: Collection,
        filter: DocumentFilter,
    ) -> Result<DeleteAck, DocumentStoreError> {
        let mut guard = self.collections.write().await;
        let Some(docs) = guard.get_mut(&collection) else {
            return Ok(DeleteAck::new(0));
        };
        match docs.iter().position(|doc| matches(doc, &filter)) {
            Some(index) => {
                docs.remove(index);
                Ok(DeleteAck::new(1))
            }
            None => Ok(DeleteAck::new(0)),
        }
    }

    async fn ping(&self) -> Result<(), DocumentStoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests;
