//! Builders for the HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tracing::warn;

use rfood::domain::ports::DocumentStore;
use rfood::inbound::http::state::HttpState;
use rfood::outbound::memory::InMemoryDocumentStore;
use rfood::outbound::persistence::{DbPool, DieselDocumentStore};

/// Select the document store: PostgreSQL when a pool is configured,
/// otherwise a process-local store that is lost on restart.
fn build_document_store(pool: Option<&DbPool>) -> Arc<dyn DocumentStore> {
    match pool {
        Some(pool) => Arc::new(DieselDocumentStore::new(pool.clone())),
        None => {
            warn!("no database configured; listings are kept in memory only");
            Arc::new(InMemoryDocumentStore::new())
        }
    }
}

/// Build the shared HTTP state over the configured store.
pub(super) fn build_http_state(pool: Option<&DbPool>) -> web::Data<HttpState> {
    web::Data::new(HttpState::from_store(
        build_document_store(pool),
        Arc::new(DefaultClock),
    ))
}
