//! PostgreSQL persistence using Diesel.
//!
//! Documents are stored as `JSONB` rows reached through `diesel-async` and a
//! `bb8` pool. Row structs and SQL stay private to this module; callers only
//! see [`DieselDocumentStore`] through the `DocumentStore` port.
//!
//! # Example
//!
//! ```no_run
//! use rfood::outbound::persistence::{DbPool, DieselDocumentStore, PoolConfig};
//!
//! # async fn connect() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/rfood")).await?;
//! let store = DieselDocumentStore::new(pool);
//! store.ensure_schema().await?;
//! # Ok(())
//! # }
//! ```

mod diesel_document_store;
pub(crate) mod diesel_helpers;
mod pool;

pub use diesel_document_store::DieselDocumentStore;
pub use pool::{DbPool, PoolConfig, PoolError};
