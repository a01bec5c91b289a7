//! Outbound adapters implementing domain ports.
//!
//! - **memory**: process-local document store for tests and database-less runs
//! - **persistence**: PostgreSQL document store using Diesel
//!
//! Adapters translate between domain types and storage representations. They
//! contain no business logic.

pub mod memory;
pub mod persistence;
