//! Keelson Store - SQLite persistence for the order aggregate
//!
//! Provides:
//! - Connection management helpers
//! - Embedded SQL migrations with checksums and idempotent application
//! - Row-access mappers per entity type (select/insert/update/delete)
//! - Related-aggregate resolvers (customers, products)
//! - The persistence orchestrator (`OrderRepository`) sequencing root and
//!   child writes under optimistic concurrency control
//!
//! Transaction management stays with the caller: every operation takes a
//! `&rusqlite::Connection`, which may or may not be inside an open
//! transaction.

pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;
pub mod rows;

// Re-export key types
pub use errors::Result;
pub use repo::{CustomerRepository, OrderRepository, ProductRepository};
