//! Keelson Core - Generic aggregate-persistence machinery
//!
//! This crate provides the foundational contracts for persisting an
//! in-memory object graph (a root entity plus its owned children) with
//! minimal writes under optimistic concurrency control:
//! - Tagged identity state for child entities (`Identity`)
//! - Field-level delta computation (`Diffable` / `Delta`)
//! - New/Changed/Removed collection reconciliation (`reconcile`)
//! - Snapshot-carrying aggregate wrapper (`Aggregate`)
//! - Canonical error taxonomy and logging facility
//!
//! The crate knows about one aggregate at a time. SQL execution, row
//! mapping, transaction management and related-aggregate lookup are
//! collaborator concerns layered on top (see `keelson-store`).

pub mod aggregate;
pub mod delta;
pub mod errors;
pub mod identity;
pub mod logging;
pub mod reconcile;

// Re-export commonly used types
pub use aggregate::{Aggregate, AggregateRoot};
pub use delta::{changed, Delta, Diffable};
pub use errors::{KeelsonError, Result};
pub use identity::Identity;
pub use reconcile::{reconcile, ChildEntity, Reconciliation};
