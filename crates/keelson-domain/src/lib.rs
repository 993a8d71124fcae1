//! Keelson Domain - Sample aggregate exercising the core machinery
//!
//! An `Order` aggregate root owning `OrderItem` children, referencing a
//! `Customer` and per-item `Product` aggregates by id. This is the
//! concrete entity pair the generic delta/reconciliation contracts in
//! `keelson-core` are implemented against.

pub mod customer;
pub mod order;
pub mod product;

pub use customer::Customer;
pub use order::{Order, OrderDelta, OrderItem, OrderItemDelta, OrderStatus};
pub use product::Product;
