//! Repository layer
//!
//! `OrderRepository` is the persistence orchestrator for the order
//! aggregate; `CustomerRepository` and `ProductRepository` resolve the
//! aggregates orders reference by id.

mod customer_repo;
mod order_repo;
mod product_repo;

pub use customer_repo::CustomerRepository;
pub use order_repo::OrderRepository;
pub use product_repo::ProductRepository;
