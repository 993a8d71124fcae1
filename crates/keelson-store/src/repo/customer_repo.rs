//! Customer resolver

use crate::errors::{from_rusqlite, Result};
use keelson_core::KeelsonError;
use keelson_domain::Customer;
use rusqlite::{params, Connection, OptionalExtension};

/// Related-aggregate resolver for customers
pub struct CustomerRepository;

impl CustomerRepository {
    /// Resolve a customer by id
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such customer exists.
    pub fn find_by_id(conn: &Connection, id: &str) -> Result<Customer> {
        conn.query_row(
            "SELECT id, name FROM customers WHERE id = ?1",
            [id],
            |row| {
                Ok(Customer {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            },
        )
        .optional()
        .map_err(from_rusqlite)?
        .ok_or_else(|| KeelsonError::not_found("customer", id))
    }

    /// Insert a customer (seed/test convenience)
    pub fn insert(conn: &Connection, customer: &Customer) -> Result<()> {
        conn.execute(
            "INSERT INTO customers (id, name) VALUES (?1, ?2)",
            params![customer.id, customer.name],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }
}
