//! Order row mapper
//!
//! The selective update builds its SET list from the sparse delta, so a
//! save never writes an unchanged column. Every update and the
//! version-checked delete are conditioned on the version read at load
//! time; the caller treats a zero affected-row count as a conflict.

use crate::errors::{from_rusqlite, Result};
use keelson_domain::{Order, OrderDelta};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

/// Column-level representation of one `orders` row
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRow {
    pub id: String,
    pub customer_id: String,
    pub status: String,
    /// Unix milliseconds
    pub create_time: i64,
    pub total_price: f64,
    pub version: i64,
}

impl OrderRow {
    /// Full row representation of the current root state
    pub fn from_order(order: &Order) -> Self {
        Self {
            id: order.id.clone(),
            customer_id: order.customer.id.clone(),
            status: order.status.code().to_string(),
            create_time: order.create_time.timestamp_millis(),
            total_price: order.total_price,
            version: order.version,
        }
    }
}

/// Row-access service for the `orders` table
pub struct OrderRowMapper;

impl OrderRowMapper {
    /// Load one row by primary key
    pub fn select_by_primary_key(conn: &Connection, id: &str) -> Result<Option<OrderRow>> {
        conn.query_row(
            "SELECT id, customer_id, status, create_time, total_price, version
             FROM orders WHERE id = ?1",
            [id],
            |row| {
                Ok(OrderRow {
                    id: row.get(0)?,
                    customer_id: row.get(1)?,
                    status: row.get(2)?,
                    create_time: row.get(3)?,
                    total_price: row.get(4)?,
                    version: row.get(5)?,
                })
            },
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// Insert a full row (first-time save)
    pub fn insert(conn: &Connection, row: &OrderRow) -> Result<usize> {
        conn.execute(
            "INSERT INTO orders (id, customer_id, status, create_time, total_price, version)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                row.id,
                row.customer_id,
                row.status,
                row.create_time,
                row.total_price,
                row.version,
            ],
        )
        .map_err(from_rusqlite)
    }

    /// Update only the columns carried by the delta, bump the version,
    /// and condition the whole statement on the version the delta was
    /// computed against. Returns the affected-row count; zero means the
    /// row was modified or removed by another actor.
    pub fn update_by_primary_key_selective(conn: &Connection, delta: &OrderDelta) -> Result<usize> {
        let mut sets: Vec<&str> = vec!["version = version + 1"];
        let mut values: Vec<Value> = Vec::new();

        if let Some(customer_id) = &delta.customer_id {
            sets.push("customer_id = ?");
            values.push(Value::from(customer_id.clone()));
        }
        if let Some(status) = &delta.status {
            sets.push("status = ?");
            values.push(Value::from(status.code().to_string()));
        }
        if let Some(create_time) = &delta.create_time {
            sets.push("create_time = ?");
            values.push(Value::from(create_time.timestamp_millis()));
        }
        if let Some(total_price) = delta.total_price {
            sets.push("total_price = ?");
            values.push(Value::from(total_price));
        }

        let sql = format!(
            "UPDATE orders SET {} WHERE id = ? AND version = ?",
            sets.join(", ")
        );
        values.push(Value::from(delta.id.clone()));
        values.push(Value::from(delta.version));

        conn.execute(&sql, params_from_iter(values))
            .map_err(from_rusqlite)
    }

    /// Delete by primary key, conditioned on the version read at load
    /// time. Returns the affected-row count.
    pub fn delete(conn: &Connection, id: &str, version: i64) -> Result<usize> {
        conn.execute(
            "DELETE FROM orders WHERE id = ?1 AND version = ?2",
            params![id, version],
        )
        .map_err(from_rusqlite)
    }
}
