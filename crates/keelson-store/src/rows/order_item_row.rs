//! Order item row mapper
//!
//! Items are owned by their order: inserted, updated and deleted only as
//! part of the order's save/remove. The store assigns the identity
//! (rowid) on insert; `insert` and `insert_all` return the assigned ids
//! so the caller can backfill them into the in-memory children.

use crate::errors::{from_rusqlite, Result};
use keelson_core::Identity;
use keelson_domain::OrderItem;
use rusqlite::{params, Connection};

/// Column-level representation of one `order_items` row
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItemRow {
    /// `None` for rows not yet inserted
    pub id: Option<i64>,
    pub order_id: String,
    pub product_id: String,
    pub quantity: f64,
}

impl OrderItemRow {
    pub fn from_item(order_id: &str, item: &OrderItem) -> Self {
        Self {
            id: item.id.into_assigned(),
            order_id: order_id.to_string(),
            product_id: item.product.id.clone(),
            quantity: item.quantity,
        }
    }
}

/// Row-access service for the `order_items` table
pub struct OrderItemRowMapper;

impl OrderItemRowMapper {
    /// All item rows of one order, in identity order
    pub fn select_by_order_id(conn: &Connection, order_id: &str) -> Result<Vec<OrderItemRow>> {
        let mut stmt = conn
            .prepare(
                "SELECT id, order_id, product_id, quantity
                 FROM order_items WHERE order_id = ?1 ORDER BY id",
            )
            .map_err(from_rusqlite)?;

        let rows = stmt
            .query_map([order_id], |row| {
                Ok(OrderItemRow {
                    id: row.get(0)?,
                    order_id: row.get(1)?,
                    product_id: row.get(2)?,
                    quantity: row.get(3)?,
                })
            })
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        Ok(rows)
    }

    /// Insert one row and return the identity the store assigned (or the
    /// explicit one the row carried)
    pub fn insert(conn: &Connection, row: &OrderItemRow) -> Result<i64> {
        match row.id {
            Some(id) => {
                conn.execute(
                    "INSERT INTO order_items (id, order_id, product_id, quantity)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![id, row.order_id, row.product_id, row.quantity],
                )
                .map_err(from_rusqlite)?;
                Ok(id)
            }
            None => {
                conn.execute(
                    "INSERT INTO order_items (order_id, product_id, quantity)
                     VALUES (?1, ?2, ?3)",
                    params![row.order_id, row.product_id, row.quantity],
                )
                .map_err(from_rusqlite)?;
                Ok(conn.last_insert_rowid())
            }
        }
    }

    /// Batch insert, returning the assigned identities in input order
    pub fn insert_all(conn: &Connection, rows: &[OrderItemRow]) -> Result<Vec<i64>> {
        let mut ids = Vec::with_capacity(rows.len());
        for row in rows {
            ids.push(Self::insert(conn, row)?);
        }
        Ok(ids)
    }

    /// Full-row update by primary key. Returns the affected-row count;
    /// zero means the row is already gone.
    pub fn update_by_primary_key(conn: &Connection, row: &OrderItemRow) -> Result<usize> {
        let id = row.id.ok_or(keelson_core::KeelsonError::MissingIdentity {
            entity: "order item",
        })?;

        conn.execute(
            "UPDATE order_items SET order_id = ?1, product_id = ?2, quantity = ?3 WHERE id = ?4",
            params![row.order_id, row.product_id, row.quantity, id],
        )
        .map_err(from_rusqlite)
    }

    /// Delete one row by primary key. Returns the affected-row count.
    pub fn delete_by_primary_key(conn: &Connection, id: i64) -> Result<usize> {
        conn.execute("DELETE FROM order_items WHERE id = ?1", params![id])
            .map_err(from_rusqlite)
    }

    /// Delete all rows of one order. Best-effort cleanup after a root
    /// delete; no affected-row expectation.
    pub fn delete_by_order_id(conn: &Connection, order_id: &str) -> Result<usize> {
        conn.execute(
            "DELETE FROM order_items WHERE order_id = ?1",
            params![order_id],
        )
        .map_err(from_rusqlite)
    }
}

/// Rebuild a domain item from its row and the already-resolved product
pub fn item_from_row(row: &OrderItemRow, product: keelson_domain::Product) -> OrderItem {
    OrderItem {
        id: Identity::from(row.id),
        product,
        quantity: row.quantity,
    }
}
