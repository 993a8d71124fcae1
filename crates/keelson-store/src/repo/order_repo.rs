//! Order persistence orchestrator
//!
//! `save` writes an existing aggregate in a fixed order: the
//! version-checked root update first, then child deletes, child updates
//! and child inserts. The root update doubles as the concurrency gate;
//! if it affects zero rows the save stops before any child write.

use std::collections::HashSet;

use chrono::{TimeZone, Utc};
use keelson_core::{Aggregate, AggregateRoot, Diffable, Identity, KeelsonError};
use keelson_domain::{Order, OrderStatus};
use rusqlite::Connection;
use tracing::debug;

use crate::errors::{corrupt_row, Result};
use crate::repo::{CustomerRepository, ProductRepository};
use crate::rows::{item_from_row, OrderItemRow, OrderItemRowMapper, OrderRow, OrderRowMapper};

/// Persistence orchestrator for the order aggregate
pub struct OrderRepository;

impl OrderRepository {
    /// Load an order with its items, resolving the customer and product
    /// references, and capture the snapshot for later change detection.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no order with this id exists, and a
    /// persistence error if a stored row violates the schema's
    /// assumptions (unknown status code, dangling product reference).
    pub fn find_by_id(conn: &Connection, id: &str) -> Result<Aggregate<Order>> {
        let row = OrderRowMapper::select_by_primary_key(conn, id)?
            .ok_or_else(|| KeelsonError::not_found("order", id))?;

        let customer = CustomerRepository::find_by_id(conn, &row.customer_id)?;

        let item_rows = OrderItemRowMapper::select_by_order_id(conn, id)?;
        let product_ids: Vec<String> =
            item_rows.iter().map(|r| r.product_id.clone()).collect();
        let products = ProductRepository::get_map_by_ids(conn, &product_ids)?;

        let mut items = Vec::with_capacity(item_rows.len());
        for item_row in &item_rows {
            let product = products
                .get(&item_row.product_id)
                .cloned()
                .ok_or_else(|| {
                    corrupt_row("order_items", id, "references a missing product")
                })?;
            items.push(item_from_row(item_row, product));
        }

        let status = OrderStatus::parse(&row.status)
            .ok_or_else(|| corrupt_row("orders", id, "unknown status code"))?;
        let create_time = Utc
            .timestamp_millis_opt(row.create_time)
            .single()
            .ok_or_else(|| corrupt_row("orders", id, "create_time out of range"))?;

        let order = Order {
            id: row.id,
            customer,
            status,
            create_time,
            total_price: row.total_price,
            version: row.version,
            items,
        };

        debug!(order_id = id, items = order.items.len(), "order loaded");
        Ok(Aggregate::loaded(order))
    }

    /// Persist the aggregate's changes.
    ///
    /// A new aggregate is inserted whole. An unchanged aggregate is a
    /// no-op. A changed aggregate gets a selective, version-checked root
    /// update followed by the reconciled child writes. On success the
    /// in-memory version is bumped and the snapshot is re-captured, so
    /// an immediately repeated save writes nothing.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the stored version no longer matches the
    /// one the aggregate was loaded with.
    pub fn save(conn: &Connection, aggregate: &mut Aggregate<Order>) -> Result<()> {
        if aggregate.is_new() {
            return Self::insert_whole(conn, aggregate);
        }
        if !aggregate.is_changed() {
            debug!(order_id = %aggregate.root().id, "order unchanged, skipping save");
            return Ok(());
        }

        let order_id = aggregate.root().id.clone();
        let snapshot = aggregate.snapshot().ok_or_else(|| KeelsonError::Internal {
            message: "changed aggregate has no snapshot".to_string(),
        })?;

        let delta = Order::diff(snapshot, aggregate.root());
        let before_keys: HashSet<i64> = snapshot
            .items
            .iter()
            .filter_map(|item| item.id.into_assigned())
            .collect();
        let removed_ids: Vec<i64> = aggregate
            .find_removed_entities(|o| o.items.as_slice())
            .into_iter()
            .filter_map(|item| item.id.into_assigned())
            .collect();
        let changed_rows: Vec<OrderItemRow> = aggregate
            .find_changed_entities(|o| o.items.as_slice())
            .into_iter()
            .map(|item| OrderItemRow::from_item(&order_id, item))
            .collect();

        // The root update carries the version check; it must succeed
        // before any child row is touched.
        let affected = OrderRowMapper::update_by_primary_key_selective(conn, &delta)?;
        if affected != 1 {
            return Err(KeelsonError::conflict("order", &order_id));
        }

        for item_id in &removed_ids {
            let affected = OrderItemRowMapper::delete_by_primary_key(conn, *item_id)?;
            if affected != 1 {
                return Err(KeelsonError::conflict("order item", item_id.to_string()));
            }
        }
        for row in &changed_rows {
            let affected = OrderItemRowMapper::update_by_primary_key(conn, row)?;
            if affected != 1 {
                let item_id = row
                    .id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| order_id.clone());
                return Err(KeelsonError::conflict("order item", item_id));
            }
        }

        let mut inserted = 0usize;
        for item in aggregate.root_mut().items.iter_mut() {
            let is_new = match item.id {
                Identity::Unassigned => true,
                Identity::Assigned(key) => !before_keys.contains(&key),
            };
            if is_new {
                let row = OrderItemRow::from_item(&order_id, item);
                let assigned = OrderItemRowMapper::insert(conn, &row)?;
                item.id = Identity::Assigned(assigned);
                inserted += 1;
            }
        }

        aggregate.root_mut().set_version(delta.version + 1);
        aggregate.mark_persisted();

        debug!(
            order_id = %order_id,
            removed = removed_ids.len(),
            changed = changed_rows.len(),
            inserted,
            "order saved"
        );
        Ok(())
    }

    /// Delete the aggregate, conditioned on the version read at load
    /// time. The root delete carries the check; item rows follow.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the order is already gone or was changed by
    /// another actor since it was loaded.
    pub fn remove(conn: &Connection, aggregate: &Aggregate<Order>) -> Result<()> {
        let root = aggregate.root();
        let affected = OrderRowMapper::delete(conn, &root.id, root.version())?;
        if affected != 1 {
            return Err(KeelsonError::conflict("order", &root.id));
        }
        // Cleanup of whatever the cascade did not already cover
        OrderItemRowMapper::delete_by_order_id(conn, &root.id)?;

        debug!(order_id = %root.id, "order removed");
        Ok(())
    }

    fn insert_whole(conn: &Connection, aggregate: &mut Aggregate<Order>) -> Result<()> {
        let order_id = aggregate.root().id.clone();
        OrderRowMapper::insert(conn, &OrderRow::from_order(aggregate.root()))?;

        for item in aggregate.root_mut().items.iter_mut() {
            let row = OrderItemRow::from_item(&order_id, item);
            let assigned = OrderItemRowMapper::insert(conn, &row)?;
            item.id = Identity::Assigned(assigned);
        }

        aggregate.mark_persisted();
        debug!(order_id = %order_id, "order inserted");
        Ok(())
    }
}
