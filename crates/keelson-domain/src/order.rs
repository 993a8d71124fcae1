use chrono::{DateTime, Utc};
use keelson_core::{changed, AggregateRoot, ChildEntity, Delta, Diffable, Identity};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::customer::Customer;
use crate::product::Product;

/// Order lifecycle status, stored as a stable string code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Open,
    Paid,
    Shipped,
    Cancelled,
}

impl OrderStatus {
    /// Stable code used in the row representation
    pub fn code(&self) -> &'static str {
        match self {
            OrderStatus::Open => "OPEN",
            OrderStatus::Paid => "PAID",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    /// Parse a stored code back into a status
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "OPEN" => Some(OrderStatus::Open),
            "PAID" => Some(OrderStatus::Paid),
            "SHIPPED" => Some(OrderStatus::Shipped),
            "CANCELLED" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }
}

/// A line of an order: one product and a quantity.
///
/// Owned exclusively by the order; created, updated and deleted only as
/// part of the order's save/remove. The store assigns the identity on
/// first insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: Identity<i64>,
    pub product: Product,
    pub quantity: f64,
}

impl OrderItem {
    /// A line that has never been persisted
    pub fn new(product: Product, quantity: f64) -> Self {
        Self {
            id: Identity::Unassigned,
            product,
            quantity,
        }
    }

    pub fn subtotal(&self) -> f64 {
        self.product.price * self.quantity
    }
}

/// Sparse change-set for one order item
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItemDelta {
    pub id: Identity<i64>,
    pub product_id: Option<String>,
    pub quantity: Option<f64>,
}

impl Delta for OrderItemDelta {
    fn is_dirty(&self) -> bool {
        self.product_id.is_some() || self.quantity.is_some()
    }
}

impl Diffable for OrderItem {
    type Delta = OrderItemDelta;

    fn diff(old: &Self, current: &Self) -> Self::Delta {
        OrderItemDelta {
            id: current.id,
            product_id: changed(&old.product.id, &current.product.id),
            quantity: changed(&old.quantity, &current.quantity),
        }
    }
}

impl ChildEntity for OrderItem {
    type Key = i64;

    fn identity(&self) -> Identity<i64> {
        self.id
    }
}

/// Order aggregate root
///
/// Holds one owned collection of items plus a reference to the customer
/// aggregate. The `version` field is the optimistic-concurrency token:
/// the store increments it on every root update and rejects writes whose
/// supplied version no longer matches the stored one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub customer: Customer,
    pub status: OrderStatus,
    pub create_time: DateTime<Utc>,
    pub total_price: f64,
    pub version: i64,
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Construct an order with a caller-assigned id
    pub fn new(id: impl Into<String>, customer: Customer) -> Self {
        Self {
            id: id.into(),
            customer,
            status: OrderStatus::Open,
            create_time: Utc::now(),
            total_price: 0.0,
            version: 1,
            items: Vec::new(),
        }
    }

    /// Construct an order with a generated id
    pub fn create(customer: Customer) -> Self {
        Self::new(Uuid::new_v4().to_string(), customer)
    }

    /// Add a line for the given product and recompute the total
    pub fn add_item(&mut self, product: Product, quantity: f64) {
        self.items.push(OrderItem::new(product, quantity));
        self.recalculate_total();
    }

    /// Drop the line with the given assigned identity and recompute the
    /// total. Lines that were never persisted are unaffected.
    pub fn remove_item(&mut self, item_id: i64) {
        self.items
            .retain(|item| item.id != Identity::Assigned(item_id));
        self.recalculate_total();
    }

    fn recalculate_total(&mut self) {
        self.total_price = self.items.iter().map(OrderItem::subtotal).sum();
    }
}

impl AggregateRoot for Order {
    type Id = String;

    fn id(&self) -> &String {
        &self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn set_version(&mut self, version: i64) {
        self.version = version;
    }
}

/// Sparse change-set for the order row.
///
/// Always carries the identity and the version read at load time, never
/// unchanged fields. Items are reconciled separately; they have no
/// representation here.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDelta {
    pub id: String,
    /// Version as of the snapshot, used for the optimistic check
    pub version: i64,
    pub customer_id: Option<String>,
    pub status: Option<OrderStatus>,
    pub create_time: Option<DateTime<Utc>>,
    pub total_price: Option<f64>,
}

impl Delta for OrderDelta {
    fn is_dirty(&self) -> bool {
        self.customer_id.is_some()
            || self.status.is_some()
            || self.create_time.is_some()
            || self.total_price.is_some()
    }
}

impl Diffable for Order {
    type Delta = OrderDelta;

    fn diff(old: &Self, current: &Self) -> Self::Delta {
        OrderDelta {
            id: current.id.clone(),
            version: old.version,
            customer_id: changed(&old.customer.id, &current.customer.id),
            status: changed(&old.status, &current.status),
            create_time: changed(&old.create_time, &current.create_time),
            total_price: changed(&old.total_price, &current.total_price),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer() -> Customer {
        Customer::new("CU01", "Ada")
    }

    fn product(id: &str, price: f64) -> Product {
        Product::new(id, "widget", price)
    }

    #[test]
    fn test_diff_of_identical_orders_is_clean() {
        let order = Order::new("O001", customer());
        let copy = order.clone();

        let delta = Order::diff(&order, &copy);

        assert!(!delta.is_dirty());
        assert_eq!(delta.id, "O001");
        assert_eq!(delta.version, 1);
        assert_eq!(delta.customer_id, None);
        assert_eq!(delta.status, None);
        assert_eq!(delta.create_time, None);
        assert_eq!(delta.total_price, None);
    }

    #[test]
    fn test_diff_carries_only_changed_fields() {
        let old = Order::new("O001", customer());
        let mut current = old.clone();
        current.status = OrderStatus::Shipped;

        let delta = Order::diff(&old, &current);

        assert!(delta.is_dirty());
        assert_eq!(delta.status, Some(OrderStatus::Shipped));
        assert_eq!(delta.customer_id, None);
        assert_eq!(delta.total_price, None);
    }

    #[test]
    fn test_diff_version_is_the_snapshot_version() {
        let old = Order::new("O001", customer());
        let mut current = old.clone();
        current.version = 9; // must not leak into the delta token
        current.status = OrderStatus::Paid;

        let delta = Order::diff(&old, &current);
        assert_eq!(delta.version, 1);
    }

    #[test]
    fn test_add_item_recomputes_total() {
        let mut order = Order::new("O001", customer());
        order.add_item(product("P1", 2.5), 4.0);
        order.add_item(product("P2", 10.0), 1.0);

        assert_eq!(order.items.len(), 2);
        assert!((order.total_price - 20.0).abs() < f64::EPSILON);
        assert!(order.items.iter().all(|i| !i.id.is_assigned()));
    }

    #[test]
    fn test_remove_item_by_assigned_identity() {
        let mut order = Order::new("O001", customer());
        order.add_item(product("P1", 3.0), 2.0);
        order.items[0].id = Identity::Assigned(11);

        order.remove_item(11);
        assert!(order.items.is_empty());
        assert_eq!(order.total_price, 0.0);
    }

    #[test]
    fn test_item_diff_detects_quantity_change() {
        let old = OrderItem {
            id: Identity::Assigned(1),
            product: product("P1", 3.0),
            quantity: 2.0,
        };
        let mut current = old.clone();
        current.quantity = 5.0;

        let delta = OrderItem::diff(&old, &current);
        assert!(delta.is_dirty());
        assert_eq!(delta.quantity, Some(5.0));
        assert_eq!(delta.product_id, None);
        assert_eq!(delta.id, Identity::Assigned(1));
    }

    #[test]
    fn test_order_serializes_with_identity_state() {
        let mut order = Order::new("O001", customer());
        order.add_item(product("P1", 2.5), 4.0);
        order.items[0].id = Identity::Assigned(7);

        let json = serde_json::to_string(&order).unwrap();
        let back: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(back, order);
        assert_eq!(back.items[0].id, Identity::Assigned(7));
    }

    #[test]
    fn test_status_codes_round_trip() {
        for status in [
            OrderStatus::Open,
            OrderStatus::Paid,
            OrderStatus::Shipped,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(OrderStatus::parse(status.code()), Some(status));
        }
        assert_eq!(OrderStatus::parse("BOGUS"), None);
    }
}
