//! Row-access services
//!
//! One mapper per entity type, each a unit struct with associated
//! functions taking a `&Connection`. Row structs mirror table columns;
//! mapping between rows and domain objects lives beside each mapper.

mod order_item_row;
mod order_row;

pub use order_item_row::{item_from_row, OrderItemRow, OrderItemRowMapper};
pub use order_row::{OrderRow, OrderRowMapper};
