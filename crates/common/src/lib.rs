//! Shared value types for the counter point-of-sale system.

mod money;
mod types;

pub use money::{Money, ParseMoneyError};
pub use types::{
    CatalogEntry, CommittedOrder, InvalidItemName, InvalidOrderId, InventoryEntry, ItemName,
    OrderId, OrderLine, OrderStatus, RESERVED_CHARS, TIMESTAMP_FORMAT,
};
