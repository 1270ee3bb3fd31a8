//! The in-progress order and the protocol that commits it.

mod builder;
mod commit;
mod state;

pub use builder::{OrderBuilder, OrderSnapshot, PriceLookup, StockLevels};
pub use commit::{CommitProtocol, CommitReceipt};
pub use state::CommitState;

use common::{InvalidItemName, Money};
use thiserror::Error;

/// Business-rule failures while building or committing an order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// The item is not in the catalog.
    #[error("Item not found: {item}")]
    NotFound { item: String },

    /// Quantity must be a positive whole number.
    #[error("Invalid quantity: {quantity} (must be greater than 0)")]
    InvalidQuantity { quantity: i64 },

    /// Not enough units on hand for the requested total.
    #[error("Insufficient stock for {item}: requested {requested}, available {available}")]
    InsufficientStock {
        item: String,
        available: u32,
        requested: u32,
    },

    /// Commit was attempted with no lines.
    #[error("Order has no items")]
    EmptyOrder,

    /// Commit was attempted without a customer name.
    #[error("Customer name is required")]
    MissingCustomerName,

    /// The customer name would corrupt the ledger record.
    #[error("Invalid customer name {name:?}: must not contain ',' or line breaks")]
    InvalidCustomerName { name: String },

    /// The item name is empty or contains a record delimiter.
    #[error("Invalid item name {name:?}: {reason}")]
    InvalidName {
        name: String,
        reason: InvalidItemName,
    },

    /// The line or order total no longer fits in a money amount.
    #[error("Amount too large: adding {item} would overflow the order total")]
    AmountOverflow { item: String },

    /// Unit prices must be greater than zero.
    #[error("Invalid price: {price} (must be greater than 0)")]
    InvalidPrice { price: Money },
}

impl OrderError {
    /// Short label used for the `reason` metric tag.
    pub fn reason(&self) -> &'static str {
        match self {
            OrderError::NotFound { .. } => "not_found",
            OrderError::InvalidQuantity { .. } => "invalid_quantity",
            OrderError::InsufficientStock { .. } => "insufficient_stock",
            OrderError::EmptyOrder => "empty_order",
            OrderError::MissingCustomerName => "missing_customer_name",
            OrderError::InvalidCustomerName { .. } => "invalid_customer_name",
            OrderError::InvalidName { .. } => "invalid_name",
            OrderError::InvalidPrice { .. } => "invalid_price",
            OrderError::AmountOverflow { .. } => "amount_overflow",
        }
    }
}
