use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Money;

/// Characters that separate fields in the line-oriented record files.
pub const RESERVED_CHARS: [char; 5] = [',', ';', ':', '\n', '\r'];

/// Timestamp layout used for committed orders (second precision).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Error returned when an item name cannot be used as a record key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidItemName {
    #[error("item name is empty")]
    Empty,

    #[error("item name {0:?} contains a reserved character")]
    ReservedChar(String),
}

/// Name of a sellable item; the key shared by catalog and inventory.
///
/// Names are trimmed and never contain a record delimiter, so they survive
/// a write/read cycle through every store unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemName(String);

impl ItemName {
    pub fn new(name: impl AsRef<str>) -> Result<Self, InvalidItemName> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(InvalidItemName::Empty);
        }
        if name.contains(RESERVED_CHARS) {
            return Err(InvalidItemName::ReservedChar(name.to_string()));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ItemName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ItemName {
    type Error = InvalidItemName;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ItemName> for String {
    fn from(name: ItemName) -> Self {
        name.0
    }
}

impl AsRef<str> for ItemName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for ItemName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Error returned when an order identifier is not `ORD` followed by digits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid order id: {0:?}")]
pub struct InvalidOrderId(pub String);

/// Sequential identifier of a committed order, rendered as `ORD0001`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrderId(u64);

impl OrderId {
    pub const PREFIX: &'static str = "ORD";

    pub fn new(sequence: u64) -> Self {
        Self(sequence)
    }

    /// Returns the numeric suffix.
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{:04}", Self::PREFIX, self.0)
    }
}

impl FromStr for OrderId {
    type Err = InvalidOrderId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .trim()
            .strip_prefix(Self::PREFIX)
            .filter(|d| !d.is_empty() && d.chars().all(|c| c.is_ascii_digit()))
            .ok_or_else(|| InvalidOrderId(s.to_string()))?;
        digits
            .parse()
            .map(Self)
            .map_err(|_| InvalidOrderId(s.to_string()))
    }
}

impl TryFrom<String> for OrderId {
    type Error = InvalidOrderId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OrderId> for String {
    fn from(id: OrderId) -> Self {
        id.to_string()
    }
}

/// A catalog record: the price an item sells for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: ItemName,
    pub unit_price: Money,
}

/// An inventory record: how many units are on hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub name: ItemName,
    pub quantity: u32,
}

/// One line of an order. The unit price is the one seen when the line was added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub item_name: ItemName,
    pub unit_price: Money,
    pub quantity: u32,
}

impl OrderLine {
    pub fn new(item_name: ItemName, unit_price: Money, quantity: u32) -> Self {
        Self {
            item_name,
            unit_price,
            quantity,
        }
    }

    /// Returns `unit_price * quantity`.
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

/// Lifecycle status recorded with a committed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[non_exhaustive]
pub enum OrderStatus {
    #[default]
    Completed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Completed" => Ok(OrderStatus::Completed),
            other => Err(format!("unknown order status: {other:?}")),
        }
    }
}

/// An order as recorded in the ledger. Never modified after it is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommittedOrder {
    pub id: OrderId,
    pub timestamp: NaiveDateTime,
    pub customer_name: String,
    pub lines: Vec<OrderLine>,
    pub total: Money,
    pub status: OrderStatus,
}

impl CommittedOrder {
    /// Sum of the embedded lines' totals.
    pub fn lines_total(&self) -> Money {
        self.lines.iter().map(OrderLine::line_total).sum()
    }

    pub fn total_quantity(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }
}
