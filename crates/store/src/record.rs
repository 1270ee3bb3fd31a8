//! Text codecs for the three record formats.
//!
//! ```text
//! catalog:    name,unitPrice
//! inventory:  name,quantity
//! ledger:     id,timestamp,customerName,itemsBlob,total,status
//!             itemsBlob = name:quantity:unitPrice[;name:quantity:unitPrice...]
//! ```
//!
//! Parsers return a [`RecordError`] instead of failing the whole load; the
//! stores log and skip such lines.

use chrono::NaiveDateTime;
use common::{
    CatalogEntry, CommittedOrder, InventoryEntry, ItemName, Money, OrderId, OrderLine,
    OrderStatus, TIMESTAMP_FORMAT,
};
use thiserror::Error;
use tracing::warn;

pub const FIELD_SEPARATOR: char = ',';
pub const LINE_ITEM_SEPARATOR: char = ';';
pub const LINE_ITEM_FIELD_SEPARATOR: char = ':';

const LEDGER_FIELDS: usize = 6;

/// Reason a single record could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("expected at least {expected} fields, found {found}")]
    MissingFields { expected: usize, found: usize },

    #[error("invalid item name {0:?}")]
    InvalidName(String),

    #[error("invalid price {0:?}")]
    InvalidPrice(String),

    #[error("invalid quantity {0:?}")]
    InvalidQuantity(String),

    #[error("invalid order id {0:?}")]
    InvalidOrderId(String),

    #[error("invalid timestamp {0:?}")]
    InvalidTimestamp(String),

    #[error("invalid status {0:?}")]
    InvalidStatus(String),
}

fn fields(line: &str, separator: char, expected: usize) -> Result<Vec<&str>, RecordError> {
    let fields: Vec<&str> = line.split(separator).map(str::trim).collect();
    if fields.len() < expected {
        return Err(RecordError::MissingFields {
            expected,
            found: fields.len(),
        });
    }
    Ok(fields)
}

fn parse_name(raw: &str) -> Result<ItemName, RecordError> {
    ItemName::new(raw).map_err(|_| RecordError::InvalidName(raw.to_string()))
}

fn parse_price(raw: &str) -> Result<Money, RecordError> {
    raw.parse::<Money>()
        .ok()
        .filter(Money::is_positive)
        .ok_or_else(|| RecordError::InvalidPrice(raw.to_string()))
}

fn parse_quantity(raw: &str) -> Result<u32, RecordError> {
    raw.parse()
        .map_err(|_| RecordError::InvalidQuantity(raw.to_string()))
}

pub fn format_catalog(entry: &CatalogEntry) -> String {
    format!("{}{FIELD_SEPARATOR}{}", entry.name, entry.unit_price)
}

pub fn parse_catalog(line: &str) -> Result<CatalogEntry, RecordError> {
    let fields = fields(line, FIELD_SEPARATOR, 2)?;
    Ok(CatalogEntry {
        name: parse_name(fields[0])?,
        unit_price: parse_price(fields[1])?,
    })
}

pub fn format_inventory(entry: &InventoryEntry) -> String {
    format!("{}{FIELD_SEPARATOR}{}", entry.name, entry.quantity)
}

pub fn parse_inventory(line: &str) -> Result<InventoryEntry, RecordError> {
    let fields = fields(line, FIELD_SEPARATOR, 2)?;
    Ok(InventoryEntry {
        name: parse_name(fields[0])?,
        quantity: parse_quantity(fields[1])?,
    })
}

fn format_line_item(line: &OrderLine) -> String {
    format!(
        "{}{sep}{}{sep}{}",
        line.item_name,
        line.quantity,
        line.unit_price,
        sep = LINE_ITEM_FIELD_SEPARATOR
    )
}

fn parse_line_item(raw: &str) -> Result<OrderLine, RecordError> {
    let fields = fields(raw, LINE_ITEM_FIELD_SEPARATOR, 3)?;
    let quantity = parse_quantity(fields[1])?;
    if quantity == 0 {
        return Err(RecordError::InvalidQuantity(fields[1].to_string()));
    }
    let unit_price = parse_price(fields[2])?;
    if unit_price.checked_multiply(quantity).is_none() {
        return Err(RecordError::InvalidQuantity(fields[1].to_string()));
    }
    Ok(OrderLine::new(parse_name(fields[0])?, unit_price, quantity))
}

pub fn format_ledger(order: &CommittedOrder) -> String {
    let items: Vec<String> = order.lines.iter().map(format_line_item).collect();
    [
        order.id.to_string(),
        order.timestamp.format(TIMESTAMP_FORMAT).to_string(),
        order.customer_name.clone(),
        items.join(&LINE_ITEM_SEPARATOR.to_string()),
        order.total.to_string(),
        order.status.to_string(),
    ]
    .join(&FIELD_SEPARATOR.to_string())
}

/// Reads only the leading id of a ledger record, however damaged the rest is.
pub fn parse_ledger_id(line: &str) -> Option<OrderId> {
    line.split(FIELD_SEPARATOR).next()?.trim().parse().ok()
}

/// Decodes a ledger record. Malformed line items inside the items blob are
/// logged and dropped; the rest of the order is kept.
pub fn parse_ledger(line: &str) -> Result<CommittedOrder, RecordError> {
    let fields = fields(line, FIELD_SEPARATOR, LEDGER_FIELDS)?;

    let id: OrderId = fields[0]
        .parse()
        .map_err(|_| RecordError::InvalidOrderId(fields[0].to_string()))?;
    let timestamp = NaiveDateTime::parse_from_str(fields[1], TIMESTAMP_FORMAT)
        .map_err(|_| RecordError::InvalidTimestamp(fields[1].to_string()))?;
    let customer_name = fields[2].to_string();
    let total: Money = fields[4]
        .parse()
        .map_err(|_| RecordError::InvalidPrice(fields[4].to_string()))?;
    let status: OrderStatus = fields[5]
        .parse()
        .map_err(|_| RecordError::InvalidStatus(fields[5].to_string()))?;

    let mut lines = Vec::new();
    for raw in fields[3]
        .split(LINE_ITEM_SEPARATOR)
        .filter(|raw| !raw.trim().is_empty())
    {
        match parse_line_item(raw) {
            Ok(item) => lines.push(item),
            Err(reason) => {
                warn!(order_id = %id, item = raw, %reason, "skipping malformed line item");
            }
        }
    }

    Ok(CommittedOrder {
        id,
        timestamp,
        customer_name,
        lines,
        total,
        status,
    })
}

/// Runs `parse` over every non-blank line, logging and dropping failures.
pub(crate) fn decode_all<T>(
    location: &str,
    lines: &[String],
    parse: impl Fn(&str) -> Result<T, RecordError>,
) -> Vec<T> {
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(index, line)| match parse(line.trim()) {
            Ok(record) => Some(record),
            Err(reason) => {
                warn!(location, line = index + 1, %reason, "skipping malformed record");
                None
            }
        })
        .collect()
}
