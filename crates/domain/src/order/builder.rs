//! The in-progress order.

use common::{ItemName, Money, OrderLine};
use serde::{Deserialize, Serialize};
use store::{CatalogStore, InventoryStore, RecordStore};

use super::OrderError;

/// Read access to unit prices.
pub trait PriceLookup {
    fn unit_price(&self, name: &str) -> Option<Money>;
}

/// Read access to units on hand. Unknown items have none.
pub trait StockLevels {
    fn available(&self, name: &str) -> u32;
}

impl<B: RecordStore> PriceLookup for CatalogStore<B> {
    fn unit_price(&self, name: &str) -> Option<Money> {
        self.get(name)
    }
}

impl<B: RecordStore> StockLevels for InventoryStore<B> {
    fn available(&self, name: &str) -> u32 {
        self.get(name)
    }
}

/// Read-only view of the in-progress order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrderSnapshot {
    pub lines: Vec<OrderLine>,
    pub total: Money,
}

/// Lines collected for the next commit.
///
/// Stock is checked on every add but never reserved; the commit protocol
/// checks again before it takes anything out of the inventory.
#[derive(Debug, Clone, Default)]
pub struct OrderBuilder {
    lines: Vec<OrderLine>,
    total: Money,
}

impl OrderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `quantity` units of `name`, merging into an existing line.
    ///
    /// The unit price is taken from the catalog the first time an item is
    /// added and kept for the life of the line.
    pub fn add_item(
        &mut self,
        name: &str,
        quantity: i64,
        prices: &impl PriceLookup,
        stock: &impl StockLevels,
    ) -> Result<(), OrderError> {
        let not_found = || OrderError::NotFound {
            item: name.trim().to_string(),
        };
        let item = ItemName::new(name).map_err(|_| not_found())?;
        let unit_price = prices.unit_price(item.as_str()).ok_or_else(not_found)?;

        let quantity = match u32::try_from(quantity) {
            Ok(q) if q > 0 => q,
            _ => return Err(OrderError::InvalidQuantity { quantity }),
        };

        let position = self.lines.iter().position(|l| l.item_name == item);
        let already = position.map_or(0, |i| self.lines[i].quantity);
        let requested = already
            .checked_add(quantity)
            .ok_or(OrderError::InvalidQuantity {
                quantity: i64::from(quantity),
            })?;

        let available = stock.available(item.as_str());
        if available < requested {
            return Err(OrderError::InsufficientStock {
                item: item.to_string(),
                available,
                requested,
            });
        }

        let mut lines = self.lines.clone();
        match position {
            Some(i) => lines[i].quantity = requested,
            None => lines.push(OrderLine::new(item.clone(), unit_price, quantity)),
        }
        let total = checked_total(&lines).ok_or_else(|| OrderError::AmountOverflow {
            item: item.to_string(),
        })?;

        self.lines = lines;
        self.total = total;
        Ok(())
    }

    /// Drops the whole line for `name`. Returns false when there was none.
    pub fn remove_item(&mut self, name: &str) -> bool {
        let name = name.trim();
        let before = self.lines.len();
        self.lines.retain(|l| l.item_name.as_str() != name);
        let removed = self.lines.len() != before;
        if removed {
            self.recompute_total();
        }
        removed
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.total = Money::zero();
    }

    pub fn current_state(&self) -> OrderSnapshot {
        OrderSnapshot {
            lines: self.lines.clone(),
            total: self.total,
        }
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Units of `name` already in the order.
    pub fn quantity_of(&self, name: &str) -> u32 {
        self.lines
            .iter()
            .find(|l| l.item_name.as_str() == name)
            .map_or(0, |l| l.quantity)
    }

    fn recompute_total(&mut self) {
        // A subset of lines whose total already fit always fits.
        self.total = checked_total(&self.lines).unwrap_or_default();
    }
}

fn checked_total(lines: &[OrderLine]) -> Option<Money> {
    lines.iter().try_fold(Money::zero(), |total, line| {
        total.checked_add(line.unit_price.checked_multiply(line.quantity)?)
    })
}
