//! Sales read model: order count, revenue, and per-item totals.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::NaiveDate;
use common::{CommittedOrder, ItemName, Money};
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::projection::{Projection, ProjectionPosition};
use crate::read_model::ReadModel;

/// Units and revenue for one item across all committed orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSales {
    pub name: ItemName,
    pub units: u64,
    pub revenue: Money,
}

/// Ledger-wide totals. `items` is ranked by units sold, then by name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SalesSummary {
    pub order_count: u64,
    pub units: u64,
    pub revenue: Money,
    pub items: Vec<ItemSales>,
}

/// Revenue for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySales {
    pub date: NaiveDate,
    pub order_count: u64,
    pub revenue: Money,
}

#[derive(Default)]
struct SalesState {
    order_count: u64,
    revenue: Money,
    items: HashMap<ItemName, (u64, Money)>,
    days: HashMap<NaiveDate, (u64, Money)>,
    position: ProjectionPosition,
}

/// Running sales totals folded from the ledger.
///
/// Revenue uses each order's recorded total; per-item revenue uses line totals.
/// Sums clamp at the largest representable amount.
#[derive(Clone, Default)]
pub struct SalesView {
    state: Arc<RwLock<SalesState>>,
}

impl SalesView {
    /// Creates a new empty sales view.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, SalesState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn summary(&self) -> SalesSummary {
        let state = self.read();
        let mut items: Vec<ItemSales> = state
            .items
            .iter()
            .map(|(name, &(units, revenue))| ItemSales {
                name: name.clone(),
                units,
                revenue,
            })
            .collect();
        items.sort_by(|a, b| b.units.cmp(&a.units).then_with(|| a.name.cmp(&b.name)));

        SalesSummary {
            order_count: state.order_count,
            units: items.iter().map(|i| i.units).sum(),
            revenue: state.revenue,
            items,
        }
    }

    /// The `limit` best-selling items by units.
    pub fn top_items(&self, limit: usize) -> Vec<ItemSales> {
        let mut items = self.summary().items;
        items.truncate(limit);
        items
    }

    /// Totals for one item, if it was ever sold.
    pub fn item(&self, name: &str) -> Option<ItemSales> {
        let state = self.read();
        state
            .items
            .get_key_value(name)
            .map(|(name, &(units, revenue))| ItemSales {
                name: name.clone(),
                units,
                revenue,
            })
    }

    /// Per-day totals, oldest first.
    pub fn daily(&self) -> Vec<DailySales> {
        let mut days: Vec<DailySales> = self
            .read()
            .days
            .iter()
            .map(|(&date, &(order_count, revenue))| DailySales {
                date,
                order_count,
                revenue,
            })
            .collect();
        days.sort_by_key(|d| d.date);
        days
    }
}

impl Projection for SalesView {
    fn name(&self) -> &'static str {
        "SalesView"
    }

    fn handle(&self, order: &CommittedOrder) -> Result<()> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);

        state.order_count += 1;
        state.revenue = state.revenue.saturating_add(order.total);
        for line in &order.lines {
            let entry = state
                .items
                .entry(line.item_name.clone())
                .or_insert((0, Money::zero()));
            entry.0 += u64::from(line.quantity);
            entry.1 = entry.1.saturating_add(line.line_total());
        }
        let day = state
            .days
            .entry(order.timestamp.date())
            .or_insert((0, Money::zero()));
        day.0 += 1;
        day.1 = day.1.saturating_add(order.total);

        state.position = state.position.advance();
        Ok(())
    }

    fn position(&self) -> ProjectionPosition {
        self.read().position
    }

    fn reset(&self) -> Result<()> {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = SalesState::default();
        Ok(())
    }
}

impl ReadModel for SalesView {
    fn name(&self) -> &'static str {
        "SalesView"
    }

    fn count(&self) -> usize {
        self.read().items.len()
    }
}
