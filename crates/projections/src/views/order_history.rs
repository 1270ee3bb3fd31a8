//! Order history read model: every committed order, queryable by id and customer.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use common::{CommittedOrder, OrderId};

use crate::Result;
use crate::projection::{Projection, ProjectionPosition};
use crate::read_model::ReadModel;

struct OrderHistoryState {
    orders: Vec<CommittedOrder>,
    by_id: HashMap<OrderId, usize>,
    position: ProjectionPosition,
}

/// Read model view over the committed-order ledger.
///
/// Orders are kept in commit order. A record whose id was already seen is
/// counted but not stored again.
#[derive(Clone)]
pub struct OrderHistoryView {
    state: Arc<RwLock<OrderHistoryState>>,
}

impl OrderHistoryView {
    /// Creates a new empty order history view.
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(OrderHistoryState {
                orders: Vec::new(),
                by_id: HashMap::new(),
                position: ProjectionPosition::zero(),
            })),
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, OrderHistoryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Gets a specific order.
    pub fn get_order(&self, order_id: OrderId) -> Option<CommittedOrder> {
        let state = self.read();
        state
            .by_id
            .get(&order_id)
            .map(|&i| state.orders[i].clone())
    }

    /// Gets all orders in commit order.
    pub fn get_all_history(&self) -> Vec<CommittedOrder> {
        self.read().orders.clone()
    }

    /// Gets the orders placed under `customer_name`, ignoring case and
    /// surrounding whitespace.
    pub fn get_history_by_customer(&self, customer_name: &str) -> Vec<CommittedOrder> {
        let wanted = customer_name.trim().to_lowercase();
        self.read()
            .orders
            .iter()
            .filter(|o| o.customer_name.to_lowercase() == wanted)
            .cloned()
            .collect()
    }

    /// Gets the `limit` most recent orders, newest first.
    pub fn get_recent(&self, limit: usize) -> Vec<CommittedOrder> {
        self.read().orders.iter().rev().take(limit).cloned().collect()
    }
}

impl Default for OrderHistoryView {
    fn default() -> Self {
        Self::new()
    }
}

impl Projection for OrderHistoryView {
    fn name(&self) -> &'static str {
        "OrderHistoryView"
    }

    fn handle(&self, order: &CommittedOrder) -> Result<()> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);

        if state.by_id.contains_key(&order.id) {
            tracing::warn!(order_id = %order.id, "duplicate order id in ledger, keeping first");
        } else {
            let index = state.orders.len();
            state.by_id.insert(order.id, index);
            state.orders.push(order.clone());
        }

        state.position = state.position.advance();
        Ok(())
    }

    fn position(&self) -> ProjectionPosition {
        self.read().position
    }

    fn reset(&self) -> Result<()> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.orders.clear();
        state.by_id.clear();
        state.position = ProjectionPosition::zero();
        Ok(())
    }
}

impl ReadModel for OrderHistoryView {
    fn name(&self) -> &'static str {
        "OrderHistoryView"
    }

    fn count(&self) -> usize {
        self.read().orders.len()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use common::{ItemName, Money, OrderLine, OrderStatus};

    use super::*;

    fn order(seq: u64, customer: &str) -> CommittedOrder {
        let line = OrderLine::new(ItemName::new("Tea").unwrap(), Money::from_units(30), 2);
        CommittedOrder {
            id: OrderId::new(seq),
            timestamp: NaiveDate::from_ymd_opt(2024, 2, 2)
                .unwrap()
                .and_hms_opt(11, 0, seq as u32)
                .unwrap(),
            customer_name: customer.to_string(),
            total: line.line_total(),
            lines: vec![line],
            status: OrderStatus::Completed,
        }
    }

    #[test]
    fn test_orders_kept_in_commit_order() {
        let view = OrderHistoryView::new();
        view.handle(&order(1, "Ann")).unwrap();
        view.handle(&order(2, "Ben")).unwrap();

        let ids: Vec<String> = view
            .get_all_history()
            .iter()
            .map(|o| o.id.to_string())
            .collect();
        assert_eq!(ids, vec!["ORD0001", "ORD0002"]);
        assert_eq!(view.count(), 2);
    }

    #[test]
    fn test_lookup_by_id() {
        let view = OrderHistoryView::new();
        view.handle(&order(7, "Ann")).unwrap();

        let found = view.get_order(OrderId::new(7)).unwrap();
        assert_eq!(found.total, Money::from_units(60));
        assert!(view.get_order(OrderId::new(8)).is_none());
    }

    #[test]
    fn test_filter_by_customer() {
        let view = OrderHistoryView::new();
        view.handle(&order(1, "Ann")).unwrap();
        view.handle(&order(2, "Ben")).unwrap();
        view.handle(&order(3, "ann")).unwrap();

        assert_eq!(view.get_history_by_customer(" ANN ").len(), 2);
        assert_eq!(view.get_history_by_customer("Ben").len(), 1);
        assert!(view.get_history_by_customer("Cid").is_empty());
    }

    #[test]
    fn test_recent_is_newest_first() {
        let view = OrderHistoryView::new();
        for seq in 1..=4 {
            view.handle(&order(seq, "Ann")).unwrap();
        }

        let recent: Vec<u64> = view.get_recent(2).iter().map(|o| o.id.sequence()).collect();
        assert_eq!(recent, vec![4, 3]);
    }

    #[test]
    fn test_duplicate_id_stored_once() {
        let view = OrderHistoryView::new();
        view.handle(&order(1, "Ann")).unwrap();
        view.handle(&order(1, "Ben")).unwrap();

        assert_eq!(view.count(), 1);
        assert_eq!(view.position().orders_processed, 2);
        assert_eq!(view.get_order(OrderId::new(1)).unwrap().customer_name, "Ann");
    }

    #[test]
    fn test_reset_clears_everything() {
        let view = OrderHistoryView::new();
        view.handle(&order(1, "Ann")).unwrap();
        view.reset().unwrap();

        assert_eq!(view.count(), 0);
        assert_eq!(view.position(), ProjectionPosition::zero());
    }
}
