//! Projection processor for feeding committed orders to projections.

use common::CommittedOrder;

use crate::Result;
use crate::projection::Projection;
use crate::source::OrderSource;

/// Delivers ledger records to every registered projection.
///
/// The processor supports:
/// - Catch-up: replays the ledger and hands each projection only the orders it
///   has not seen yet
/// - Single order delivery: feeds a freshly committed order to all projections
/// - Rebuild: resets all projections and replays from scratch
#[derive(Default)]
pub struct ProjectionProcessor {
    projections: Vec<Box<dyn Projection>>,
}

impl ProjectionProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a projection with this processor.
    pub fn register(&mut self, projection: Box<dyn Projection>) {
        self.projections.push(projection);
    }

    /// Returns the number of registered projections.
    pub fn projection_count(&self) -> usize {
        self.projections.len()
    }

    /// Replays `source` and brings every projection up to date. Returns the
    /// number of ledger records read.
    #[tracing::instrument(skip_all)]
    pub fn run_catch_up<S>(&self, source: &S) -> Result<u64>
    where
        S: OrderSource + ?Sized,
    {
        let orders = source.committed_orders()?;
        let mut order_index: u64 = 0;

        for order in &orders {
            order_index += 1;

            for projection in &self.projections {
                if projection.position().orders_processed < order_index {
                    projection.handle(order)?;
                    metrics::counter!("projections_orders_processed").increment(1);
                }
            }
        }

        tracing::info!(orders_processed = order_index, "catch-up complete");

        Ok(order_index)
    }

    /// Delivers a single order to all registered projections.
    #[tracing::instrument(skip(self, order), fields(order_id = %order.id))]
    pub fn process_order(&self, order: &CommittedOrder) -> Result<()> {
        for projection in &self.projections {
            projection.handle(order)?;
        }
        Ok(())
    }

    /// Resets all projections and replays the ledger from scratch.
    #[tracing::instrument(skip_all)]
    pub fn rebuild_all<S>(&self, source: &S) -> Result<u64>
    where
        S: OrderSource + ?Sized,
    {
        for projection in &self.projections {
            projection.reset()?;
        }
        self.run_catch_up(source)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use chrono::NaiveDate;
    use common::{Money, OrderId, OrderStatus};

    use super::*;
    use crate::projection::ProjectionPosition;

    /// A counting projection that shares its state with the test.
    #[derive(Clone, Default)]
    struct CountingProjection {
        state: Arc<Mutex<(u64, ProjectionPosition)>>,
    }

    impl CountingProjection {
        fn count(&self) -> u64 {
            self.state.lock().unwrap().0
        }
    }

    impl Projection for CountingProjection {
        fn name(&self) -> &'static str {
            "CountingProjection"
        }

        fn handle(&self, _order: &CommittedOrder) -> Result<()> {
            let mut state = self.state.lock().unwrap();
            state.0 += 1;
            state.1 = state.1.advance();
            Ok(())
        }

        fn position(&self) -> ProjectionPosition {
            self.state.lock().unwrap().1
        }

        fn reset(&self) -> Result<()> {
            *self.state.lock().unwrap() = (0, ProjectionPosition::zero());
            Ok(())
        }
    }

    fn order(seq: u64) -> CommittedOrder {
        CommittedOrder {
            id: OrderId::new(seq),
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            customer_name: "Ann".to_string(),
            lines: Vec::new(),
            total: Money::zero(),
            status: OrderStatus::Completed,
        }
    }

    #[test]
    fn test_catch_up_processes_all_orders() {
        let counting = CountingProjection::default();
        let mut processor = ProjectionProcessor::new();
        processor.register(Box::new(counting.clone()));

        let ledger = vec![order(1), order(2), order(3)];
        assert_eq!(processor.run_catch_up(ledger.as_slice()).unwrap(), 3);
        assert_eq!(counting.count(), 3);
    }

    #[test]
    fn test_catch_up_skips_seen_orders() {
        let counting = CountingProjection::default();
        let mut processor = ProjectionProcessor::new();
        processor.register(Box::new(counting.clone()));

        let mut ledger = vec![order(1), order(2)];
        processor.run_catch_up(ledger.as_slice()).unwrap();
        ledger.push(order(3));
        processor.run_catch_up(ledger.as_slice()).unwrap();

        assert_eq!(counting.count(), 3);
    }

    #[test]
    fn test_rebuild_resets_then_replays() {
        let counting = CountingProjection::default();
        let mut processor = ProjectionProcessor::new();
        processor.register(Box::new(counting.clone()));

        let ledger = vec![order(1), order(2)];
        processor.process_order(&order(1)).unwrap();
        processor.process_order(&order(1)).unwrap();
        processor.process_order(&order(1)).unwrap();

        processor.rebuild_all(ledger.as_slice()).unwrap();
        assert_eq!(counting.count(), 2);
        assert_eq!(processor.projection_count(), 1);
    }
}
