//! Where projections read committed orders from.

use common::CommittedOrder;
use domain::OrderDesk;
use store::{LedgerStore, RecordStore};

use crate::Result;

/// Anything that can hand back the full ledger in commit order.
pub trait OrderSource {
    fn committed_orders(&self) -> Result<Vec<CommittedOrder>>;
}

impl<B: RecordStore> OrderSource for LedgerStore<B> {
    fn committed_orders(&self) -> Result<Vec<CommittedOrder>> {
        Ok(self.replay_all()?)
    }
}

impl<B: RecordStore> OrderSource for OrderDesk<B> {
    fn committed_orders(&self) -> Result<Vec<CommittedOrder>> {
        Ok(self.replay_ledger()?)
    }
}

impl OrderSource for [CommittedOrder] {
    fn committed_orders(&self) -> Result<Vec<CommittedOrder>> {
        Ok(self.to_vec())
    }
}
