use common::{CommittedOrder, OrderId};
use tracing::info;

use crate::record::{decode_all, format_ledger, parse_ledger, parse_ledger_id};
use crate::{RecordStore, Result, StoreError};

/// Append-only log of committed orders.
///
/// The store keeps only the readable count and the highest id found in any
/// record, readable or not, in memory; `replay_all` always reads back from
/// the medium.
pub struct LedgerStore<B: RecordStore> {
    backend: B,
    committed: usize,
    last_id: Option<OrderId>,
}

impl<B: RecordStore> LedgerStore<B> {
    pub fn open(backend: B) -> Result<Self> {
        let mut store = Self {
            backend,
            committed: 0,
            last_id: None,
        };
        let lines = store.backend.read_lines()?;
        store.committed = decode_all(&store.backend.location(), &lines, parse_ledger).len();
        // Damaged records still own their id.
        store.last_id = lines.iter().filter_map(|line| parse_ledger_id(line)).max();

        info!(
            orders = store.committed,
            last_id = ?store.last_id.map(|id| id.to_string()),
            "ledger loaded"
        );
        Ok(store)
    }

    /// Writes one record after every existing one. The id must be greater
    /// than every id already in the ledger.
    pub fn append(&mut self, order: &CommittedOrder) -> Result<()> {
        if let Some(last) = self.last_id
            && order.id <= last
        {
            return Err(StoreError::OutOfSequence { id: order.id, last });
        }

        self.backend.append_line(&format_ledger(order))?;
        self.committed += 1;
        self.last_id = Some(order.id);
        Ok(())
    }

    /// Every readable order, in commit order. Unreadable records are skipped.
    pub fn replay_all(&self) -> Result<Vec<CommittedOrder>> {
        let lines = self.backend.read_lines()?;
        Ok(decode_all(&self.backend.location(), &lines, parse_ledger))
    }

    /// Number of orders readable at open time plus those appended since.
    pub fn committed_count(&self) -> usize {
        self.committed
    }

    pub fn last_id(&self) -> Option<OrderId> {
        self.last_id
    }
}
