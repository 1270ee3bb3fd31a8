//! Turning the in-progress order into a ledger record.

use chrono::NaiveDateTime;
use common::{CommittedOrder, InventoryEntry, Money, OrderId, OrderStatus};
use serde::{Deserialize, Serialize};
use store::{InventoryStore, LedgerStore, RecordStore};
use tracing::{debug, error};

use super::{CommitState, OrderBuilder, OrderError};
use crate::DomainError;

/// Characters a customer name may not contain, since they would split the
/// ledger record.
const CUSTOMER_NAME_FORBIDDEN: [char; 3] = [',', '\n', '\r'];

/// What a successful commit reports back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitReceipt {
    pub order_id: OrderId,
    pub total: Money,
    pub order: CommittedOrder,
}

/// Validates, takes stock, writes the ledger record, and hands out order ids.
///
/// The id counter only moves after the ledger append succeeded, so a failed
/// commit never burns an id.
#[derive(Debug)]
pub struct CommitProtocol {
    state: CommitState,
    next_sequence: u64,
}

impl CommitProtocol {
    /// Picks up numbering after whatever the ledger already holds.
    ///
    /// Uses the larger of the readable record count and the highest id seen,
    /// so skipped or hand-edited records can never cause an id to repeat.
    pub fn resume<B: RecordStore>(ledger: &LedgerStore<B>) -> Self {
        let highest = ledger.last_id().map_or(0, |id| id.sequence());
        let committed = ledger.committed_count() as u64;
        Self {
            state: CommitState::Idle,
            next_sequence: committed.max(highest) + 1,
        }
    }

    pub fn state(&self) -> CommitState {
        self.state
    }

    /// The id the next successful commit will receive.
    pub fn next_order_id(&self) -> OrderId {
        OrderId::new(self.next_sequence)
    }

    /// Commits `builder` for `customer_name`, clearing it on success.
    ///
    /// On failure the builder is left as it was and the inventory holds its
    /// pre-commit quantities.
    pub fn commit<B: RecordStore>(
        &mut self,
        builder: &mut OrderBuilder,
        inventory: &mut InventoryStore<B>,
        ledger: &mut LedgerStore<B>,
        customer_name: &str,
        timestamp: NaiveDateTime,
    ) -> Result<CommitReceipt, DomainError> {
        self.transition(CommitState::Validating);
        let outcome = self.run(builder, inventory, ledger, customer_name, timestamp);

        match &outcome {
            Ok(_) => self.transition(CommitState::Done),
            Err(_) => self.transition(CommitState::Rejected),
        }
        self.transition(CommitState::Idle);

        let order = outcome?;
        builder.clear();
        Ok(CommitReceipt {
            order_id: order.id,
            total: order.total,
            order,
        })
    }

    fn run<B: RecordStore>(
        &mut self,
        builder: &OrderBuilder,
        inventory: &mut InventoryStore<B>,
        ledger: &mut LedgerStore<B>,
        customer_name: &str,
        timestamp: NaiveDateTime,
    ) -> Result<CommittedOrder, DomainError> {
        if builder.is_empty() {
            return Err(OrderError::EmptyOrder.into());
        }
        let customer_name = check_customer_name(customer_name)?;

        for line in builder.lines() {
            let available = inventory.get(line.item_name.as_str());
            if available < line.quantity {
                return Err(OrderError::InsufficientStock {
                    item: line.item_name.to_string(),
                    available,
                    requested: line.quantity,
                }
                .into());
            }
        }

        self.transition(CommitState::Committing);
        if inventory.is_dirty() {
            inventory.sync()?;
        }
        let snapshot = inventory.snapshot_all();

        for line in builder.lines() {
            if let Err(e) = inventory.decrement(&line.item_name, line.quantity) {
                restore(inventory, snapshot);
                return Err(e.into());
            }
        }

        let order = CommittedOrder {
            id: self.next_order_id(),
            timestamp,
            customer_name,
            lines: builder.lines().to_vec(),
            total: builder.total(),
            status: OrderStatus::Completed,
        };

        if let Err(e) = ledger.append(&order) {
            restore(inventory, snapshot);
            return Err(e.into());
        }

        self.next_sequence += 1;
        Ok(order)
    }

    fn transition(&mut self, next: CommitState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal commit transition {} -> {}",
            self.state,
            next
        );
        debug!(from = %self.state, to = %next, "commit state");
        self.state = next;
    }
}

fn check_customer_name(raw: &str) -> Result<String, OrderError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(OrderError::MissingCustomerName);
    }
    if name.contains(CUSTOMER_NAME_FORBIDDEN) {
        return Err(OrderError::InvalidCustomerName {
            name: name.to_string(),
        });
    }
    Ok(name.to_string())
}

fn restore<B: RecordStore>(inventory: &mut InventoryStore<B>, snapshot: Vec<InventoryEntry>) {
    if let Err(e) = inventory.restore(snapshot) {
        error!(error = %e, "failed to restore inventory after aborted commit");
    }
}
