//! The order desk: one session owning every store and the in-progress order.

use chrono::{Local, NaiveDateTime, Timelike};
use common::{CommittedOrder, ItemName, Money, OrderId};
use serde::{Deserialize, Serialize};
use store::{CatalogStore, FileRecordStore, InventoryStore, LedgerStore, RecordStore, StorePaths};

use crate::error::DomainError;
use crate::order::{
    CommitProtocol, CommitReceipt, CommitState, OrderBuilder, OrderError, OrderSnapshot,
};

/// One sellable item as shown on the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuEntry {
    pub name: ItemName,
    pub unit_price: Money,
    pub stock: u32,
}

/// Session object for a single counter.
///
/// All mutation goes through `&mut self`; callers sharing a desk put it
/// behind one lock so validate, decrement and append run as one step.
pub struct OrderDesk<B: RecordStore> {
    catalog: CatalogStore<B>,
    inventory: InventoryStore<B>,
    ledger: LedgerStore<B>,
    builder: OrderBuilder,
    protocol: CommitProtocol,
}

impl OrderDesk<FileRecordStore> {
    /// Opens a desk over the three store files at `paths`.
    pub fn open_files(paths: &StorePaths) -> Result<Self, DomainError> {
        Self::open(
            FileRecordStore::new(&paths.catalog),
            FileRecordStore::new(&paths.inventory),
            FileRecordStore::new(&paths.ledger),
        )
    }
}

impl<B: RecordStore> OrderDesk<B> {
    /// Loads catalog and inventory and resumes order numbering from the ledger.
    pub fn open(catalog: B, inventory: B, ledger: B) -> Result<Self, DomainError> {
        let catalog = CatalogStore::open(catalog)?;
        let inventory = InventoryStore::open(inventory)?;
        let ledger = LedgerStore::open(ledger)?;
        let protocol = CommitProtocol::resume(&ledger);

        tracing::info!(
            items = catalog.len(),
            orders = ledger.committed_count(),
            next_order_id = %protocol.next_order_id(),
            "order desk opened"
        );

        Ok(Self {
            catalog,
            inventory,
            ledger,
            builder: OrderBuilder::new(),
            protocol,
        })
    }

    /// Every catalog item with its current stock, in catalog order.
    pub fn menu(&self) -> Vec<MenuEntry> {
        self.catalog
            .list()
            .iter()
            .map(|entry| MenuEntry {
                name: entry.name.clone(),
                unit_price: entry.unit_price,
                stock: self.inventory.get(entry.name.as_str()),
            })
            .collect()
    }

    /// Adds a sellable item, or overwrites price and stock of an existing one.
    #[tracing::instrument(skip(self))]
    pub fn register_item(
        &mut self,
        name: &str,
        unit_price: Money,
        stock: i64,
    ) -> Result<MenuEntry, DomainError> {
        let name = ItemName::new(name).map_err(|reason| OrderError::InvalidName {
            name: name.to_string(),
            reason,
        })?;
        if !unit_price.is_positive() {
            return Err(OrderError::InvalidPrice { price: unit_price }.into());
        }
        let stock =
            u32::try_from(stock).map_err(|_| OrderError::InvalidQuantity { quantity: stock })?;

        self.catalog.put(name.clone(), unit_price)?;
        if let Err(e) = self.inventory.put(name.clone(), stock) {
            tracing::error!(item = %name, error = %e, "catalog updated but stock write failed");
            return Err(e.into());
        }

        tracing::info!(item = %name, %unit_price, stock, "item registered");
        Ok(MenuEntry {
            name,
            unit_price,
            stock,
        })
    }

    /// Overwrites the stock level of a catalog item.
    #[tracing::instrument(skip(self))]
    pub fn restock(&mut self, name: &str, quantity: i64) -> Result<u32, DomainError> {
        let item = ItemName::new(name)
            .ok()
            .filter(|item| self.catalog.contains(item.as_str()))
            .ok_or_else(|| OrderError::NotFound {
                item: name.trim().to_string(),
            })?;
        let quantity =
            u32::try_from(quantity).map_err(|_| OrderError::InvalidQuantity { quantity })?;

        self.inventory.put(item, quantity)?;
        Ok(quantity)
    }

    /// Units on hand for `name`, 0 when unknown.
    pub fn stock_of(&self, name: &str) -> u32 {
        self.inventory.get(name.trim())
    }

    #[tracing::instrument(skip(self))]
    pub fn add_item(&mut self, name: &str, quantity: i64) -> Result<OrderSnapshot, DomainError> {
        self.builder
            .add_item(name, quantity, &self.catalog, &self.inventory)?;
        Ok(self.builder.current_state())
    }

    /// Removes the line for `name`; absent names are ignored.
    #[tracing::instrument(skip(self))]
    pub fn remove_item(&mut self, name: &str) -> OrderSnapshot {
        self.builder.remove_item(name);
        self.builder.current_state()
    }

    pub fn clear_order(&mut self) {
        self.builder.clear();
    }

    pub fn current_order(&self) -> OrderSnapshot {
        self.builder.current_state()
    }

    /// Commits the in-progress order, stamped with the local wall clock.
    pub fn commit(&mut self, customer_name: &str) -> Result<CommitReceipt, DomainError> {
        let now = Local::now().naive_local();
        self.commit_at(customer_name, now.with_nanosecond(0).unwrap_or(now))
    }

    /// Commits the in-progress order with an explicit timestamp.
    #[tracing::instrument(skip(self, timestamp))]
    pub fn commit_at(
        &mut self,
        customer_name: &str,
        timestamp: NaiveDateTime,
    ) -> Result<CommitReceipt, DomainError> {
        let started = std::time::Instant::now();
        let result = self.protocol.commit(
            &mut self.builder,
            &mut self.inventory,
            &mut self.ledger,
            customer_name,
            timestamp,
        );

        match &result {
            Ok(receipt) => {
                let duration = started.elapsed().as_secs_f64();
                metrics::histogram!("order_commit_duration_seconds").record(duration);
                metrics::counter!("orders_committed_total").increment(1);
                metrics::counter!("order_revenue_cents_total")
                    .increment(u64::try_from(receipt.total.cents()).unwrap_or(0));
                tracing::info!(
                    order_id = %receipt.order_id,
                    total = %receipt.total,
                    lines = receipt.order.lines.len(),
                    duration,
                    "order committed"
                );
            }
            Err(e) => {
                metrics::counter!("orders_rejected_total", "reason" => e.reason()).increment(1);
                if e.is_persistence_failure() {
                    tracing::error!(error = %e, "commit failed");
                } else {
                    tracing::warn!(error = %e, "commit rejected");
                }
            }
        }
        result
    }

    /// Every committed order, read back from the ledger.
    pub fn replay_ledger(&self) -> Result<Vec<CommittedOrder>, DomainError> {
        Ok(self.ledger.replay_all()?)
    }

    pub fn next_order_id(&self) -> OrderId {
        self.protocol.next_order_id()
    }

    pub fn commit_state(&self) -> CommitState {
        self.protocol.state()
    }

    pub fn committed_count(&self) -> usize {
        self.ledger.committed_count()
    }

    pub fn catalog(&self) -> &CatalogStore<B> {
        &self.catalog
    }

    pub fn inventory(&self) -> &InventoryStore<B> {
        &self.inventory
    }
}
