use std::collections::HashMap;

use common::{InventoryEntry, ItemName};
use tracing::{debug, info, warn};

use crate::record::{decode_all, format_inventory, parse_inventory};
use crate::{RecordStore, Result, StoreError};

/// Item name → units on hand.
///
/// Every successful mutation rewrites the whole snapshot. If the rewrite
/// fails the in-memory change is rolled back. `restore` is the exception: it
/// keeps the restored state in memory even when the write fails and marks
/// the store dirty until a later write succeeds.
pub struct InventoryStore<B: RecordStore> {
    backend: B,
    entries: Vec<InventoryEntry>,
    index: HashMap<ItemName, usize>,
    dirty: bool,
}

impl<B: RecordStore> InventoryStore<B> {
    /// Loads the inventory from `backend`, skipping unreadable records.
    pub fn open(backend: B) -> Result<Self> {
        let lines = backend.read_lines()?;
        let records = decode_all(&backend.location(), &lines, parse_inventory);

        let mut store = Self {
            backend,
            entries: Vec::new(),
            index: HashMap::new(),
            dirty: false,
        };
        for record in records {
            store.set(record.name, record.quantity);
        }

        info!(items = store.entries.len(), "inventory loaded");
        Ok(store)
    }

    /// Units on hand, or 0 for an unknown item.
    pub fn get(&self, name: &str) -> u32 {
        self.index
            .get(name)
            .map_or(0, |&i| self.entries[i].quantity)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Sets the stock level for `name` (initial stocking or restock).
    pub fn put(&mut self, name: ItemName, quantity: u32) -> Result<()> {
        let previous = self.snapshot_all();
        self.set(name, quantity);
        self.persist_or_rollback(previous)
    }

    /// Removes `amount` units and returns what is left.
    pub fn decrement(&mut self, name: &ItemName, amount: u32) -> Result<u32> {
        let available = self.get(name.as_str());
        if amount > available {
            return Err(StoreError::InsufficientStock {
                item: name.clone(),
                available,
                requested: amount,
            });
        }
        if amount == 0 {
            return Ok(available);
        }

        let previous = self.snapshot_all();
        let i = self.index[name];
        self.entries[i].quantity = available - amount;
        self.persist_or_rollback(previous)?;

        debug!(item = %name, amount, remaining = available - amount, "stock decremented");
        Ok(available - amount)
    }

    /// Copy of every entry, in file order.
    pub fn snapshot_all(&self) -> Vec<InventoryEntry> {
        self.entries.clone()
    }

    pub fn entries(&self) -> &[InventoryEntry] {
        &self.entries
    }

    /// Replaces the whole inventory with `snapshot` and persists it.
    ///
    /// Memory holds `snapshot` afterwards whether or not the write succeeded.
    pub fn restore(&mut self, snapshot: Vec<InventoryEntry>) -> Result<()> {
        self.entries = snapshot;
        self.reindex();
        self.persist()
    }

    /// True when memory holds changes the medium has not seen.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Rewrites the medium from memory.
    pub fn sync(&mut self) -> Result<()> {
        self.persist()
    }

    fn set(&mut self, name: ItemName, quantity: u32) {
        match self.index.get(&name) {
            Some(&i) => self.entries[i].quantity = quantity,
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push(InventoryEntry { name, quantity });
            }
        }
    }

    fn reindex(&mut self) {
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.name.clone(), i))
            .collect();
    }

    fn write_all(&self) -> Result<()> {
        let lines: Vec<String> = self.entries.iter().map(format_inventory).collect();
        self.backend.replace_all(&lines)
    }

    fn persist(&mut self) -> Result<()> {
        match self.write_all() {
            Ok(()) => {
                self.dirty = false;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "inventory kept in memory only until the next write");
                self.dirty = true;
                Err(e)
            }
        }
    }

    fn persist_or_rollback(&mut self, previous: Vec<InventoryEntry>) -> Result<()> {
        if let Err(e) = self.write_all() {
            self.entries = previous;
            self.reindex();
            return Err(e);
        }
        self.dirty = false;
        Ok(())
    }
}
