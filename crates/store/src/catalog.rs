use std::collections::HashMap;

use common::{CatalogEntry, ItemName, Money};
use tracing::info;

use crate::record::{decode_all, format_catalog, parse_catalog};
use crate::{RecordStore, Result};

/// Item name → unit price, in the order names were first seen.
///
/// Every `put` is persisted by appending one record; on load the last record
/// for a name wins.
pub struct CatalogStore<B: RecordStore> {
    backend: B,
    entries: Vec<CatalogEntry>,
    index: HashMap<ItemName, usize>,
}

impl<B: RecordStore> CatalogStore<B> {
    /// Loads the catalog from `backend`, skipping unreadable records.
    pub fn open(backend: B) -> Result<Self> {
        let lines = backend.read_lines()?;
        let records = decode_all(&backend.location(), &lines, parse_catalog);

        let mut store = Self {
            backend,
            entries: Vec::new(),
            index: HashMap::new(),
        };
        for record in records {
            store.upsert(record.name, record.unit_price);
        }

        info!(items = store.entries.len(), "catalog loaded");
        Ok(store)
    }

    pub fn get(&self, name: &str) -> Option<Money> {
        self.index.get(name).map(|&i| self.entries[i].unit_price)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Inserts or overwrites the price for `name`. The record is written
    /// before memory changes, so a failed write leaves the catalog as it was.
    pub fn put(&mut self, name: ItemName, unit_price: Money) -> Result<()> {
        let entry = CatalogEntry { name, unit_price };
        self.backend.append_line(&format_catalog(&entry))?;
        self.upsert(entry.name, entry.unit_price);
        Ok(())
    }

    pub fn list(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn upsert(&mut self, name: ItemName, unit_price: Money) {
        match self.index.get(&name) {
            Some(&i) => self.entries[i].unit_price = unit_price,
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push(CatalogEntry { name, unit_price });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryRecordStore;

    fn name(s: &str) -> ItemName {
        ItemName::new(s).unwrap()
    }

    #[test]
    fn load_skips_malformed_and_last_write_wins() {
        let backend =
            InMemoryRecordStore::with_lines(["Coffee,50", "Tea", "Cake,abc", "Tea,30", "Coffee,55"]);
        let catalog = CatalogStore::open(backend).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("Coffee"), Some(Money::from_units(55)));
        assert_eq!(catalog.get("Tea"), Some(Money::from_units(30)));
        assert_eq!(catalog.get("Cake"), None);
    }

    #[test]
    fn list_preserves_first_insertion_order() {
        let backend = InMemoryRecordStore::with_lines(["Coffee,50", "Tea,30", "Coffee,60"]);
        let catalog = CatalogStore::open(backend).unwrap();

        let names: Vec<&str> = catalog.list().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Coffee", "Tea"]);
    }

    #[test]
    fn put_appends_a_record() {
        let backend = InMemoryRecordStore::new();
        let mut catalog = CatalogStore::open(backend.clone()).unwrap();

        catalog.put(name("Juice"), Money::from_units(70)).unwrap();
        catalog.put(name("Juice"), Money::from_units(75)).unwrap();

        assert_eq!(backend.lines(), vec!["Juice,70.00", "Juice,75.00"]);
        assert_eq!(catalog.get("Juice"), Some(Money::from_units(75)));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn failed_put_leaves_catalog_unchanged() {
        let backend = InMemoryRecordStore::with_lines(["Coffee,50"]);
        let mut catalog = CatalogStore::open(backend.clone()).unwrap();
        backend.set_fail_on_write(true);

        assert!(catalog.put(name("Coffee"), Money::from_units(99)).is_err());
        assert!(catalog.put(name("Water"), Money::from_units(20)).is_err());

        assert_eq!(catalog.get("Coffee"), Some(Money::from_units(50)));
        assert!(!catalog.contains("Water"));
    }
}
