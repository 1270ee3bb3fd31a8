//! First-run seeding of the store files.

use common::{CatalogEntry, InventoryEntry, ItemName, Money};
use tracing::info;

use crate::file::{FileRecordStore, StorePaths};
use crate::record::{format_catalog, format_inventory};
use crate::{RecordStore, Result};

/// Default counter menu: name, price in whole units, opening stock.
pub const DEFAULT_MENU: [(&str, i64, u32); 8] = [
    ("Coffee", 50, 100),
    ("Tea", 30, 100),
    ("Sandwich", 120, 50),
    ("Cake", 80, 30),
    ("Burger", 150, 50),
    ("Fries", 60, 80),
    ("Juice", 70, 60),
    ("Water", 20, 100),
];

fn default_entries() -> impl Iterator<Item = (CatalogEntry, InventoryEntry)> {
    DEFAULT_MENU.iter().filter_map(|&(name, price, stock)| {
        let name = ItemName::new(name).ok()?;
        Some((
            CatalogEntry {
                name: name.clone(),
                unit_price: Money::from_units(price),
            },
            InventoryEntry {
                name,
                quantity: stock,
            },
        ))
    })
}

/// Creates whichever store files are missing. Existing files are left alone.
pub fn ensure_defaults(paths: &StorePaths) -> Result<()> {
    let catalog = FileRecordStore::new(&paths.catalog);
    if !catalog.exists() {
        let lines: Vec<String> = default_entries().map(|(c, _)| format_catalog(&c)).collect();
        catalog.replace_all(&lines)?;
        info!(path = %paths.catalog.display(), "seeded default catalog");
    }

    let inventory = FileRecordStore::new(&paths.inventory);
    if !inventory.exists() {
        let lines: Vec<String> = default_entries()
            .map(|(_, i)| format_inventory(&i))
            .collect();
        inventory.replace_all(&lines)?;
        info!(path = %paths.inventory.display(), "seeded default inventory");
    }

    let ledger = FileRecordStore::new(&paths.ledger);
    if !ledger.exists() {
        ledger.replace_all(&[])?;
        info!(path = %paths.ledger.display(), "created empty ledger");
    }

    Ok(())
}
