//! Persistence for the counter point-of-sale system.
//!
//! Three stores sit on top of a line-oriented [`RecordStore`]:
//! - [`CatalogStore`]: item prices, appended on every change
//! - [`InventoryStore`]: stock levels, rewritten as a full snapshot on every change
//! - [`LedgerStore`]: committed orders, append-only
//!
//! [`FileRecordStore`] is the production medium; [`InMemoryRecordStore`] backs tests.

pub mod backend;
pub mod bootstrap;
pub mod catalog;
pub mod error;
pub mod file;
pub mod inventory;
pub mod ledger;
pub mod memory;
pub mod record;

pub use backend::RecordStore;
pub use bootstrap::{DEFAULT_MENU, ensure_defaults};
pub use catalog::CatalogStore;
pub use error::{Result, StoreError};
pub use file::{FileRecordStore, StorePaths};
pub use inventory::InventoryStore;
pub use ledger::LedgerStore;
pub use memory::InMemoryRecordStore;
pub use record::RecordError;
