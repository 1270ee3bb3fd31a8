//! Integration tests for the order desk.
//!
//! These tests drive the desk end to end: building orders against stock,
//! committing them, and reopening the stores to check what was persisted.

use chrono::NaiveDate;
use common::{Money, OrderId};
use domain::{DomainError, OrderDesk, OrderError};
use proptest::prelude::*;
use store::{InMemoryRecordStore, RecordStore, StorePaths, ensure_defaults};

struct Backends {
    catalog: InMemoryRecordStore,
    inventory: InMemoryRecordStore,
    ledger: InMemoryRecordStore,
}

impl Backends {
    fn new(catalog: &[&str], inventory: &[&str]) -> Self {
        Self {
            catalog: InMemoryRecordStore::with_lines(catalog.iter().copied()),
            inventory: InMemoryRecordStore::with_lines(inventory.iter().copied()),
            ledger: InMemoryRecordStore::new(),
        }
    }

    fn open(&self) -> OrderDesk<InMemoryRecordStore> {
        OrderDesk::open(
            self.catalog.clone(),
            self.inventory.clone(),
            self.ledger.clone(),
        )
        .unwrap()
    }
}

fn coffee_and_tea(coffee: u32) -> Backends {
    let coffee = format!("Coffee,{coffee}");
    Backends::new(&["Coffee,50", "Tea,30"], &[coffee.as_str(), "Tea,100"])
}

mod scenarios {
    use super::*;

    #[test]
    fn third_coffee_exceeds_stock() {
        let backends = coffee_and_tea(2);
        let mut desk = backends.open();

        desk.add_item("Coffee", 1).unwrap();
        desk.add_item("Coffee", 1).unwrap();
        let err = desk.add_item("Coffee", 1).unwrap_err();

        match err {
            DomainError::Order(OrderError::InsufficientStock {
                item, available, ..
            }) => {
                assert_eq!(item, "Coffee");
                assert_eq!(available, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(desk.stock_of("Coffee"), 2);
        assert_eq!(backends.inventory.write_count(), 0);
    }

    #[test]
    fn empty_order_commit_touches_nothing() {
        let backends = coffee_and_tea(2);
        let mut desk = backends.open();

        assert!(matches!(
            desk.commit("Alice"),
            Err(DomainError::Order(OrderError::EmptyOrder))
        ));
        assert_eq!(backends.inventory.write_count(), 0);
        assert_eq!(backends.ledger.write_count(), 0);
        assert_eq!(desk.next_order_id(), OrderId::new(1));
    }

    #[test]
    fn first_commit_gets_ord0001() {
        let backends = coffee_and_tea(2);
        let mut desk = backends.open();

        desk.add_item("Coffee", 2).unwrap();
        let receipt = desk.commit("Bob").unwrap();

        assert_eq!(receipt.order_id.to_string(), "ORD0001");
        assert_eq!(receipt.total, Money::from_units(100));
        assert_eq!(desk.stock_of("Coffee"), 0);
        assert!(desk.current_order().lines.is_empty());
        assert_eq!(desk.current_order().total, Money::zero());

        let ledger = desk.replay_ledger().unwrap();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0].total, Money::from_units(100));
        assert_eq!(backends.ledger.lines().len(), 1);
        assert!(backends.ledger.lines()[0].starts_with("ORD0001,"));
    }

    #[test]
    fn removing_absent_item_is_noop() {
        let backends = coffee_and_tea(2);
        let mut desk = backends.open();
        desk.add_item("Tea", 2).unwrap();

        let before = desk.current_order();
        let after = desk.remove_item("Sandwich");

        assert_eq!(before, after);
    }

    #[test]
    fn missing_customer_keeps_order() {
        let backends = coffee_and_tea(2);
        let mut desk = backends.open();
        desk.add_item("Tea", 1).unwrap();

        assert!(matches!(
            desk.commit("  "),
            Err(DomainError::Order(OrderError::MissingCustomerName))
        ));
        assert_eq!(desk.current_order().lines.len(), 1);
    }
}

mod persistence {
    use super::*;

    #[test]
    fn ledger_failure_keeps_builder_and_stock() {
        let backends = coffee_and_tea(5);
        let mut desk = backends.open();
        desk.add_item("Coffee", 3).unwrap();
        backends.ledger.set_fail_on_write(true);

        let err = desk.commit("Cara").unwrap_err();

        assert!(err.is_persistence_failure());
        assert_eq!(desk.stock_of("Coffee"), 5);
        assert!(backends.inventory.lines().contains(&"Coffee,5".to_string()));
        assert_eq!(desk.current_order().lines[0].quantity, 3);
        assert_eq!(desk.next_order_id(), OrderId::new(1));
    }

    #[test]
    fn failed_rollback_still_reports_pre_commit_stock() {
        let backends = Backends::new(&["Coffee,50", "Tea,30"], &["Coffee,5", "Tea,5"]);
        let mut desk = backends.open();
        desk.add_item("Coffee", 2).unwrap();
        desk.add_item("Tea", 1).unwrap();
        backends.inventory.fail_after_writes(1);

        assert!(desk.commit("Ann").unwrap_err().is_persistence_failure());

        assert_eq!(desk.stock_of("Coffee"), 5);
        assert_eq!(desk.stock_of("Tea"), 5);
        assert!(desk.inventory().is_dirty());
        assert!(backends.ledger.lines().is_empty());
        assert_eq!(desk.current_order().lines.len(), 2);

        backends.inventory.clear_failures();
        desk.commit("Ann").unwrap();
        assert_eq!(backends.inventory.lines(), vec!["Coffee,3", "Tea,4"]);
    }

    #[test]
    fn oversized_total_is_rejected() {
        let backends = coffee_and_tea(5);
        let mut desk = backends.open();
        desk.register_item("Gold", "90000000000000000".parse().unwrap(), 5).unwrap();

        desk.add_item("Gold", 1).unwrap();
        let err = desk.add_item("Gold", 1).unwrap_err();

        assert!(matches!(
            err,
            DomainError::Order(OrderError::AmountOverflow { .. })
        ));
        assert_eq!(desk.current_order().lines[0].quantity, 1);
        assert!(matches!(
            desk.add_item("Tea", i64::MAX),
            Err(DomainError::Order(OrderError::InvalidQuantity { .. }))
        ));
    }

    #[test]
    fn numbering_skips_past_unreadable_last_record() {
        let backends = coffee_and_tea(5);
        backends
            .ledger
            .append_line("ORD0001,2024-01-01 10:00:00,Ann,Tea:1:30,30,Completed")
            .unwrap();
        backends
            .ledger
            .append_line("ORD0002,2024-01-01 10:05:00,Ben,Tea:1:30,30,Paid")
            .unwrap();
        let mut desk = backends.open();

        assert_eq!(desk.committed_count(), 1);
        assert_eq!(desk.next_order_id(), OrderId::new(3));

        desk.add_item("Coffee", 1).unwrap();
        assert_eq!(desk.commit("Cid").unwrap().order_id.to_string(), "ORD0003");
    }

    #[test]
    fn reopened_desk_continues_numbering() {
        let backends = coffee_and_tea(10);
        {
            let mut desk = backends.open();
            for customer in ["Ann", "Ben", "Cid"] {
                desk.add_item("Coffee", 1).unwrap();
                desk.commit(customer).unwrap();
            }
        }

        let mut desk = backends.open();
        assert_eq!(desk.committed_count(), 3);
        assert_eq!(desk.stock_of("Coffee"), 7);

        desk.add_item("Tea", 1).unwrap();
        assert_eq!(desk.commit("Dee").unwrap().order_id.to_string(), "ORD0004");
    }

    #[test]
    fn file_backed_restart_replays_orders() {
        let dir = tempfile::tempdir().unwrap();
        let paths = StorePaths::in_dir(dir.path());
        ensure_defaults(&paths).unwrap();
        let at = NaiveDate::from_ymd_opt(2024, 8, 2)
            .unwrap()
            .and_hms_opt(14, 5, 9)
            .unwrap();

        let committed = {
            let mut desk = OrderDesk::open_files(&paths).unwrap();
            desk.add_item("Sandwich", 2).unwrap();
            desk.add_item("Juice", 1).unwrap();
            desk.add_item("Sandwich", 1).unwrap();
            desk.commit_at("Eve", at).unwrap().order
        };

        let desk = OrderDesk::open_files(&paths).unwrap();
        let replayed = desk.replay_ledger().unwrap();

        assert_eq!(replayed, vec![committed.clone()]);
        assert_eq!(committed.total, Money::from_units(430));
        assert_eq!(desk.stock_of("Sandwich"), 47);
        assert_eq!(desk.stock_of("Juice"), 59);
        assert_eq!(desk.next_order_id(), OrderId::new(2));
    }

    #[test]
    fn registered_item_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let paths = StorePaths::in_dir(dir.path());
        ensure_defaults(&paths).unwrap();

        {
            let mut desk = OrderDesk::open_files(&paths).unwrap();
            desk.register_item("Muffin", Money::from_cents(6550), 12).unwrap();
            desk.register_item("Coffee", Money::from_units(55), 80).unwrap();
        }

        let desk = OrderDesk::open_files(&paths).unwrap();
        let menu = desk.menu();
        assert_eq!(menu.len(), 9);
        assert_eq!(menu[0].unit_price, Money::from_units(55));
        assert_eq!(menu[0].stock, 80);
        assert_eq!(menu[8].name.as_str(), "Muffin");
        assert_eq!(menu[8].stock, 12);
    }
}

#[derive(Debug, Clone)]
enum Action {
    Add(usize, i64),
    Remove(usize),
    Clear,
}

const ITEMS: [&str; 4] = ["Coffee", "Tea", "Cake", "Muffin"];

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        4 => (0..ITEMS.len(), -1i64..6).prop_map(|(i, q)| Action::Add(i, q)),
        1 => (0..ITEMS.len()).prop_map(Action::Remove),
        1 => Just(Action::Clear),
    ]
}

fn stocked() -> Backends {
    Backends::new(
        &["Coffee,50", "Tea,30", "Cake,80.50"],
        &["Coffee,6", "Tea,9", "Cake,3"],
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn total_always_matches_lines(actions in prop::collection::vec(action(), 0..40)) {
        let backends = stocked();
        let mut desk = backends.open();

        for action in actions {
            match action {
                Action::Add(i, q) => { let _ = desk.add_item(ITEMS[i], q); }
                Action::Remove(i) => { desk.remove_item(ITEMS[i]); }
                Action::Clear => desk.clear_order(),
            }
            let order = desk.current_order();
            let sum: Money = order.lines.iter().map(|l| l.line_total()).sum();
            prop_assert_eq!(order.total, sum);
            for line in &order.lines {
                prop_assert!(line.quantity > 0);
                prop_assert!(line.quantity <= desk.stock_of(line.item_name.as_str()));
            }
        }
        prop_assert_eq!(backends.inventory.write_count(), 0);
    }

    #[test]
    fn commits_never_oversell_or_reuse_ids(
        rounds in prop::collection::vec(prop::collection::vec(action(), 1..8), 1..8)
    ) {
        let backends = stocked();
        let mut desk = backends.open();
        let mut last_id: Option<OrderId> = None;

        for actions in rounds {
            for action in actions {
                if let Action::Add(i, q) = action {
                    let _ = desk.add_item(ITEMS[i], q);
                }
            }
            if let Ok(receipt) = desk.commit("Pat") {
                if let Some(prev) = last_id {
                    prop_assert!(receipt.order_id > prev);
                }
                last_id = Some(receipt.order_id);
            }
            desk.clear_order();

            for entry in desk.inventory().entries() {
                prop_assert!(entry.quantity <= 9);
            }
        }

        let replayed = desk.replay_ledger().unwrap();
        let sold: u32 = replayed
            .iter()
            .flat_map(|o| &o.lines)
            .filter(|l| l.item_name.as_str() == "Cake")
            .map(|l| l.quantity)
            .sum();
        prop_assert_eq!(sold + desk.stock_of("Cake"), 3);
        for order in &replayed {
            prop_assert_eq!(order.total, order.lines_total());
        }
    }
}
