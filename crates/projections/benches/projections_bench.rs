use chrono::NaiveDate;
use common::{CommittedOrder, ItemName, Money, OrderId, OrderLine, OrderStatus};
use criterion::{Criterion, criterion_group, criterion_main};
use projections::{OrderHistoryView, ProjectionProcessor, SalesView};

fn ledger(n: u64) -> Vec<CommittedOrder> {
    let items = ["Coffee", "Tea", "Cake", "Juice"];
    (1..=n)
        .map(|seq| {
            let lines: Vec<OrderLine> = items
                .iter()
                .take(1 + (seq % 4) as usize)
                .map(|name| OrderLine::new(ItemName::new(name).unwrap(), Money::from_units(50), 2))
                .collect();
            CommittedOrder {
                id: OrderId::new(seq),
                timestamp: NaiveDate::from_ymd_opt(2024, 1, 1 + (seq % 28) as u32)
                    .unwrap()
                    .and_hms_opt(10, 0, 0)
                    .unwrap(),
                customer_name: format!("Customer {}", seq % 17),
                total: lines.iter().map(OrderLine::line_total).sum(),
                lines,
                status: OrderStatus::Completed,
            }
        })
        .collect()
}

fn bench_rebuild_1000_orders(c: &mut Criterion) {
    let orders = ledger(1000);
    let mut processor = ProjectionProcessor::new();
    processor.register(Box::new(OrderHistoryView::new()));
    processor.register(Box::new(SalesView::new()));

    c.bench_function("projections/rebuild_1000_orders", |b| {
        b.iter(|| processor.rebuild_all(orders.as_slice()).unwrap());
    });
}

fn bench_sales_summary(c: &mut Criterion) {
    let orders = ledger(1000);
    let sales = SalesView::new();
    let mut processor = ProjectionProcessor::new();
    processor.register(Box::new(sales.clone()));
    processor.run_catch_up(orders.as_slice()).unwrap();

    c.bench_function("projections/sales_summary", |b| {
        b.iter(|| sales.summary());
    });
}

criterion_group!(benches, bench_rebuild_1000_orders, bench_sales_summary);
criterion_main!(benches);
