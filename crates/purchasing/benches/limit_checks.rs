use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use spendguard_core::AggregateId;
use spendguard_purchasing::{LineItem, Money, PurchaseOrder, PurchaseOrderId};

fn order_with_items(n: usize) -> (PurchaseOrder, Vec<LineItem>) {
    let mut order = PurchaseOrder::new(
        PurchaseOrderId::new(AggregateId::new()),
        Money::from(i64::MAX / 2),
    );
    for i in 0..n {
        order.try_add_item(LineItem::new(Money::from(i as i64 + 1)));
    }
    let items = order.items().to_vec();
    (order, items)
}

fn bench_limit_checks(c: &mut Criterion) {
    let mut group = c.benchmark_group("limit_checks");

    for &n in &[10usize, 100, 1_000] {
        let (order, items) = order_with_items(n);
        let last = items.last().cloned().expect("at least one item");

        group.bench_with_input(BenchmarkId::new("new_item", n), &n, |b, _| {
            b.iter(|| order.evaluate_limit_for_new_item(black_box(Money::from(42))))
        });

        group.bench_with_input(BenchmarkId::new("replacement", n), &n, |b, _| {
            b.iter(|| {
                order
                    .evaluate_limit_for_replacement(black_box(&last), black_box(Money::from(42)))
                    .expect("member")
            })
        });

        group.bench_with_input(BenchmarkId::new("update_item_cost", n), &n, |b, _| {
            let mut order = order.clone();
            let id = last.id_typed();
            b.iter(|| order.try_update_item_cost(id, black_box(Money::from(7))).expect("member"))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_limit_checks);
criterion_main!(benches);
