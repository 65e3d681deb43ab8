//! # Stockroom Benchmarks
//!
//! | Group | Operation | Target |
//! |-------|-----------|--------|
//! | intake | One delivery line with N tracked units | < 10ms for 500 units |
//! | search | Identifier substring search over 5000 units | < 20ms |
//! | bulk | Single bulk stock adjustment | < 100µs |

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use inventory_engine::test_utils::*;
use inventory_engine::*;
use shared_types::TrackingMode;

fn serials(prefix: &str, count: usize) -> Vec<TrackedUnitSeed> {
    (0..count)
        .map(|i| TrackedUnitSeed::serial(format!("{}-{:06}", prefix, i)))
        .collect()
}

fn bench_tracked_intake(c: &mut Criterion) {
    let mut group = c.benchmark_group("intake");

    for size in [10usize, 100, 500] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("tracked_line", size), &size, |b, &size| {
            b.iter_batched(
                || {
                    let (service, _) = make_test_service();
                    let entry = create_entry(&service, "Widget", TrackingMode::Serial);
                    let delivery = open_delivery(&service);
                    let request = AddDeliveryLineRequest {
                        delivery_id: delivery.id,
                        catalog_entry_id: entry.id,
                        quantity: size as i64,
                        unit_price: money("100.00"),
                        seeds: serials("SN", size),
                    };
                    (service, request)
                },
                |(service, request)| black_box(service.add_delivery_line(request).is_ok()),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_identifier_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");

    let (service, _) = make_test_service();
    let entry = create_entry(&service, "Widget", TrackingMode::Serial);
    for batch in 0..10 {
        let delivery = open_delivery(&service);
        service
            .add_delivery_line(AddDeliveryLineRequest {
                delivery_id: delivery.id,
                catalog_entry_id: entry.id,
                quantity: 500,
                unit_price: money("100.00"),
                seeds: serials(&format!("B{}", batch), 500),
            })
            .unwrap();
    }

    let by_substring = IdentifierFilter {
        search: Some("B7-0004".to_string()),
        ..Default::default()
    };
    group.bench_function("substring_5000_units", |b| {
        b.iter(|| black_box(service.list_identifiers(&by_substring).unwrap().len()))
    });
    group.bench_function("stock_overview", |b| {
        b.iter(|| black_box(service.stock_overview().unwrap().len()))
    });

    group.finish();
}

fn bench_bulk_adjustment(c: &mut Criterion) {
    let mut group = c.benchmark_group("bulk");

    let (service, _) = make_test_service();
    let cable = create_entry(&service, "USB-C cable", TrackingMode::None);
    group.bench_function("adjust_plus_one", |b| {
        b.iter(|| black_box(adjust(&service, cable.id, 1).is_ok()))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_tracked_intake,
    bench_identifier_search,
    bench_bulk_adjustment
);
criterion_main!(benches);
