//! Performance benchmarks for the view pipeline.

use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use orderview::{
    paginate, run_query, Criteria, CriteriaStore, DateMode, OrderStatus, Record, RecordFeed,
    ViewPublisher,
};

const TYPES: [&str; 5] = ["Book", "Medicine", "Electric", "Mobile", "Watch"];

fn synthetic_orders(count: usize) -> Vec<Record> {
    (0..count)
        .map(|i| {
            let day = (i * 7919) % 365;
            let date = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                + chrono::Duration::days(day as i64);
            Record::new(
                i as u64,
                TYPES[i % TYPES.len()],
                OrderStatus::ALL[(i / 3) % OrderStatus::ALL.len()],
                date.format("%Y-%m-%d").to_string(),
            )
            .with_field("name", format!("Order {}", i))
            .with_field("address", "Somewhere")
        })
        .collect()
}

/// Benchmark a full query under each date mode
fn bench_query_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");
    let records = synthetic_orders(5_000);
    let from = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    let to = Utc.with_ymd_and_hms(2024, 6, 30, 0, 0, 0).unwrap();

    for (name, criteria) in [
        ("identity", Criteria::default()),
        ("type", Criteria::default().with_type("Book")),
        ("newest", Criteria::default().with_date_mode(DateMode::Newest)),
        ("oldest", Criteria::default().with_date_mode(DateMode::Oldest)),
        (
            "range",
            Criteria::default()
                .with_date_mode(DateMode::Range)
                .with_range(Some(from), Some(to)),
        ),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| black_box(run_query(&records, &criteria)));
        });
    }

    group.finish();
}

/// Benchmark a publisher recomputation at varying collection sizes
fn bench_recompute(c: &mut Criterion) {
    let mut group = c.benchmark_group("recompute");

    for count in [1_000, 5_000, 10_000] {
        group.bench_with_input(BenchmarkId::new("records", count), &count, |b, &count| {
            let mut publisher = ViewPublisher::new(CriteriaStore::new(), RecordFeed::detached());
            publisher.deliver(synthetic_orders(count));
            publisher.set_date_mode(DateMode::Newest);

            let mut flip = false;
            b.iter(|| {
                flip = !flip;
                publisher.set_type(if flip { "Mobile" } else { "" });
                black_box(publisher.page_view().len());
            });
        });
    }

    group.finish();
}

/// Benchmark windowing deep into a large filtered view
fn bench_paginate(c: &mut Criterion) {
    let records = synthetic_orders(10_000);

    c.bench_function("paginate_middle", |b| {
        b.iter(|| black_box(paginate(&records, 500, 9)));
    });
}

criterion_group!(benches, bench_query_modes, bench_recompute, bench_paginate);
criterion_main!(benches);
