//! Benchmarks for selection aggregation over a synthetic topology

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nwdash_common::{
    EntryKey, HierarchyCatalog, MetricName, MetricSchema, MetricSet, MetricsStore, Scope,
    Selection, SelectionAggregator,
};
use std::sync::Arc;

fn synthetic_aggregator(customers: usize) -> SelectionAggregator {
    let data_centers = 8;
    let servers = 6;

    let mut catalog = HierarchyCatalog::new();
    for dc in 0..data_centers {
        catalog
            .add_data_center(
                format!("dc-{}", dc),
                (0..servers).map(|s| format!("bk-{}", s)),
            )
            .unwrap();
    }

    let mut store = MetricsStore::new(MetricSchema::Counts);
    for c in 0..customers {
        let assigned: Vec<String> = (0..3).map(|i| format!("dc-{}", (c + i) % data_centers)).collect();
        for dc in &assigned {
            for s in 0..servers {
                let metrics = MetricSet::zeroed(MetricSchema::Counts)
                    .with(MetricName::NwServerCount, (c % 7) as u64 + 1)
                    .with(MetricName::StorageNodeCount, s as u64)
                    .with(MetricName::ObjectCount, (c * s) as u64 % 97)
                    .with(MetricName::DomainCount, 10);
                store
                    .insert(EntryKey::new(format!("cust-{}", c), dc.as_str(), format!("bk-{}", s)), metrics)
                    .unwrap();
            }
        }
        catalog.add_customer(format!("cust-{}", c), assigned).unwrap();
    }

    SelectionAggregator::new(Arc::new(catalog), Arc::new(store))
}

fn aggregate_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");

    for customers in [10, 100, 1000].iter() {
        let aggregator = synthetic_aggregator(*customers);

        group.bench_with_input(BenchmarkId::new("all", customers), customers, |b, _| {
            let selection = Selection::all();
            b.iter(|| black_box(aggregator.aggregate(black_box(&selection))));
        });

        group.bench_with_input(BenchmarkId::new("customer", customers), customers, |b, _| {
            let selection = Selection::new(Scope::only("cust-3"), Scope::All, Scope::All);
            b.iter(|| black_box(aggregator.aggregate(black_box(&selection))));
        });

        group.bench_with_input(BenchmarkId::new("children", customers), customers, |b, _| {
            let selection = Selection::all();
            b.iter(|| black_box(aggregator.aggregate_children(black_box(&selection))));
        });
    }

    group.finish();
}

fn options_bench(c: &mut Criterion) {
    let aggregator = synthetic_aggregator(100);

    c.bench_function("options_for_all", |b| {
        let selection = Selection::all();
        b.iter(|| black_box(aggregator.options_for(black_box(&selection))));
    });
}

criterion_group!(benches, aggregate_bench, options_bench);
criterion_main!(benches);
