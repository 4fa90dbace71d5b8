//! Tree store lookup benchmarks.
//!
//! Compares sequential child scans with and without the position cache, and
//! measures the cost of revalidating after a mutation.

#![allow(clippy::semicolon_if_nothing_returned)]

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use treestore_rust::{ColumnType, TreePosition, TreeStore, TreeStoreOptions};

fn wide_store(width: usize, cache_lookups: bool) -> (TreeStore, TreePosition) {
    let options = TreeStoreOptions {
        cache_lookups,
        capacity: width + 1,
        ..TreeStoreOptions::default()
    };
    let mut store = TreeStore::with_options([ColumnType::UInt], options);
    let parent = store.add_child(None).unwrap();
    for i in 0..width {
        let kid = store.add_child(Some(&parent)).unwrap();
        store.set_value(&kid, 0, i as u64).unwrap();
    }
    (store, parent)
}

fn sequential_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequential_scan");
    for width in [16usize, 256, 2048] {
        for (label, cached) in [("cached", true), ("uncached", false)] {
            let (mut store, parent) = wide_store(width, cached);
            group.bench_with_input(BenchmarkId::new(label, width), &width, |b, &width| {
                b.iter(|| {
                    for i in 0..width {
                        black_box(store.child(Some(&parent), black_box(i)).unwrap());
                    }
                });
            });
        }
    }
    group.finish();
}

fn repeated_index(c: &mut Criterion) {
    let (mut store, parent) = wide_store(1024, true);
    c.bench_function("repeated_index_hit", |b| {
        b.iter(|| store.child(Some(&parent), black_box(700)).unwrap());
    });
}

fn scan_after_mutation(c: &mut Criterion) {
    c.bench_function("scan_after_insert_256", |b| {
        let (mut store, parent) = wide_store(256, true);
        b.iter(|| {
            let first = store.child(Some(&parent), 0).unwrap().unwrap();
            let inserted = store.insert_after(&first).unwrap();
            for i in 0..256 {
                black_box(store.child(Some(&parent), i).unwrap());
            }
            store.remove(&inserted).unwrap();
        });
    });
}

fn children_count(c: &mut Criterion) {
    let (mut store, parent) = wide_store(1024, true);
    c.bench_function("children_count_cached", |b| {
        b.iter(|| store.children_count(Some(black_box(&parent))).unwrap());
    });
    c.bench_function("children_count_root", |b| {
        b.iter(|| store.children_count(black_box(None)).unwrap());
    });
}

criterion_group!(
    benches,
    sequential_scan,
    repeated_index,
    scan_after_mutation,
    children_count
);
criterion_main!(benches);
