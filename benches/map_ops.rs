//! Benchmarks comparing AvlMap to the standard library's BTreeMap.

use avl_rs::AvlMap;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeMap;

fn generate_keys(n: usize) -> Vec<u64> {
    let mut keys: Vec<u64> = (0..n as u64).collect();
    keys.shuffle(&mut StdRng::seed_from_u64(42));
    keys
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");

    for size in [1_000, 10_000, 100_000].iter() {
        let keys = generate_keys(*size);

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), size, |b, _| {
            b.iter(|| {
                let mut map: BTreeMap<u64, u64> = BTreeMap::new();
                for (i, key) in keys.iter().enumerate() {
                    map.insert(*key, i as u64);
                }
                black_box(map)
            });
        });

        group.bench_with_input(BenchmarkId::new("AvlMap", size), size, |b, _| {
            b.iter(|| {
                let mut map: AvlMap<u64, u64> = AvlMap::new();
                for (i, key) in keys.iter().enumerate() {
                    map.insert(*key, i as u64);
                }
                black_box(map)
            });
        });
    }

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");

    for size in [1_000, 10_000, 100_000].iter() {
        let keys = generate_keys(*size);

        let mut btree: BTreeMap<u64, u64> = BTreeMap::new();
        let mut avl: AvlMap<u64, u64> = AvlMap::new();
        for (i, key) in keys.iter().enumerate() {
            btree.insert(*key, i as u64);
            avl.insert(*key, i as u64);
        }

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), size, |b, _| {
            b.iter(|| {
                let mut hits = 0u64;
                for key in keys.iter() {
                    if btree.get(key).is_some() {
                        hits += 1;
                    }
                }
                black_box(hits)
            });
        });

        group.bench_with_input(BenchmarkId::new("AvlMap", size), size, |b, _| {
            b.iter(|| {
                let mut hits = 0u64;
                for key in keys.iter() {
                    if avl.get(key).is_some() {
                        hits += 1;
                    }
                }
                black_box(hits)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_insert, bench_lookup);
criterion_main!(benches);
