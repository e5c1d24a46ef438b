//! `TypeCache` against `FxHashMap` on the `bench-dict` workload.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use kiln_cache::{CacheConfig, TypeCache};
use kilnc::commands::{cache_round, map_round, TypeSets};
use kilnc::BenchConfig;
use rustc_hash::FxHashMap;

/// Fill set A, then look up sets A and B, at several set sizes.
fn bench_fill_and_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("type_cache/fill_and_lookup");

    for types in [10, 80, 500, 2000] {
        let sets = TypeSets::sample(types, BenchConfig::DEFAULT_SEED);
        group.throughput(Throughput::Elements((types * 2) as u64));

        group.bench_with_input(BenchmarkId::new("type_cache", types), &sets, |b, sets| {
            let mut cache = TypeCache::with_capacity(BenchConfig::DEFAULT_CAPACITY);
            b.iter(|| black_box(cache_round(&mut cache, sets)));
        });
        group.bench_with_input(BenchmarkId::new("fx_hash_map", types), &sets, |b, sets| {
            let mut map = FxHashMap::default();
            b.iter(|| black_box(map_round(&mut map, sets)));
        });
    }

    group.finish();
}

/// Insert into an empty cache, paying for every growth on the way.
fn bench_growth(c: &mut Criterion) {
    let mut group = c.benchmark_group("type_cache/growth");
    let sets = TypeSets::sample(2000, BenchConfig::DEFAULT_SEED);

    for percent in [50, 72, 90] {
        let config = CacheConfig::new()
            .with_initial_capacity(2)
            .with_max_load_percent(percent);
        group.bench_with_input(BenchmarkId::from_parameter(percent), &config, |b, config| {
            b.iter(|| {
                let Ok(mut cache) = TypeCache::with_config(*config) else {
                    return;
                };
                black_box(cache_round(&mut cache, &sets));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_fill_and_lookup, bench_growth);
criterion_main!(benches);
