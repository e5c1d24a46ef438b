//! `bench-dict`: `TypeCache` against `FxHashMap`.
//!
//! Both containers get the same workload: store an index for every type of
//! set A, then sum the stored values found for every type of sets A and B.
//! Set B is sampled independently, so some of its lookups miss.

use std::hint::black_box;
use std::time::{Duration, Instant};

use kiln_cache::{CacheConfig, CacheError, CacheStats, TypeCache};
use kiln_ir::TypeIdentity;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;

use crate::BenchConfig;

/// Number of distinct identities the sampler draws from.
pub const TYPE_UNIVERSE: u32 = 4096;

/// Two type sets sampled with replacement from the same universe.
#[derive(Clone, Debug)]
pub struct TypeSets {
    pub a: Vec<TypeIdentity>,
    pub b: Vec<TypeIdentity>,
}

impl TypeSets {
    /// Sample `types` identities for each set.
    pub fn sample(types: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut draw = |count: usize| -> Vec<TypeIdentity> {
            (0..count)
                .filter_map(|_| {
                    let offset = rng.random_range(0..TYPE_UNIVERSE);
                    TypeIdentity::from_raw(TypeIdentity::FIRST_DYNAMIC + offset)
                })
                .collect()
        };
        let a = draw(types);
        let b = draw(types);
        Self { a, b }
    }
}

/// Run one round of the workload against a `TypeCache`.
pub fn cache_round(cache: &mut TypeCache<u64>, sets: &TypeSets) -> u64 {
    for (index, &ty) in (0u64..).zip(&sets.a) {
        *cache.get_or_insert_ref(ty) = index;
    }
    sets.a
        .iter()
        .chain(&sets.b)
        .filter_map(|&ty| cache.try_get(ty))
        .sum()
}

/// Run one round of the workload against an `FxHashMap`.
pub fn map_round(map: &mut FxHashMap<TypeIdentity, u64>, sets: &TypeSets) -> u64 {
    for (index, &ty) in (0u64..).zip(&sets.a) {
        map.insert(ty, index);
    }
    sets.a
        .iter()
        .chain(&sets.b)
        .filter_map(|ty| map.get(ty))
        .sum()
}

/// Timings of one `bench-dict` run.
#[derive(Clone, Debug)]
pub struct DictReport {
    pub cache: Duration,
    pub map: Duration,
    /// Sum computed by the last round; equal for both containers.
    pub sum: u64,
    pub cache_stats: CacheStats,
}

/// Time `config.rounds` rounds of the workload on both containers.
pub fn bench_dict(config: &BenchConfig) -> Result<DictReport, CacheError> {
    let sets = TypeSets::sample(config.types, config.seed);
    let cache_config = CacheConfig::new().with_initial_capacity(config.capacity);
    let mut cache = TypeCache::with_config(cache_config)?;
    let mut map = FxHashMap::default();
    tracing::debug!(
        types = config.types,
        rounds = config.rounds,
        capacity = config.capacity,
        "starting dictionary benchmark"
    );

    let mut cache_sum = 0;
    let start = Instant::now();
    for _ in 0..config.rounds {
        cache_sum = black_box(cache_round(&mut cache, &sets));
    }
    let cache_time = start.elapsed();

    let mut map_sum = 0;
    let start = Instant::now();
    for _ in 0..config.rounds {
        map_sum = black_box(map_round(&mut map, &sets));
    }
    let map_time = start.elapsed();

    debug_assert_eq!(cache_sum, map_sum);
    Ok(DictReport {
        cache: cache_time,
        map: map_time,
        sum: cache_sum,
        cache_stats: cache.stats(),
    })
}
