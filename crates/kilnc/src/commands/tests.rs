use super::*;
use crate::BenchConfig;
use kiln_cache::TypeCache;
use kiln_ir::ConstructibleShape;
use kiln_thunk::{SharedThunkFactory, ThunkFactory};
use pretty_assertions::assert_eq;
use rustc_hash::FxHashMap;

#[test]
fn sampling_is_seeded() {
    let first = TypeSets::sample(80, 7);
    let second = TypeSets::sample(80, 7);
    let other = TypeSets::sample(80, 8);

    assert_eq!(first.a, second.a);
    assert_eq!(first.b, second.b);
    assert_ne!(first.a, other.a);
    assert_eq!(first.a.len(), 80);
    assert!(first
        .a
        .iter()
        .all(|ty| ty.raw() >= kiln_ir::TypeIdentity::FIRST_DYNAMIC));
}

#[test]
fn cache_and_map_agree() {
    let sets = TypeSets::sample(200, 1);
    let mut cache = TypeCache::with_capacity(2);
    let mut map = FxHashMap::default();

    for _ in 0..3 {
        assert_eq!(cache_round(&mut cache, &sets), map_round(&mut map, &sets));
    }
    assert_eq!(cache.len(), map.len());
}

#[test]
fn bench_dict_reports_cache_growth() {
    let config = BenchConfig {
        types: 300,
        rounds: 2,
        capacity: 2,
        ..BenchConfig::default()
    };

    let report = bench_dict(&config).unwrap();

    assert!(report.cache_stats.growths > 0);
    assert!(report.cache_stats.len <= 300);
    assert!(report.sum > 0);
}

#[test]
fn catalogue_constructs_every_type() {
    let catalogue = Catalogue::new();

    assert_eq!(reflect_round(&catalogue).unwrap(), 4);

    let shape = ConstructibleShape::parameterless();
    let mut factory = ThunkFactory::new(&catalogue.resolver);
    let person: Person = factory
        .get_thunk(catalogue.types[0], &shape)
        .unwrap()
        .invoke_as()
        .unwrap();
    assert_eq!(person.first_name, "a");
    let marker: Marker = factory
        .get_thunk(catalogue.types[3], &shape)
        .unwrap()
        .invoke_as()
        .unwrap();
    assert_eq!(marker, Marker);
}

#[test]
fn cached_variants_compile_once_per_type() {
    let catalogue = Catalogue::new();
    let mut factory = ThunkFactory::new(&catalogue.resolver);
    let shared = SharedThunkFactory::new(&catalogue.resolver);

    for _ in 0..5 {
        cached_round(&mut factory, &catalogue.types).unwrap();
        shared_round(&shared, &catalogue.types).unwrap();
    }

    assert_eq!(factory.stats().compiled, 4);
    assert_eq!(factory.stats().hits, 16);
    assert_eq!(shared.stats().compiled, 4);
}

#[test]
fn bench_ctor_counts_constructions() {
    let report = bench_ctor(3).unwrap();

    assert_eq!(report.constructed, 12);
}
