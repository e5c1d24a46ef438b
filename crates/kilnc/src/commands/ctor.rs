//! `bench-ctor`: constructing instances per type.
//!
//! Three ways to build a fixed catalogue of types through their
//! parameterless constructors:
//! - resolving and compiling on every construction
//! - a `ThunkFactory` cached thunk
//! - a `SharedThunkFactory` cached thunk

use std::hint::black_box;
use std::time::{Duration, Instant};

use kiln_ir::{ConstructibleShape, TypeIdentity, TypeRegistry};
use kiln_thunk::{
    CompiledThunk, ConstructorResolver, ConstructorTable, MetadataResolver, SharedThunkFactory,
    ThunkError, ThunkFactory,
};

/// Record type of the catalogue.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Person {
    pub age: u32,
    pub first_name: String,
    pub last_name: String,
}

/// Unit type of the catalogue.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Marker;

/// Types constructed by the benchmark, with the metadata describing them.
pub struct Catalogue {
    pub resolver: MetadataResolver,
    pub types: Vec<TypeIdentity>,
}

impl Catalogue {
    /// `Person`, `Vec<i32>`, `String` and `Marker`, each with a public
    /// parameterless constructor.
    pub fn new() -> Self {
        let mut registry = TypeRegistry::new();
        let mut table = ConstructorTable::new();
        let types = vec![
            table
                .define::<Person>(&mut registry)
                .public(&[], |_| {
                    Ok(Person {
                        first_name: "a".to_owned(),
                        ..Person::default()
                    })
                })
                .finish(),
            table.define::<Vec<i32>>(&mut registry).with_default().finish(),
            table.define::<String>(&mut registry).with_default().finish(),
            table.define::<Marker>(&mut registry).with_default().finish(),
        ];
        Self {
            resolver: MetadataResolver::new(registry, table),
            types,
        }
    }
}

impl Default for Catalogue {
    fn default() -> Self {
        Self::new()
    }
}

/// Construct every type once, resolving each constructor from metadata.
pub fn reflect_round(catalogue: &Catalogue) -> Result<usize, ThunkError> {
    let shape = ConstructibleShape::parameterless();
    for &ty in &catalogue.types {
        let descriptor = catalogue.resolver.resolve(ty, &shape)?;
        black_box(CompiledThunk::compile(&descriptor).invoke()?);
    }
    Ok(catalogue.types.len())
}

/// Construct every type once through thunks cached in `factory`.
pub fn cached_round<R: ConstructorResolver>(
    factory: &mut ThunkFactory<R>,
    types: &[TypeIdentity],
) -> Result<usize, ThunkError> {
    let shape = ConstructibleShape::parameterless();
    for &ty in types {
        black_box(factory.get_thunk(ty, &shape)?.invoke()?);
    }
    Ok(types.len())
}

/// Construct every type once through thunks cached in a shared factory.
pub fn shared_round<R: ConstructorResolver>(
    factory: &SharedThunkFactory<R>,
    types: &[TypeIdentity],
) -> Result<usize, ThunkError> {
    let shape = ConstructibleShape::parameterless();
    for &ty in types {
        black_box(factory.get_thunk(ty, &shape)?.invoke()?);
    }
    Ok(types.len())
}

/// Timings of one `bench-ctor` run.
#[derive(Clone, Debug)]
pub struct CtorReport {
    pub reflect: Duration,
    pub cached: Duration,
    pub shared: Duration,
    /// Instances built per variant.
    pub constructed: usize,
}

/// Time `rounds` rounds of each construction variant.
pub fn bench_ctor(rounds: usize) -> Result<CtorReport, ThunkError> {
    let catalogue = Catalogue::new();
    let mut factory = ThunkFactory::new(&catalogue.resolver);
    let shared = SharedThunkFactory::new(&catalogue.resolver);
    tracing::debug!(
        rounds,
        types = catalogue.types.len(),
        "starting constructor benchmark"
    );

    let mut constructed = 0;
    let start = Instant::now();
    for _ in 0..rounds {
        constructed += reflect_round(&catalogue)?;
    }
    let reflect = start.elapsed();

    let start = Instant::now();
    for _ in 0..rounds {
        cached_round(&mut factory, &catalogue.types)?;
    }
    let cached = start.elapsed();

    let start = Instant::now();
    for _ in 0..rounds {
        shared_round(&shared, &catalogue.types)?;
    }
    let shared_time = start.elapsed();

    tracing::debug!(stats = ?factory.stats(), "constructor benchmark finished");
    Ok(CtorReport {
        reflect,
        cached,
        shared: shared_time,
        constructed,
    })
}
