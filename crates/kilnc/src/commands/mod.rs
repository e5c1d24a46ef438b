//! Benchmark commands.

mod ctor;
mod dict;

pub use ctor::{
    bench_ctor, cached_round, reflect_round, shared_round, Catalogue, CtorReport, Marker, Person,
};
pub use dict::{bench_dict, cache_round, map_round, DictReport, TypeSets, TYPE_UNIVERSE};

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
