//! Identity-keyed caches for per-type memoization.
//!
//! `TypeCache<V>` maps each `TypeIdentity` to exactly one value slot. Its
//! central operation, [`TypeCache::get_or_insert_ref`], finds or claims the
//! slot in a single probe sequence and hands back `&mut V`, so callers fill
//! a fresh slot without a second lookup.
//!
//! `ShardedTypeCache<V>` is the thread-safe variant: sixteen independently
//! locked `TypeCache` shards.

mod config;
mod error;
mod sharded;
mod table;

pub use config::CacheConfig;
pub use error::CacheError;
pub use sharded::{ShardedTypeCache, NUM_SHARDS};
pub use table::{CacheStats, TypeCache};
