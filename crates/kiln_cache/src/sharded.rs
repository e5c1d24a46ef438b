//! Sharded cache for concurrent access.
//!
//! Coarse-grained exclusion, split across shards: each shard is a
//! `TypeCache` behind its own mutex, and a key always maps to the same shard.
//! A shard lock is held for the whole probe, insert, possible rehash and the
//! caller's closure, so types in different shards never contend while work on
//! one type is fully serialized.

use kiln_ir::TypeIdentity;
use parking_lot::Mutex;

use crate::{CacheConfig, CacheError, CacheStats, TypeCache};

/// Number of shards. Identity handles are issued sequentially, so the low
/// bits of the handle spread types evenly.
pub const NUM_SHARDS: usize = 16;

/// Thread-safe `TypeCache` split into independently locked shards.
pub struct ShardedTypeCache<V> {
    shards: [Mutex<TypeCache<V>>; NUM_SHARDS],
}

impl<V> ShardedTypeCache<V> {
    /// Create an empty cache with the default configuration.
    pub fn new() -> Self {
        let shards = std::array::from_fn(|_| Mutex::new(TypeCache::new()));
        Self { shards }
    }

    /// Create an empty cache whose shards together start with
    /// `config.initial_capacity` slots.
    pub fn with_config(config: CacheConfig) -> Result<Self, CacheError> {
        config.validate()?;
        let per_shard = config.with_initial_capacity(config.initial_capacity / NUM_SHARDS);
        let mut shards = Self::new().shards;
        for shard in &mut shards {
            *shard.get_mut() = TypeCache::with_config(per_shard)?;
        }
        Ok(Self { shards })
    }

    #[inline]
    fn shard(&self, key: TypeIdentity) -> &Mutex<TypeCache<V>> {
        &self.shards[key.raw() as usize % NUM_SHARDS]
    }

    /// Run `f` on the slot for `key`, inserting `V::default()` if absent.
    ///
    /// The shard stays locked while `f` runs, so `f` observes and publishes
    /// the slot atomically with respect to every other caller using `key`.
    pub fn with_slot<R>(&self, key: TypeIdentity, f: impl FnOnce(&mut V) -> R) -> R
    where
        V: Default,
    {
        let mut shard = self.shard(key).lock();
        f(shard.get_or_insert_ref(key))
    }

    /// Run `f` on the value for `key`, if present, without inserting.
    pub fn read<R>(&self, key: TypeIdentity, f: impl FnOnce(Option<&V>) -> R) -> R {
        let shard = self.shard(key).lock();
        f(shard.try_get(key))
    }

    /// Clone the value for `key`, if present.
    pub fn get_cloned(&self, key: TypeIdentity) -> Option<V>
    where
        V: Clone,
    {
        self.read(key, |value| value.cloned())
    }

    /// Total entries across all shards.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.lock().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|shard| shard.lock().is_empty())
    }

    /// Counters summed across all shards.
    pub fn stats(&self) -> CacheStats {
        self.shards
            .iter()
            .fold(CacheStats::default(), |total, shard| {
                let stats = shard.lock().stats();
                CacheStats {
                    len: total.len + stats.len,
                    capacity: total.capacity + stats.capacity,
                    growths: total.growths + stats.growths,
                }
            })
    }
}

impl<V> Default for ShardedTypeCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
