//! Open-addressed identity-keyed table.
//!
//! # Layout
//!
//! - Slots live in one `Vec<Option<Entry<V>>>`; `None` is an empty slot
//! - Capacity is a power of two so the home slot is a shift of the hash
//! - Hash: Fibonacci multiplication of the raw identity handle
//! - Collisions: linear probing; there is no removal, so no tombstones
//!
//! The table never holds more than `CacheConfig::threshold(capacity)`
//! entries, which keeps at least one slot empty and bounds every probe.

use std::fmt;

use kiln_ir::TypeIdentity;

use crate::{CacheConfig, CacheError};

/// 2^64 / golden ratio.
const FIBONACCI: u64 = 0x9E37_79B9_7F4A_7C15;

struct Entry<V> {
    key: TypeIdentity,
    value: V,
}

/// Outcome of a probe sequence.
enum Probe {
    /// Slot holding the key.
    Occupied(usize),
    /// First empty slot on the key's probe sequence.
    Vacant(usize),
}

/// Size and growth counters of a cache.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub len: usize,
    pub capacity: usize,
    /// Number of grow-and-rehash passes since construction.
    pub growths: u32,
}

impl CacheStats {
    /// Occupied slots as a percentage of capacity.
    pub fn load_percent(&self) -> usize {
        if self.capacity == 0 {
            0
        } else {
            self.len * 100 / self.capacity
        }
    }
}

/// Cache mapping each `TypeIdentity` to one value slot.
///
/// Specialized for the insert-once/read-many workload of per-type
/// memoization: no removal, no shrinking, and a single probe sequence per
/// operation.
pub struct TypeCache<V> {
    slots: Vec<Option<Entry<V>>>,
    len: usize,
    /// Entries allowed before the next insertion grows the table.
    threshold: usize,
    /// `64 - log2(capacity)`.
    shift: u32,
    growths: u32,
    config: CacheConfig,
}

impl<V> TypeCache<V> {
    /// Create an empty cache with the default configuration.
    pub fn new() -> Self {
        let config = CacheConfig::default();
        Self::from_slots(config, empty_slots(CacheConfig::DEFAULT_INITIAL_CAPACITY))
    }

    /// Create an empty cache with at least `capacity` slots.
    ///
    /// # Panics
    /// Panics if `capacity` rounded up to a power of two overflows `usize`
    /// or the slots cannot be allocated. [`TypeCache::with_config`] reports
    /// both as errors instead.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(CacheConfig::default().with_initial_capacity(capacity))
            .unwrap_or_else(|e| panic!("{e}"))
    }

    /// Create an empty cache with a custom sizing policy.
    pub fn with_config(config: CacheConfig) -> Result<Self, CacheError> {
        config.validate()?;
        let capacity = config
            .normalized_capacity()
            .ok_or(CacheError::CapacityOverflow)?;
        Ok(Self::from_slots(config, try_empty_slots(capacity)?))
    }

    fn from_slots(config: CacheConfig, slots: Vec<Option<Entry<V>>>) -> Self {
        let capacity = slots.len();
        Self {
            slots,
            len: 0,
            threshold: config.threshold(capacity),
            shift: 64 - capacity.trailing_zeros(),
            growths: 0,
            config,
        }
    }

    /// Get the value slot for `key`, inserting `V::default()` if absent.
    ///
    /// Repeated calls with the same key always reach the same logical slot,
    /// however many times the table has grown in between.
    #[inline]
    pub fn get_or_insert_ref(&mut self, key: TypeIdentity) -> &mut V
    where
        V: Default,
    {
        self.get_or_insert_with(key, V::default)
    }

    /// Get the value slot for `key`, inserting `init()` if absent.
    ///
    /// `init` runs only when the key is new, before the table is touched:
    /// if it panics the cache is left as it was.
    pub fn get_or_insert_with(&mut self, key: TypeIdentity, init: impl FnOnce() -> V) -> &mut V {
        match self.probe(key) {
            Probe::Occupied(index) => {
                &mut self.slots[index]
                    .get_or_insert_with(|| Entry { key, value: init() })
                    .value
            }
            Probe::Vacant(index) => {
                let entry = Entry { key, value: init() };
                let index = if self.len >= self.threshold {
                    self.grow(self.len + 1);
                    self.vacant_index(key)
                } else {
                    index
                };
                self.len += 1;
                tracing::trace!(%key, len = self.len, "type cache slot claimed");
                &mut self.slots[index].insert(entry).value
            }
        }
    }

    /// Look up the value for `key` without modifying the cache.
    #[inline]
    pub fn try_get(&self, key: TypeIdentity) -> Option<&V> {
        match self.probe(key) {
            Probe::Occupied(index) => self.slots[index].as_ref().map(|entry| &entry.value),
            Probe::Vacant(_) => None,
        }
    }

    /// Look up the value for `key` mutably, without inserting.
    pub fn get_mut(&mut self, key: TypeIdentity) -> Option<&mut V> {
        match self.probe(key) {
            Probe::Occupied(index) => self.slots[index].as_mut().map(|entry| &mut entry.value),
            Probe::Vacant(_) => None,
        }
    }

    #[inline]
    pub fn contains_key(&self, key: TypeIdentity) -> bool {
        matches!(self.probe(key), Probe::Occupied(_))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots in the backing array.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            len: self.len,
            capacity: self.capacity(),
            growths: self.growths,
        }
    }

    /// Iterate over occupied entries in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (TypeIdentity, &V)> {
        self.slots
            .iter()
            .filter_map(|slot| slot.as_ref().map(|entry| (entry.key, &entry.value)))
    }

    /// Make room for `additional` more entries without growing on insert.
    ///
    /// Unlike growth during insertion, which aborts on allocation failure,
    /// this reports the failure to the caller.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), CacheError> {
        let needed = self
            .len
            .checked_add(additional)
            .ok_or(CacheError::CapacityOverflow)?;
        let capacity = self
            .capacity_for(needed)
            .ok_or(CacheError::CapacityOverflow)?;
        if capacity == self.capacity() {
            return Ok(());
        }

        self.rehash_into(try_empty_slots(capacity)?);
        Ok(())
    }

    /// Smallest capacity reachable by repeated growth that holds `needed`
    /// entries, or `None` on overflow.
    fn capacity_for(&self, needed: usize) -> Option<usize> {
        let mut capacity = self.capacity();
        while self.config.threshold(capacity) < needed {
            capacity = capacity
                .checked_mul(self.config.growth_factor)
                .and_then(usize::checked_next_power_of_two)?;
        }
        Some(capacity)
    }

    /// Index of `key` on the home hash's probe sequence.
    #[inline]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "the shift leaves at most log2(capacity) significant bits"
    )]
    fn home(&self, key: TypeIdentity) -> usize {
        (u64::from(key.raw()).wrapping_mul(FIBONACCI) >> self.shift) as usize
    }

    fn probe(&self, key: TypeIdentity) -> Probe {
        let mask = self.slots.len() - 1;
        let mut index = self.home(key);
        loop {
            match &self.slots[index] {
                Some(entry) if entry.key == key => return Probe::Occupied(index),
                Some(_) => index = (index + 1) & mask,
                None => return Probe::Vacant(index),
            }
        }
    }

    /// First empty slot for a key known to be absent.
    fn vacant_index(&self, key: TypeIdentity) -> usize {
        let mask = self.slots.len() - 1;
        let mut index = self.home(key);
        while self.slots[index].is_some() {
            index = (index + 1) & mask;
        }
        index
    }

    /// Grow by the configured factor until `needed` entries fit and rehash
    /// every entry.
    ///
    /// # Panics
    /// Panics if the new capacity overflows `usize`. Allocation failure
    /// aborts, as for any `Vec`.
    #[cold]
    #[inline(never)]
    fn grow(&mut self, needed: usize) {
        let Some(capacity) = self.capacity_for(needed) else {
            panic!("{}", CacheError::CapacityOverflow);
        };
        self.rehash_into(empty_slots(capacity));
    }

    fn rehash_into(&mut self, slots: Vec<Option<Entry<V>>>) {
        let from = self.capacity();
        let old = std::mem::replace(&mut self.slots, slots);
        let capacity = self.slots.len();
        self.shift = 64 - capacity.trailing_zeros();
        self.threshold = self.config.threshold(capacity);
        self.growths += 1;

        for entry in old.into_iter().flatten() {
            let index = self.vacant_index(entry.key);
            self.slots[index] = Some(entry);
        }

        tracing::debug!(from, to = capacity, len = self.len, "type cache grown");
    }
}

fn empty_slots<V>(capacity: usize) -> Vec<Option<Entry<V>>> {
    std::iter::repeat_with(|| None).take(capacity).collect()
}

fn try_empty_slots<V>(capacity: usize) -> Result<Vec<Option<Entry<V>>>, CacheError> {
    let mut slots = Vec::new();
    slots
        .try_reserve_exact(capacity)
        .map_err(|source| CacheError::AllocationFailure {
            requested: capacity,
            source,
        })?;
    slots.resize_with(capacity, || None);
    Ok(slots)
}

impl<V> Default for TypeCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for TypeCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
