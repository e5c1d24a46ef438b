//! Thread-safe thunk factory.

use std::sync::atomic::{AtomicUsize, Ordering};

use kiln_cache::{CacheConfig, CacheError, CacheStats, ShardedTypeCache};
use kiln_ir::{ConstructibleShape, TypeIdentity};

use crate::factory::{check_shape, compile_thunk};
use crate::{CompiledThunk, ConstructorResolver, FactoryStats, ThunkError};

/// `ThunkFactory` for concurrent callers.
///
/// Compilation happens while the shard holding the type is locked. Threads
/// racing on one type agree on a single compiled thunk and never see a slot
/// half-filled; types in other shards proceed in parallel. Share it behind an
/// `Arc`.
pub struct SharedThunkFactory<R> {
    cache: ShardedTypeCache<Option<CompiledThunk>>,
    resolver: R,
    compiled: AtomicUsize,
    hits: AtomicUsize,
    failures: AtomicUsize,
}

impl<R: ConstructorResolver> SharedThunkFactory<R> {
    pub fn new(resolver: R) -> Self {
        Self::from_cache(ShardedTypeCache::new(), resolver)
    }

    /// Create a factory whose shards together start with
    /// `config.initial_capacity` slots.
    pub fn with_config(resolver: R, config: CacheConfig) -> Result<Self, CacheError> {
        Ok(Self::from_cache(ShardedTypeCache::with_config(config)?, resolver))
    }

    fn from_cache(cache: ShardedTypeCache<Option<CompiledThunk>>, resolver: R) -> Self {
        Self {
            cache,
            resolver,
            compiled: AtomicUsize::new(0),
            hits: AtomicUsize::new(0),
            failures: AtomicUsize::new(0),
        }
    }

    /// Return the thunk constructing `ty`, compiling it on first request.
    ///
    /// Same contract as `ThunkFactory::get_thunk`.
    pub fn get_thunk(
        &self,
        ty: TypeIdentity,
        shape: &ConstructibleShape,
    ) -> Result<CompiledThunk, ThunkError> {
        self.cache.with_slot(ty, |slot| {
            if let Some(thunk) = slot.as_ref() {
                let thunk = check_shape(thunk, ty, shape)?;
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Ok(thunk);
            }
            match compile_thunk(&self.resolver, ty, shape) {
                Ok(thunk) => {
                    *slot = Some(thunk.clone());
                    self.compiled.fetch_add(1, Ordering::Relaxed);
                    Ok(thunk)
                }
                Err(err) => {
                    self.failures.fetch_add(1, Ordering::Relaxed);
                    Err(err)
                }
            }
        })
    }

    /// Clone the compiled thunk for `ty` without compiling.
    pub fn try_get(&self, ty: TypeIdentity) -> Option<CompiledThunk> {
        self.cache.get_cloned(ty).flatten()
    }

    /// Number of compiled thunks.
    pub fn len(&self) -> usize {
        self.compiled.load(Ordering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> FactoryStats {
        FactoryStats {
            compiled: self.compiled.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
