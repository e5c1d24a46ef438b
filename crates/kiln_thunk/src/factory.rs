//! Per-type thunk memoization.
//!
//! `ThunkFactory` owns a `TypeCache<Option<CompiledThunk>>`. A slot holding
//! `None` has not been compiled yet; `Some` is final. Resolution runs only for
//! empty slots, so each type is resolved and compiled at most once per
//! factory.

use kiln_cache::{CacheConfig, CacheError, CacheStats, TypeCache};
use kiln_ir::{ConstructibleShape, TypeIdentity};

use crate::{CompiledThunk, ConstructorResolver, ThunkError};

/// Counters kept by a thunk factory.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FactoryStats {
    /// Thunks compiled.
    pub compiled: usize,
    /// Requests served from the cache.
    pub hits: usize,
    /// Requests whose resolution failed.
    pub failures: usize,
}

/// Single-threaded factory of compiled construction thunks.
pub struct ThunkFactory<R> {
    cache: TypeCache<Option<CompiledThunk>>,
    resolver: R,
    stats: FactoryStats,
}

impl<R: ConstructorResolver> ThunkFactory<R> {
    /// Create a factory with the default cache configuration.
    pub fn new(resolver: R) -> Self {
        Self {
            cache: TypeCache::new(),
            resolver,
            stats: FactoryStats::default(),
        }
    }

    /// Create a factory whose cache uses `config`.
    pub fn with_config(resolver: R, config: CacheConfig) -> Result<Self, CacheError> {
        Ok(Self {
            cache: TypeCache::with_config(config)?,
            resolver,
            stats: FactoryStats::default(),
        })
    }

    /// Return the thunk constructing `ty`, compiling it on first request.
    ///
    /// `shape` selects the constructor on first compilation. Later requests
    /// must ask for the same shape; a different one is a `ShapeConflict`.
    /// When resolution fails the slot stays empty and a later request
    /// resolves again.
    pub fn get_thunk(
        &mut self,
        ty: TypeIdentity,
        shape: &ConstructibleShape,
    ) -> Result<CompiledThunk, ThunkError> {
        let slot = self.cache.get_or_insert_ref(ty);
        if let Some(thunk) = slot.as_ref() {
            let thunk = check_shape(thunk, ty, shape)?;
            self.stats.hits += 1;
            return Ok(thunk);
        }

        match compile_thunk(&self.resolver, ty, shape) {
            Ok(thunk) => {
                *slot = Some(thunk.clone());
                self.stats.compiled += 1;
                Ok(thunk)
            }
            Err(err) => {
                self.stats.failures += 1;
                Err(err)
            }
        }
    }

    /// Peek at the compiled thunk for `ty` without compiling.
    pub fn try_get(&self, ty: TypeIdentity) -> Option<&CompiledThunk> {
        self.cache.try_get(ty).and_then(Option::as_ref)
    }

    /// Number of compiled thunks.
    pub fn len(&self) -> usize {
        self.stats.compiled
    }

    pub fn is_empty(&self) -> bool {
        self.stats.compiled == 0
    }

    pub fn stats(&self) -> FactoryStats {
        self.stats
    }

    /// Counters of the underlying cache.
    ///
    /// Types whose resolution failed still occupy an (empty) slot.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }
}

/// Hand out a cached thunk if it was compiled for `shape`.
pub(crate) fn check_shape(
    thunk: &CompiledThunk,
    ty: TypeIdentity,
    shape: &ConstructibleShape,
) -> Result<CompiledThunk, ThunkError> {
    if thunk.signature() == shape {
        Ok(thunk.clone())
    } else {
        Err(ThunkError::ShapeConflict {
            ty,
            cached: thunk.signature().clone(),
            requested: shape.clone(),
        })
    }
}

/// Resolve and compile the thunk for `ty`.
#[cold]
#[tracing::instrument(level = "debug", skip_all, fields(ty = %ty, shape = %shape))]
pub(crate) fn compile_thunk<R: ConstructorResolver + ?Sized>(
    resolver: &R,
    ty: TypeIdentity,
    shape: &ConstructibleShape,
) -> Result<CompiledThunk, ThunkError> {
    match resolver.resolve(ty, shape) {
        Ok(descriptor) => {
            let thunk = CompiledThunk::compile_for(&descriptor, shape);
            tracing::debug!(arity = thunk.arity(), "thunk compiled");
            Ok(thunk)
        }
        Err(err) => {
            tracing::debug!(error = %err, "thunk resolution failed");
            Err(err)
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
