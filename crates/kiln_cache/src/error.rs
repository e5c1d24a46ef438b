//! Cache errors.

use std::collections::TryReserveError;

/// Error raised while configuring or sizing a cache.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The backing array could not be allocated.
    #[error("type cache could not allocate {requested} slots")]
    AllocationFailure {
        requested: usize,
        #[source]
        source: TryReserveError,
    },
    /// The capacity computation overflowed `usize`.
    #[error("type cache capacity overflow")]
    CapacityOverflow,
    /// The sizing policy is unusable.
    #[error("invalid type cache configuration: {reason}")]
    InvalidConfig { reason: String },
}
