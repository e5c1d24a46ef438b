//! Cache sizing configuration.
//!
//! # Defaults
//!
//! - **Initial capacity**: 32 slots (rounded up to a power of two, minimum 2)
//! - **Max load**: 72% of slots occupied before growing
//! - **Growth factor**: x2 (the new capacity is rounded up to a power of two)

use crate::CacheError;

/// Sizing policy of a `TypeCache`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CacheConfig {
    /// Slots allocated at construction.
    pub initial_capacity: usize,
    /// Percentage of occupied slots that triggers growth.
    pub max_load_percent: u8,
    /// Capacity multiplier applied on growth.
    pub growth_factor: usize,
}

impl CacheConfig {
    pub const DEFAULT_INITIAL_CAPACITY: usize = 32;
    pub const DEFAULT_MAX_LOAD_PERCENT: u8 = 72;
    pub const DEFAULT_GROWTH_FACTOR: usize = 2;

    /// Accepted range for `max_load_percent`.
    pub const LOAD_PERCENT_RANGE: std::ops::RangeInclusive<u8> = 10..=90;
    /// Accepted range for `growth_factor`.
    pub const GROWTH_FACTOR_RANGE: std::ops::RangeInclusive<usize> = 2..=1 << 16;

    pub const fn new() -> Self {
        Self {
            initial_capacity: Self::DEFAULT_INITIAL_CAPACITY,
            max_load_percent: Self::DEFAULT_MAX_LOAD_PERCENT,
            growth_factor: Self::DEFAULT_GROWTH_FACTOR,
        }
    }

    #[must_use]
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_max_load_percent(mut self, percent: u8) -> Self {
        self.max_load_percent = percent;
        self
    }

    #[must_use]
    pub fn with_growth_factor(mut self, factor: usize) -> Self {
        self.growth_factor = factor;
        self
    }

    /// Check the policy can always keep at least one slot free and that the
    /// initial capacity is representable.
    pub fn validate(&self) -> Result<(), CacheError> {
        if !Self::LOAD_PERCENT_RANGE.contains(&self.max_load_percent) {
            return Err(CacheError::InvalidConfig {
                reason: format!(
                    "max_load_percent must be within {}..={}, got {}",
                    Self::LOAD_PERCENT_RANGE.start(),
                    Self::LOAD_PERCENT_RANGE.end(),
                    self.max_load_percent
                ),
            });
        }
        if !Self::GROWTH_FACTOR_RANGE.contains(&self.growth_factor) {
            return Err(CacheError::InvalidConfig {
                reason: format!(
                    "growth_factor must be within {}..={}, got {}",
                    Self::GROWTH_FACTOR_RANGE.start(),
                    Self::GROWTH_FACTOR_RANGE.end(),
                    self.growth_factor
                ),
            });
        }
        if self.normalized_capacity().is_none() {
            return Err(CacheError::CapacityOverflow);
        }
        Ok(())
    }

    /// Power-of-two capacity actually allocated at construction, or `None`
    /// if rounding up overflows `usize`.
    pub(crate) fn normalized_capacity(&self) -> Option<usize> {
        self.initial_capacity.max(2).checked_next_power_of_two()
    }

    /// Maximum number of entries a table of `capacity` slots may hold.
    ///
    /// Always leaves at least one slot empty so probing terminates.
    pub(crate) fn threshold(&self, capacity: usize) -> usize {
        let percent = usize::from(self.max_load_percent);
        let limit = capacity / 100 * percent + capacity % 100 * percent / 100;
        limit.clamp(1, capacity - 1)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
