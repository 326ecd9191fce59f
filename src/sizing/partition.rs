//! Splitting a cache's capacity into hot, warm and cold tiers.
//!
//! New entries are admitted to **hot**. Entries that are touched again are
//! promoted to **warm**, which gets the lion's share of the capacity. Entries
//! that age out of hot or warm without being touched land in **cold**, the
//! eviction candidates. Hot and cold are always the same size.

use serde::Serialize;

use crate::error::{Error, Result};

/// Fraction of capacity given to the warm tier when none is specified.
pub const DEFAULT_WARM_RATIO: f64 = 0.8;

/// Smallest capacity that gives every tier at least one slot.
pub const MIN_CAPACITY: u32 = 3;

/// Tier sizes for a bounded cache. `hot + warm + cold` equals the capacity
/// it was computed from, and every tier holds at least one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CapacityPartition {
    hot: u32,
    warm: u32,
    cold: u32,
}

impl CapacityPartition {
    /// Partitions `capacity` with [`DEFAULT_WARM_RATIO`].
    ///
    /// # Errors
    /// Returns [`Error::CapacityTooSmall`] if `capacity < 3`.
    pub fn new(capacity: u32) -> Result<Self> {
        Self::compute(capacity, DEFAULT_WARM_RATIO)
    }

    /// Partitions `capacity`, giving `warm_ratio` of it to the warm tier and
    /// splitting the remainder evenly between hot and cold.
    ///
    /// ```rust
    /// use cachestat::sizing::CapacityPartition;
    ///
    /// let p = CapacityPartition::compute(100, 0.8).unwrap();
    /// assert_eq!((p.hot(), p.warm(), p.cold()), (10, 80, 10));
    /// ```
    ///
    /// # Errors
    /// - [`Error::CapacityTooSmall`] if `capacity < 3`.
    /// - [`Error::WarmRatioOutOfRange`] if `warm_ratio` is not in `[0, 1)`.
    ///
    /// # Panics
    /// Panics if the computed tiers break the sum or minimum-size invariant,
    /// which would be a bug in this function rather than bad input.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn compute(capacity: u32, warm_ratio: f64) -> Result<Self> {
        if capacity < MIN_CAPACITY {
            return Err(Error::CapacityTooSmall { capacity });
        }
        if !(0.0..1.0).contains(&warm_ratio) {
            return Err(Error::WarmRatioOutOfRange { ratio: warm_ratio });
        }

        let total = i64::from(capacity);
        // A ratio small enough to floor to zero still leaves warm one slot.
        let warm = ((total as f64 * warm_ratio).floor() as i64).max(1);
        let hot = ((total - warm) / 2).max(1);
        let cold = hot;

        let overflow = warm + hot + cold - total;
        let warm = warm - overflow;

        assert!(
            hot >= 1 && warm >= 1 && cold >= 1 && hot + warm + cold == total,
            "partition of {capacity} at ratio {warm_ratio} produced ({hot}, {warm}, {cold})"
        );

        Ok(Self {
            hot: hot as u32,
            warm: warm as u32,
            cold: cold as u32,
        })
    }

    /// Capacity of the admission tier.
    #[inline]
    pub fn hot(&self) -> u32 {
        self.hot
    }

    /// Capacity of the frequently-reused tier.
    #[inline]
    pub fn warm(&self) -> u32 {
        self.warm
    }

    /// Capacity of the eviction-candidate tier.
    #[inline]
    pub fn cold(&self) -> u32 {
        self.cold
    }

    /// Total capacity, `hot + warm + cold`.
    #[inline]
    pub fn capacity(&self) -> u32 {
        self.hot + self.warm + self.cold
    }
}
