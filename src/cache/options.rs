//! Cache configuration and the layout derived from it.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::sizing::{estimate_bucket_count, CapacityPartition, DEFAULT_WARM_RATIO};

fn default_warm_ratio() -> f64 {
    DEFAULT_WARM_RATIO
}

/// User-facing configuration of a bounded cache.
///
/// ```rust
/// use cachestat::cache::CacheOptions;
///
/// let layout = CacheOptions::new(100).layout().unwrap();
/// assert_eq!(layout.partition().warm(), 80);
/// assert_eq!(layout.capacity(), 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheOptions {
    /// Total number of entries the cache may hold.
    pub capacity: u32,
    /// Fraction of `capacity` reserved for frequently reused entries.
    #[serde(default = "default_warm_ratio")]
    pub warm_ratio: f64,
}

impl CacheOptions {
    /// Options for `capacity` entries with the default warm ratio.
    pub fn new(capacity: u32) -> Self {
        Self {
            capacity,
            warm_ratio: DEFAULT_WARM_RATIO,
        }
    }

    /// Overrides the warm ratio.
    #[must_use]
    pub fn with_warm_ratio(mut self, warm_ratio: f64) -> Self {
        self.warm_ratio = warm_ratio;
        self
    }

    /// Validates the options and computes tier sizes and the backing table's
    /// bucket count. Called once when a cache is built.
    ///
    /// # Errors
    /// Propagates the validation errors of [`CapacityPartition::compute`].
    pub fn layout(&self) -> Result<CacheLayout> {
        let partition = CapacityPartition::compute(self.capacity, self.warm_ratio)?;
        let bucket_count = estimate_bucket_count(i32::try_from(self.capacity).unwrap_or(i32::MAX));

        #[cfg(feature = "tracing")]
        tracing::debug!(
            capacity = self.capacity,
            hot = partition.hot(),
            warm = partition.warm(),
            cold = partition.cold(),
            bucket_count,
            "computed cache layout"
        );

        Ok(CacheLayout {
            partition,
            bucket_count,
        })
    }
}

/// Everything a cache constructor needs to allocate its structures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheLayout {
    partition: CapacityPartition,
    bucket_count: i32,
}

impl CacheLayout {
    /// Tier sizes.
    #[inline]
    pub fn partition(&self) -> CapacityPartition {
        self.partition
    }

    /// Initial bucket count for the backing hash table.
    #[inline]
    pub fn bucket_count(&self) -> i32 {
        self.bucket_count
    }

    /// Total capacity across all tiers.
    #[inline]
    pub fn capacity(&self) -> u32 {
        self.partition.capacity()
    }
}
