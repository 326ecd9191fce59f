//! Hit/miss/eviction statistics for caches.

use serde::{Deserialize, Serialize};

use crate::concurrency::Counter;

/// Read-only statistics a cache exposes to monitoring.
///
/// Implementors supply the four raw tallies; `total`, `hit_ratio` and
/// `snapshot` are derived from them.
pub trait CacheMetrics {
    /// Lookups that found their key.
    fn hits(&self) -> i64;

    /// Lookups that did not.
    fn misses(&self) -> i64;

    /// Entries removed to make room.
    fn evicted(&self) -> i64;

    /// Values replaced in place.
    fn updated(&self) -> i64;

    /// `hits + misses`.
    fn total(&self) -> i64 {
        self.hits().wrapping_add(self.misses())
    }

    /// `hits / total`, where `1.0` means every lookup hit. `0.0` before the
    /// first lookup.
    #[allow(clippy::cast_precision_loss)]
    fn hit_ratio(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.hits() as f64 / total as f64
        }
    }

    /// Captures every statistic at once.
    ///
    /// Each field is read separately, so under concurrent traffic the fields
    /// may not be mutually consistent.
    fn snapshot(&self) -> MetricsSnapshot {
        let hits = self.hits();
        let misses = self.misses();
        MetricsSnapshot {
            hits,
            misses,
            evicted: self.evicted(),
            updated: self.updated(),
        }
    }
}

/// Point-in-time copy of a cache's statistics, suitable for export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Lookups that found their key.
    pub hits: i64,
    /// Lookups that did not.
    pub misses: i64,
    /// Entries removed to make room.
    pub evicted: i64,
    /// Values replaced in place.
    pub updated: i64,
}

impl CacheMetrics for MetricsSnapshot {
    fn hits(&self) -> i64 {
        self.hits
    }

    fn misses(&self) -> i64 {
        self.misses
    }

    fn evicted(&self) -> i64 {
        self.evicted
    }

    fn updated(&self) -> i64 {
        self.updated
    }
}

/// Counter-backed statistics recorder.
///
/// Cache implementations embed one of these and call the `increment_*`
/// methods on their hot paths.
#[derive(Debug, Default)]
pub struct Telemetry {
    hits: Counter,
    misses: Counter,
    evicted: Counter,
    updated: Counter,
}

impl Telemetry {
    /// Creates a recorder with every tally at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a lookup that found its key.
    #[inline]
    pub fn increment_hit(&self) {
        self.hits.increment();
    }

    /// Records a lookup that missed.
    #[inline]
    pub fn increment_miss(&self) {
        self.misses.increment();
    }

    /// Records an eviction.
    #[inline]
    pub fn increment_evicted(&self) {
        self.evicted.increment();
    }

    /// Records an in-place update.
    #[inline]
    pub fn increment_updated(&self) {
        self.updated.increment();
    }
}

impl CacheMetrics for Telemetry {
    fn hits(&self) -> i64 {
        self.hits.count()
    }

    fn misses(&self) -> i64 {
        self.misses.count()
    }

    fn evicted(&self) -> i64 {
        self.evicted.count()
    }

    fn updated(&self) -> i64 {
        self.updated.count()
    }
}

#[cfg(all(test, not(loom)))]
mod tests {
    use super::*;

    #[test]
    fn empty_telemetry_reports_zero_ratio() {
        let t = Telemetry::new();
        assert_eq!(t.total(), 0);
        assert!(t.hit_ratio().abs() < f64::EPSILON);
    }

    #[test]
    fn ratio_is_hits_over_total() {
        let t = Telemetry::new();
        for _ in 0..3 {
            t.increment_hit();
        }
        t.increment_miss();
        t.increment_evicted();
        t.increment_updated();
        t.increment_updated();

        assert_eq!(t.total(), 4);
        assert!((t.hit_ratio() - 0.75).abs() < f64::EPSILON);
        assert_eq!(
            t.snapshot(),
            MetricsSnapshot {
                hits: 3,
                misses: 1,
                evicted: 1,
                updated: 2,
            }
        );
    }

    #[test]
    fn all_hits_is_a_ratio_of_one() {
        let t = Telemetry::new();
        t.increment_hit();
        assert!((t.hit_ratio() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn concurrent_recording_is_exact() {
        let t = Telemetry::new();
        std::thread::scope(|s| {
            for i in 0..8 {
                let t = &t;
                s.spawn(move || {
                    for _ in 0..5_000 {
                        if i % 2 == 0 {
                            t.increment_hit();
                        } else {
                            t.increment_miss();
                        }
                    }
                });
            }
        });
        assert_eq!(t.hits(), 20_000);
        assert_eq!(t.misses(), 20_000);
        assert!((t.hit_ratio() - 0.5).abs() < f64::EPSILON);
    }
}
