//! `Counter` — a statistics counter backed by a [`StripedAccumulator`].

use core::fmt;

use super::striped::StripedAccumulator;

/// A hot-path event counter (hits, misses, evictions, ...).
///
/// Increments are lock-free and scale with the number of writing threads.
/// [`count`](Self::count) is eventually exact: once every writer has returned,
/// it reports the precise total.
#[derive(Default)]
pub struct Counter {
    cells: StripedAccumulator,
}

impl Counter {
    /// Creates a counter at zero.
    pub fn new() -> Self {
        Self {
            cells: StripedAccumulator::new(),
        }
    }

    /// Adds one.
    #[inline]
    pub fn increment(&self) {
        self.cells.add(1);
    }

    /// Adds `value`, which may be negative.
    #[inline]
    pub fn add(&self, value: i64) {
        self.cells.add(value);
    }

    /// Returns the current total.
    #[inline]
    pub fn count(&self) -> i64 {
        self.cells.sum()
    }
}

impl fmt::Debug for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Counter").field(&self.count()).finish()
    }
}

#[cfg(all(test, not(loom)))]
mod tests {
    use super::*;

    #[test]
    fn increments_and_adds() {
        let counter = Counter::new();
        assert_eq!(counter.count(), 0);
        counter.increment();
        counter.increment();
        counter.add(40);
        counter.add(-1);
        assert_eq!(counter.count(), 41);
        assert_eq!(counter.count(), 41);
    }

    #[test]
    fn debug_shows_the_total() {
        let counter = Counter::new();
        counter.add(7);
        assert_eq!(format!("{counter:?}"), "Counter(7)");
    }
}
