//! Cache-line padding to prevent false sharing.

use core::fmt;
use core::ops::{Deref, DerefMut};

use super::sync::AtomicI64;
use core::sync::atomic::Ordering;

/// Width, in bytes, that a padded value is aligned to on this target.
///
/// 128 on x86-64 (the spatial prefetcher pulls cache lines in pairs), aarch64
/// (Apple Silicon lines are 128 bytes) and powerpc64. 64 everywhere else.
#[cfg(any(target_arch = "x86_64", target_arch = "aarch64", target_arch = "powerpc64"))]
pub const CACHE_LINE_SIZE: usize = 128;

/// Width, in bytes, that a padded value is aligned to on this target.
#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64", target_arch = "powerpc64")))]
pub const CACHE_LINE_SIZE: usize = 64;

/// Pads and aligns a value to [`CACHE_LINE_SIZE`].
///
/// Two `CachePadded` values never share a cache line, so writes to one do not
/// invalidate the other in a neighbouring core's cache.
#[cfg_attr(
    any(target_arch = "x86_64", target_arch = "aarch64", target_arch = "powerpc64"),
    repr(C, align(128))
)]
#[cfg_attr(
    not(any(target_arch = "x86_64", target_arch = "aarch64", target_arch = "powerpc64")),
    repr(C, align(64))
)]
#[derive(Default)]
pub struct CachePadded<T> {
    value: T,
}

impl<T> CachePadded<T> {
    /// Creates a new cache-padded value.
    pub const fn new(value: T) -> Self {
        Self { value }
    }

    /// Returns the inner value.
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T> Deref for CachePadded<T> {
    type Target = T;
    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T> DerefMut for CachePadded<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

impl<T: fmt::Debug> fmt::Debug for CachePadded<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachePadded").field("value", &self.value).finish()
    }
}

/// A signed 64-bit atomic that owns a whole cache line.
///
/// This is the unit the striped accumulator is built from: the base cell and
/// every shard are `PaddedI64`s, so threads hammering different shards never
/// contend on the same line.
pub struct PaddedI64 {
    value: CachePadded<AtomicI64>,
}

impl PaddedI64 {
    /// Creates a cell holding `value`.
    #[inline]
    pub fn new(value: i64) -> Self {
        Self {
            value: CachePadded::new(AtomicI64::new(value)),
        }
    }

    /// Loads the current value with acquire ordering.
    #[inline]
    pub fn load(&self) -> i64 {
        self.value.load(Ordering::Acquire)
    }

    /// Replaces `current` with `current + delta` (wrapping) if the cell still
    /// holds `current`.
    ///
    /// Returns the observed value on failure. This is a strong CAS: a failure
    /// always means another writer got there first, which the accumulator
    /// treats as a contention signal.
    #[inline]
    pub fn try_add(&self, current: i64, delta: i64) -> Result<i64, i64> {
        self.value.compare_exchange(
            current,
            current.wrapping_add(delta),
            Ordering::AcqRel,
            Ordering::Acquire,
        )
    }
}

impl Default for PaddedI64 {
    fn default() -> Self {
        Self::new(0)
    }
}

impl fmt::Debug for PaddedI64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PaddedI64").field(&self.load()).finish()
    }
}

#[cfg(all(test, not(loom)))]
mod tests {
    use super::*;
    use core::mem;

    #[test]
    fn padded_values_fill_a_line() {
        assert_eq!(mem::align_of::<CachePadded<u8>>(), CACHE_LINE_SIZE);
        assert_eq!(mem::size_of::<CachePadded<u8>>(), CACHE_LINE_SIZE);
        assert_eq!(mem::size_of::<PaddedI64>(), CACHE_LINE_SIZE);
    }

    #[test]
    fn adjacent_cells_do_not_share_a_line() {
        let cells = [PaddedI64::new(1), PaddedI64::new(2)];
        let a = &cells[0] as *const PaddedI64 as usize;
        let b = &cells[1] as *const PaddedI64 as usize;
        assert_eq!(a % CACHE_LINE_SIZE, 0);
        assert!(b - a >= CACHE_LINE_SIZE);
    }

    #[test]
    fn try_add_wraps_and_reports_conflicts() {
        let cell = PaddedI64::new(i64::MAX);
        assert_eq!(cell.try_add(i64::MAX, 1), Ok(i64::MAX));
        assert_eq!(cell.load(), i64::MIN);

        assert_eq!(cell.try_add(0, 5), Err(i64::MIN));
        assert_eq!(cell.load(), i64::MIN);
    }

    #[test]
    fn deref_reaches_inner_value() {
        let mut padded = CachePadded::new(vec![1, 2]);
        padded.push(3);
        assert_eq!(padded.len(), 3);
        assert_eq!(padded.into_inner(), vec![1, 2, 3]);
    }
}
