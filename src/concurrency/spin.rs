//! A single-bit try-lock.
//!
//! `SpinFlag` only offers `try_acquire`. There is no blocking `lock`: a caller
//! that loses the race is expected to go do something else (retry against a
//! different cell) rather than wait for the holder.

use core::fmt;
use core::sync::atomic::Ordering;

use super::sync::AtomicBool;

/// A one-bit lock guarding short critical sections.
pub struct SpinFlag {
    busy: AtomicBool,
}

impl SpinFlag {
    /// Creates an unlocked flag.
    #[inline]
    pub fn new() -> Self {
        Self {
            busy: AtomicBool::new(false),
        }
    }

    /// Returns `true` if some thread currently holds the flag.
    #[inline]
    pub fn is_held(&self) -> bool {
        self.busy.load(Ordering::Relaxed)
    }

    /// Attempts to take the flag without waiting.
    ///
    /// Returns a guard that releases the flag on drop, or `None` if another
    /// thread holds it.
    #[inline]
    pub fn try_acquire(&self) -> Option<SpinGuard<'_>> {
        if self.busy.load(Ordering::Relaxed) {
            return None;
        }
        self.busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| SpinGuard { flag: self })
    }
}

impl Default for SpinFlag {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SpinFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpinFlag").field("held", &self.is_held()).finish()
    }
}

/// Holds a [`SpinFlag`] until dropped.
#[must_use = "the flag is released as soon as the guard is dropped"]
pub struct SpinGuard<'a> {
    flag: &'a SpinFlag,
}

impl Drop for SpinGuard<'_> {
    #[inline]
    fn drop(&mut self) {
        self.flag.busy.store(false, Ordering::Release);
    }
}
