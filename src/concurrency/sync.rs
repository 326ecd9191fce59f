//! Atomic and spin-hint re-exports.
//!
//! Under `--cfg loom` these resolve to loom's model-checked types so the
//! accumulator's retry protocol can be explored exhaustively. Otherwise they
//! are the `core` atomics with no wrapper cost. Per-thread state that feeds
//! the protocol (see `probe`) switches to loom's thread locals the same way.

#[cfg(loom)]
pub(crate) use loom::sync::atomic::{AtomicBool, AtomicI64, AtomicPtr, AtomicU32};

#[cfg(not(loom))]
pub(crate) use core::sync::atomic::{AtomicBool, AtomicI64, AtomicPtr, AtomicU32};

use crossbeam_utils::Backoff;

/// Backs off after a failed CAS without ever parking the thread.
#[inline]
pub(crate) fn relax(backoff: &Backoff) {
    #[cfg(loom)]
    {
        let _ = backoff;
        loom::thread::yield_now();
    }
    #[cfg(not(loom))]
    backoff.spin();
}
