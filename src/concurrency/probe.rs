//! Per-thread probe values for shard selection.
//!
//! Each thread is handed a fixed probe the first time it asks for one. The
//! value never changes for the life of the thread, so a thread keeps landing
//! on the same shard and that shard's line stays warm in its core's cache.
//! Probes are deliberately not random: two threads whose probes alias under
//! the table mask will keep sharing a shard. A collision on one `add` is
//! resolved by [`advance_probe`] for that call only.

use core::cell::Cell;
use core::sync::atomic::Ordering;

use super::sync::AtomicU32;

/// Odd increment (2^32 / golden ratio) so consecutive threads differ in their
/// low bits.
const PROBE_INCREMENT: u32 = 0x9e37_79b9;

#[cfg(not(loom))]
static NEXT_PROBE: AtomicU32 = AtomicU32::new(0);

#[cfg(not(loom))]
thread_local! {
    static PROBE: Cell<u32> = const { Cell::new(0) };
}

// Model threads share one OS thread, and each execution must start from the
// same sequence.
#[cfg(loom)]
loom::lazy_static! {
    static ref NEXT_PROBE: AtomicU32 = AtomicU32::new(0);
}

#[cfg(loom)]
loom::thread_local! {
    static PROBE: Cell<u32> = Cell::new(0);
}

/// Returns the calling thread's probe. Never zero.
#[inline]
pub fn thread_probe() -> u32 {
    PROBE.with(|probe| {
        let current = probe.get();
        if current != 0 {
            return current;
        }
        let mut fresh = NEXT_PROBE
            .fetch_add(PROBE_INCREMENT, Ordering::Relaxed)
            .wrapping_add(PROBE_INCREMENT);
        if fresh == 0 {
            fresh = 1;
        }
        probe.set(fresh);
        fresh
    })
}

/// Marsaglia xorshift step used to pick another shard after a collision.
///
/// Maps non-zero inputs to non-zero outputs.
#[inline]
pub const fn advance_probe(mut probe: u32) -> u32 {
    probe ^= probe << 13;
    probe ^= probe >> 17;
    probe ^= probe << 5;
    probe
}
