//! `StripedAccumulator` — a contention-adaptive 64-bit sum.
//!
//! Uncontended writers CAS a single padded `base` cell. The first failed CAS
//! installs a two-slot table of padded shards; from then on each thread adds
//! into the shard selected by its probe. Repeated collisions on a shard double
//! the table, up to the largest power of two not exceeding four times the
//! logical CPU count.
//!
//! The only mutual exclusion is `busy`, a one-bit try-lock held while a table
//! is installed, a slot is populated, or the table is doubled. A thread that
//! finds it held never waits: it rehashes its probe or falls back to `base`.
//!
//! Reclamation: shard cells are never freed before the accumulator is dropped,
//! and a replaced table is chained behind its successor instead of being freed,
//! so a reader still walking an old table always sees live memory. At most
//! `log2(max_shards)` tables are ever allocated.

use core::fmt;
use core::ptr;
use core::sync::atomic::Ordering;
use std::sync::OnceLock;

use crossbeam_utils::Backoff;

use super::cache_padded::PaddedI64;
use super::probe::{advance_probe, thread_probe};
use super::spin::SpinFlag;
use super::sync::{relax, AtomicPtr};

/// Power-of-two array of lazily populated shard cells.
struct ShardTable {
    slots: Box<[AtomicPtr<PaddedI64>]>,
    /// The table this one replaced, kept alive until the accumulator drops.
    retired: *mut ShardTable,
}

impl ShardTable {
    fn with_len(len: usize, retired: *mut ShardTable) -> Self {
        debug_assert!(len.is_power_of_two() && len >= 2);
        let slots = (0..len).map(|_| AtomicPtr::new(ptr::null_mut())).collect();
        Self { slots, retired }
    }

    #[inline]
    fn slot(&self, probe: u32) -> &AtomicPtr<PaddedI64> {
        &self.slots[probe as usize & (self.slots.len() - 1)]
    }
}

/// Largest power of two not exceeding `4 × available_parallelism`.
fn default_max_shards() -> usize {
    static MAX: OnceLock<usize> = OnceLock::new();
    *MAX.get_or_init(|| {
        let cpus = std::thread::available_parallelism().map_or(1, |n| n.get());
        floor_power_of_two(cpus.saturating_mul(4))
    })
}

fn floor_power_of_two(n: usize) -> usize {
    if n < 2 {
        2
    } else {
        1 << (usize::BITS - 1 - n.leading_zeros())
    }
}

/// A 64-bit running sum that spreads concurrent writers over padded shards.
///
/// # Example
///
/// ```rust
/// use cachestat::concurrency::StripedAccumulator;
///
/// let acc = StripedAccumulator::new();
/// std::thread::scope(|s| {
///     for _ in 0..4 {
///         s.spawn(|| {
///             for _ in 0..1000 {
///                 acc.add(1);
///             }
///         });
///     }
/// });
/// assert_eq!(acc.sum(), 4000);
/// ```
pub struct StripedAccumulator {
    base: PaddedI64,
    table: AtomicPtr<ShardTable>,
    busy: SpinFlag,
    max_shards: usize,
}

// SAFETY: all shared state is reached through atomics. Tables and cells are
// heap allocations owned by the accumulator and freed only in `Drop`, which
// has exclusive access.
unsafe impl Send for StripedAccumulator {}
unsafe impl Sync for StripedAccumulator {}

impl StripedAccumulator {
    /// Creates an accumulator holding zero, with no shard table.
    pub fn new() -> Self {
        Self::with_max_shards(default_max_shards())
    }

    /// Creates an accumulator whose shard table never grows past `max_shards`
    /// (rounded down to a power of two, at least 2).
    pub fn with_max_shards(max_shards: usize) -> Self {
        Self {
            base: PaddedI64::new(0),
            table: AtomicPtr::new(ptr::null_mut()),
            busy: SpinFlag::new(),
            max_shards: floor_power_of_two(max_shards),
        }
    }

    /// Upper bound on the shard table length.
    #[inline]
    pub fn max_shards(&self) -> usize {
        self.max_shards
    }

    /// Current shard table length; `0` until the first contended add.
    pub fn shard_len(&self) -> usize {
        // SAFETY: published tables stay alive until `self` is dropped.
        unsafe { self.table.load(Ordering::Acquire).as_ref() }.map_or(0, |t| t.slots.len())
    }

    /// Adds `delta` to the sum. Overflow wraps.
    #[inline]
    pub fn add(&self, delta: i64) {
        if self.table.load(Ordering::Acquire).is_null() {
            let observed = self.base.load();
            if self.base.try_add(observed, delta).is_ok() {
                return;
            }
        }
        self.add_contended(delta);
    }

    /// Returns `base + Σ shards`.
    ///
    /// Every `add` that returned before this call began is included. Adds
    /// racing with the call may or may not be.
    pub fn sum(&self) -> i64 {
        let mut total = self.base.load();
        // SAFETY: published tables and their cells stay alive until drop.
        if let Some(table) = unsafe { self.table.load(Ordering::Acquire).as_ref() } {
            for slot in table.slots.iter() {
                // SAFETY: a published cell is only freed by `Drop`.
                if let Some(cell) = unsafe { slot.load(Ordering::Acquire).as_ref() } {
                    total = total.wrapping_add(cell.load());
                }
            }
        }
        total
    }

    #[cold]
    fn add_contended(&self, delta: i64) {
        self.add_contended_with(delta, |cell, delta| {
            let observed = cell.load();
            cell.try_add(observed, delta).is_ok()
        });
    }

    /// The contended retry loop. `try_cell` makes one attempt to add `delta`
    /// into an existing shard and reports whether it landed.
    fn add_contended_with<F>(&self, delta: i64, mut try_cell: F)
    where
        F: FnMut(&PaddedI64, i64) -> bool,
    {
        let mut probe = thread_probe();
        let mut collide = false;
        let backoff = Backoff::new();

        loop {
            let table_ptr = self.table.load(Ordering::Acquire);
            // SAFETY: published tables stay alive until `self` is dropped.
            if let Some(table) = unsafe { table_ptr.as_ref() } {
                let cell_ptr = table.slot(probe).load(Ordering::Acquire);
                // SAFETY: published cells stay alive until `self` is dropped.
                if let Some(cell) = unsafe { cell_ptr.as_ref() } {
                    if try_cell(cell, delta) {
                        return;
                    }
                    if table.slots.len() >= self.max_shards
                        || self.table.load(Ordering::Relaxed) != table_ptr
                    {
                        // At the cap, or someone already grew it.
                        collide = false;
                    } else if !collide {
                        collide = true;
                    } else if let Some(_guard) = self.busy.try_acquire() {
                        if self.table.load(Ordering::Acquire) == table_ptr {
                            self.grow(table_ptr);
                        }
                        collide = false;
                        // Retry the same probe against the doubled table.
                        continue;
                    }
                } else {
                    if let Some(_guard) = self.busy.try_acquire() {
                        if self.populate(probe, delta) {
                            return;
                        }
                        continue;
                    }
                    collide = false;
                }
                probe = advance_probe(probe);
            } else if let Some(_guard) = self.busy.try_acquire() {
                if self.table.load(Ordering::Acquire).is_null() {
                    self.install(probe, delta);
                    return;
                }
                continue;
            } else {
                let observed = self.base.load();
                if self.base.try_add(observed, delta).is_ok() {
                    return;
                }
            }
            relax(&backoff);
        }
    }

    /// Fills the empty slot for `probe` with a new cell seeded with `delta`.
    ///
    /// Caller must hold `busy`. Re-reads the table so a slot is never
    /// populated in a table that has already been replaced.
    fn populate(&self, probe: u32, delta: i64) -> bool {
        // SAFETY: a table was observed before taking the lock and tables are
        // never unpublished.
        let table = unsafe { &*self.table.load(Ordering::Acquire) };
        let slot = table.slot(probe);
        if !slot.load(Ordering::Relaxed).is_null() {
            return false;
        }
        slot.store(Box::into_raw(Box::new(PaddedI64::new(delta))), Ordering::Release);
        true
    }

    /// Publishes the first two-slot table. Caller must hold `busy`.
    fn install(&self, probe: u32, delta: i64) {
        let table = ShardTable::with_len(2, ptr::null_mut());
        table
            .slot(probe)
            .store(Box::into_raw(Box::new(PaddedI64::new(delta))), Ordering::Relaxed);
        self.table
            .store(Box::into_raw(Box::new(table)), Ordering::Release);

        #[cfg(feature = "tracing")]
        tracing::trace!(shards = 2, "installed shard table");
    }

    /// Replaces `old_ptr` with a table twice its length. Caller must hold
    /// `busy` and `old_ptr` must be the current table.
    ///
    /// Existing cells keep their index: the wider mask only adds a high bit.
    fn grow(&self, old_ptr: *mut ShardTable) {
        // SAFETY: `old_ptr` is the published table and cannot be freed while
        // `self` is alive.
        let old = unsafe { &*old_ptr };
        let len = old.slots.len() * 2;
        if len > self.max_shards {
            return;
        }
        let table = ShardTable::with_len(len, old_ptr);
        for (dst, src) in table.slots.iter().zip(old.slots.iter()) {
            dst.store(src.load(Ordering::Relaxed), Ordering::Relaxed);
        }
        self.table
            .store(Box::into_raw(Box::new(table)), Ordering::Release);

        #[cfg(feature = "tracing")]
        tracing::trace!(shards = len, max = self.max_shards, "doubled shard table");
    }
}

impl Default for StripedAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StripedAccumulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StripedAccumulator")
            .field("sum", &self.sum())
            .field("shards", &self.shard_len())
            .field("max_shards", &self.max_shards)
            .finish()
    }
}

impl Drop for StripedAccumulator {
    fn drop(&mut self) {
        let mut table_ptr = self.table.load(Ordering::Relaxed);
        // Every live cell is reachable from the newest table.
        // SAFETY: `&mut self` means no other thread can observe these.
        if let Some(table) = unsafe { table_ptr.as_ref() } {
            for slot in table.slots.iter() {
                let cell = slot.load(Ordering::Relaxed);
                if !cell.is_null() {
                    // SAFETY: each cell was boxed once and appears in exactly
                    // one slot of the newest table.
                    drop(unsafe { Box::from_raw(cell) });
                }
            }
        }
        while !table_ptr.is_null() {
            // SAFETY: each table in the retired chain was boxed once and is
            // visited once.
            let table = unsafe { Box::from_raw(table_ptr) };
            table_ptr = table.retired;
        }
    }
}
