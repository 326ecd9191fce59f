//! # `cachestat` - Counting and Sizing for Concurrent Caches
//!
//! The statistics and sizing substrate beneath bounded in-memory caches:
//! contention-adaptive counters for hit/miss/eviction tallies, and the
//! construction-time arithmetic that turns one capacity budget into tier sizes
//! and a backing hash-table size.
//!
//! ## Components
//!
//! 1. **Striped counting** ([`concurrency`]):
//!    - [`CachePadded`] / [`PaddedI64`]: values that own a full cache line
//!    - [`StripedAccumulator`]: a base cell plus a lazily grown, power-of-two
//!      table of padded shards, capped at four shards per logical CPU
//!    - [`Counter`]: `increment` / `add` / `count` over an accumulator
//!
//! 2. **Sizing** ([`sizing`]):
//!    - [`CapacityPartition`]: splits capacity into hot, warm and cold tiers
//!    - [`estimate_bucket_count`]: table-driven bucket count at ~0.75 load
//!
//! 3. **Cache interfaces** ([`cache`]):
//!    - [`Cache`]: lookup/insert/remove contract with derived compound ops
//!    - [`CacheMetrics`] and [`Telemetry`]: counter-backed statistics
//!    - [`CacheOptions`]: serde-friendly configuration producing a [`CacheLayout`]
//!
//! ## Progress Guarantees
//!
//! `Counter::increment` never blocks. The accumulator's single-bit lock is
//! only ever *tried*; a thread that loses the race retries on another cell
//! instead of waiting. Sizing functions are pure.
//!
//! ## Logging
//!
//! Enable the `tracing` feature to get `trace!` events on shard-table growth
//! and a `debug!` event for each computed [`CacheLayout`].
//!
//! ## Example
//!
//! ```rust
//! use cachestat::{CacheMetrics, CacheOptions, Telemetry};
//!
//! let layout = CacheOptions::new(1_000).layout().unwrap();
//! assert_eq!(layout.partition().warm(), 800);
//!
//! let telemetry = Telemetry::new();
//! telemetry.increment_hit();
//! telemetry.increment_miss();
//! assert_eq!(telemetry.total(), 2);
//! assert!((telemetry.hit_ratio() - 0.5).abs() < f64::EPSILON);
//! ```

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod cache;
pub mod concurrency;
pub mod error;
pub mod sizing;

pub use cache::{Cache, CacheLayout, CacheMetrics, CacheOptions, MetricsSnapshot, Telemetry};
pub use concurrency::{CachePadded, Counter, PaddedI64, StripedAccumulator, CACHE_LINE_SIZE};
pub use error::{Error, Result};
pub use sizing::{estimate_bucket_count, CapacityPartition};

// Compile-time layout checks.
#[cfg(not(loom))]
const _: () = {
    use core::mem;

    assert!(CACHE_LINE_SIZE.is_power_of_two());
    assert!(mem::align_of::<CachePadded<u8>>() == CACHE_LINE_SIZE);
    assert!(mem::size_of::<CachePadded<u64>>() == CACHE_LINE_SIZE);

    // A padded cell is exactly one line: nothing else can share it.
    assert!(mem::size_of::<PaddedI64>() == CACHE_LINE_SIZE);
    assert!(mem::align_of::<PaddedI64>() == CACHE_LINE_SIZE);
};
