//! Interfaces between the counting and sizing core and the caches built on it.
//!
//! - [`Cache`]: the operations callers perform on a bounded cache.
//! - [`CacheMetrics`] / [`Telemetry`]: counter-backed statistics.
//! - [`CacheOptions`] / [`CacheLayout`]: construction-time sizing.

pub mod contract;
pub mod metrics;
pub mod options;

pub use contract::Cache;
pub use metrics::{CacheMetrics, MetricsSnapshot, Telemetry};
pub use options::{CacheLayout, CacheOptions};
