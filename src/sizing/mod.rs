//! Construction-time sizing for bounded caches.
//!
//! Both entry points are pure functions over immutable inputs and static
//! tables; they need no synchronisation.

pub mod buckets;
pub mod partition;

pub use buckets::estimate_bucket_count;
pub use partition::{CapacityPartition, DEFAULT_WARM_RATIO, MIN_CAPACITY};
