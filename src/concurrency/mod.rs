//! Lock-free counting primitives.
//!
//! Layered bottom-up: [`CachePadded`] / [`PaddedI64`] keep hot values on
//! their own cache lines, [`SpinFlag`] guards the rare structural changes,
//! [`StripedAccumulator`] spreads writers across padded shards, and
//! [`Counter`] is the façade caches use for their statistics.

pub mod cache_padded;
pub mod counter;
pub mod probe;
pub mod spin;
pub mod striped;

pub(crate) mod sync;

pub use cache_padded::{CachePadded, PaddedI64, CACHE_LINE_SIZE};
pub use counter::Counter;
pub use spin::{SpinFlag, SpinGuard};
pub use striped::StripedAccumulator;
