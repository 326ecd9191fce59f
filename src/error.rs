//! Error type for cache construction and lookup.

use core::fmt;

/// Errors surfaced by sizing validation and the provided [`Cache`] methods.
///
/// [`Cache`]: crate::cache::Cache
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Error {
    /// Total capacity must be at least 3 so every tier gets one slot.
    CapacityTooSmall {
        /// The rejected capacity.
        capacity: u32,
    },
    /// The warm ratio must lie in `[0, 1)`.
    WarmRatioOutOfRange {
        /// The rejected ratio.
        ratio: f64,
    },
    /// The requested key is not in the cache.
    KeyNotFound,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityTooSmall { capacity } => {
                write!(f, "capacity must be at least 3, got {capacity}")
            }
            Self::WarmRatioOutOfRange { ratio } => {
                write!(f, "warm ratio must be in [0, 1), got {ratio}")
            }
            Self::KeyNotFound => f.write_str("key not found in the cache"),
        }
    }
}

impl std::error::Error for Error {}

/// Result alias for this crate.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_bad_value() {
        assert_eq!(
            Error::CapacityTooSmall { capacity: 2 }.to_string(),
            "capacity must be at least 3, got 2"
        );
        assert_eq!(
            Error::WarmRatioOutOfRange { ratio: 1.0 }.to_string(),
            "warm ratio must be in [0, 1), got 1"
        );
    }
}
