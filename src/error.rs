//! Error types for text-patch.

use thiserror::Error;

/// Result type alias for text-patch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during text-patch operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed delta string, or a delta whose lengths disagree with the
    /// source text it is replayed against.
    #[error("invalid delta: {0}")]
    InvalidDelta(String),

    /// Malformed patch text. Carries the offending line.
    #[error("Invalid patch string: {0}")]
    InvalidPatch(String),

    /// Pattern handed to the Bitap matcher exceeds the configured width.
    #[error("pattern length {len} exceeds the maximum of {max}")]
    PatternTooLong { len: usize, max: usize },
}
