//! Error types for ashlar.

/// Errors that can occur when configuring a chunker or counting tokens.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid chunk size (must be > 0).
    #[error("invalid chunk size: {0} (must be > 0)")]
    InvalidChunkSize(usize),

    /// Overlap exceeds chunk size.
    #[error("overlap {overlap} exceeds chunk size {size}")]
    OverlapExceedsSize {
        /// The chunk size.
        size: usize,
        /// The overlap that exceeded the size.
        overlap: usize,
    },

    /// Minimum chunk size is not below the target size.
    #[error("min chunk size {min} must be below chunk size {size}")]
    MinChunkExceedsSize {
        /// The chunk size.
        size: usize,
        /// The minimum that was too large.
        min: usize,
    },

    /// A reduction-pass ratio is not a positive finite number.
    #[error("invalid threshold {name}: {value}")]
    InvalidThreshold {
        /// Which threshold was rejected.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A custom protected-span pattern failed to compile.
    #[error("invalid span pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// The token-counting oracle failed.
    #[error("token count error: {0}")]
    TokenCount(String),
}

/// Result type for ashlar operations.
pub type Result<T> = std::result::Result<T, Error>;
