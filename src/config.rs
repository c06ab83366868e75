//! Chunking configuration.
//!
//! All sizes are in characters. The defaults match a chat-ingestion pipeline:
//! 600-character chunks with 100 characters of overlap.
//!
//! ```rust
//! use ashlar::ChunkingConfig;
//!
//! let config = ChunkingConfig::new(400)
//!     .with_overlap(50)
//!     .with_min_chunk_size(120)
//!     .with_token_validation(true);
//! assert!(config.validate().is_ok());
//!
//! let bad = ChunkingConfig::new(100).with_overlap(100);
//! assert!(bad.validate().is_err());
//! ```
//!
//! Configs deserialize with `serde`; missing fields take their defaults.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

const DEFAULT_OVERLAP: usize = 100;

/// Parameters for boundary-aware chunking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Target chunk size in characters.
    pub target_size: usize,
    /// Characters repeated at the head of the next chunk (0 disables).
    pub overlap: usize,
    /// Shrink chunks whose token count looks too large.
    pub use_token_validation: bool,
    /// Chunks below this size are merged into neighbours (0 disables).
    pub min_chunk_size: usize,
    /// Heuristics for the token-driven reduction pass.
    pub reduction: ReductionThresholds,
}

impl ChunkingConfig {
    /// A config with the given target size and every other field defaulted.
    ///
    /// The overlap is capped at a sixth of the target, so small targets still
    /// validate:
    ///
    /// ```rust
    /// use ashlar::ChunkingConfig;
    ///
    /// assert_eq!(ChunkingConfig::new(600).overlap, 100);
    /// assert_eq!(ChunkingConfig::new(60).overlap, 10);
    /// assert!(ChunkingConfig::new(1).validate().is_ok());
    /// ```
    #[must_use]
    pub fn new(target_size: usize) -> Self {
        Self {
            target_size,
            overlap: DEFAULT_OVERLAP.min(target_size / 6),
            ..Self::default()
        }
    }

    /// Set the overlap.
    #[must_use]
    pub fn with_overlap(mut self, overlap: usize) -> Self {
        self.overlap = overlap;
        self
    }

    /// Set the minimum chunk size for the merge pass.
    #[must_use]
    pub fn with_min_chunk_size(mut self, min_chunk_size: usize) -> Self {
        self.min_chunk_size = min_chunk_size;
        self
    }

    /// Enable or disable token validation.
    #[must_use]
    pub fn with_token_validation(mut self, enabled: bool) -> Self {
        self.use_token_validation = enabled;
        self
    }

    /// Replace the reduction-pass thresholds.
    #[must_use]
    pub fn with_reduction(mut self, reduction: ReductionThresholds) -> Self {
        self.reduction = reduction;
        self
    }

    /// Reject degenerate parameters.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidChunkSize`] if `target_size == 0`
    /// - [`Error::OverlapExceedsSize`] if `overlap >= target_size`
    /// - [`Error::MinChunkExceedsSize`] if `min_chunk_size >= target_size`
    /// - [`Error::InvalidThreshold`] if a reduction ratio is not positive and finite
    pub fn validate(&self) -> Result<()> {
        if self.target_size == 0 {
            return Err(Error::InvalidChunkSize(self.target_size));
        }
        if self.overlap >= self.target_size {
            return Err(Error::OverlapExceedsSize {
                size: self.target_size,
                overlap: self.overlap,
            });
        }
        if self.min_chunk_size >= self.target_size {
            return Err(Error::MinChunkExceedsSize {
                size: self.target_size,
                min: self.min_chunk_size,
            });
        }
        self.reduction.validate()
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            target_size: 600,
            overlap: DEFAULT_OVERLAP,
            use_token_validation: false,
            min_chunk_size: 0,
            reduction: ReductionThresholds::default(),
        }
    }
}

/// Thresholds for shrinking a chunk whose token count overshoots.
///
/// These are empirical. Recalibrate them when switching token counters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReductionThresholds {
    /// A chunk is too heavy when `tokens > token_ratio * target_size`.
    pub token_ratio: f64,
    /// Only chunks longer than this many characters are reduced.
    pub min_chars: usize,
    /// The reduced search ceiling is `start + ceiling_ratio * target_size`.
    pub ceiling_ratio: f64,
    /// A reduced chunk must still reach more than this many characters past its start.
    pub min_advance: usize,
}

impl ReductionThresholds {
    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("token_ratio", self.token_ratio),
            ("ceiling_ratio", self.ceiling_ratio),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidThreshold { name, value });
            }
        }
        Ok(())
    }
}

impl Default for ReductionThresholds {
    fn default() -> Self {
        Self {
            token_ratio: 0.35,
            min_chars: 200,
            ceiling_ratio: 0.7,
            min_advance: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(ChunkingConfig::default().validate().is_ok());
    }

    #[test]
    fn test_new_caps_default_overlap() {
        for target in [1, 5, 60, 100, 599, 600, 5_000] {
            let config = ChunkingConfig::new(target);
            assert!(config.validate().is_ok(), "target {target}");
            assert!(config.overlap <= DEFAULT_OVERLAP);
        }
        assert_eq!(ChunkingConfig::new(100).overlap, 16);
        assert_eq!(ChunkingConfig::new(5_000).overlap, 100);
    }

    #[test]
    fn test_zero_size_rejected() {
        let err = ChunkingConfig::new(0).with_overlap(0).validate().unwrap_err();
        assert!(matches!(err, Error::InvalidChunkSize(0)));
    }

    #[test]
    fn test_overlap_must_be_below_size() {
        let err = ChunkingConfig::new(50).with_overlap(50).validate().unwrap_err();
        assert!(matches!(
            err,
            Error::OverlapExceedsSize {
                size: 50,
                overlap: 50
            }
        ));
    }

    #[test]
    fn test_min_chunk_must_be_below_size() {
        let config = ChunkingConfig::new(50).with_overlap(0).with_min_chunk_size(50);
        assert!(matches!(
            config.validate(),
            Err(Error::MinChunkExceedsSize { size: 50, min: 50 })
        ));
    }

    #[test]
    fn test_nan_ratio_rejected() {
        let config = ChunkingConfig::default().with_reduction(ReductionThresholds {
            token_ratio: f64::NAN,
            ..ReductionThresholds::default()
        });
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidThreshold {
                name: "token_ratio",
                ..
            })
        ));
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let config: ChunkingConfig =
            serde_json::from_str(r#"{"target_size": 300, "min_chunk_size": 80}"#).unwrap();
        assert_eq!(config.target_size, 300);
        assert_eq!(config.overlap, 100);
        assert_eq!(config.min_chunk_size, 80);
        assert_eq!(config.reduction, ReductionThresholds::default());
    }
}
