//! Chunk capacity: a target size plus the ceiling fused chunks may reach.
//!
//! ## The Problem
//!
//! Boundary-aware splitting produces uneven chunks. A paragraph break early in
//! a window or a URL that has to be deferred can leave a chunk far below the
//! target, and a tiny chunk embeds poorly.
//!
//! ```text
//! Target: 100 chars
//!
//! Split:  ["Short intro.", "https://example.com/... more text (98 chars)"]
//!          ↑ 12 chars, mostly noise as a standalone embedding
//!
//! Merged (target=100, max=150):
//!         ["Short intro. https://example.com/... more text"]
//!          ↑ 111 chars, over target but under the ceiling
//! ```
//!
//! ## Desired vs Max
//!
//! - `desired`: the size the splitter aims for.
//! - `max`: the ceiling the merge pass may fill up to when absorbing
//!   undersized neighbours. The splitter itself only exceeds `desired` to
//!   swallow a protected span whole.

/// Default headroom the merge pass may use above the target size.
pub const MERGE_HEADROOM: f64 = 1.5;

/// Chunk size configuration with a target and a merge ceiling, in characters.
///
/// # Examples
///
/// ```rust
/// use ashlar::{BoundaryChunker, ChunkCapacity, ChunkingConfig};
///
/// let cap = ChunkCapacity::with_headroom(100, 1.5);
/// assert_eq!(cap.desired(), 100);
/// assert_eq!(cap.max(), 150);
///
/// let chunker = BoundaryChunker::new(ChunkingConfig::new(400)).unwrap();
/// assert_eq!(chunker.capacity().max(), 600);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkCapacity {
    desired: usize,
    max: usize,
}

impl ChunkCapacity {
    /// Create a capacity whose ceiling is `desired * ratio`.
    ///
    /// Ratios below 1.0 are treated as 1.0.
    #[must_use]
    pub fn with_headroom(desired: usize, ratio: f64) -> Self {
        let max = (desired as f64 * ratio.max(1.0)) as usize;
        Self {
            desired,
            max: max.max(desired),
        }
    }

    /// The target chunk size.
    #[must_use]
    pub const fn desired(&self) -> usize {
        self.desired
    }

    /// The ceiling for fused chunks.
    #[must_use]
    pub const fn max(&self) -> usize {
        self.max
    }

    /// Check if adding `additional` characters would exceed the ceiling.
    #[must_use]
    pub fn would_overflow(&self, current: usize, additional: usize) -> bool {
        current.saturating_add(additional) > self.max
    }
}
