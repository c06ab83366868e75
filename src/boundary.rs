//! Boundary-aware chunking.
//!
//! The chunker walks a cursor through the text. Each step asks the break-point
//! selector where the current chunk should end, optionally shrinks the chunk
//! if a token counter says it is too heavy, then advances the cursor (backing
//! up by the overlap, aligned to a word boundary).
//!
//! ```text
//! target = 40, overlap = 10
//!
//! "Deploy notes. See https://ci.example.com/run/42 for logs. Then retry."
//!
//! chunk 0: "Deploy notes."
//! chunk 1: "notes. See"                              <- URL crosses the ceiling, deferred
//! chunk 2: "See https://ci.example.com/run/42 for"
//! chunk 3: "for logs. Then retry."
//!           ↑ restarts back up by the overlap, to just after a space
//! ```
//!
//! ## Guarantees
//!
//! - Chunks never start or end strictly inside a protected span.
//! - A span longer than the target is emitted whole, in one oversized chunk.
//! - Every non-whitespace character lands in at least one chunk.
//! - The loop always terminates: every step moves the cursor forward.

use std::sync::Arc;

use crate::breaks::find_break_point;
use crate::capacity::{ChunkCapacity, MERGE_HEADROOM};
use crate::config::ChunkingConfig;
use crate::merge::merge_small_chunks;
use crate::source::SourceText;
use crate::spans::{ProtectedSpans, SpanDetector};
use crate::tokens::{HeuristicCounter, TokenCounter};
use crate::{Chunker, Result, Slab};

/// Chunker that never splits URLs, code, or list items.
///
/// ## Example
///
/// ```rust
/// use ashlar::{BoundaryChunker, Chunker, ChunkingConfig};
///
/// let config = ChunkingConfig::new(100).with_overlap(0);
/// let chunker = BoundaryChunker::new(config).unwrap();
///
/// let text = "Short intro. https://example.com/this/is/a/very/long/url/that/should/\
///             not/be/broken/in/the/middle/ever More text after the URL that \
///             continues for a while to ensure chunking happens.";
/// let slabs = chunker.chunk(text);
///
/// assert_eq!(slabs[0].text, "Short intro.");
/// assert!(slabs[1].text.starts_with("https://example.com/"));
/// assert!(slabs[1].text.contains("/middle/ever"));
/// ```
#[derive(Clone)]
pub struct BoundaryChunker {
    config: ChunkingConfig,
    capacity: ChunkCapacity,
    detector: Arc<SpanDetector>,
    counter: Option<Arc<dyn TokenCounter>>,
}

impl BoundaryChunker {
    /// Create a chunker with the default protected-span scanners.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is degenerate; see
    /// [`ChunkingConfig::validate`].
    pub fn new(config: ChunkingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            capacity: ChunkCapacity::with_headroom(config.target_size, MERGE_HEADROOM),
            config,
            detector: Arc::new(SpanDetector::default()),
            counter: None,
        })
    }

    /// Replace the protected-span detector.
    #[must_use]
    pub fn with_detector(mut self, detector: SpanDetector) -> Self {
        self.detector = Arc::new(detector);
        self
    }

    /// Attach a token counter and enable token validation.
    #[must_use]
    pub fn with_token_counter(mut self, counter: impl TokenCounter + 'static) -> Self {
        self.counter = Some(Arc::new(counter));
        self.config.use_token_validation = true;
        self
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// Target size and merge ceiling.
    #[must_use]
    pub fn capacity(&self) -> ChunkCapacity {
        self.capacity
    }

    fn token_counter(&self) -> Option<&dyn TokenCounter> {
        if !self.config.use_token_validation {
            return None;
        }
        Some(self.counter.as_deref().unwrap_or(&HeuristicCounter))
    }

    /// Emit the trimmed `[start, end)` region, if it has any content.
    fn push_slab(slabs: &mut Vec<Slab>, source: &SourceText<'_>, start: usize, end: usize) {
        let (start, end) = source.trim_range(start, end);
        if start < end {
            let slab = Slab::new(
                source.slice(start, end),
                source.byte_offset(start),
                source.byte_offset(end),
                slabs.len(),
            );
            tracing::trace!(index = slab.index, chars = end - start, "chunk");
            slabs.push(slab);
        }
    }

    /// Shrink `[start, end)` if the token counter says it is too heavy.
    fn reduce(
        &self,
        counter: &dyn TokenCounter,
        source: &SourceText<'_>,
        spans: &ProtectedSpans,
        start: usize,
        end: usize,
    ) -> usize {
        let thresholds = &self.config.reduction;
        let target = self.config.target_size;

        let (trimmed_start, trimmed_end) = source.trim_range(start, end);
        if trimmed_end - trimmed_start <= thresholds.min_chars {
            return end;
        }
        let tokens = match counter.count_tokens(source.slice(trimmed_start, trimmed_end)) {
            Ok(tokens) => tokens,
            Err(e) => {
                tracing::debug!(error = %e, start, "token count failed; skipping validation");
                return end;
            }
        };
        if tokens as f64 <= thresholds.token_ratio * target as f64 {
            return end;
        }

        let ceiling = start + (thresholds.ceiling_ratio * target as f64) as usize;
        if ceiling <= start {
            return end;
        }
        let reduced = find_break_point(source, start, ceiling, spans);
        if reduced > start + thresholds.min_advance && reduced < end {
            tracing::debug!(start, from = end, to = reduced, tokens, "reduced heavy chunk");
            reduced
        } else {
            end
        }
    }

    /// Where the next chunk starts, given the one just emitted.
    fn next_start(
        &self,
        source: &SourceText<'_>,
        spans: &ProtectedSpans,
        start: usize,
        end: usize,
    ) -> usize {
        let overlap = self.config.overlap;
        if overlap == 0 || end >= source.len() {
            return end;
        }
        let overlap_start = end.saturating_sub(overlap);
        if overlap_start <= start {
            return end;
        }
        (overlap_start..end)
            .find(|&i| source.char_at(i) == Some(' ') && !spans.is_protected(i))
            .map_or(end, |i| i + 1)
    }
}

impl Chunker for BoundaryChunker {
    fn chunk(&self, text: &str) -> Vec<Slab> {
        if text.trim().is_empty() {
            return vec![];
        }

        let source = SourceText::new(text);
        let len = source.len();
        let target = self.capacity.desired();

        if len <= target {
            let mut slabs = Vec::with_capacity(1);
            Self::push_slab(&mut slabs, &source, 0, len);
            return slabs;
        }

        let spans = self.detector.detect_in(&source);
        let counter = self.token_counter();
        let mut slabs = Vec::with_capacity(self.estimate_chunks(len));
        let mut start = 0;

        while start < len {
            let max_end = (start + target).min(len);
            if max_end >= len {
                Self::push_slab(&mut slabs, &source, start, len);
                break;
            }

            let mut end = find_break_point(&source, start, max_end, &spans);
            if end <= start {
                end = max_end;
            }
            if let Some(counter) = counter {
                end = self.reduce(counter, &source, &spans, start, end);
            }

            Self::push_slab(&mut slabs, &source, start, end);

            let mut next = self.next_start(&source, &spans, start, end);
            if next <= start {
                next = end;
                if next <= start {
                    break;
                }
            }
            start = next;
        }

        tracing::debug!(
            chars = len,
            spans = spans.len(),
            chunks = slabs.len(),
            "chunked text"
        );

        if self.config.min_chunk_size > 0 && slabs.len() > 1 {
            slabs = merge_small_chunks(slabs, self.config.min_chunk_size, target);
        }
        slabs
    }

    fn estimate_chunks(&self, text_len: usize) -> usize {
        let step = self.config.target_size - self.config.overlap;
        text_len.div_ceil(step.max(1)).max(1)
    }
}

impl std::fmt::Debug for BoundaryChunker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundaryChunker")
            .field("config", &self.config)
            .field("detector", &self.detector)
            .field("token_counter", &self.counter.is_some())
            .finish()
    }
}

/// Split `text` into chunk strings.
///
/// ```rust
/// use ashlar::{chunk_text, ChunkingConfig};
///
/// let chunks = chunk_text("  just one line  ", &ChunkingConfig::default()).unwrap();
/// assert_eq!(chunks, vec!["just one line"]);
/// ```
///
/// # Errors
///
/// Returns an error if the config is degenerate; see
/// [`ChunkingConfig::validate`].
pub fn chunk_text(text: &str, config: &ChunkingConfig) -> Result<Vec<String>> {
    let chunker = BoundaryChunker::new(config.clone())?;
    Ok(chunker.chunk(text).into_iter().map(|slab| slab.text).collect())
}
