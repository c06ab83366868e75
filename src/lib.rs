//! # ashlar
//!
//! Boundary-aware text chunking for retrieval-augmented generation (RAG)
//! over chat transcripts.
//!
//! ## The Problem
//!
//! Chat messages are not prose. They carry links, code, and lists, and a
//! naive splitter cuts straight through them:
//!
//! - A URL split in two is two dead strings
//! - A code block split mid-function is useless to embed
//! - A list item split mid-line loses the point it was making
//!
//! Between those atomic spans you still want the most natural break
//! available: paragraph, then sentence, then line, then word.
//!
//! ## The Pipeline
//!
//! ```text
//! text ──▶ protected spans ──▶ ┌─ break-point selection ◀─┐ ──▶ merge small ──▶ chunks
//!          (code, URLs,        │  (token check, shrink)   │     chunks
//!           lists)             └─ advance, with overlap ──┘
//! ```
//!
//! 1. [`SpanDetector`] runs a set of [`SpanScanner`]s and merges their hits
//!    into sorted, disjoint [`ProtectedSpan`]s.
//! 2. [`BoundaryChunker`] walks the text. For each window it picks the best
//!    break in the back half of the window, never inside a span. A span that
//!    crosses the window edge is deferred to the next chunk, or swallowed
//!    whole if it is bigger than a chunk.
//! 3. With token validation on, a [`TokenCounter`] flags token-heavy chunks
//!    and the chunker retries with a tighter ceiling.
//! 4. [`merge_small_chunks`] fuses stragglers below `min_chunk_size` into a
//!    neighbour, up to 1.5× the target size.
//!
//! ## Quick Start
//!
//! ```rust
//! use ashlar::{BoundaryChunker, Chunker, ChunkingConfig};
//!
//! let text = "Deploy is done. Logs are at https://ci.example.com/runs/42/logs \
//!             and the fix was:\n\n```\nretry = 3\n```\n\nPing me if it flakes again.";
//!
//! let config = ChunkingConfig::new(60).with_overlap(0);
//! let chunker = BoundaryChunker::new(config).unwrap();
//! let slabs = chunker.chunk(text);
//!
//! assert!(slabs.iter().any(|s| s.text.contains("https://ci.example.com/runs/42/logs")));
//! assert!(slabs.iter().any(|s| s.text.contains("```\nretry = 3\n```")));
//! ```
//!
//! For plain strings use [`chunk_text`]; for batches of chat messages with
//! metadata use [`chunk_documents`].
//!
//! ## Sizes
//!
//! All sizes are in characters, not bytes, so multi-byte text never splits
//! mid-character. [`Slab`] offsets are bytes, for slicing the source.

mod boundary;
mod breaks;
mod capacity;
mod config;
mod document;
mod error;
mod merge;
mod slab;
mod source;
mod spans;
mod tokens;

pub use boundary::{chunk_text, BoundaryChunker};
pub use capacity::{ChunkCapacity, MERGE_HEADROOM};
pub use config::{ChunkingConfig, ReductionThresholds};
pub use document::{chunk_documents, ChunkMetadata, ChunkedDocument, Document};
pub use error::{Error, Result};
pub use merge::merge_small_chunks;
pub use slab::Slab;
pub use spans::{
    find_protected_spans, FencedCodeScanner, InlineCodeScanner, ListItemScanner, PatternScanner,
    ProtectedSpan, SpanDetector, SpanScanner, UrlScanner,
};
#[cfg(feature = "tiktoken")]
pub use tokens::TiktokenCounter;
pub use tokens::{HeuristicCounter, TokenCounter};

/// A text chunking strategy.
///
/// ```rust
/// use ashlar::{BoundaryChunker, Chunker, ChunkingConfig};
///
/// fn chunk_document(chunker: &dyn Chunker, text: &str) -> Vec<ashlar::Slab> {
///     chunker.chunk(text)
/// }
///
/// let chunker = BoundaryChunker::new(ChunkingConfig::default()).unwrap();
/// let slabs = chunk_document(&chunker, "Hello world. This is a test.");
/// assert_eq!(slabs.len(), 1);
/// ```
pub trait Chunker: Send + Sync {
    /// Split text into chunks.
    ///
    /// Each chunk is a [`Slab`] containing the text and its byte offsets
    /// in the original document.
    fn chunk(&self, text: &str) -> Vec<Slab>;

    /// Estimate the number of chunks for a given text length.
    ///
    /// Useful for pre-allocation. May be approximate.
    fn estimate_chunks(&self, text_len: usize) -> usize {
        // Conservative default
        (text_len / 500).max(1)
    }
}
