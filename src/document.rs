//! Batch chunking of chat messages.
//!
//! Each source message becomes zero or more chunk documents whose IDs are
//! deterministic (`"{id}-chunk-{i}"`), so re-ingesting the same message
//! upserts over the previous chunks instead of duplicating them.

use serde::{Deserialize, Serialize};

use crate::{BoundaryChunker, Chunker};

/// A chat message ready for chunking.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    /// Stable message ID, conventionally `"{channel}-{ts}"`.
    pub id: String,
    /// Message body.
    pub text: String,
    /// Channel ID.
    pub channel: String,
    /// Human-readable channel name.
    pub channel_name: String,
    /// Author ID.
    pub user: String,
    /// Message timestamp.
    pub ts: String,
    /// Parent thread timestamp, for replies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_ts: Option<String>,
    /// Link back to the message.
    pub permalink: String,
}

impl Document {
    /// A document with the conventional `"{channel}-{ts}"` ID.
    ///
    /// ```rust
    /// use ashlar::Document;
    ///
    /// let doc = Document::new("C024BE91L", "1712345678.000200", "hello");
    /// assert_eq!(doc.id, "C024BE91L-1712345678.000200");
    /// assert_eq!(doc.user, "unknown");
    /// ```
    #[must_use]
    pub fn new(channel: impl Into<String>, ts: impl Into<String>, text: impl Into<String>) -> Self {
        let channel = channel.into();
        let ts = ts.into();
        Self {
            id: format!("{channel}-{ts}"),
            text: text.into(),
            channel,
            user: "unknown".to_string(),
            ts,
            ..Self::default()
        }
    }
}

/// Metadata carried by every chunk of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Channel ID.
    pub channel: String,
    /// Human-readable channel name.
    pub channel_name: String,
    /// Author ID.
    pub user: String,
    /// Message timestamp.
    pub ts: String,
    /// Parent thread timestamp, for replies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_ts: Option<String>,
    /// Link back to the message.
    pub permalink: String,
    /// Zero-based position of this chunk within its document.
    pub chunk_index: usize,
}

/// One chunk of a [`Document`], ready for embedding and upsert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkedDocument {
    /// `"{document id}-chunk-{index}"`.
    pub id: String,
    /// Chunk text.
    pub text: String,
    /// Source metadata.
    pub metadata: ChunkMetadata,
}

/// Chunk every document, skipping those with blank text.
///
/// ```rust
/// use ashlar::{chunk_documents, BoundaryChunker, ChunkingConfig, Document};
///
/// let chunker = BoundaryChunker::new(ChunkingConfig::default()).unwrap();
/// let docs = vec![
///     Document::new("C1", "100.1", "short message"),
///     Document::new("C1", "100.2", "   "),
/// ];
///
/// let chunks = chunk_documents(&docs, &chunker);
/// assert_eq!(chunks.len(), 1);
/// assert_eq!(chunks[0].id, "C1-100.1-chunk-0");
/// assert_eq!(chunks[0].metadata.chunk_index, 0);
/// ```
pub fn chunk_documents(docs: &[Document], chunker: &BoundaryChunker) -> Vec<ChunkedDocument> {
    let mut chunked = Vec::new();

    for doc in docs {
        if doc.text.trim().is_empty() {
            tracing::trace!(id = %doc.id, "skipping document without text");
            continue;
        }

        for slab in chunker.chunk(&doc.text) {
            chunked.push(ChunkedDocument {
                id: format!("{}-chunk-{}", doc.id, slab.index),
                text: slab.text,
                metadata: ChunkMetadata {
                    channel: doc.channel.clone(),
                    channel_name: doc.channel_name.clone(),
                    user: doc.user.clone(),
                    ts: doc.ts.clone(),
                    thread_ts: doc.thread_ts.clone(),
                    permalink: doc.permalink.clone(),
                    chunk_index: slab.index,
                },
            });
        }
    }

    tracing::info!(
        documents = docs.len(),
        chunks = chunked.len(),
        "chunked documents"
    );
    chunked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChunkingConfig;

    fn chunker(target: usize) -> BoundaryChunker {
        BoundaryChunker::new(ChunkingConfig::new(target).with_overlap(0)).unwrap()
    }

    #[test]
    fn test_ids_are_deterministic_per_document() {
        let long = "One sentence here. ".repeat(20);
        let docs = vec![
            Document::new("C1", "1.0", long.clone()),
            Document::new("C2", "2.0", "tiny"),
        ];

        let first = chunk_documents(&docs, &chunker(100));
        let second = chunk_documents(&docs, &chunker(100));
        assert_eq!(first, second);

        let c1: Vec<_> = first.iter().filter(|c| c.metadata.channel == "C1").collect();
        assert!(c1.len() > 1);
        for (i, chunk) in c1.iter().enumerate() {
            assert_eq!(chunk.id, format!("C1-1.0-chunk-{i}"));
            assert_eq!(chunk.metadata.chunk_index, i);
        }
        assert_eq!(first.last().unwrap().id, "C2-2.0-chunk-0");
    }

    #[test]
    fn test_metadata_is_copied() {
        let doc = Document {
            channel_name: "general".into(),
            user: "U42".into(),
            thread_ts: Some("0.5".into()),
            permalink: "https://team.slack.com/archives/C1/p10".into(),
            ..Document::new("C1", "1.0", "hello world")
        };
        let chunks = chunk_documents(&[doc], &chunker(100));
        let meta = &chunks[0].metadata;
        assert_eq!(meta.channel, "C1");
        assert_eq!(meta.channel_name, "general");
        assert_eq!(meta.user, "U42");
        assert_eq!(meta.ts, "1.0");
        assert_eq!(meta.thread_ts.as_deref(), Some("0.5"));
        assert_eq!(meta.permalink, "https://team.slack.com/archives/C1/p10");
    }

    #[test]
    fn test_serde_shape() {
        let doc: Document = serde_json::from_str(
            r#"{"id": "C1-1.0", "text": "hi", "channel": "C1", "ts": "1.0"}"#,
        )
        .unwrap();
        assert_eq!(doc.user, "");
        assert_eq!(doc.thread_ts, None);

        let chunks = chunk_documents(&[doc], &chunker(100));
        let value = serde_json::to_value(&chunks[0]).unwrap();
        assert_eq!(value["id"], "C1-1.0-chunk-0");
        assert_eq!(value["metadata"]["chunk_index"], 0);
        assert!(value["metadata"].get("thread_ts").is_none());
    }
}
