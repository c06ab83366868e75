//! Basic Chat Chunking
//!
//! Chunk a chat message without cutting links, code, or list items, then
//! chunk a batch of messages with metadata.
//!
//! ```bash
//! RUST_LOG=ashlar=debug cargo run --example basic_chunking
//! ```

use ashlar::{chunk_documents, BoundaryChunker, Chunker, ChunkingConfig, Document};
use tracing_subscriber::EnvFilter;

fn main() -> ashlar::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let message = "Deploy to staging is done. Pipeline logs are at \
        https://ci.example.com/pipelines/4821/jobs/17/artifacts/raw/output.log \
        if anyone wants to dig in.\n\n\
        The fix for the flaky job was:\n\n\
        ```\n[retry]\nattempts = 3\nbackoff_ms = 250\n```\n\n\
        Follow-ups:\n\
        - bump the request timeout on staging to 30s\n\
        - page on-call if the job fails twice in a row\n\n\
        Runbook: <https://wiki.example.com/runbooks/deploys|Deploy runbook>";

    let config = ChunkingConfig::new(120)
        .with_overlap(20)
        .with_min_chunk_size(40);
    let chunker = BoundaryChunker::new(config)?;
    let slabs = chunker.chunk(message);

    println!("Message: {} chars", message.chars().count());
    println!("Chunks: {}\n", slabs.len());

    for slab in &slabs {
        println!(
            "[{}] bytes {}-{} ({} chars):\n{}\n",
            slab.index,
            slab.start,
            slab.end,
            slab.char_len(),
            slab.text
        );
    }

    // Batches carry channel metadata through to every chunk
    let docs = vec![
        Document {
            channel_name: "deploys".into(),
            user: "U024BE7LH".into(),
            ..Document::new("C024BE91L", "1712345678.000200", message)
        },
        Document::new("C024BE91L", "1712345690.000300", "thanks!"),
    ];

    for chunk in chunk_documents(&docs, &chunker) {
        println!(
            "{} #{} chunk {}: {} chars",
            chunk.id,
            chunk.metadata.channel_name,
            chunk.metadata.chunk_index,
            chunk.text.chars().count()
        );
    }

    Ok(())
}
