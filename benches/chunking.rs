//! Benchmarks for boundary-aware chunking.

use ashlar::{find_protected_spans, BoundaryChunker, Chunker, ChunkingConfig, Result};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn sample_text(size: usize) -> String {
    // Chat-like text: prose interleaved with links, code, and lists
    let messages = [
        "The deploy finished without errors. ",
        "Logs are at https://ci.example.com/pipelines/4821/jobs/17/artifacts ",
        "and the flaky test was `integration::retry_backoff`. ",
        "Fix was:\n\n```\nretry = 3\nbackoff_ms = 250\n```\n\n",
        "Follow-ups:\n- bump the timeout on staging\n- page on-call if it recurs\n",
        "See <https://wiki.example.com/runbooks/deploys|the runbook> for details. ",
        "How vexingly quick daft zebras jump! ",
    ];
    let mut text = String::with_capacity(size);
    let mut i = 0;
    while text.len() < size {
        text.push_str(messages[i % messages.len()]);
        i += 1;
    }
    text
}

fn bench_boundary_chunker(c: &mut Criterion) {
    let mut group = c.benchmark_group("boundary_chunker");

    for size in [1_000, 10_000, 100_000] {
        let text = sample_text(size);
        let plain = BoundaryChunker::new(ChunkingConfig::new(500).with_overlap(0)).unwrap();
        let overlapped = BoundaryChunker::new(
            ChunkingConfig::new(500)
                .with_overlap(100)
                .with_min_chunk_size(200),
        )
        .unwrap();

        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("plain", size), &text, |b, text| {
            b.iter(|| plain.chunk(black_box(text)))
        });
        group.bench_with_input(BenchmarkId::new("overlap_merge", size), &text, |b, text| {
            b.iter(|| overlapped.chunk(black_box(text)))
        });
    }

    group.finish();
}

fn bench_token_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("token_validation");

    for size in [1_000, 10_000, 100_000] {
        let text = sample_text(size);
        let heuristic =
            BoundaryChunker::new(ChunkingConfig::new(500).with_token_validation(true)).unwrap();
        let chars = BoundaryChunker::new(ChunkingConfig::new(500))
            .unwrap()
            .with_token_counter(|t: &str| -> Result<usize> { Ok(t.chars().count()) });

        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("heuristic", size), &text, |b, text| {
            b.iter(|| heuristic.chunk(black_box(text)))
        });
        group.bench_with_input(BenchmarkId::new("char_count", size), &text, |b, text| {
            b.iter(|| chars.chunk(black_box(text)))
        });
    }

    group.finish();
}

fn bench_span_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("span_detection");

    for size in [1_000, 10_000, 100_000] {
        let text = sample_text(size);

        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("default", size), &text, |b, text| {
            b.iter(|| find_protected_spans(black_box(text)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_boundary_chunker,
    bench_token_validation,
    bench_span_detection
);
criterion_main!(benches);
