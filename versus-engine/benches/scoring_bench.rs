//! Performance benchmarks for verse scoring
//!
//! Measures:
//! - Composite scoring latency by verse length
//! - Beat alignment latency
//! - Cache hit path versus direct scoring

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use std::time::Duration;
use versus_engine::analysis::{CompositeScorer, VerseScorer};
use versus_engine::services::{AnalysisCache, BeatMapper, CacheOptions};
use versus_engine::{AnalysisMode, BeatContext, Verse};

const LINES: &[&str] = &[
    "I'm spitting fire on this track",
    "Never looking back",
    "I move like a ghost in the night",
    "Cheddar in the bank and my bars are tight",
    "You're a rookie, I'm the storm in the fight",
    "No pun intended but I'm cold as ice",
    "Every verse I write is a diamond in the rough",
    "Stack it to the ceiling when the going gets tough",
];

fn verse_of(lines: usize) -> Verse {
    let text: Vec<&str> = LINES.iter().cycle().take(lines).copied().collect();
    Verse::new(&text.join("\n")).unwrap()
}

/// Benchmark full composite scoring
fn bench_composite_scoring(c: &mut Criterion) {
    let mut group = c.benchmark_group("composite_scoring");
    let scorer = CompositeScorer::new();

    for lines in [2usize, 8, 32, 64] {
        let verse = verse_of(lines);
        group.throughput(Throughput::Elements(verse.word_count() as u64));
        group.bench_with_input(BenchmarkId::new("lines", lines), &verse, |b, verse| {
            b.iter(|| black_box(scorer.score(black_box(verse), AnalysisMode::Live)))
        });
    }

    group.finish();
}

/// Benchmark beat alignment
fn bench_beat_alignment(c: &mut Criterion) {
    let mut group = c.benchmark_group("beat_alignment");
    let mapper = BeatMapper::new();
    let context = BeatContext::new(90.0);

    for lines in [2usize, 16] {
        let verse = verse_of(lines);
        group.bench_with_input(BenchmarkId::new("lines", lines), &verse, |b, verse| {
            b.iter(|| black_box(mapper.align_to_beat(black_box(verse), &context).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark the cache hit path against direct scoring
fn bench_cache_hit(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let cache = AnalysisCache::with_limits(
        Arc::new(CompositeScorer::new()),
        Duration::from_secs(3600),
        512,
    );
    let verse = verse_of(16);
    runtime.block_on(cache.get_or_compute(&verse, CacheOptions::default()));

    c.bench_function("cache_hit_16_lines", |b| {
        b.iter(|| {
            black_box(runtime.block_on(cache.get_or_compute(black_box(&verse), CacheOptions::default())))
        })
    });
}

criterion_group!(
    benches,
    bench_composite_scoring,
    bench_beat_alignment,
    bench_cache_hit
);
criterion_main!(benches);
