//! Integration tests for concurrent access to the analysis cache
//!
//! Many battle participants poll the same verses at once; each distinct
//! verse must be scored once per TTL window no matter how many callers race.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use versus_engine::analysis::{CompositeScorer, VerseScorer};
use versus_engine::services::{AnalysisCache, CacheOptions};
use versus_engine::{AnalysisMode, CompositeScore, Verse, VerseEngine, Winner};

/// Counts scorer invocations per run
struct SpyScorer {
    inner: CompositeScorer,
    calls: AtomicUsize,
}

impl VerseScorer for SpyScorer {
    fn score(&self, verse: &Verse, mode: AnalysisMode) -> CompositeScore {
        self.calls.fetch_add(1, Ordering::SeqCst);
        // Long enough for every racing task to arrive while in flight
        std::thread::sleep(Duration::from_millis(20));
        self.inner.score(verse, mode)
    }
}

fn spy_cache() -> (Arc<SpyScorer>, Arc<AnalysisCache<SpyScorer>>) {
    let scorer = Arc::new(SpyScorer {
        inner: CompositeScorer::new(),
        calls: AtomicUsize::new(0),
    });
    let cache = Arc::new(AnalysisCache::with_limits(
        Arc::clone(&scorer),
        Duration::from_secs(60),
        64,
    ));
    (scorer, cache)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_callers_share_one_computation() {
    let (scorer, cache) = spy_cache();
    let verse = Verse::new("Everybody asks at once\nEverybody waits as one").unwrap();

    let mut join_set = JoinSet::new();
    for _ in 0..32 {
        let cache = Arc::clone(&cache);
        let verse = verse.clone();
        join_set.spawn(async move { cache.get_or_compute(&verse, CacheOptions::default()).await });
    }

    let mut scores = Vec::new();
    while let Some(result) = join_set.join_next().await {
        scores.push(result.expect("Task panicked"));
    }

    assert_eq!(scores.len(), 32);
    assert_eq!(scorer.calls.load(Ordering::SeqCst), 1);
    assert!(scores.iter().all(|s| s.same_scores(&scores[0])));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_distinct_keys_compute_independently() {
    let (scorer, cache) = spy_cache();
    let verses: Vec<Verse> = (0..8)
        .map(|i| Verse::new(&format!("verse number {} on the mic", i)).unwrap())
        .collect();

    let mut join_set = JoinSet::new();
    for round in 0..4 {
        for (i, verse) in verses.iter().enumerate() {
            let cache = Arc::clone(&cache);
            let verse = verse.clone();
            let mode = if (i + round) % 2 == 0 {
                AnalysisMode::Live
            } else {
                AnalysisMode::Final
            };
            join_set.spawn(async move { cache.get_or_compute(&verse, CacheOptions::new(mode)).await });
        }
    }
    while let Some(result) = join_set.join_next().await {
        result.expect("Task panicked");
    }

    // 8 verses x 2 modes
    assert_eq!(scorer.calls.load(Ordering::SeqCst), 16);
    let stats = cache.stats().await;
    assert_eq!(stats.entries, 16);
    assert_eq!(stats.misses, 16);
    assert_eq!(stats.hits + stats.coalesced, 16);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_compares_through_engine() {
    let engine = Arc::new(VerseEngine::from_config(&Default::default()).unwrap());
    let a = "I'm spitting fire on this track\nNever looking back";
    let b = "I move like a ghost in the night\nI'm a storm, I'm a fight";

    let mut join_set = JoinSet::new();
    for _ in 0..10 {
        let engine = Arc::clone(&engine);
        join_set.spawn(async move { engine.compare(a, b, AnalysisMode::Final).await.unwrap() });
    }

    let mut results = Vec::new();
    while let Some(result) = join_set.join_next().await {
        results.push(result.expect("Task panicked"));
    }

    assert!(results.iter().all(|r| r == &results[0]));
    assert_eq!(engine.cache().stats().await.computations, 2);
    let flipped = engine.compare(b, a, AnalysisMode::Final).await.unwrap();
    assert_eq!(flipped.margin, results[0].margin);
    if results[0].winner == Winner::Tie {
        assert_eq!(flipped.winner, Winner::Tie);
    } else {
        assert_ne!(flipped.winner, results[0].winner);
    }
}
