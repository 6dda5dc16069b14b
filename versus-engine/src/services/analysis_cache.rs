//! Real-Time Analysis Cache
//!
//! Memoizes composite scores per `(verse text, mode)` with a TTL and a hard
//! entry limit, and guarantees at most one computation per key at a time.
//!
//! # Concurrency
//! The slot map sits behind one async mutex that is only held for map
//! bookkeeping, never while scoring. Each slot owns a
//! `tokio::sync::OnceCell`: the first caller for a key runs the scorer
//! inside `get_or_init`, and every concurrent caller for the same key
//! awaits that same cell instead of scoring again.
//!
//! # Eviction
//! - Expired entries are misses and are replaced on lookup
//! - Above capacity, the oldest inserted entries go first
//! - `spawn_sweeper` runs a periodic background sweep of expired entries
//!
//! # Augmentation
//! When a caller asks for it and a `CommentaryProvider` is configured, the
//! first scored read of a slot starts one commentary task for that slot.
//! The task runs under a timeout and a cancellation token; if it succeeds
//! the text is stored in the slot and shows up on later reads. Timeouts and
//! failures are logged and dropped. The base score is never delayed.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use sha2::{Digest, Sha256};
use tokio::sync::{Mutex, OnceCell, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use versus_common::config::CacheConfig;
use versus_common::Error;

use super::commentary_client::CommentaryProvider;
use crate::analysis::VerseScorer;
use crate::types::{AnalysisMode, CompositeScore, Verse};

/// Per-request options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheOptions {
    pub mode: AnalysisMode,
    /// Ask for LLM commentary; does not affect the cache key
    pub augment: bool,
}

impl CacheOptions {
    pub fn new(mode: AnalysisMode) -> Self {
        Self {
            mode,
            augment: false,
        }
    }

    pub fn with_augmentation(mut self) -> Self {
        self.augment = true;
        self
    }
}

/// Snapshot of cache counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Reads served from a finished entry
    pub hits: u64,
    /// Reads that created a new entry
    pub misses: u64,
    /// Reads that joined a computation already in flight
    pub coalesced: u64,
    /// Scorer invocations
    pub computations: u64,
    /// Entries removed by TTL, capacity or corruption
    pub evictions: u64,
    pub entries: usize,
}

#[derive(Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    coalesced: AtomicU64,
    computations: AtomicU64,
    evictions: AtomicU64,
}

struct Slot {
    seq: u64,
    inserted_at: Instant,
    value: Arc<OnceCell<CompositeScore>>,
    commentary: Arc<RwLock<Option<String>>>,
    augmentation: Option<CancellationToken>,
}

impl Slot {
    fn new(seq: u64, now: Instant) -> Self {
        Self {
            seq,
            inserted_at: now,
            value: Arc::new(OnceCell::new()),
            commentary: Arc::new(RwLock::new(None)),
            augmentation: None,
        }
    }

    fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.inserted_at) >= ttl
    }

    fn is_corrupt(&self) -> bool {
        self.value.get().map_or(false, |score| !score.is_consistent())
    }

    fn cancel_augmentation(&self) {
        if let Some(token) = &self.augmentation {
            token.cancel();
        }
    }
}

#[derive(Default)]
struct CacheState {
    slots: HashMap<String, Slot>,
    /// Insertion order; entries whose seq no longer matches the slot are stale
    order: VecDeque<(u64, String)>,
    next_seq: u64,
}

impl CacheState {
    fn remove(&mut self, key: &str) -> bool {
        match self.slots.remove(key) {
            Some(slot) => {
                slot.cancel_augmentation();
                true
            }
            None => false,
        }
    }

    fn insert(&mut self, key: &str, now: Instant, capacity: usize) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.slots.insert(key.to_string(), Slot::new(seq, now));
        self.order.push_back((seq, key.to_string()));
        // Expired and invalidated keys leave stale order entries behind
        if self.order.len() > capacity.saturating_mul(2) {
            self.compact_order();
        }
    }

    /// Drop oldest entries until within capacity; returns how many went
    fn enforce_capacity(&mut self, capacity: usize) -> u64 {
        let mut evicted = 0;
        while self.slots.len() > capacity {
            let Some((seq, key)) = self.order.pop_front() else {
                break;
            };
            let current = self.slots.get(&key).map_or(false, |slot| slot.seq == seq);
            if current && self.remove(&key) {
                evicted += 1;
            }
        }
        evicted
    }

    fn compact_order(&mut self) {
        let slots = &self.slots;
        self.order
            .retain(|(seq, key)| slots.get(key).map_or(false, |slot| slot.seq == *seq));
    }
}

/// Stable cache key for a verse under a mode
pub fn fingerprint(text: &str, mode: AnalysisMode) -> String {
    let mut hasher = Sha256::new();
    hasher.update(mode.as_str().as_bytes());
    hasher.update([0u8]);
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Real-Time Analysis Cache
pub struct AnalysisCache<S> {
    scorer: Arc<S>,
    ttl: Duration,
    capacity: usize,
    state: Mutex<CacheState>,
    counters: Counters,
    commentary: Option<Arc<dyn CommentaryProvider>>,
    augmentation_timeout: Duration,
    shutdown: CancellationToken,
}

impl<S: VerseScorer + 'static> AnalysisCache<S> {
    pub fn new(scorer: Arc<S>, config: &CacheConfig) -> Self {
        Self::with_limits(scorer, config.ttl(), config.capacity)
    }

    pub fn with_limits(scorer: Arc<S>, ttl: Duration, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        info!(ttl_secs = ttl.as_secs_f64(), capacity, "Analysis cache created");
        Self {
            scorer,
            ttl,
            capacity,
            state: Mutex::new(CacheState::default()),
            counters: Counters::default(),
            commentary: None,
            augmentation_timeout: Duration::from_secs(3),
            shutdown: CancellationToken::new(),
        }
    }

    /// Attach a commentary provider with its per-request budget
    pub fn with_commentary(mut self, provider: Arc<dyn CommentaryProvider>, timeout: Duration) -> Self {
        self.commentary = Some(provider);
        self.augmentation_timeout = timeout;
        self
    }

    pub fn scorer(&self) -> &Arc<S> {
        &self.scorer
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Return the cached score for this verse, computing it at most once
    ///
    /// The returned value is a copy; any commentary that has already arrived
    /// for the entry is merged in.
    pub async fn get_or_compute(&self, verse: &Verse, options: CacheOptions) -> CompositeScore {
        let key = fingerprint(verse.text(), options.mode);

        let (cell, commentary) = {
            let mut state = self.state.lock().await;
            let now = Instant::now();

            let reusable = match state.slots.get(&key) {
                Some(slot) if slot.is_expired(now, self.ttl) => {
                    debug!(key = %&key[..12], "Cache entry expired");
                    false
                }
                Some(slot) if slot.is_corrupt() => {
                    warn!(key = %&key[..12], "Corrupt cache entry, recomputing");
                    false
                }
                Some(_) => true,
                None => false,
            };

            if reusable {
                let slot = &state.slots[&key];
                if slot.value.initialized() {
                    self.counters.hits.fetch_add(1, Ordering::Relaxed);
                } else {
                    self.counters.coalesced.fetch_add(1, Ordering::Relaxed);
                }
            } else {
                if state.remove(&key) {
                    self.counters.evictions.fetch_add(1, Ordering::Relaxed);
                }
                state.insert(&key, now, self.capacity);
                self.counters.misses.fetch_add(1, Ordering::Relaxed);
                let evicted = state.enforce_capacity(self.capacity);
                self.counters.evictions.fetch_add(evicted, Ordering::Relaxed);
            }

            let slot = &state.slots[&key];
            (slot.value.clone(), slot.commentary.clone())
        };

        let scorer = &self.scorer;
        let counters = &self.counters;
        let mode = options.mode;
        let score = cell
            .get_or_init(|| async move {
                counters.computations.fetch_add(1, Ordering::Relaxed);
                scorer.score(verse, mode)
            })
            .await
            .clone();

        if options.augment {
            self.start_augmentation(&key, verse.text(), &score).await;
        }

        let mut result = score;
        result.commentary = commentary.read().await.clone();
        result
    }

    /// Start one commentary task for the slot, if none has been started
    async fn start_augmentation(&self, key: &str, text: &str, score: &CompositeScore) {
        let Some(provider) = self.commentary.clone() else {
            debug!("Augmentation requested but no commentary provider configured");
            return;
        };

        let (token, commentary) = {
            let mut state = self.state.lock().await;
            let Some(slot) = state.slots.get_mut(key) else {
                return;
            };
            if slot.augmentation.is_some() {
                return;
            }
            let token = self.shutdown.child_token();
            slot.augmentation = Some(token.clone());
            (token, slot.commentary.clone())
        };

        let timeout = self.augmentation_timeout;
        let text = text.to_string();
        let score = score.clone();

        tokio::spawn(async move {
            let outcome = tokio::select! {
                _ = token.cancelled() => {
                    debug!(provider = provider.name(), "Augmentation cancelled");
                    return;
                }
                outcome = tokio::time::timeout(timeout, provider.commentary(&text, &score)) => outcome,
            };

            let error = match outcome {
                Ok(Ok(notes)) => {
                    *commentary.write().await = Some(notes);
                    debug!(provider = provider.name(), "Augmentation stored");
                    return;
                }
                Ok(Err(e)) => Error::from(e),
                Err(_) => Error::AugmentationTimeout(timeout),
            };
            warn!(provider = provider.name(), error = %error, "Augmentation omitted");
        });
    }

    /// Remove expired entries and enforce capacity; returns the number removed
    pub async fn sweep(&self) -> usize {
        let mut state = self.state.lock().await;
        let now = Instant::now();

        let expired: Vec<String> = state
            .slots
            .iter()
            .filter(|(_, slot)| slot.is_expired(now, self.ttl))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &expired {
            state.remove(key);
        }
        state.compact_order();
        let overflow = state.enforce_capacity(self.capacity);

        let removed = expired.len() as u64 + overflow;
        self.counters.evictions.fetch_add(removed, Ordering::Relaxed);
        if removed > 0 {
            debug!(removed, remaining = state.slots.len(), "Cache sweep complete");
        }
        removed as usize
    }

    /// Run `sweep` every `interval` until `shutdown` is called
    pub fn spawn_sweeper(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let cache = Arc::clone(self);
        let token = self.shutdown.child_token();
        info!(interval_secs = interval.as_secs_f64(), "Cache sweeper started");

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        cache.sweep().await;
                    }
                }
            }
            info!("Cache sweeper stopped");
        })
    }

    /// Drop the entry for one verse, if present
    pub async fn invalidate(&self, verse: &Verse, mode: AnalysisMode) -> bool {
        let key = fingerprint(verse.text(), mode);
        self.state.lock().await.remove(&key)
    }

    pub async fn clear(&self) {
        let mut state = self.state.lock().await;
        for slot in state.slots.values() {
            slot.cancel_augmentation();
        }
        state.slots.clear();
        state.order.clear();
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.slots.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn stats(&self) -> CacheStats {
        let entries = self.len().await;
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            coalesced: self.counters.coalesced.load(Ordering::Relaxed),
            computations: self.counters.computations.load(Ordering::Relaxed),
            evictions: self.counters.evictions.load(Ordering::Relaxed),
            entries,
        }
    }

    /// Stop the sweeper and cancel every in-flight augmentation
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::CompositeScorer;
    use crate::services::commentary_client::CommentaryError;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    /// Scorer spy counting invocations
    struct CountingScorer {
        inner: CompositeScorer,
        calls: AtomicUsize,
        delay: Option<Duration>,
    }

    impl CountingScorer {
        fn new() -> Self {
            Self {
                inner: CompositeScorer::new(),
                calls: AtomicUsize::new(0),
                delay: None,
            }
        }

        fn slow(delay: Duration) -> Self {
            Self {
                delay: Some(delay),
                ..Self::new()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl VerseScorer for CountingScorer {
        fn score(&self, verse: &Verse, mode: AnalysisMode) -> CompositeScore {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                std::thread::sleep(delay);
            }
            self.inner.score(verse, mode)
        }
    }

    struct FixedCommentary {
        delay: Duration,
        reply: Result<&'static str, ()>,
    }

    #[async_trait]
    impl CommentaryProvider for FixedCommentary {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn commentary(
            &self,
            _verse: &str,
            _score: &CompositeScore,
        ) -> Result<String, CommentaryError> {
            tokio::time::sleep(self.delay).await;
            self.reply
                .map(str::to_string)
                .map_err(|_| CommentaryError::Api {
                    status: 503,
                    message: "unavailable".to_string(),
                })
        }
    }

    fn verse(text: &str) -> Verse {
        Verse::new(text).unwrap()
    }

    fn cache(scorer: Arc<CountingScorer>) -> AnalysisCache<CountingScorer> {
        AnalysisCache::with_limits(scorer, Duration::from_secs(60), 16)
    }

    #[test]
    fn test_fingerprint_depends_on_mode_and_text() {
        let a = fingerprint("cat in the hat", AnalysisMode::Live);
        assert_eq!(a.len(), 64);
        assert_eq!(a, fingerprint("cat in the hat", AnalysisMode::Live));
        assert_ne!(a, fingerprint("cat in the hat", AnalysisMode::Final));
        assert_ne!(a, fingerprint("cat in the hat ", AnalysisMode::Live));
    }

    #[tokio::test]
    async fn test_second_read_within_ttl_does_not_rescore() {
        let scorer = Arc::new(CountingScorer::new());
        let cache = cache(scorer.clone());
        let v = verse("I'm spitting fire on this track\nNever looking back");

        let first = cache.get_or_compute(&v, CacheOptions::default()).await;
        let second = cache.get_or_compute(&v, CacheOptions::default()).await;

        assert_eq!(scorer.calls(), 1);
        assert_eq!(first, second);
        let stats = cache.stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.computations, 1);
    }

    #[tokio::test]
    async fn test_mode_is_part_of_key() {
        let scorer = Arc::new(CountingScorer::new());
        let cache = cache(scorer.clone());
        let v = verse("cat in the hat");

        cache.get_or_compute(&v, CacheOptions::new(AnalysisMode::Live)).await;
        let fin = cache.get_or_compute(&v, CacheOptions::new(AnalysisMode::Final)).await;

        assert_eq!(scorer.calls(), 2);
        assert_eq!(fin.mode, AnalysisMode::Final);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_is_recomputed() {
        let scorer = Arc::new(CountingScorer::new());
        let cache = cache(scorer.clone());
        let v = verse("cat in the hat");

        cache.get_or_compute(&v, CacheOptions::default()).await;
        tokio::time::advance(Duration::from_secs(59)).await;
        cache.get_or_compute(&v, CacheOptions::default()).await;
        assert_eq!(scorer.calls(), 1);

        tokio::time::advance(Duration::from_secs(2)).await;
        cache.get_or_compute(&v, CacheOptions::default()).await;
        assert_eq!(scorer.calls(), 2);
        assert_eq!(cache.stats().await.evictions, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_reads_compute_once() {
        let scorer = Arc::new(CountingScorer::slow(Duration::from_millis(50)));
        let cache = Arc::new(cache(scorer.clone()));
        let v = verse("we all ask for the same verse\nat the very same time");

        let mut handles = Vec::new();
        for _ in 0..10 {
            let cache = Arc::clone(&cache);
            let v = v.clone();
            handles.push(tokio::spawn(async move {
                cache.get_or_compute(&v, CacheOptions::default()).await
            }));
        }

        let mut results = Vec::new();
        for handle in handles {
            results.push(handle.await.unwrap());
        }

        assert_eq!(scorer.calls(), 1);
        assert!(results.windows(2).all(|w| w[0] == w[1]));
        let stats = cache.stats().await;
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits + stats.coalesced, 9);
    }

    #[tokio::test]
    async fn test_capacity_evicts_oldest_first() {
        let scorer = Arc::new(CountingScorer::new());
        let cache = AnalysisCache::with_limits(scorer.clone(), Duration::from_secs(60), 2);

        let (a, b, c) = (verse("first verse"), verse("second verse"), verse("third verse"));
        cache.get_or_compute(&a, CacheOptions::default()).await;
        cache.get_or_compute(&b, CacheOptions::default()).await;
        cache.get_or_compute(&c, CacheOptions::default()).await;
        assert_eq!(cache.len().await, 2);
        assert_eq!(scorer.calls(), 3);

        // b and c are still cached, a was evicted
        cache.get_or_compute(&b, CacheOptions::default()).await;
        cache.get_or_compute(&c, CacheOptions::default()).await;
        assert_eq!(scorer.calls(), 3);
        cache.get_or_compute(&a, CacheOptions::default()).await;
        assert_eq!(scorer.calls(), 4);
    }

    #[tokio::test]
    async fn test_corrupt_entry_treated_as_miss() {
        let scorer = Arc::new(CountingScorer::new());
        let cache = cache(scorer.clone());
        let v = verse("cat in the hat\nbat on the mat");

        let good = cache.get_or_compute(&v, CacheOptions::default()).await;

        {
            let mut state = cache.state.lock().await;
            let key = fingerprint(v.text(), AnalysisMode::Live);
            let mut bad = good.clone();
            bad.overall = (good.overall + 13) % 101;
            let cell = OnceCell::new_with(Some(bad));
            state.slots.get_mut(&key).unwrap().value = Arc::new(cell);
        }

        let recovered = cache.get_or_compute(&v, CacheOptions::default()).await;
        assert_eq!(scorer.calls(), 2);
        assert!(recovered.same_scores(&good));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_removes_expired_entries() {
        let scorer = Arc::new(CountingScorer::new());
        let cache = cache(scorer);
        cache.get_or_compute(&verse("one"), CacheOptions::default()).await;
        cache.get_or_compute(&verse("two"), CacheOptions::default()).await;

        assert_eq!(cache.sweep().await, 0);
        tokio::time::advance(Duration::from_secs(61)).await;
        assert_eq!(cache.sweep().await, 2);
        assert!(cache.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_background_sweeper() {
        let scorer = Arc::new(CountingScorer::new());
        let cache = Arc::new(cache(scorer));
        let handle = cache.spawn_sweeper(Duration::from_secs(30));

        cache.get_or_compute(&verse("one"), CacheOptions::default()).await;
        tokio::time::sleep(Duration::from_secs(100)).await;
        assert!(cache.is_empty().await);

        cache.shutdown();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_invalidate_and_clear() {
        let scorer = Arc::new(CountingScorer::new());
        let cache = cache(scorer.clone());
        let v = verse("cat in the hat");

        cache.get_or_compute(&v, CacheOptions::default()).await;
        assert!(cache.invalidate(&v, AnalysisMode::Live).await);
        assert!(!cache.invalidate(&v, AnalysisMode::Live).await);
        cache.get_or_compute(&v, CacheOptions::default()).await;
        assert_eq!(scorer.calls(), 2);

        cache.clear().await;
        assert!(cache.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_order_stays_bounded_under_churn() {
        let scorer = Arc::new(CountingScorer::new());
        let cache = AnalysisCache::with_limits(scorer.clone(), Duration::from_secs(1), 4);
        let v = verse("cat in the hat");

        // Same key recomputed after every expiry
        for _ in 0..1000 {
            cache.get_or_compute(&v, CacheOptions::default()).await;
            tokio::time::advance(Duration::from_secs(2)).await;
        }
        // Insert then invalidate
        for _ in 0..1000 {
            cache.get_or_compute(&v, CacheOptions::default()).await;
            assert!(cache.invalidate(&v, AnalysisMode::Live).await);
        }

        let state = cache.state.lock().await;
        assert!(state.order.len() <= 2 * 4 + 1, "order grew to {}", state.order.len());
        assert!(state.slots.len() <= 4);
        drop(state);
        assert_eq!(scorer.calls(), 2000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_augmentation_merged_into_later_read() {
        let scorer = Arc::new(CountingScorer::new());
        let provider = Arc::new(FixedCommentary {
            delay: Duration::from_millis(100),
            reply: Ok("Tight scheme, lean on imagery."),
        });
        let cache = cache(scorer.clone()).with_commentary(provider, Duration::from_secs(2));
        let v = verse("cat in the hat\nbat on the mat");
        let options = CacheOptions::default().with_augmentation();

        let first = cache.get_or_compute(&v, options).await;
        assert!(first.commentary.is_none());

        tokio::time::sleep(Duration::from_millis(500)).await;
        let second = cache.get_or_compute(&v, CacheOptions::default()).await;
        assert_eq!(second.commentary.as_deref(), Some("Tight scheme, lean on imagery."));
        assert!(second.same_scores(&first));
        assert_eq!(scorer.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_augmentation_is_omitted() {
        let scorer = Arc::new(CountingScorer::new());
        let provider = Arc::new(FixedCommentary {
            delay: Duration::from_secs(10),
            reply: Ok("too late"),
        });
        let cache = cache(scorer).with_commentary(provider, Duration::from_millis(200));
        let v = verse("cat in the hat");
        let options = CacheOptions::default().with_augmentation();

        let first = cache.get_or_compute(&v, options).await;
        tokio::time::sleep(Duration::from_secs(20)).await;
        let second = cache.get_or_compute(&v, options).await;

        assert!(second.commentary.is_none());
        assert!(second.same_scores(&first));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_augmentation_is_omitted() {
        let scorer = Arc::new(CountingScorer::new());
        let provider = Arc::new(FixedCommentary {
            delay: Duration::from_millis(10),
            reply: Err(()),
        });
        let cache = cache(scorer).with_commentary(provider, Duration::from_secs(1));
        let v = verse("cat in the hat");
        let options = CacheOptions::default().with_augmentation();

        cache.get_or_compute(&v, options).await;
        tokio::time::sleep(Duration::from_secs(2)).await;
        let later = cache.get_or_compute(&v, options).await;
        assert!(later.commentary.is_none());
    }

    #[tokio::test]
    async fn test_augmentation_without_provider_is_noop() {
        let scorer = Arc::new(CountingScorer::new());
        let cache = cache(scorer);
        let v = verse("cat in the hat");
        let score = cache
            .get_or_compute(&v, CacheOptions::default().with_augmentation())
            .await;
        assert!(score.commentary.is_none());
    }
}
