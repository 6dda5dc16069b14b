//! Engine facade
//!
//! Bundles the scorer, the injected analysis cache and the stateless
//! services behind the operations the rest of the application calls.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{info, warn};
use versus_common::config::TomlConfig;
use versus_common::Result;

use crate::analysis::{CompositeScorer, VerseScorer};
use crate::services::commentary_client::{resolve_api_key, CommentaryProvider, OpenAiCompatClient};
use crate::services::{AnalysisCache, BeatMapper, CacheOptions, StyleProfiler, VerseComparator};
use crate::types::{
    AnalysisMode, BeatContext, ComparisonResult, CompositeScore, FlowModel, HistoricalVerse,
    StyleProfile, Verse,
};

/// Verse Analysis & Flow Modeling Engine
pub struct VerseEngine<S = CompositeScorer> {
    cache: Arc<AnalysisCache<S>>,
    comparator: VerseComparator<S>,
    beat_mapper: BeatMapper,
    profiler: StyleProfiler,
}

impl VerseEngine<CompositeScorer> {
    /// Build an engine from bootstrap configuration
    ///
    /// Augmentation is attached only when enabled and an API key resolves;
    /// otherwise the engine runs without it.
    pub fn from_config(config: &TomlConfig) -> Result<Self> {
        config.validate()?;

        let scorer = Arc::new(CompositeScorer::with_min_final_words(
            config.scoring.min_final_words,
        ));
        let mut cache = AnalysisCache::new(scorer, &config.cache);

        if config.augmentation.enabled {
            match resolve_api_key(&config.augmentation) {
                Some(key) => {
                    let client = OpenAiCompatClient::new(&config.augmentation, key)?;
                    info!(model = client.model(), "Commentary augmentation enabled");
                    let provider: Arc<dyn CommentaryProvider> = Arc::new(client);
                    cache = cache.with_commentary(provider, config.augmentation.timeout());
                }
                None => warn!("Augmentation enabled but no API key configured, disabling"),
            }
        }

        Ok(Self::new(Arc::new(cache)))
    }

    /// Score a verse directly, penalizing phrasing reused from the
    /// performer's earlier verses
    pub fn evaluate_against(
        &self,
        text: &str,
        mode: AnalysisMode,
        prior_verses: &[&str],
    ) -> Result<CompositeScore> {
        let verse = Verse::new(text)?;
        Ok(self.cache.scorer().score_against(&verse, mode, prior_verses))
    }
}

impl<S: VerseScorer + 'static> VerseEngine<S> {
    pub fn new(cache: Arc<AnalysisCache<S>>) -> Self {
        Self {
            comparator: VerseComparator::new(Arc::clone(&cache)),
            cache,
            beat_mapper: BeatMapper::new(),
            profiler: StyleProfiler::new(),
        }
    }

    pub fn cache(&self) -> &Arc<AnalysisCache<S>> {
        &self.cache
    }

    /// Score a verse directly, bypassing the cache
    pub fn evaluate(&self, text: &str, mode: AnalysisMode) -> Result<CompositeScore> {
        let verse = Verse::new(text)?;
        Ok(self.cache.scorer().score(&verse, mode))
    }

    /// Score a verse through the cache
    pub async fn evaluate_cached(&self, text: &str, options: CacheOptions) -> Result<CompositeScore> {
        let verse = Verse::new(text)?;
        Ok(self.cache.get_or_compute(&verse, options).await)
    }

    pub async fn compare(
        &self,
        verse_a: &str,
        verse_b: &str,
        mode: AnalysisMode,
    ) -> Result<ComparisonResult> {
        self.comparator.compare(verse_a, verse_b, mode).await
    }

    pub fn align_to_beat(&self, text: &str, context: &BeatContext) -> Result<FlowModel> {
        let verse = Verse::new(text)?;
        self.beat_mapper.align_to_beat(&verse, context)
    }

    pub fn extract_profile(&self, name: &str, history: &[HistoricalVerse]) -> StyleProfile {
        self.profiler.extract_profile(name, history)
    }

    pub fn start_sweeper(&self, interval: Duration) -> JoinHandle<()> {
        self.cache.spawn_sweeper(interval)
    }

    /// Stop background work owned by the cache
    pub fn shutdown(&self) {
        self.cache.shutdown();
        info!("Verse engine shut down");
    }
}
