//! Composite Scorer
//!
//! Runs the rhyme, flow and creativity analyzers and combines them with
//! fixed weights:
//!
//! | Dimension  | Weight |
//! |------------|--------|
//! | Rhyme      | 0.35   |
//! | Flow       | 0.35   |
//! | Creativity | 0.30   |
//!
//! The weighting is done in integer percent so the rounding of the overall
//! score is exact and reproducible.
//!
//! `Final` mode flags verses shorter than the minimum word count as
//! low-confidence instead of failing; callers decide whether to accept them.

use tracing::debug;
use versus_common::Result;

use super::{CreativityScorer, FlowScorer, RhymeAnalyzer};
use crate::types::{AnalysisMode, CompositeScore, Verse};

/// Rhyme weight in percent
pub const RHYME_WEIGHT_PCT: u32 = 35;
/// Flow weight in percent
pub const FLOW_WEIGHT_PCT: u32 = 35;
/// Creativity weight in percent
pub const CREATIVITY_WEIGHT_PCT: u32 = 30;

/// Default minimum word count for a confident `Final` score
pub const DEFAULT_MIN_FINAL_WORDS: usize = 8;

const _: () = assert!(RHYME_WEIGHT_PCT + FLOW_WEIGHT_PCT + CREATIVITY_WEIGHT_PCT == 100);

/// `round(0.35 * rhyme + 0.35 * flow + 0.30 * creativity)`, halves rounded up
pub fn weighted_overall(rhyme: u8, flow: u8, creativity: u8) -> u8 {
    let weighted = RHYME_WEIGHT_PCT * rhyme as u32
        + FLOW_WEIGHT_PCT * flow as u32
        + CREATIVITY_WEIGHT_PCT * creativity as u32;
    ((weighted + 50) / 100).min(100) as u8
}

/// Anything that can turn a verse into a composite score
///
/// The analysis cache is generic over this trait so tests can inject a
/// scorer that counts invocations.
pub trait VerseScorer: Send + Sync {
    fn score(&self, verse: &Verse, mode: AnalysisMode) -> CompositeScore;
}

/// Composite Scorer
pub struct CompositeScorer {
    rhyme: RhymeAnalyzer,
    flow: FlowScorer,
    creativity: CreativityScorer,
    min_final_words: usize,
}

impl CompositeScorer {
    pub fn new() -> Self {
        Self::with_min_final_words(DEFAULT_MIN_FINAL_WORDS)
    }

    pub fn with_min_final_words(min_final_words: usize) -> Self {
        Self {
            rhyme: RhymeAnalyzer::new(),
            flow: FlowScorer::new(),
            creativity: CreativityScorer::new(),
            min_final_words,
        }
    }

    pub fn min_final_words(&self) -> usize {
        self.min_final_words
    }

    /// Validate raw text and score it
    ///
    /// # Errors
    /// `Error::InvalidInput` when the text is not text (control characters).
    pub fn evaluate(&self, text: &str, mode: AnalysisMode) -> Result<CompositeScore> {
        let verse = Verse::new(text)?;
        Ok(self.score(&verse, mode))
    }

    /// Score a verse, penalizing originality for bigrams reused from
    /// `prior_verses`
    pub fn score_against(
        &self,
        verse: &Verse,
        mode: AnalysisMode,
        prior_verses: &[&str],
    ) -> CompositeScore {
        let rhyme = self.rhyme.analyze(verse);
        let flow = self.flow.analyze(verse);
        let creativity = self.creativity.analyze_against(verse, prior_verses);

        let overall = weighted_overall(rhyme.density_score, flow.score, creativity.score);
        let low_confidence =
            mode == AnalysisMode::Final && verse.word_count() < self.min_final_words;

        debug!(
            overall,
            rhyme = rhyme.density_score,
            flow = flow.score,
            creativity = creativity.score,
            mode = mode.as_str(),
            priors = prior_verses.len(),
            low_confidence,
            "Composite scoring complete"
        );

        CompositeScore {
            overall,
            rhyme,
            flow,
            creativity,
            mode,
            low_confidence,
            commentary: None,
            computed_at: versus_common::time::now(),
        }
    }
}

impl VerseScorer for CompositeScorer {
    fn score(&self, verse: &Verse, mode: AnalysisMode) -> CompositeScore {
        self.score_against(verse, mode, &[])
    }
}

impl Default for CompositeScorer {
    fn default() -> Self {
        Self::new()
    }
}
