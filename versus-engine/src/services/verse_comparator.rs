//! Verse Comparison Engine
//!
//! Decides a head-to-head round from two composite scores. Overall scores
//! closer than [`TIE_THRESHOLD`] points are a tie.

use std::sync::Arc;

use tracing::debug;
use versus_common::Result;

use super::analysis_cache::{AnalysisCache, CacheOptions};
use crate::analysis::VerseScorer;
use crate::types::{AnalysisMode, ComparisonResult, CompositeScore, Verse, Winner};

/// Minimum overall margin for a decision
pub const TIE_THRESHOLD: u8 = 5;

/// Compare two already computed scores
pub fn compare_scores(a: &CompositeScore, b: &CompositeScore) -> ComparisonResult {
    let margin = a.overall.abs_diff(b.overall);

    if margin < TIE_THRESHOLD {
        return ComparisonResult {
            winner: Winner::Tie,
            margin,
            reasoning: vec![format!(
                "Overall scores {} (A) and {} (B) are within {} points",
                a.overall, b.overall, TIE_THRESHOLD
            )],
        };
    }

    let (winner, label) = if a.overall > b.overall {
        (Winner::A, "A")
    } else {
        (Winner::B, "B")
    };

    let dimensions = [
        ("Rhyme density", a.rhyme.density_score, b.rhyme.density_score),
        ("Flow", a.flow.score, b.flow.score),
        ("Creativity", a.creativity.score, b.creativity.score),
    ];

    // (name, margin, winner's score, loser's score)
    let mut favoring: Vec<(&str, u8, u8, u8)> = dimensions
        .iter()
        .filter_map(|&(name, score_a, score_b)| {
            let (won, lost) = match winner {
                Winner::A => (score_a, score_b),
                _ => (score_b, score_a),
            };
            (won > lost).then(|| (name, won - lost, won, lost))
        })
        .collect();
    // Stable sort keeps rhyme, flow, creativity order on equal margins
    favoring.sort_by(|x, y| y.1.cmp(&x.1));

    let mut reasoning: Vec<String> = favoring
        .iter()
        .map(|(name, diff, won, lost)| {
            format!(
                "{} favored {} by {} points ({} vs {})",
                name, label, diff, won, lost
            )
        })
        .collect();

    if reasoning.is_empty() {
        let (won, lost) = match winner {
            Winner::A => (a.overall, b.overall),
            _ => (b.overall, a.overall),
        };
        reasoning.push(format!(
            "{} won on overall score ({} vs {})",
            label, won, lost
        ));
    }

    ComparisonResult {
        winner,
        margin,
        reasoning,
    }
}

/// Scores both verses through the shared cache, then compares
pub struct VerseComparator<S> {
    cache: Arc<AnalysisCache<S>>,
}

impl<S: VerseScorer + 'static> VerseComparator<S> {
    pub fn new(cache: Arc<AnalysisCache<S>>) -> Self {
        Self { cache }
    }

    /// # Errors
    /// `Error::InvalidInput` if either text is not valid verse text.
    pub async fn compare(
        &self,
        verse_a: &str,
        verse_b: &str,
        mode: AnalysisMode,
    ) -> Result<ComparisonResult> {
        let verse_a = Verse::new(verse_a)?;
        let verse_b = Verse::new(verse_b)?;
        Ok(self.compare_verses(&verse_a, &verse_b, mode).await)
    }

    pub async fn compare_verses(
        &self,
        verse_a: &Verse,
        verse_b: &Verse,
        mode: AnalysisMode,
    ) -> ComparisonResult {
        let options = CacheOptions::new(mode);
        let (score_a, score_b) = tokio::join!(
            self.cache.get_or_compute(verse_a, options),
            self.cache.get_or_compute(verse_b, options)
        );

        let result = compare_scores(&score_a, &score_b);
        debug!(
            winner = ?result.winner,
            margin = result.margin,
            a = score_a.overall,
            b = score_b.overall,
            "Comparison complete"
        );
        result
    }
}
