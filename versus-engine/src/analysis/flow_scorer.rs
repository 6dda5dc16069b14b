//! Flow Quality Scorer
//!
//! Measures how evenly a verse sits on the beat, using the per-line syllable
//! counts from the shared phonetic heuristic.
//!
//! # Scoring Algorithm
//! - **Rhythm consistency** (weight: 0.7):
//!   `100 * (1 - clamp(variance / mean², 0, 1))` over the syllable pattern
//!   (population variance, i.e. the squared coefficient of variation).
//!   Fewer than two lines have no meaningful variance and get a neutral 50.
//! - **Length fit** (weight: 0.3): mean per-line fit × 100, where a line of
//!   3..=24 syllables fits fully, shorter lines fit `c / 3` and longer lines
//!   `max(0, 1 - (c - 24) / 24)`.
//!
//! An empty verse scores 0.

use tracing::debug;

use super::to_score;
use crate::types::{FlowAnalysis, Verse};

pub const CONSISTENCY_WEIGHT: f64 = 0.7;
pub const LENGTH_FIT_WEIGHT: f64 = 0.3;

/// Consistency reported when variance is undefined (0 or 1 line)
pub const NEUTRAL_CONSISTENCY: f64 = 50.0;

pub const MIN_COMFORTABLE_SYLLABLES: u32 = 3;
pub const MAX_COMFORTABLE_SYLLABLES: u32 = 24;

/// Flow Quality Scorer
pub struct FlowScorer;

impl FlowScorer {
    pub fn new() -> Self {
        Self
    }

    /// Score the flow of a verse
    pub fn analyze(&self, verse: &Verse) -> FlowAnalysis {
        let syllable_pattern = verse.syllable_pattern();

        if syllable_pattern.is_empty() {
            return FlowAnalysis {
                score: 0,
                syllable_pattern,
                rhythm_consistency: NEUTRAL_CONSISTENCY,
            };
        }

        let rhythm_consistency = rhythm_consistency(&syllable_pattern);
        let length_fit = length_fit(&syllable_pattern);
        let score = to_score(
            CONSISTENCY_WEIGHT * rhythm_consistency + LENGTH_FIT_WEIGHT * length_fit,
        );

        debug!(
            score,
            consistency = rhythm_consistency,
            length_fit,
            lines = syllable_pattern.len(),
            "Flow analysis complete"
        );

        FlowAnalysis {
            score,
            syllable_pattern,
            rhythm_consistency,
        }
    }
}

impl Default for FlowScorer {
    fn default() -> Self {
        Self::new()
    }
}

/// Evenness of line lengths, 0-100
pub fn rhythm_consistency(pattern: &[u32]) -> f64 {
    if pattern.len() < 2 {
        return NEUTRAL_CONSISTENCY;
    }
    let n = pattern.len() as f64;
    let mean = pattern.iter().map(|&c| c as f64).sum::<f64>() / n;
    if mean <= 0.0 {
        return NEUTRAL_CONSISTENCY;
    }
    let variance = pattern
        .iter()
        .map(|&c| (c as f64 - mean).powi(2))
        .sum::<f64>()
        / n;
    let normalized = (variance / (mean * mean)).clamp(0.0, 1.0);
    100.0 * (1.0 - normalized)
}

/// How comfortably one line fits a bar, 0.0-1.0
pub fn line_fit(syllables: u32) -> f64 {
    if syllables < MIN_COMFORTABLE_SYLLABLES {
        syllables as f64 / MIN_COMFORTABLE_SYLLABLES as f64
    } else if syllables > MAX_COMFORTABLE_SYLLABLES {
        let over = (syllables - MAX_COMFORTABLE_SYLLABLES) as f64;
        (1.0 - over / MAX_COMFORTABLE_SYLLABLES as f64).max(0.0)
    } else {
        1.0
    }
}

fn length_fit(pattern: &[u32]) -> f64 {
    if pattern.is_empty() {
        return 0.0;
    }
    100.0 * pattern.iter().map(|&c| line_fit(c)).sum::<f64>() / pattern.len() as f64
}
