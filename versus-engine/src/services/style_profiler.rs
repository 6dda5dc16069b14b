//! Style Profile Extractor
//!
//! Summarizes a competitor's history of scored verses into averaged style
//! metrics, a style label and a short list of battle tactics.
//!
//! # Metrics (means over the history)
//! - `avg_syllables_per_bar`: syllables per line across every line
//! - `rhyme_complexity`: rhyme density / 100
//! - `flow_variation`: 1 - rhythm consistency / 100
//! - `wordplay_frequency`, `metaphor_density`: hits per line, capped at 1
//!
//! # Labels
//! First matching rule in [`STYLE_RULES`] wins; `smooth` otherwise.
//!
//! | Priority | Rule                                               | Label       |
//! |----------|----------------------------------------------------|-------------|
//! | 1        | rhyme > 0.7 and wordplay > 0.6                     | technical   |
//! | 2        | metaphor > 0.7                                     | creative    |
//! | 3        | wordplay > 0.7                                     | aggressive  |
//! | 4        | syllables/bar >= 14 and flow variation <= 0.25     | storyteller |

use tracing::debug;

use crate::types::{HistoricalVerse, StyleLabel, StyleProfile};

pub const TECHNICAL_RHYME_THRESHOLD: f64 = 0.7;
pub const TECHNICAL_WORDPLAY_THRESHOLD: f64 = 0.6;
pub const CREATIVE_METAPHOR_THRESHOLD: f64 = 0.7;
pub const AGGRESSIVE_WORDPLAY_THRESHOLD: f64 = 0.7;
pub const STORYTELLER_MIN_SYLLABLES: f64 = 14.0;
pub const STORYTELLER_MAX_FLOW_VARIATION: f64 = 0.25;

/// Baseline profile numbers for an empty history
pub const DEFAULT_SYLLABLES_PER_BAR: f64 = 10.0;
pub const DEFAULT_RATIO: f64 = 0.5;

/// Aggregated metrics a style rule inspects
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleMetrics {
    pub avg_syllables_per_bar: f64,
    pub rhyme_complexity: f64,
    pub flow_variation: f64,
    pub wordplay_frequency: f64,
    pub metaphor_density: f64,
}

impl StyleMetrics {
    pub fn baseline() -> Self {
        Self {
            avg_syllables_per_bar: DEFAULT_SYLLABLES_PER_BAR,
            rhyme_complexity: DEFAULT_RATIO,
            flow_variation: DEFAULT_RATIO,
            wordplay_frequency: DEFAULT_RATIO,
            metaphor_density: DEFAULT_RATIO,
        }
    }

    fn from_history(history: &[HistoricalVerse]) -> Self {
        let n = history.len() as f64;

        let (syllables, lines) = history
            .iter()
            .flat_map(|h| h.score.flow.syllable_pattern.iter())
            .fold((0u64, 0u64), |(s, l), &c| (s + c as u64, l + 1));
        let avg_syllables_per_bar = if lines == 0 {
            0.0
        } else {
            syllables as f64 / lines as f64
        };

        let mean = |f: fn(&HistoricalVerse) -> f64| history.iter().map(f).sum::<f64>() / n;

        Self {
            avg_syllables_per_bar,
            rhyme_complexity: mean(|h| h.score.rhyme.density_score as f64 / 100.0),
            flow_variation: mean(|h| (1.0 - h.score.flow.rhythm_consistency / 100.0).clamp(0.0, 1.0)),
            wordplay_frequency: mean(|h| per_line(h.score.creativity.wordplay.len(), h)),
            metaphor_density: mean(|h| per_line(h.score.creativity.metaphors.len(), h)),
        }
    }
}

fn per_line(count: usize, verse: &HistoricalVerse) -> f64 {
    let lines = verse.score.flow.syllable_pattern.len().max(1);
    (count as f64 / lines as f64).min(1.0)
}

/// One row of the ordered classification table
pub struct StyleRule {
    pub label: StyleLabel,
    pub matches: fn(&StyleMetrics) -> bool,
}

/// Classification rules in priority order
pub const STYLE_RULES: &[StyleRule] = &[
    StyleRule {
        label: StyleLabel::Technical,
        matches: is_technical,
    },
    StyleRule {
        label: StyleLabel::Creative,
        matches: is_creative,
    },
    StyleRule {
        label: StyleLabel::Aggressive,
        matches: is_aggressive,
    },
    StyleRule {
        label: StyleLabel::Storyteller,
        matches: is_storyteller,
    },
];

fn is_technical(m: &StyleMetrics) -> bool {
    m.rhyme_complexity > TECHNICAL_RHYME_THRESHOLD && m.wordplay_frequency > TECHNICAL_WORDPLAY_THRESHOLD
}

fn is_creative(m: &StyleMetrics) -> bool {
    m.metaphor_density > CREATIVE_METAPHOR_THRESHOLD
}

fn is_aggressive(m: &StyleMetrics) -> bool {
    m.wordplay_frequency > AGGRESSIVE_WORDPLAY_THRESHOLD
}

fn is_storyteller(m: &StyleMetrics) -> bool {
    m.avg_syllables_per_bar >= STORYTELLER_MIN_SYLLABLES
        && m.flow_variation <= STORYTELLER_MAX_FLOW_VARIATION
}

pub fn classify(metrics: &StyleMetrics) -> StyleLabel {
    STYLE_RULES
        .iter()
        .find(|rule| (rule.matches)(metrics))
        .map_or(StyleLabel::Smooth, |rule| rule.label)
}

/// Battle tactics implied by the metrics, strongest traits first
pub fn battle_tactics(metrics: &StyleMetrics) -> Vec<String> {
    let mut tactics = Vec::new();

    if metrics.rhyme_complexity > 0.5 {
        tactics.push("Stack multi-syllabic rhyme chains to build pressure");
    }
    if metrics.wordplay_frequency > 0.5 {
        tactics.push("Lead with punchlines and double meanings");
    }
    if metrics.metaphor_density > 0.5 {
        tactics.push("Extend metaphors across several bars");
    }
    if metrics.flow_variation < 0.15 {
        tactics.push("Hold a steady cadence locked to the beat");
    } else if metrics.flow_variation > 0.35 {
        tactics.push("Switch cadences to keep opponents off balance");
    }
    if metrics.avg_syllables_per_bar >= STORYTELLER_MIN_SYLLABLES {
        tactics.push("Pack dense bars that carry a narrative");
    } else if metrics.avg_syllables_per_bar < 8.0 {
        tactics.push("Keep bars short and punchy");
    }
    if tactics.is_empty() {
        tactics.push("Play the fundamentals: clean end rhymes and even bars");
    }

    tactics.into_iter().map(String::from).collect()
}

/// Style Profile Extractor
pub struct StyleProfiler;

impl StyleProfiler {
    pub fn new() -> Self {
        Self
    }

    /// Build a profile from scored history; an empty history yields the baseline
    pub fn extract_profile(&self, name: &str, history: &[HistoricalVerse]) -> StyleProfile {
        let metrics = if history.is_empty() {
            StyleMetrics::baseline()
        } else {
            StyleMetrics::from_history(history)
        };
        let style_label = classify(&metrics);

        debug!(
            profile = name,
            verses = history.len(),
            label = style_label.as_str(),
            rhyme = metrics.rhyme_complexity,
            wordplay = metrics.wordplay_frequency,
            metaphor = metrics.metaphor_density,
            "Style profile extracted"
        );

        StyleProfile {
            name: name.to_string(),
            style_label,
            avg_syllables_per_bar: metrics.avg_syllables_per_bar,
            rhyme_complexity: metrics.rhyme_complexity,
            flow_variation: metrics.flow_variation,
            wordplay_frequency: metrics.wordplay_frequency,
            metaphor_density: metrics.metaphor_density,
            battle_tactics: battle_tactics(&metrics),
        }
    }
}

impl Default for StyleProfiler {
    fn default() -> Self {
        Self::new()
    }
}
