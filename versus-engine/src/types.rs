//! Shared value types for verse analysis
//!
//! Every analyzer consumes a [`Verse`] and produces one of the result types
//! below. All results are plain values: callers always receive owned copies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use versus_common::{Error, Result};

use crate::analysis::phonetics::{self, Word};

// ============================================================================
// Verse
// ============================================================================

/// Validated verse text, tokenized into non-empty lines of words
///
/// A verse has no identity beyond its content.
#[derive(Debug, Clone, PartialEq)]
pub struct Verse {
    text: String,
    lines: Vec<Vec<Word>>,
}

impl Verse {
    /// Validate and tokenize verse text
    ///
    /// Empty or whitespace-only text is valid (it scores at baseline).
    /// Text carrying NUL or other non-whitespace control characters is not
    /// text and is rejected with `Error::InvalidInput`.
    pub fn new(text: &str) -> Result<Self> {
        if let Some(bad) = text
            .chars()
            .find(|c| c.is_control() && !matches!(c, '\n' | '\r' | '\t'))
        {
            return Err(Error::InvalidInput(format!(
                "verse contains control character U+{:04X}",
                bad as u32
            )));
        }

        let lines = phonetics::tokenize(text);
        Ok(Self {
            text: text.to_string(),
            lines,
        })
    }

    /// Validate raw bytes as UTF-8 verse text
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| Error::InvalidInput(format!("verse is not UTF-8 text: {}", e)))?;
        Self::new(text)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Non-empty lines in order
    pub fn lines(&self) -> &[Vec<Word>] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn word_count(&self) -> usize {
        self.lines.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Per-line syllable counts (shared by the flow scorer and beat mapper)
    pub fn syllable_pattern(&self) -> Vec<u32> {
        self.lines
            .iter()
            .map(|line| line.iter().map(|w| w.syllable_count() as u32).sum())
            .collect()
    }

    /// All words in reading order
    pub fn words(&self) -> impl Iterator<Item = &Word> {
        self.lines.iter().flatten()
    }
}

// ============================================================================
// Analysis results
// ============================================================================

/// Scoring mode
///
/// `Live` scores partial verses during a round; `Final` additionally flags
/// verses below the minimum word count as low-confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    Live,
    Final,
}

impl AnalysisMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMode::Live => "live",
            AnalysisMode::Final => "final",
        }
    }
}

impl Default for AnalysisMode {
    fn default() -> Self {
        AnalysisMode::Live
    }
}

impl std::str::FromStr for AnalysisMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "live" => Ok(AnalysisMode::Live),
            "final" => Ok(AnalysisMode::Final),
            other => Err(Error::InvalidInput(format!("unknown analysis mode '{}'", other))),
        }
    }
}

/// Rhyme analysis result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RhymeAnalysis {
    /// Weighted rhyme occurrences per word, 0-100
    pub density_score: u8,
    pub end_rhymes: Vec<String>,
    pub internal_rhymes: Vec<String>,
    pub multi_syllabic_rhymes: Vec<String>,
}

impl RhymeAnalysis {
    pub fn empty() -> Self {
        Self {
            density_score: 0,
            end_rhymes: Vec::new(),
            internal_rhymes: Vec::new(),
            multi_syllabic_rhymes: Vec::new(),
        }
    }

    /// True if the word (normalized form) takes part in any rhyme
    pub fn is_rhyme_bearing(&self, normalized: &str) -> bool {
        self.end_rhymes.iter().any(|w| w == normalized)
            || self.internal_rhymes.iter().any(|w| w == normalized)
            || self.multi_syllabic_rhymes.iter().any(|w| w == normalized)
    }
}

/// Flow analysis result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowAnalysis {
    pub score: u8,
    /// Syllable count per non-empty line
    pub syllable_pattern: Vec<u32>,
    /// 0-100, 100 = perfectly even line lengths
    pub rhythm_consistency: f64,
}

/// Creativity analysis result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreativityAnalysis {
    pub score: u8,
    pub wordplay: Vec<String>,
    pub metaphors: Vec<String>,
    /// 0-100, 100 = no cliché or repeated phrasing
    pub originality: f64,
}

/// Weighted composite of the three analyzers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeScore {
    pub overall: u8,
    pub rhyme: RhymeAnalysis,
    pub flow: FlowAnalysis,
    pub creativity: CreativityAnalysis,
    pub mode: AnalysisMode,
    /// Set in `Final` mode when the verse is too short to judge fairly
    pub low_confidence: bool,
    /// Qualitative notes from the augmentation service, if any arrived in time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commentary: Option<String>,
    pub computed_at: DateTime<Utc>,
}

impl CompositeScore {
    /// Compare everything except `computed_at` and `commentary`
    pub fn same_scores(&self, other: &CompositeScore) -> bool {
        self.overall == other.overall
            && self.rhyme == other.rhyme
            && self.flow == other.flow
            && self.creativity == other.creativity
            && self.mode == other.mode
            && self.low_confidence == other.low_confidence
    }

    /// Re-check range and weighting invariants
    ///
    /// Used by the cache to detect corrupt entries.
    pub fn is_consistent(&self) -> bool {
        let in_range = |v: f64| v.is_finite() && (0.0..=100.0).contains(&v);
        self.overall <= 100
            && self.rhyme.density_score <= 100
            && self.flow.score <= 100
            && self.creativity.score <= 100
            && in_range(self.flow.rhythm_consistency)
            && in_range(self.creativity.originality)
            && self.overall
                == crate::analysis::composite_scorer::weighted_overall(
                    self.rhyme.density_score,
                    self.flow.score,
                    self.creativity.score,
                )
    }
}

// ============================================================================
// Comparison
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    A,
    B,
    #[serde(rename = "tie")]
    Tie,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub winner: Winner,
    pub margin: u8,
    pub reasoning: Vec<String>,
}

// ============================================================================
// Beat alignment
// ============================================================================

/// Tempo description supplied by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeatContext {
    pub bpm: f64,
    #[serde(default = "default_beats_per_bar")]
    pub beats_per_bar: u32,
    /// Optional bar start offsets in milliseconds, one per line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downbeats: Option<Vec<f64>>,
}

fn default_beats_per_bar() -> u32 {
    4
}

impl BeatContext {
    /// Common time (4/4) at the given tempo
    pub fn new(bpm: f64) -> Self {
        Self {
            bpm,
            beats_per_bar: default_beats_per_bar(),
            downbeats: None,
        }
    }

    /// Build from a time signature such as "3/4"; only the numerator matters
    pub fn from_time_signature(bpm: f64, signature: &str) -> Result<Self> {
        let (numerator, denominator) = signature.split_once('/').ok_or_else(|| {
            Error::Config(format!("time signature '{}' is not of the form N/M", signature))
        })?;
        let beats: u32 = numerator.trim().parse().map_err(|_| {
            Error::Config(format!("invalid time signature numerator '{}'", numerator))
        })?;
        let unit: u32 = denominator.trim().parse().map_err(|_| {
            Error::Config(format!("invalid time signature denominator '{}'", denominator))
        })?;
        if beats == 0 || unit == 0 {
            return Err(Error::Config(format!(
                "time signature '{}' must have non-zero parts",
                signature
            )));
        }
        Ok(Self {
            bpm,
            beats_per_bar: beats,
            downbeats: None,
        })
    }

    pub fn with_downbeats(mut self, downbeats: Vec<f64>) -> Self {
        self.downbeats = Some(downbeats);
        self
    }

    /// Reject tempos and bar lengths that cannot be timed
    pub fn validate(&self) -> Result<()> {
        if !self.bpm.is_finite() || self.bpm <= 0.0 {
            return Err(Error::Config(format!("bpm must be positive, got {}", self.bpm)));
        }
        if self.beats_per_bar == 0 {
            return Err(Error::Config("beats per bar must be at least 1".to_string()));
        }
        if !self.ms_per_bar().is_finite() {
            return Err(Error::Config(format!("bpm {} is too slow to time", self.bpm)));
        }
        if let Some(downbeats) = &self.downbeats {
            if downbeats.iter().any(|d| !d.is_finite() || *d < 0.0) {
                return Err(Error::Config(
                    "downbeats must be finite, non-negative offsets".to_string(),
                ));
            }
        }
        Ok(())
    }

    pub fn ms_per_bar(&self) -> f64 {
        (60_000.0 / self.bpm) * self.beats_per_bar as f64
    }
}

/// One timed syllable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyllableTiming {
    pub syllable_text: String,
    pub start_time_ms: f64,
    pub duration_ms: f64,
}

/// Timing and stress model for speech synchronization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowModel {
    pub timing: Vec<SyllableTiming>,
    /// Parallel to `timing`, each in [0, 1]
    pub syllable_stress: Vec<f64>,
    /// Index of the last syllable before each breath pause
    pub pause_points: Vec<usize>,
    pub emphasis_words: Vec<String>,
}

impl FlowModel {
    pub fn empty() -> Self {
        Self {
            timing: Vec::new(),
            syllable_stress: Vec::new(),
            pause_points: Vec::new(),
            emphasis_words: Vec::new(),
        }
    }

    /// End of the last syllable
    pub fn total_duration_ms(&self) -> f64 {
        self.timing
            .last()
            .map(|t| t.start_time_ms + t.duration_ms)
            .unwrap_or(0.0)
    }
}

// ============================================================================
// Style profile
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleLabel {
    Technical,
    Smooth,
    Creative,
    Aggressive,
    Storyteller,
}

impl StyleLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StyleLabel::Technical => "technical",
            StyleLabel::Smooth => "smooth",
            StyleLabel::Creative => "creative",
            StyleLabel::Aggressive => "aggressive",
            StyleLabel::Storyteller => "storyteller",
        }
    }
}

/// One historical verse with the score it received
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalVerse {
    pub verse: String,
    pub score: CompositeScore,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleProfile {
    pub name: String,
    pub style_label: StyleLabel,
    pub avg_syllables_per_bar: f64,
    pub rhyme_complexity: f64,
    pub flow_variation: f64,
    pub wordplay_frequency: f64,
    pub metaphor_density: f64,
    pub battle_tactics: Vec<String>,
}
