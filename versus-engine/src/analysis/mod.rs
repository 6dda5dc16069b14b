//! Verse analyzers
//!
//! Pure, synchronous scoring components. None of them hold mutable state, so
//! a single instance can be shared freely across threads.
//!
//! Data flow: `phonetics` feeds the rhyme, flow and creativity analyzers;
//! `composite_scorer` combines their results into one `CompositeScore`.

pub mod composite_scorer;
pub mod creativity_scorer;
pub mod flow_scorer;
pub mod phonetics;
pub mod rhyme_analyzer;

pub use composite_scorer::{CompositeScorer, VerseScorer};
pub use creativity_scorer::CreativityScorer;
pub use flow_scorer::FlowScorer;
pub use rhyme_analyzer::RhymeAnalyzer;

/// Append `value` unless already present, keeping first-seen order
pub(crate) fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}

/// Round a 0-100 float score to an integer score, clamped
pub(crate) fn to_score(value: f64) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}
