//! Rhyme Analyzer
//!
//! Detects end, internal and multi-syllabic rhymes and folds them into a
//! single density score.
//!
//! # Rhyme kinds
//! - **End rhyme**: final words of two different lines rhyme. Each rhyming
//!   line pair is one occurrence, so a single line can never end-rhyme.
//! - **Internal rhyme**: two words within one line rhyme. A pair that uses
//!   the line's final word is skipped when that word already end-rhymes.
//! - **Multi-syllabic rhyme**: two words on different lines share a chain of
//!   at least two matching syllables counted from the end (final syllable by
//!   rhyme key, earlier syllables by vowel nucleus).
//!
//! # Density
//! `density = clamp(round(100 * weighted / total_words), 0, 100)` with
//! weights end = 3.0, multi-syllabic = 2.0, internal = 1.0.

use std::collections::BTreeSet;

use tracing::debug;

use super::phonetics::{rhymes, Word};
use super::{push_unique, to_score};
use crate::types::{RhymeAnalysis, Verse};

pub const END_RHYME_WEIGHT: f64 = 3.0;
pub const MULTI_SYLLABIC_WEIGHT: f64 = 2.0;
pub const INTERNAL_RHYME_WEIGHT: f64 = 1.0;

/// Shortest syllable chain that counts as a multi-syllabic rhyme
pub const MIN_MULTI_SYLLABIC_CHAIN: usize = 2;

/// Function words too common to count as internal rhymes
const INTERNAL_STOPWORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "to", "of", "in", "on", "at", "it", "is", "im", "i", "be",
    "me", "we", "he", "so", "do", "no",
];

/// Raw occurrence counts behind a density score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RhymeCounts {
    pub end: usize,
    pub internal: usize,
    pub multi_syllabic: usize,
}

impl RhymeCounts {
    pub fn weighted(&self) -> f64 {
        self.end as f64 * END_RHYME_WEIGHT
            + self.multi_syllabic as f64 * MULTI_SYLLABIC_WEIGHT
            + self.internal as f64 * INTERNAL_RHYME_WEIGHT
    }
}

/// Rhyme Analyzer
pub struct RhymeAnalyzer;

impl RhymeAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Analyze rhymes in a verse
    pub fn analyze(&self, verse: &Verse) -> RhymeAnalysis {
        self.analyze_with_counts(verse).0
    }

    /// Analyze rhymes and also return the raw occurrence counts
    pub fn analyze_with_counts(&self, verse: &Verse) -> (RhymeAnalysis, RhymeCounts) {
        if verse.is_empty() {
            return (RhymeAnalysis::empty(), RhymeCounts::default());
        }

        let mut analysis = RhymeAnalysis::empty();
        let mut counts = RhymeCounts::default();

        let end_rhymed = self.detect_end_rhymes(verse, &mut analysis, &mut counts);
        self.detect_internal_rhymes(verse, &end_rhymed, &mut analysis, &mut counts);
        self.detect_multi_syllabic(verse, &mut analysis, &mut counts);

        let total_words = verse.word_count();
        analysis.density_score = if total_words == 0 {
            0
        } else {
            to_score(100.0 * counts.weighted() / total_words as f64)
        };

        debug!(
            density = analysis.density_score,
            end = counts.end,
            internal = counts.internal,
            multi_syllabic = counts.multi_syllabic,
            words = total_words,
            "Rhyme analysis complete"
        );

        (analysis, counts)
    }

    /// Returns, per line, whether its final word takes part in an end rhyme
    fn detect_end_rhymes(
        &self,
        verse: &Verse,
        analysis: &mut RhymeAnalysis,
        counts: &mut RhymeCounts,
    ) -> Vec<bool> {
        let finals: Vec<&Word> = verse.lines().iter().filter_map(|line| line.last()).collect();
        let mut end_rhymed = vec![false; finals.len()];

        for i in 0..finals.len() {
            for j in (i + 1)..finals.len() {
                if rhymes(finals[i], finals[j]) {
                    counts.end += 1;
                    end_rhymed[i] = true;
                    end_rhymed[j] = true;
                    push_unique(&mut analysis.end_rhymes, finals[i].normalized());
                    push_unique(&mut analysis.end_rhymes, finals[j].normalized());
                }
            }
        }
        end_rhymed
    }

    fn detect_internal_rhymes(
        &self,
        verse: &Verse,
        end_rhymed: &[bool],
        analysis: &mut RhymeAnalysis,
        counts: &mut RhymeCounts,
    ) {
        for (line_idx, line) in verse.lines().iter().enumerate() {
            let last = line.len() - 1;
            for i in 0..line.len() {
                if !counts_for_internal(&line[i]) {
                    continue;
                }
                for j in (i + 1)..line.len() {
                    if j == last && end_rhymed[line_idx] {
                        continue;
                    }
                    if !counts_for_internal(&line[j]) {
                        continue;
                    }
                    if rhymes(&line[i], &line[j]) {
                        counts.internal += 1;
                        push_unique(&mut analysis.internal_rhymes, line[i].normalized());
                        push_unique(&mut analysis.internal_rhymes, line[j].normalized());
                    }
                }
            }
        }
    }

    fn detect_multi_syllabic(
        &self,
        verse: &Verse,
        analysis: &mut RhymeAnalysis,
        counts: &mut RhymeCounts,
    ) {
        let candidates: Vec<(usize, &Word)> = verse
            .lines()
            .iter()
            .enumerate()
            .flat_map(|(idx, line)| line.iter().map(move |w| (idx, w)))
            .filter(|(_, w)| w.syllable_count() >= MIN_MULTI_SYLLABIC_CHAIN)
            .collect();

        // Each distinct word pair counts once, however often it repeats
        let mut seen: BTreeSet<(String, String)> = BTreeSet::new();

        for i in 0..candidates.len() {
            for j in (i + 1)..candidates.len() {
                let (line_a, a) = candidates[i];
                let (line_b, b) = candidates[j];
                if line_a == line_b {
                    continue;
                }
                if matching_chain(a, b) < MIN_MULTI_SYLLABIC_CHAIN {
                    continue;
                }
                let pair = if a.normalized() <= b.normalized() {
                    (a.normalized().to_string(), b.normalized().to_string())
                } else {
                    (b.normalized().to_string(), a.normalized().to_string())
                };
                if seen.insert(pair) {
                    counts.multi_syllabic += 1;
                    push_unique(&mut analysis.multi_syllabic_rhymes, a.normalized());
                    push_unique(&mut analysis.multi_syllabic_rhymes, b.normalized());
                }
            }
        }
    }
}

impl Default for RhymeAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn counts_for_internal(word: &Word) -> bool {
    word.normalized().chars().count() >= 2 && !INTERNAL_STOPWORDS.contains(&word.normalized())
}

/// Number of matching syllables counted back from the end of both words
fn matching_chain(a: &Word, b: &Word) -> usize {
    if !rhymes(a, b) {
        return 0;
    }
    let (na, nb) = (a.nuclei(), b.nuclei());
    let mut chain = 1;
    let depth = na.len().min(nb.len());
    for k in 2..=depth {
        if na[na.len() - k] == nb[nb.len() - k] {
            chain += 1;
        } else {
            break;
        }
    }
    chain
}
