//! Flow / Prosody Aligner
//!
//! Lays the syllables of a verse onto a bar grid so a speech synthesizer can
//! follow the beat. Each non-empty line gets one bar; its syllables share
//! the bar evenly.
//!
//! # Timing
//! - `ms_per_bar = 60000 / bpm * beats_per_bar`
//! - `time_per_syllable = ms_per_bar / syllables_in_line`
//! - A micro-pause of 10% of a syllable follows every word but the last in
//!   a line
//! - A breath pause of 15% of a bar separates consecutive lines
//! - With downbeats, line `n` starts at `max(cursor, downbeats[n])`
//!
//! # Stress
//! Base 0.8 for rhyme-bearing words, 0.5 otherwise. The first syllable of a
//! word and the penultimate syllable of words longer than two syllables get
//! ×1.2; every other syllable ×0.8. Values are clamped to [0, 1].
//!
//! Output is a pure function of `(verse, context)`.

use tracing::debug;
use versus_common::Result;

use crate::analysis::phonetics::Word;
use crate::analysis::{push_unique, RhymeAnalyzer};
use crate::types::{BeatContext, FlowModel, SyllableTiming, Verse};

/// Micro-pause after a word, as a fraction of the line's syllable duration
pub const MICRO_PAUSE_RATIO: f64 = 0.10;
/// Breath pause between lines, as a fraction of a bar
pub const BREATH_PAUSE_RATIO: f64 = 0.15;

pub const RHYME_BASE_STRESS: f64 = 0.8;
pub const DEFAULT_BASE_STRESS: f64 = 0.5;
pub const STRESSED_MULTIPLIER: f64 = 1.2;
pub const UNSTRESSED_MULTIPLIER: f64 = 0.8;

/// Flow / Prosody Aligner
pub struct BeatMapper {
    rhyme: RhymeAnalyzer,
}

impl BeatMapper {
    pub fn new() -> Self {
        Self {
            rhyme: RhymeAnalyzer::new(),
        }
    }

    /// Build the timing and stress model for a verse
    ///
    /// # Errors
    /// `Error::Config` when the beat context cannot be timed (non-positive
    /// or non-finite bpm, zero beats per bar, negative downbeats).
    pub fn align_to_beat(&self, verse: &Verse, context: &BeatContext) -> Result<FlowModel> {
        context.validate()?;

        if verse.is_empty() {
            return Ok(FlowModel::empty());
        }

        let rhymes = self.rhyme.analyze(verse);
        let ms_per_bar = context.ms_per_bar();
        let breath = BREATH_PAUSE_RATIO * ms_per_bar;
        let last_line = verse.line_count() - 1;

        let mut model = FlowModel::empty();
        let mut cursor = 0.0_f64;

        for (line_idx, line) in verse.lines().iter().enumerate() {
            if let Some(downbeat) = context
                .downbeats
                .as_ref()
                .and_then(|d| d.get(line_idx))
            {
                cursor = cursor.max(*downbeat);
            }

            let syllables: usize = line.iter().map(Word::syllable_count).sum();
            let time_per_syllable = ms_per_bar / syllables as f64;
            let last_word = line.len() - 1;

            for (word_idx, word) in line.iter().enumerate() {
                let bearing = rhymes.is_rhyme_bearing(word.normalized());
                if bearing || word.syllable_count() > 1 {
                    push_unique(&mut model.emphasis_words, word.normalized());
                }

                for (syl_idx, piece) in word.syllables().iter().enumerate() {
                    model.timing.push(SyllableTiming {
                        syllable_text: piece.clone(),
                        start_time_ms: cursor,
                        duration_ms: time_per_syllable,
                    });
                    model
                        .syllable_stress
                        .push(syllable_stress(bearing, syl_idx, word.syllable_count()));
                    cursor += time_per_syllable;
                }

                if word_idx != last_word {
                    cursor += MICRO_PAUSE_RATIO * time_per_syllable;
                }
            }

            if line_idx != last_line {
                model.pause_points.push(model.timing.len() - 1);
                cursor += breath;
            }
        }

        debug!(
            syllables = model.timing.len(),
            lines = verse.line_count(),
            ms_per_bar,
            total_ms = model.total_duration_ms(),
            "Beat alignment complete"
        );

        Ok(model)
    }
}

impl Default for BeatMapper {
    fn default() -> Self {
        Self::new()
    }
}

fn syllable_stress(rhyme_bearing: bool, index: usize, syllables: usize) -> f64 {
    let base = if rhyme_bearing {
        RHYME_BASE_STRESS
    } else {
        DEFAULT_BASE_STRESS
    };
    let stressed = index == 0 || (syllables > 2 && index == syllables - 2);
    let multiplier = if stressed {
        STRESSED_MULTIPLIER
    } else {
        UNSTRESSED_MULTIPLIER
    };
    (base * multiplier).clamp(0.0, 1.0)
}
