//! Creativity Scorer
//!
//! Keyword and pattern heuristics for wordplay and figurative language,
//! plus an originality measure based on word-bigram overlap.
//!
//! # Detection
//! - **Wordplay**: homophone pairs used in the same verse ("write" and
//!   "right"), explicit ambiguity cues ("no pun intended", "get it?") and
//!   double-entendre battle vocabulary ("bread", "bars", "chains").
//! - **Metaphors**: explicit similes ("like a ...", "as the ...",
//!   "as cold as ...") and implied metaphors built from a subject, a copula
//!   and an article ("I'm a ...", "you're the ...").
//! - **Originality**: `100 * (1 - clamp(cliche + 0.5 * repetition + prior, 0, 1))`
//!   where each term is a fraction of the verse's within-line word bigrams:
//!   found in the built-in cliché corpus, duplicated inside the verse, or
//!   found in the caller's prior verses. No bigrams gives a neutral 50.
//!
//! # Score
//! `round(100 * (0.35 * wordplay + 0.35 * metaphor) + 0.30 * originality)`
//! where wordplay and metaphor counts are normalized per line and saturate
//! at one hit every two lines.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::phonetics::Word;
use super::{push_unique, to_score};
use crate::types::{CreativityAnalysis, Verse};

pub const WORDPLAY_WEIGHT: f64 = 0.35;
pub const METAPHOR_WEIGHT: f64 = 0.35;
pub const ORIGINALITY_WEIGHT: f64 = 0.30;

/// Hits per line at which wordplay and metaphor terms saturate
pub const SATURATION_PER_LINE: f64 = 0.5;

pub const REPETITION_PENALTY_WEIGHT: f64 = 0.5;

/// Originality when the verse has no bigrams to judge
pub const NEUTRAL_ORIGINALITY: f64 = 50.0;

const HOMOPHONE_PAIRS: &[(&str, &str)] = &[
    ("write", "right"),
    ("rain", "reign"),
    ("piece", "peace"),
    ("whole", "hole"),
    ("knight", "night"),
    ("sole", "soul"),
    ("pain", "pane"),
    ("brake", "break"),
    ("board", "bored"),
    ("scene", "seen"),
    ("sun", "son"),
    ("weight", "wait"),
    ("mourning", "morning"),
    ("flour", "flower"),
    ("heal", "heel"),
    ("real", "reel"),
    ("rap", "wrap"),
    ("beat", "beet"),
    ("dough", "doe"),
    ("cent", "scent"),
    ("mind", "mined"),
    ("threw", "through"),
    ("whether", "weather"),
    ("died", "dyed"),
    ("higher", "hire"),
];

const DOUBLE_ENTENDRES: &[&str] = &[
    "bars", "bread", "dough", "cheddar", "cheese", "paper", "sick", "ill", "chains", "heat",
    "cold", "bank", "wave", "lit", "grind", "smoke", "blades", "bullets", "punchline",
];

const CLICHE_PHRASES: &[&str] = &[
    "spitting fire",
    "on this track",
    "never looking back",
    "mic drop",
    "drop the mic",
    "bring the heat",
    "keep it real",
    "top of the game",
    "rest in peace",
    "straight outta",
    "hold it down",
    "on the mic",
    "in the game",
    "real recognize real",
    "you can't see me",
    "step to me",
    "back to back",
    "all day every day",
    "hot fire",
    "game over",
    "lights out",
    "to the top",
    "started from the bottom",
    "on my grind",
    "money on my mind",
    "break it down",
    "the one and only",
    "we run this",
    "you ain't ready",
    "take the crown",
    "king of the hill",
    "number one",
    "kill the beat",
    "sick flow",
    "ice cold",
    "burn it down",
    "light it up",
    "heavy is the head",
];

static AMBIGUITY_CUE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:no pun intended|pun intended|double meaning|play on words|literally|figuratively)\b|\bget it\?",
    )
    .expect("valid ambiguity cue regex")
});

static SIMILE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:like|as)\s+(?:a|an|the|my|your|his|her|their|some)\s+[a-z']+")
        .expect("valid simile regex")
});

static AS_AS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bas\s+[a-z']+\s+as\s+(?:(?:a|an|the)\s+)?[a-z']+").expect("valid as-as regex")
});

static IMPLIED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:i'm|i am|you're|you are|he's|he is|she's|she is|we're|we are|they're|they are|it's|this is)\s+(?:a|an|the)\s+[a-z']+",
    )
    .expect("valid implied metaphor regex")
});

static CLICHE_BIGRAMS: Lazy<HashSet<(String, String)>> = Lazy::new(|| {
    CLICHE_PHRASES
        .iter()
        .flat_map(|phrase| {
            let words: Vec<Word> = phrase.split_whitespace().filter_map(Word::from_token).collect();
            line_bigrams(&words)
        })
        .collect()
});

/// Creativity Scorer
pub struct CreativityScorer;

impl CreativityScorer {
    pub fn new() -> Self {
        Self
    }

    /// Score a verse against the built-in cliché corpus only
    pub fn analyze(&self, verse: &Verse) -> CreativityAnalysis {
        self.analyze_against(verse, &[])
    }

    /// Score a verse, also penalizing phrasing reused from `prior_verses`
    pub fn analyze_against(&self, verse: &Verse, prior_verses: &[&str]) -> CreativityAnalysis {
        if verse.is_empty() {
            return CreativityAnalysis {
                score: 0,
                wordplay: Vec::new(),
                metaphors: Vec::new(),
                originality: NEUTRAL_ORIGINALITY,
            };
        }

        let wordplay = detect_wordplay(verse);
        let metaphors = detect_metaphors(verse);
        let originality = originality(verse, prior_verses);

        let lines = verse.line_count() as f64;
        let saturate = |count: usize| (count as f64 / (SATURATION_PER_LINE * lines)).min(1.0);
        let score = to_score(
            100.0
                * (WORDPLAY_WEIGHT * saturate(wordplay.len())
                    + METAPHOR_WEIGHT * saturate(metaphors.len()))
                + ORIGINALITY_WEIGHT * originality,
        );

        debug!(
            score,
            wordplay = wordplay.len(),
            metaphors = metaphors.len(),
            originality,
            "Creativity analysis complete"
        );

        CreativityAnalysis {
            score,
            wordplay,
            metaphors,
            originality,
        }
    }
}

impl Default for CreativityScorer {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_apostrophes(line: &str) -> String {
    line.replace(['\u{2019}', '\u{2018}'], "'")
}

fn collapse(matched: &str) -> String {
    matched
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn detect_wordplay(verse: &Verse) -> Vec<String> {
    let mut found = Vec::new();
    let vocabulary: HashSet<&str> = verse.words().map(Word::normalized).collect();

    for (a, b) in HOMOPHONE_PAIRS {
        if vocabulary.contains(a) && vocabulary.contains(b) {
            push_unique(&mut found, &format!("{}/{}", a, b));
        }
    }

    for line in verse.text().lines() {
        let line = normalize_apostrophes(line);
        for m in AMBIGUITY_CUE_RE.find_iter(&line) {
            push_unique(&mut found, &collapse(m.as_str()));
        }
    }

    for word in verse.words() {
        if DOUBLE_ENTENDRES.contains(&word.normalized()) {
            push_unique(&mut found, word.normalized());
        }
    }
    found
}

fn detect_metaphors(verse: &Verse) -> Vec<String> {
    let mut found = Vec::new();
    for line in verse.text().lines() {
        let line = normalize_apostrophes(line);
        // "as cold as the arctic" must not also yield "as the arctic"
        let mut claimed: Vec<(usize, usize)> = Vec::new();
        for re in [&*AS_AS_RE, &*SIMILE_RE, &*IMPLIED_RE] {
            for m in re.find_iter(&line) {
                if claimed.iter().any(|&(s, e)| m.start() < e && s < m.end()) {
                    continue;
                }
                claimed.push((m.start(), m.end()));
                push_unique(&mut found, &collapse(m.as_str()));
            }
        }
    }
    found
}

fn line_bigrams(words: &[Word]) -> Vec<(String, String)> {
    words
        .windows(2)
        .map(|pair| (pair[0].normalized().to_string(), pair[1].normalized().to_string()))
        .collect()
}

fn verse_bigrams(verse: &Verse) -> Vec<(String, String)> {
    verse.lines().iter().flat_map(|line| line_bigrams(line)).collect()
}

/// Originality of a verse, 0-100
pub fn originality(verse: &Verse, prior_verses: &[&str]) -> f64 {
    let bigrams = verse_bigrams(verse);
    if bigrams.is_empty() {
        return NEUTRAL_ORIGINALITY;
    }
    let total = bigrams.len() as f64;

    let cliche = bigrams.iter().filter(|b| CLICHE_BIGRAMS.contains(*b)).count() as f64 / total;

    let distinct: HashSet<&(String, String)> = bigrams.iter().collect();
    let repetition = (bigrams.len() - distinct.len()) as f64 / total;

    let prior = if prior_verses.is_empty() {
        0.0
    } else {
        let prior_set: HashSet<(String, String)> = prior_verses
            .iter()
            .flat_map(|text| {
                super::phonetics::tokenize(text)
                    .iter()
                    .flat_map(|line| line_bigrams(line))
                    .collect::<Vec<_>>()
            })
            .collect();
        bigrams.iter().filter(|b| prior_set.contains(*b)).count() as f64 / total
    };

    let penalty = (cliche + REPETITION_PENALTY_WEIGHT * repetition + prior).clamp(0.0, 1.0);
    100.0 * (1.0 - penalty)
}
