//! Phonetic approximation: tokenization, syllables and rhyme keys
//!
//! This is a spelling-based heuristic, not dictionary phonetics. It is
//! deterministic and cheap, and it is the single place to swap in a
//! pronunciation dictionary later. Every analyzer gets syllables from here,
//! so the flow scorer and beat mapper always agree on line lengths.
//!
//! # Syllable rules
//! - Vowels are `a e i o u`, plus `y` anywhere except the first letter
//! - Each maximal vowel run is one syllable nucleus
//! - A final lone `e` is silent when another nucleus exists, unless the word
//!   ends in consonant + `le` ("table") or in `ire` ("fire")
//! - A final `ed` is silent when another nucleus exists and the letter
//!   before it is not `t` or `d` ("looked" vs "wanted")
//! - Every word has at least one syllable
//!
//! Only ASCII vowels are recognized; other letters act as consonants.
//!
//! # Rhyme keys
//! A word's rhyme key runs from its last sounding nucleus to the end of the
//! word ("track" -> "ack", "make" -> "ake", "fire" -> "ire"). Two words
//! rhyme when the shared suffix of their keys covers at least
//! [`RHYME_SIMILARITY_THRESHOLD`] of the longer key.

/// Minimum key similarity for two words to count as rhyming
pub const RHYME_SIMILARITY_THRESHOLD: f64 = 0.6;

/// One token of verse text with its precomputed phonetic breakdown
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    display: String,
    normalized: String,
    syllables: Vec<String>,
    nuclei: Vec<String>,
    rhyme_key: String,
}

impl Word {
    /// Build a word from a raw whitespace-delimited token
    ///
    /// Returns `None` when the token carries no letters or digits.
    pub fn from_token(token: &str) -> Option<Self> {
        let letters: Vec<char> = token.chars().filter(|c| c.is_alphanumeric()).collect();
        if letters.is_empty() {
            return None;
        }
        let lower: Vec<char> = letters
            .iter()
            .flat_map(|c| c.to_lowercase())
            .collect();
        // Lowercasing can change length for a handful of non-ASCII letters;
        // fall back to the lowercase form for splitting in that case.
        let source = if lower.len() == letters.len() { &letters } else { &lower };

        let spans = sounding_nuclei(&lower);
        let syllables = split_pieces(source, &spans);
        let nuclei = spans
            .iter()
            .map(|&(start, end)| lower[start..end].iter().collect())
            .collect();
        let rhyme_key = rhyme_key_from(&lower, &spans);

        Some(Self {
            display: token.to_string(),
            normalized: lower.into_iter().collect(),
            syllables,
            nuclei,
            rhyme_key,
        })
    }

    /// Token exactly as written (punctuation included)
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Lowercase letters and digits only
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// Syllable text pieces; length always equals `syllable_count()`
    pub fn syllables(&self) -> &[String] {
        &self.syllables
    }

    pub fn syllable_count(&self) -> usize {
        self.syllables.len()
    }

    /// Vowel nucleus of each sounding syllable (empty for vowel-less words)
    pub fn nuclei(&self) -> &[String] {
        &self.nuclei
    }

    pub fn rhyme_key(&self) -> &str {
        &self.rhyme_key
    }
}

/// Split text into non-empty lines of words
///
/// Lines split on `\n` (a trailing `\r` is dropped), words on whitespace.
/// Lines with no word tokens are skipped.
pub fn tokenize(text: &str) -> Vec<Vec<Word>> {
    text.split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .map(|line| {
            line.split_whitespace()
                .filter_map(Word::from_token)
                .collect::<Vec<_>>()
        })
        .filter(|words| !words.is_empty())
        .collect()
}

/// Syllable count for a single raw token (0 if it has no letters)
pub fn count_syllables(token: &str) -> usize {
    Word::from_token(token).map_or(0, |w| w.syllable_count())
}

/// Rhyme similarity between two words, 0.0-1.0
///
/// Identical words never rhyme with each other.
pub fn rhyme_similarity(a: &Word, b: &Word) -> f64 {
    if a.normalized == b.normalized {
        return 0.0;
    }
    key_similarity(&a.rhyme_key, &b.rhyme_key)
}

/// True if the two words rhyme above the similarity threshold
pub fn rhymes(a: &Word, b: &Word) -> bool {
    rhyme_similarity(a, b) >= RHYME_SIMILARITY_THRESHOLD
}

/// Shared suffix length over the longer key length
pub fn key_similarity(a: &str, b: &str) -> f64 {
    let a_len = a.chars().count();
    let b_len = b.chars().count();
    let longest = a_len.max(b_len);
    if a_len == 0 || b_len == 0 {
        return 0.0;
    }
    let shared = a
        .chars()
        .rev()
        .zip(b.chars().rev())
        .take_while(|(x, y)| x == y)
        .count();
    shared as f64 / longest as f64
}

fn is_vowel(chars: &[char], index: usize) -> bool {
    match chars[index] {
        'a' | 'e' | 'i' | 'o' | 'u' => true,
        'y' => index > 0,
        _ => false,
    }
}

fn vowel_runs(chars: &[char]) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut start: Option<usize> = None;
    for i in 0..chars.len() {
        match (is_vowel(chars, i), start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                runs.push((s, i));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push((s, chars.len()));
    }
    runs
}

fn ends_with(chars: &[char], suffix: &str) -> bool {
    let suffix: Vec<char> = suffix.chars().collect();
    chars.len() >= suffix.len() && chars[chars.len() - suffix.len()..] == suffix[..]
}

/// Vowel runs that are actually pronounced
fn sounding_nuclei(chars: &[char]) -> Vec<(usize, usize)> {
    let mut runs = vowel_runs(chars);
    if runs.len() < 2 {
        return runs;
    }
    let len = chars.len();
    let (last_start, last_end) = runs[runs.len() - 1];

    // Final lone 'e'
    if last_start == len - 1 && last_end == len && chars[last_start] == 'e' {
        let consonant_le = len >= 3
            && chars[len - 2] == 'l'
            && !is_vowel(chars, len - 3)
            && chars[len - 3] != 'l';
        if !consonant_le && !ends_with(chars, "ire") {
            runs.pop();
        }
        return runs;
    }

    // Final "ed"
    if len >= 3
        && last_start == len - 2
        && last_end == len - 1
        && chars[len - 2] == 'e'
        && chars[len - 1] == 'd'
        && !matches!(chars[len - 3], 't' | 'd')
    {
        runs.pop();
    }
    runs
}

/// Split letters into one piece per nucleus
///
/// Each non-first syllable starts at the consonant just before its nucleus.
fn split_pieces(chars: &[char], nuclei: &[(usize, usize)]) -> Vec<String> {
    if nuclei.len() < 2 {
        return vec![chars.iter().collect()];
    }
    let mut pieces = Vec::with_capacity(nuclei.len());
    let mut piece_start = 0;
    for window in nuclei.windows(2) {
        let (_, prev_end) = window[0];
        let (start, _) = window[1];
        let boundary = if start > prev_end { start - 1 } else { start };
        pieces.push(chars[piece_start..boundary].iter().collect());
        piece_start = boundary;
    }
    pieces.push(chars[piece_start..].iter().collect());
    pieces
}

fn rhyme_key_from(chars: &[char], nuclei: &[(usize, usize)]) -> String {
    let start = match nuclei {
        [] => 0,
        [.., (prev, _), (last, _)]
            if *last == chars.len() - 1 && chars[*last] == 'e' =>
        {
            // Sounding final 'e' ("fire", "table") belongs to the previous nucleus
            *prev
        }
        [.., (last, _)] => *last,
    };
    chars[start..].iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(token: &str) -> Word {
        Word::from_token(token).unwrap()
    }

    #[test]
    fn test_basic_syllable_counts() {
        assert_eq!(count_syllables("track"), 1);
        assert_eq!(count_syllables("spitting"), 2);
        assert_eq!(count_syllables("never"), 2);
        assert_eq!(count_syllables("looking"), 2);
        assert_eq!(count_syllables("I'm"), 1);
    }

    #[test]
    fn test_silent_e_rules() {
        assert_eq!(count_syllables("make"), 1);
        assert_eq!(count_syllables("rhyme"), 1);
        assert_eq!(count_syllables("style"), 1);
        assert_eq!(count_syllables("table"), 2);
        assert_eq!(count_syllables("fire"), 2);
        // Single nucleus words keep their 'e'
        assert_eq!(count_syllables("the"), 1);
        assert_eq!(count_syllables("me"), 1);
    }

    #[test]
    fn test_silent_ed_rules() {
        assert_eq!(count_syllables("looked"), 1);
        assert_eq!(count_syllables("wanted"), 2);
        assert_eq!(count_syllables("faded"), 2);
        assert_eq!(count_syllables("need"), 1);
    }

    #[test]
    fn test_y_handling() {
        assert_eq!(count_syllables("you"), 1);
        assert_eq!(count_syllables("my"), 1);
        assert_eq!(count_syllables("crazy"), 2);
    }

    #[test]
    fn test_minimum_one_syllable() {
        assert_eq!(count_syllables("hmm"), 1);
        assert_eq!(count_syllables("100"), 1);
        assert_eq!(count_syllables("..."), 0);
    }

    #[test]
    fn test_pieces_match_count() {
        for token in ["spitting", "looking", "little", "fire", "make", "hmm", "microphone"] {
            let w = word(token);
            assert_eq!(w.syllables().len(), w.syllable_count(), "{}", token);
            assert_eq!(w.syllables().concat().to_lowercase(), w.normalized(), "{}", token);
        }
    }

    #[test]
    fn test_syllable_pieces() {
        assert_eq!(word("spitting").syllables(), ["spit", "ting"]);
        assert_eq!(word("looking").syllables(), ["loo", "king"]);
        assert_eq!(word("Never").syllables(), ["Ne", "ver"]);
    }

    #[test]
    fn test_display_and_normalized_forms() {
        let w = word("Back!");
        assert_eq!(w.display(), "Back!");
        assert_eq!(w.normalized(), "back");
    }

    #[test]
    fn test_rhyme_keys() {
        assert_eq!(word("track").rhyme_key(), "ack");
        assert_eq!(word("make").rhyme_key(), "ake");
        assert_eq!(word("fire").rhyme_key(), "ire");
        assert_eq!(word("looked").rhyme_key(), "ooked");
        assert_eq!(word("hmm").rhyme_key(), "hmm");
    }

    #[test]
    fn test_rhyme_similarity() {
        assert!(rhymes(&word("track"), &word("back")));
        assert!(rhymes(&word("fire"), &word("desire")));
        assert!(!rhymes(&word("track"), &word("never")));
        // Same word is repetition, not rhyme
        assert_eq!(rhyme_similarity(&word("back"), &word("Back")), 0.0);
    }

    #[test]
    fn test_key_similarity_partial() {
        assert!((key_similarity("ack", "eck") - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(key_similarity("", "ack"), 0.0);
        assert_eq!(key_similarity("ow", "o"), 0.0);
    }

    #[test]
    fn test_tokenize_lines() {
        let lines = tokenize("I'm spitting fire on this track\r\n\nNever looking back");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), 6);
        assert_eq!(lines[1].len(), 3);
    }
}
