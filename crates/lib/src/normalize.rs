//! # Utterance Normalization
//!
//! Two normal forms are used by the classifiers: a scoring form with
//! interrogative/auxiliary stop-words and punctuation removed, and a
//! conversational form where only punctuation is removed.

use regex::Regex;
use std::sync::LazyLock;

/// Interrogative and auxiliary words dropped before domain scoring.
pub const STOP_WORDS: [&str; 15] = [
    "what", "how", "why", "when", "where", "who", "can", "is", "are", "do", "does", "will",
    "would", "could", "should",
];

static PUNCTUATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("valid punctuation regex"));

static STOP_WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(r"\b(?:{})\b", STOP_WORDS.join("|"));
    Regex::new(&pattern).expect("valid stop-word regex")
});

/// Lower-cases, replaces punctuation with spaces, drops stop-words and
/// collapses whitespace.
pub fn normalize_for_scoring(text: &str) -> String {
    let lowered = text.to_lowercase();
    let spaced = PUNCTUATION_RE.replace_all(&lowered, " ");
    let without_stop_words = STOP_WORD_RE.replace_all(&spaced, " ");
    collapse_whitespace(&without_stop_words)
}

/// Lower-cases and deletes punctuation, keeping every word.
pub fn normalize_conversational(text: &str) -> String {
    strip_punctuation(&text.to_lowercase())
}

/// Deletes punctuation characters and collapses whitespace.
pub fn strip_punctuation(text: &str) -> String {
    collapse_whitespace(&PUNCTUATION_RE.replace_all(text, ""))
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whole-word containment: `phrase` appears in `text` bounded by spaces or
/// the ends of the text. Both sides are expected in conversational form.
pub fn contains_words(text: &str, phrase: &str) -> bool {
    if phrase.is_empty() {
        return false;
    }
    format!(" {text} ").contains(&format!(" {phrase} "))
}
