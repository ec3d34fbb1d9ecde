//! # Response Post-Processor
//!
//! Deterministic cleanup of raw generator output before it is shown to a user.
//! The steps run in a fixed order:
//!
//! 1. Strip an echo of the original question.
//! 2. Strip a leading label such as `Answer:`.
//!
//! Steps 1 and 2 repeat until neither removes anything, so a label in front
//! of an echo or a stack of labels goes in a single pass and a second
//! `clean` over the output leaves it unchanged.
//! 3. Apply the critical factual corrections.
//! 4. Collapse immediately repeated tokens.
//! 5. Ensure terminal punctuation.
//! 6. Replace answers shorter than the minimum word count with a fallback.

use crate::{
    constants::DEFAULT_MIN_ANSWER_WORDS,
    templates::{ANSWER_LABELS, FACTUAL_CORRECTIONS, SHORT_ANSWER_FALLBACK},
};
use regex::Regex;
use std::sync::LazyLock;

static CORRECTIONS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    FACTUAL_CORRECTIONS
        .iter()
        .map(|(wrong, right)| {
            let re = Regex::new(&format!("(?i){}", regex::escape(wrong)))
                .expect("escaped correction phrase is a valid regex");
            (re, *right)
        })
        .collect()
});

#[derive(Debug, Clone)]
pub struct PostProcessor {
    min_words: usize,
    fallback: String,
}

impl Default for PostProcessor {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_ANSWER_WORDS)
    }
}

impl PostProcessor {
    pub fn new(min_words: usize) -> Self {
        Self {
            min_words,
            fallback: SHORT_ANSWER_FALLBACK.to_string(),
        }
    }

    /// Replaces the text substituted for too-short answers.
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    pub fn min_words(&self) -> usize {
        self.min_words
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Cleans `raw_text` produced for `original_question`. Never returns an
    /// empty string.
    pub fn clean(&self, raw_text: &str, original_question: &str) -> String {
        let text = strip_prefixes(raw_text.trim(), original_question.trim());
        let text = apply_corrections(text);
        let text = collapse_repeats(&text);
        let text = ensure_terminal_punctuation(text);

        if text.split_whitespace().count() < self.min_words.max(1) {
            return self.fallback.clone();
        }
        text
    }
}

fn strip_prefixes<'a>(mut text: &'a str, question: &str) -> &'a str {
    loop {
        let stripped = strip_label(strip_echo(text, question));
        if stripped.len() == text.len() {
            return stripped;
        }
        text = stripped;
    }
}

fn strip_echo<'a>(text: &'a str, question: &str) -> &'a str {
    if question.is_empty() {
        return text;
    }
    strip_prefix_ignore_case(text, question)
        .map(str::trim_start)
        .unwrap_or(text)
}

fn strip_label(text: &str) -> &str {
    ANSWER_LABELS
        .iter()
        .find_map(|label| strip_prefix_ignore_case(text, label))
        .map(str::trim_start)
        .unwrap_or(text)
}

fn apply_corrections(text: &str) -> String {
    CORRECTIONS
        .iter()
        .fold(text.to_string(), |acc, (re, right)| {
            re.replace_all(&acc, *right).into_owned()
        })
}

fn collapse_repeats(text: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();
    for token in text.split_whitespace() {
        let repeated = kept
            .last()
            .is_some_and(|previous| previous.to_lowercase() == token.to_lowercase());
        if !repeated {
            kept.push(token);
        }
    }
    kept.join(" ")
}

fn ensure_terminal_punctuation(mut text: String) -> String {
    if text.is_empty() || text.ends_with('.') || text.ends_with('?') {
        return text;
    }
    text.push('.');

    // "x. x" becomes "x. x." here; drop the new duplicate so a second pass
    // has nothing left to collapse.
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if let [.., before, last] = tokens.as_slice() {
        if before.to_lowercase() == last.to_lowercase() {
            return tokens[..tokens.len() - 1].join(" ");
        }
    }
    text
}

/// Strips `prefix` from the start of `text`, comparing characters case-insensitively.
fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let mut text_chars = text.char_indices();
    for expected in prefix.chars() {
        let (_, actual) = text_chars.next()?;
        if !actual.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
    }
    let offset = text_chars.next().map_or(text.len(), |(index, _)| index);
    Some(&text[offset..])
}
