//! # Conversational Detectors
//!
//! Greeting and compliment detection. Both run on the conversational normal
//! form (lower-case, punctuation removed, every word kept) and are checked
//! before any domain scoring takes place.

use crate::{
    constants::{SHORT_GREETINGS, SHORT_GREETING_MAX_WORDS},
    lexicon::Lexicon,
    normalize::{contains_words, normalize_conversational},
};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ConversationalDetector {
    lexicon: Arc<Lexicon>,
}

impl ConversationalDetector {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    /// True when the utterance is, starts with, or ends with a greeting phrase
    /// on a word boundary. Utterances of at most two words also count when
    /// they contain `hi`, `hello` or `hey` anywhere.
    pub fn is_greeting(&self, utterance: &str) -> bool {
        let cleaned = normalize_conversational(utterance);
        if cleaned.is_empty() {
            return false;
        }

        let bounded = self.lexicon.greetings().iter().any(|greeting| {
            cleaned == *greeting
                || cleaned.starts_with(&format!("{greeting} "))
                || cleaned.ends_with(&format!(" {greeting}"))
        });
        if bounded {
            return true;
        }

        cleaned.split_whitespace().count() <= SHORT_GREETING_MAX_WORDS
            && SHORT_GREETINGS
                .iter()
                .any(|greeting| cleaned.contains(greeting))
    }

    /// True when any compliment phrase appears in the utterance as whole words.
    pub fn is_compliment(&self, utterance: &str) -> bool {
        let cleaned = normalize_conversational(utterance);
        self.lexicon
            .compliments()
            .iter()
            .any(|phrase| contains_words(&cleaned, phrase))
    }
}
