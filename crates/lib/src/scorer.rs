//! # Relevance Scorer
//!
//! Weighted keyword scoring of an utterance against the supported-domain
//! categories of the [`Lexicon`].

use crate::{
    constants::{CONFIDENCE_SCALE, IN_DOMAIN_THRESHOLD},
    lexicon::Lexicon,
    normalize::normalize_for_scoring,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// The scorer's judgement for one utterance.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RelevanceVerdict {
    pub is_in_domain: bool,
    /// Normalized confidence in `[0, 1]`. Already scaled; do not renormalize.
    pub confidence: f64,
    pub matched_categories: Vec<String>,
    pub matched_phrases: Vec<String>,
}

impl RelevanceVerdict {
    /// A short human-readable account of what matched, for telemetry.
    pub fn reason(&self) -> String {
        if self.matched_categories.is_empty() {
            return "No climate keywords detected".to_string();
        }
        let phrases: Vec<&str> = self
            .matched_phrases
            .iter()
            .take(3)
            .map(String::as_str)
            .collect();
        let categories: Vec<&str> = self
            .matched_categories
            .iter()
            .take(2)
            .map(String::as_str)
            .collect();
        format!(
            "Keywords: {} | Categories: {}",
            phrases.join(", "),
            categories.join(", ")
        )
    }
}

#[derive(Debug, Clone)]
pub struct RelevanceScorer {
    lexicon: Arc<Lexicon>,
}

impl RelevanceScorer {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    /// Scores an utterance.
    ///
    /// Each phrase counts once if present in the normalized text, regardless
    /// of how often it occurs. A phrase listed under several categories counts
    /// for each of them.
    pub fn score(&self, utterance: &str) -> RelevanceVerdict {
        let normalized = normalize_for_scoring(utterance);
        if normalized.is_empty() {
            return RelevanceVerdict::default();
        }

        let mut total = 0.0;
        let mut matched_categories = Vec::new();
        let mut matched_phrases = Vec::new();

        for category in self.lexicon.domain_categories() {
            let hits: Vec<&String> = category
                .phrases
                .iter()
                .filter(|phrase| normalized.contains(phrase.as_str()))
                .collect();
            if hits.is_empty() {
                continue;
            }
            total += hits.len() as f64 * category.weight;
            matched_categories.push(category.name.clone());
            matched_phrases.extend(hits.into_iter().cloned());
        }

        let max = self.lexicon.max_domain_score();
        let confidence = if max > 0.0 {
            (total / max * CONFIDENCE_SCALE).min(1.0)
        } else {
            0.0
        };

        debug!(%normalized, confidence, ?matched_categories, "Scored utterance");

        RelevanceVerdict {
            is_in_domain: confidence > IN_DOMAIN_THRESHOLD,
            confidence,
            matched_categories,
            matched_phrases,
        }
    }
}
