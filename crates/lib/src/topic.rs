//! # Off-Domain Topic Detector

use crate::lexicon::Lexicon;
use serde::Serialize;
use std::sync::Arc;

/// The off-domain category an utterance was attributed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OffDomainTopic {
    pub topic: String,
    pub matched_phrases: Vec<String>,
}

impl OffDomainTopic {
    /// The topic name as shown to users: `personal_life` becomes `Personal Life`.
    pub fn display_name(&self) -> String {
        self.topic
            .split('_')
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone)]
pub struct TopicDetector {
    lexicon: Arc<Lexicon>,
}

impl TopicDetector {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    /// Scans the lower-cased utterance (stop-words kept) for off-domain phrases.
    ///
    /// The category with the most matching phrases wins; ties go to the
    /// category listed first in the lexicon. Returns `None` when nothing matched.
    pub fn detect_off_domain(&self, utterance: &str) -> Option<OffDomainTopic> {
        let lowered = utterance.to_lowercase();
        let mut best: Option<OffDomainTopic> = None;

        for category in self.lexicon.off_domain_categories() {
            let matches: Vec<String> = category
                .phrases
                .iter()
                .filter(|phrase| lowered.contains(phrase.as_str()))
                .cloned()
                .collect();
            if matches.is_empty() {
                continue;
            }
            let beats_current = best
                .as_ref()
                .map_or(true, |current| matches.len() > current.matched_phrases.len());
            if beats_current {
                best = Some(OffDomainTopic {
                    topic: category.name.clone(),
                    matched_phrases: matches,
                });
            }
        }

        best
    }
}
