//! # Intent Router
//!
//! Selects exactly one response strategy per utterance. The policy is an
//! ordered list of `(predicate, strategy)` rules evaluated first-match-wins,
//! so the priority between strategies is visible in one place:
//!
//! | # | Strategy                  | Fires when                                             |
//! |---|---------------------------|--------------------------------------------------------|
//! | 1 | `greeting`                | the utterance is a greeting                            |
//! | 2 | `compliment`              | a compliment that is neither in-domain nor off-domain  |
//! | 3 | `off_domain_reject`       | an off-domain topic is flagged and confidence < 0.2    |
//! | 4 | `science_bridge`          | a bridge topic is mentioned and not in-domain          |
//! | 5 | `low_confidence_redirect` | not in-domain, or confidence < 0.05                    |
//! | 6 | `answer`                  | always                                                 |
//!
//! Because rule 5 precedes rule 6, an in-domain utterance always reaches the
//! generator even if it also mentions a bridge topic.

use crate::{
    constants::{LOW_CONFIDENCE_FLOOR, OFF_DOMAIN_CONFIDENCE_CEILING},
    conversational::ConversationalDetector,
    lexicon::{Lexicon, ScienceBridge},
    scorer::{RelevanceScorer, RelevanceVerdict},
    topic::{OffDomainTopic, TopicDetector},
};
use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};
use tracing::info;

/// The response-construction branch chosen for an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Greeting,
    Compliment,
    OffDomainReject,
    LowConfidenceRedirect,
    ScienceBridge,
    Answer,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Greeting => "greeting",
            Strategy::Compliment => "compliment",
            Strategy::OffDomainReject => "off_domain_reject",
            Strategy::LowConfidenceRedirect => "low_confidence_redirect",
            Strategy::ScienceBridge => "science_bridge",
            Strategy::Answer => "answer",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the decision list looks at for one utterance.
#[derive(Debug, Clone, Default)]
pub struct Signals {
    pub greeting: bool,
    pub compliment: bool,
    pub verdict: RelevanceVerdict,
    pub off_domain: Option<OffDomainTopic>,
    pub science_bridge: Option<ScienceBridge>,
}

/// One entry of the decision list.
#[derive(Clone, Copy)]
pub struct Rule {
    pub strategy: Strategy,
    pub predicate: fn(&Signals) -> bool,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("strategy", &self.strategy)
            .finish_non_exhaustive()
    }
}

fn is_greeting(s: &Signals) -> bool {
    s.greeting
}

fn is_unscored_compliment(s: &Signals) -> bool {
    s.compliment && !s.verdict.is_in_domain && s.off_domain.is_none()
}

fn is_off_domain(s: &Signals) -> bool {
    s.off_domain.is_some() && s.verdict.confidence < OFF_DOMAIN_CONFIDENCE_CEILING
}

fn is_bridgeable(s: &Signals) -> bool {
    s.science_bridge.is_some() && !s.verdict.is_in_domain
}

fn is_low_confidence(s: &Signals) -> bool {
    !s.verdict.is_in_domain || s.verdict.confidence < LOW_CONFIDENCE_FLOOR
}

fn always(_: &Signals) -> bool {
    true
}

/// An ordered, first-match-wins list of routing rules.
#[derive(Debug, Clone)]
pub struct DecisionList {
    rules: Vec<Rule>,
}

impl DecisionList {
    /// The full policy, science bridge included.
    pub fn standard() -> Self {
        Self {
            rules: vec![
                Rule { strategy: Strategy::Greeting, predicate: is_greeting },
                Rule { strategy: Strategy::Compliment, predicate: is_unscored_compliment },
                Rule { strategy: Strategy::OffDomainReject, predicate: is_off_domain },
                Rule { strategy: Strategy::ScienceBridge, predicate: is_bridgeable },
                Rule { strategy: Strategy::LowConfidenceRedirect, predicate: is_low_confidence },
                Rule { strategy: Strategy::Answer, predicate: always },
            ],
        }
    }

    /// The policy with the science-bridge rule removed.
    pub fn without_science_bridge() -> Self {
        let mut list = Self::standard();
        list.rules.retain(|rule| rule.strategy != Strategy::ScienceBridge);
        list
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Returns the strategy of the first rule whose predicate holds.
    pub fn decide(&self, signals: &Signals) -> Strategy {
        self.rules
            .iter()
            .find(|rule| (rule.predicate)(signals))
            .map_or(Strategy::Answer, |rule| rule.strategy)
    }
}

impl Default for DecisionList {
    fn default() -> Self {
        Self::standard()
    }
}

/// Gathers signals for an utterance and applies the decision list.
#[derive(Debug, Clone)]
pub struct IntentRouter {
    lexicon: Arc<Lexicon>,
    scorer: RelevanceScorer,
    topics: TopicDetector,
    conversational: ConversationalDetector,
    decisions: DecisionList,
}

impl IntentRouter {
    pub fn new(lexicon: Arc<Lexicon>, science_bridge: bool) -> Self {
        let decisions = if science_bridge {
            DecisionList::standard()
        } else {
            DecisionList::without_science_bridge()
        };
        Self {
            scorer: RelevanceScorer::new(lexicon.clone()),
            topics: TopicDetector::new(lexicon.clone()),
            conversational: ConversationalDetector::new(lexicon.clone()),
            lexicon,
            decisions,
        }
    }

    pub fn scorer(&self) -> &RelevanceScorer {
        &self.scorer
    }

    pub fn topics(&self) -> &TopicDetector {
        &self.topics
    }

    pub fn conversational(&self) -> &ConversationalDetector {
        &self.conversational
    }

    pub fn decisions(&self) -> &DecisionList {
        &self.decisions
    }

    /// Computes the signals for an utterance. A greeting short-circuits the
    /// rest: nothing after rule 1 can change the outcome.
    pub fn analyze(&self, utterance: &str) -> Signals {
        if self.conversational.is_greeting(utterance) {
            return Signals {
                greeting: true,
                ..Default::default()
            };
        }

        let lowered = utterance.to_lowercase();
        Signals {
            greeting: false,
            compliment: self.conversational.is_compliment(utterance),
            verdict: self.scorer.score(utterance),
            off_domain: self.topics.detect_off_domain(utterance),
            science_bridge: self
                .lexicon
                .science_bridges()
                .iter()
                .find(|bridge| lowered.contains(bridge.topic.as_str()))
                .cloned(),
        }
    }

    /// Analyzes an utterance and selects its strategy.
    pub fn route(&self, utterance: &str) -> (Strategy, Signals) {
        let signals = self.analyze(utterance);
        let strategy = self.decisions.decide(&signals);
        info!(
            %strategy,
            confidence = signals.verdict.confidence,
            in_domain = signals.verdict.is_in_domain,
            off_domain = signals.off_domain.as_ref().map(|t| t.topic.as_str()),
            "Routed utterance"
        );
        (strategy, signals)
    }
}
