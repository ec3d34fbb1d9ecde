//! # Routing Tests
//!
//! Exercises the decision list in isolation with hand-built signals, then the
//! full router over the built-in lexicon.

mod common;

use climate_qa::{
    lexicon::{Lexicon, ScienceBridge},
    router::{DecisionList, IntentRouter, Signals, Strategy},
    scorer::RelevanceVerdict,
    topic::OffDomainTopic,
};
use common::setup_tracing;
use std::sync::Arc;

fn verdict(confidence: f64) -> RelevanceVerdict {
    RelevanceVerdict {
        is_in_domain: confidence > 0.08,
        confidence,
        matched_categories: vec![],
        matched_phrases: vec![],
    }
}

fn food() -> Option<OffDomainTopic> {
    Some(OffDomainTopic {
        topic: "food".to_string(),
        matched_phrases: vec!["pasta".to_string()],
    })
}

fn bridge() -> Option<ScienceBridge> {
    Some(ScienceBridge {
        topic: "chemistry".to_string(),
        explanation: "Chemistry explains greenhouse gases.".to_string(),
    })
}

fn router() -> IntentRouter {
    IntentRouter::new(Arc::new(Lexicon::built_in()), true)
}

// --- Decision list ---

#[test]
fn test_rule_order() {
    let order: Vec<Strategy> = DecisionList::standard()
        .rules()
        .iter()
        .map(|rule| rule.strategy)
        .collect();

    assert_eq!(
        order,
        vec![
            Strategy::Greeting,
            Strategy::Compliment,
            Strategy::OffDomainReject,
            Strategy::ScienceBridge,
            Strategy::LowConfidenceRedirect,
            Strategy::Answer,
        ]
    );
}

#[test]
fn test_without_science_bridge_drops_only_that_rule() {
    let list = DecisionList::without_science_bridge();

    assert_eq!(list.rules().len(), 5);
    assert!(list
        .rules()
        .iter()
        .all(|rule| rule.strategy != Strategy::ScienceBridge));

    let signals = Signals {
        verdict: verdict(0.0),
        science_bridge: bridge(),
        ..Default::default()
    };
    assert_eq!(list.decide(&signals), Strategy::LowConfidenceRedirect);
}

#[test]
fn test_greeting_beats_everything() {
    let signals = Signals {
        greeting: true,
        compliment: true,
        verdict: verdict(0.9),
        off_domain: food(),
        science_bridge: bridge(),
    };
    assert_eq!(DecisionList::standard().decide(&signals), Strategy::Greeting);
}

#[test]
fn test_compliment_only_when_not_in_domain_or_off_domain() {
    let list = DecisionList::standard();

    let plain = Signals {
        compliment: true,
        verdict: verdict(0.0),
        ..Default::default()
    };
    assert_eq!(list.decide(&plain), Strategy::Compliment);

    let with_question = Signals {
        compliment: true,
        verdict: verdict(0.3),
        ..Default::default()
    };
    assert_eq!(list.decide(&with_question), Strategy::Answer);

    let off_domain = Signals {
        compliment: true,
        verdict: verdict(0.0),
        off_domain: food(),
        ..Default::default()
    };
    assert_eq!(list.decide(&off_domain), Strategy::OffDomainReject);
}

#[test]
fn test_off_domain_rejected_below_ceiling_only() {
    let list = DecisionList::standard();

    let weak = Signals {
        verdict: verdict(0.19),
        off_domain: food(),
        ..Default::default()
    };
    assert_eq!(list.decide(&weak), Strategy::OffDomainReject);

    let strong = Signals {
        verdict: verdict(0.2),
        off_domain: food(),
        ..Default::default()
    };
    assert_eq!(list.decide(&strong), Strategy::Answer);
}

#[test]
fn test_in_domain_beats_science_bridge() {
    let list = DecisionList::standard();

    let in_domain = Signals {
        verdict: verdict(0.4),
        science_bridge: bridge(),
        ..Default::default()
    };
    assert_eq!(list.decide(&in_domain), Strategy::Answer);

    let out_of_domain = Signals {
        verdict: verdict(0.0),
        science_bridge: bridge(),
        ..Default::default()
    };
    assert_eq!(list.decide(&out_of_domain), Strategy::ScienceBridge);
}

#[test]
fn test_off_domain_reject_beats_science_bridge() {
    let signals = Signals {
        verdict: verdict(0.0),
        off_domain: food(),
        science_bridge: bridge(),
        ..Default::default()
    };
    assert_eq!(
        DecisionList::standard().decide(&signals),
        Strategy::OffDomainReject
    );
}

#[test]
fn test_gap_between_floor_and_threshold_redirects() {
    let list = DecisionList::standard();

    for confidence in [0.0, 0.04, 0.05, 0.07, 0.08] {
        let signals = Signals {
            verdict: verdict(confidence),
            ..Default::default()
        };
        assert_eq!(
            list.decide(&signals),
            Strategy::LowConfidenceRedirect,
            "confidence {confidence}"
        );
    }

    let signals = Signals {
        verdict: verdict(0.081),
        ..Default::default()
    };
    assert_eq!(list.decide(&signals), Strategy::Answer);
}

// --- Full router ---

#[test]
fn test_route_scenarios() {
    setup_tracing();
    let router = router();

    let cases = [
        ("What is global warming?", Strategy::Answer),
        ("How do I cook pasta?", Strategy::OffDomainReject),
        ("Hello", Strategy::Greeting),
        ("HELLO!!", Strategy::Greeting),
        ("Thanks!", Strategy::Compliment),
        ("thanks, how do solar panels work?", Strategy::Answer),
        ("Tell me about photosynthesis", Strategy::ScienceBridge),
        ("How does photosynthesis affect climate change?", Strategy::Answer),
        ("Tell me about pollution", Strategy::LowConfidenceRedirect),
        ("What time is it?", Strategy::LowConfidenceRedirect),
        ("Is my solar powered smartphone any good?", Strategy::OffDomainReject),
        ("Will climate change cancel football?", Strategy::Answer),
    ];

    for (utterance, expected) in cases {
        let (strategy, _) = router.route(utterance);
        assert_eq!(strategy, expected, "utterance: {utterance:?}");
    }
}

#[test]
fn test_greeting_short_circuits_scoring() {
    let (strategy, signals) = router().route("Good morning! What is global warming?");

    assert_eq!(strategy, Strategy::Greeting);
    assert_eq!(signals.verdict.confidence, 0.0);
    assert!(signals.off_domain.is_none());
}

#[test]
fn test_router_without_science_bridge() {
    let router = IntentRouter::new(Arc::new(Lexicon::built_in()), false);
    let (strategy, _) = router.route("Tell me about photosynthesis");
    assert_eq!(strategy, Strategy::LowConfidenceRedirect);
}

#[test]
fn test_strategy_names() {
    assert_eq!(Strategy::OffDomainReject.to_string(), "off_domain_reject");
    assert_eq!(
        serde_json::to_string(&Strategy::LowConfidenceRedirect).unwrap(),
        "\"low_confidence_redirect\""
    );
}
