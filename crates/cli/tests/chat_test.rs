//! # Chat Loop Tests
//!
//! Drives the interactive loop and the one-shot commands with in-memory
//! input and output.

use climate_qa::{Assistant, Session, Strategy};
use climate_qa_cli::{chat::run_chat, commands};
use climate_qa_test_utils::{MemorySink, MockGenerator};
use std::io::Cursor;

fn assistant_with(generator: &MockGenerator, sink: &MemorySink) -> Assistant {
    Assistant::builder()
        .generator(Box::new(generator.clone()))
        .telemetry(Box::new(sink.clone()))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_chat_loop_commands_and_summary() {
    // --- 1. Arrange ---
    let generator = MockGenerator::new();
    let sink = MemorySink::new();
    let assistant = assistant_with(&generator, &sink);
    let mut session = Session::with_id("chat-session");
    let input = Cursor::new("help\n\n   \nWhat is global warming?\nHow do I cook pasta?\nstats\nquit\nWhat is ignored?\n");
    let mut output = Vec::new();

    // --- 2. Act ---
    let summary = run_chat(&assistant, &mut session, input, &mut output)
        .await
        .unwrap();

    // --- 3. Assert ---
    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("How do renewable energy sources work?"));
    assert!(text.contains("Climate topic detected"));
    assert!(text.contains("Non-climate topic (confidence: 0.00)"));
    assert!(text.contains("Questions asked: 2"));
    assert!(text.contains("Climate questions answered: 1"));
    assert!(text.contains("Off-topic questions redirected: 1"));

    // Blank lines and commands never reach the assistant; input after quit is not read.
    assert_eq!(
        generator.get_calls(),
        vec!["question: What is global warming?".to_string()]
    );
    assert_eq!(summary.total_questions, 2);
    assert_eq!(sink.interactions().len(), 2);
    assert_eq!(sink.summaries(), vec![summary]);
}

#[tokio::test]
async fn test_chat_loop_end_of_input_ends_session() {
    // --- 1. Arrange ---
    let generator = MockGenerator::new();
    let sink = MemorySink::new();
    let assistant = assistant_with(&generator, &sink);
    let mut session = Session::new();
    let mut output = Vec::new();

    // --- 2. Act ---
    let summary = run_chat(&assistant, &mut session, Cursor::new("hello\n"), &mut output)
        .await
        .unwrap();

    // --- 3. Assert ---
    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("Session Summary:"));
    assert_eq!(summary.total_questions, 1);
    assert_eq!(summary.answered, 0);
    assert!(generator.get_calls().is_empty());
    assert_eq!(sink.summaries().len(), 1);
}

#[tokio::test]
async fn test_ask_prints_reply_text_or_json() {
    // --- 1. Arrange ---
    let generator = MockGenerator::new();
    generator.add_response(
        "global warming",
        "Burning fossil fuels traps extra heat in the atmosphere.",
    );
    let sink = MemorySink::new();
    let assistant = assistant_with(&generator, &sink);

    // --- 2. Act ---
    let mut plain = Vec::new();
    commands::ask(&assistant, "What drives global warming?", false, &mut plain)
        .await
        .unwrap();
    let mut json = Vec::new();
    commands::ask(&assistant, "What drives global warming?", true, &mut json)
        .await
        .unwrap();

    // --- 3. Assert ---
    assert_eq!(
        String::from_utf8(plain).unwrap(),
        "Burning fossil fuels traps extra heat in the atmosphere.\n"
    );
    let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
    assert_eq!(value["metadata"]["strategy"], "answer");
    assert_eq!(value["text"], "Burning fossil fuels traps extra heat in the atmosphere.");
    // Each one-shot question is its own session.
    assert_eq!(sink.summaries().len(), 2);
}

#[test]
fn test_classify_reports_signals_without_generating() {
    // --- 1. Arrange ---
    let router = commands::load_router(None).unwrap();
    let mut output = Vec::new();

    // --- 2. Act ---
    let strategy = commands::classify(&router, "How do I cook pasta?", &mut output).unwrap();

    // --- 3. Assert ---
    let text = String::from_utf8(output).unwrap();
    assert_eq!(strategy, Strategy::OffDomainReject);
    assert!(text.contains("Strategy:     off_domain_reject"));
    assert!(text.contains("Off-domain:   Food (cook, pasta)"));
    assert!(text.contains("In domain:    false"));
}
