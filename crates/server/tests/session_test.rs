//! # Session Endpoint Tests
//!
//! Verifies that counters accumulate across requests, that ending a session
//! emits its summary, that idle sessions expire the same way and that
//! concurrent questions never lose an update.

mod common;

use anyhow::Result;
use climate_qa::config::SessionsConfig;
use climate_qa_server::spawn_idle_sweep;
use common::TestApp;
use reqwest::StatusCode;
use std::time::Duration;

#[tokio::test]
async fn test_session_counters_accumulate() -> Result<()> {
    // --- 1. Arrange ---
    let app = TestApp::spawn().await?;
    let session = "accumulating-session";

    // --- 2. Act ---
    app.ask(Some(session), "What is global warming?").await?;
    app.ask(Some(session), "How do I cook pasta?").await?;
    app.ask(Some(session), "Why is global warming dangerous?").await?;
    let response = app
        .client
        .get(format!("{}/sessions/{session}", app.address))
        .send()
        .await?;

    // --- 3. Assert ---
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["session_id"], session);
    assert_eq!(body["questions_asked"], 3);
    assert_eq!(body["climate_questions"], 2);
    assert_eq!(body["rejected_questions"], 1);
    let engagement = body["engagement"].as_f64().unwrap_or_default();
    assert!((engagement - 2.0 / 3.0).abs() < 1e-9);
    Ok(())
}

#[tokio::test]
async fn test_unknown_session_is_not_found() -> Result<()> {
    // --- 1. Arrange ---
    let app = TestApp::spawn().await?;

    // --- 2. Act ---
    let stats = app
        .client
        .get(format!("{}/sessions/nobody", app.address))
        .send()
        .await?;
    let ended = app
        .client
        .delete(format!("{}/sessions/nobody", app.address))
        .send()
        .await?;

    // --- 3. Assert ---
    assert_eq!(stats.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = stats.json().await?;
    assert_eq!(body["error"], "Session 'nobody' not found.");
    assert_eq!(ended.status(), StatusCode::NOT_FOUND);
    assert!(app.sink.summaries().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_ending_session_emits_summary() -> Result<()> {
    // --- 1. Arrange ---
    let app = TestApp::spawn().await?;
    let session = "ending-session";
    app.ask(Some(session), "hello").await?;
    app.ask(Some(session), "What is global warming?").await?;

    // --- 2. Act ---
    let response = app
        .client
        .delete(format!("{}/sessions/{session}", app.address))
        .send()
        .await?;

    // --- 3. Assert ---
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["session_id"], session);
    assert_eq!(body["total_questions"], 2);
    assert_eq!(body["answered"], 1);
    assert_eq!(body["redirected"], 1);

    let summaries = app.sink.summaries();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].session_id, session);

    // The session is gone once ended.
    let again = app
        .client
        .get(format!("{}/sessions/{session}", app.address))
        .send()
        .await?;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_concurrent_questions_on_one_session() -> Result<()> {
    // --- 1. Arrange ---
    let app = TestApp::spawn().await?;
    let session = "busy-session";
    let mut requests = tokio::task::JoinSet::new();

    // --- 2. Act ---
    for _ in 0..8 {
        let request = app
            .client
            .post(format!("{}/ask", app.address))
            .json(&serde_json::json!({
                "session_id": session,
                "question": "What is global warming?",
            }));
        requests.spawn(request.send());
    }

    // --- 3. Assert ---
    while let Some(result) = requests.join_next().await {
        assert!(result??.status().is_success());
    }
    let handle = app
        .app_state
        .find_session(session)
        .await
        .expect("session should exist");
    let stats = handle.lock().await.stats().clone();
    assert_eq!(stats.questions_asked, 8);
    assert_eq!(stats.climate_questions, 8);
    assert_eq!(app.sink.interactions().len(), 8);
    Ok(())
}

#[tokio::test]
async fn test_idle_sessions_expire_with_summary() -> Result<()> {
    // --- 1. Arrange ---
    let app = TestApp::spawn().await?;
    app.ask(Some("idle-session"), "What is global warming?").await?;
    app.ask(Some("other-idle-session"), "hello").await?;

    // --- 2. Act ---
    let kept = app.app_state.expire_idle(Duration::from_secs(3600)).await;
    let mut expired = app.app_state.expire_idle(Duration::ZERO).await;

    // --- 3. Assert ---
    assert!(kept.is_empty());
    expired.sort_by(|a, b| a.session_id.cmp(&b.session_id));
    let ids: Vec<&str> = expired.iter().map(|s| s.session_id.as_str()).collect();
    assert_eq!(ids, vec!["idle-session", "other-idle-session"]);
    assert_eq!(expired[0].answered, 1);
    assert_eq!(app.sink.summaries().len(), 2);
    assert!(app.app_state.sessions.read().await.is_empty());

    let stats = app
        .client
        .get(format!("{}/sessions/idle-session", app.address))
        .send()
        .await?;
    assert_eq!(stats.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_busy_session_is_not_expired() -> Result<()> {
    // --- 1. Arrange ---
    let app = TestApp::spawn().await?;
    app.ask(Some("busy-idle-session"), "What is global warming?").await?;
    let handle = app
        .app_state
        .find_session("busy-idle-session")
        .await
        .expect("session should exist");

    // --- 2. Act ---
    let guard = handle.lock().await;
    let expired = app.app_state.expire_idle(Duration::ZERO).await;
    drop(guard);

    // --- 3. Assert ---
    assert!(expired.is_empty());
    assert!(app.sink.summaries().is_empty());
    assert!(app.app_state.find_session("busy-idle-session").await.is_some());
    Ok(())
}

#[tokio::test]
async fn test_background_sweep_ends_idle_sessions() -> Result<()> {
    // --- 1. Arrange ---
    let app = TestApp::spawn().await?;
    app.ask(Some("swept-session"), "What is global warming?").await?;
    let config = SessionsConfig {
        idle_timeout_secs: 0,
        sweep_interval_secs: 1,
    };

    // --- 2. Act ---
    let sweeper = spawn_idle_sweep(app.app_state.clone(), &config);
    let swept = tokio::time::timeout(Duration::from_secs(5), async {
        while app.sink.summaries().is_empty() {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await;
    sweeper.abort();

    // --- 3. Assert ---
    assert!(swept.is_ok(), "the sweep should end the idle session");
    let summaries = app.sink.summaries();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].session_id, "swept-session");
    assert!(app.app_state.find_session("swept-session").await.is_none());
    Ok(())
}
