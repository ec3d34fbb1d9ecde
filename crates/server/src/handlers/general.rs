//! # General Route Handlers
//!
//! The root and health check endpoints, plus `/ask`, which runs one utterance
//! through the assistant.

use super::{AppError, AppState};
use crate::types::{AskRequest, AskResponse};
use axum::{extract::State, Json};
use tracing::info;

/// The handler for the root (`/`) endpoint.
pub async fn root() -> &'static str {
    "climate-qa server is running."
}

/// The handler for the health check (`/health`) endpoint.
pub async fn health_check() -> &'static str {
    "OK"
}

/// Answers one utterance within a session.
///
/// The session is created on first use. Requests for the same session are
/// serialized on its lock so the counters never lose an update.
pub async fn ask_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<AskRequest>,
) -> Result<Json<AskResponse>, AppError> {
    if payload.question.trim().is_empty() {
        return Err(AppError::BadRequest(
            "The 'question' field must not be empty.".to_string(),
        ));
    }

    let (session_id, handle) = app_state.session_or_create(payload.session_id).await;
    info!(session_id = %session_id, "Received question");

    let mut session = handle.lock().await;
    let reply = app_state
        .assistant
        .process(&mut session, &payload.question)
        .await;

    Ok(Json(AskResponse {
        session_id,
        response: reply.text,
        metadata: reply.metadata,
    }))
}
