use super::{AppError, AppState};
use crate::types::SessionStatsResponse;
use axum::{
    extract::{Path, State},
    Json,
};
use climate_qa::SessionSummary;
use tracing::info;

/// Reports the running counters of a live session.
pub async fn session_stats_handler(
    State(app_state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionStatsResponse>, AppError> {
    let handle = app_state
        .find_session(&session_id)
        .await
        .ok_or_else(|| AppError::SessionNotFound(session_id.clone()))?;
    let session = handle.lock().await;
    let stats = session.stats().clone();

    Ok(Json(SessionStatsResponse {
        session_id,
        started_at: session.started_at(),
        average_generation_time: stats.average_generation_time(),
        engagement: stats.engagement(),
        stats,
    }))
}

/// Ends a session, emits its summary and returns it.
pub async fn end_session_handler(
    State(app_state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionSummary>, AppError> {
    let handle = app_state
        .remove_session(&session_id)
        .await
        .ok_or_else(|| AppError::SessionNotFound(session_id.clone()))?;
    // Waits for any in-flight question on this session to finish.
    let session = handle.lock().await;
    let summary = app_state.assistant.finish_session(&session);
    info!(session_id = %session_id, "Ended session");

    Ok(Json(summary))
}
