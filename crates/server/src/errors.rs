use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// A custom error type for the server application.
///
/// Processing an utterance never fails, so these cover only request
/// validation, unknown sessions and unexpected faults.
pub enum AppError {
    /// The request was well-formed JSON but unusable.
    BadRequest(String),
    /// No live session has the requested id.
    SessionNotFound(String),
    /// Generic internal server errors.
    Internal(anyhow::Error),
}

/// Conversion from `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, error_message) = match self {
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::SessionNotFound(id) => {
                (StatusCode::NOT_FOUND, format!("Session '{id}' not found."))
            }
            AppError::Internal(err) => {
                error!("Internal server error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred.".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status_code, body).into_response()
    }
}
