use chrono::{DateTime, Utc};
use climate_qa::{ReplyMetadata, SessionStats};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    /// Continues this session, or starts one with this id if unknown.
    #[serde(default)]
    pub session_id: Option<String>,
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub session_id: String,
    pub response: String,
    pub metadata: ReplyMetadata,
}

#[derive(Debug, Serialize)]
pub struct SessionStatsResponse {
    pub session_id: String,
    pub started_at: DateTime<Utc>,
    #[serde(flatten)]
    pub stats: SessionStats,
    pub average_generation_time: f64,
    pub engagement: f64,
}
