//! # Sessions
//!
//! A [`Session`] is the explicit per-conversation context passed into
//! [`crate::Assistant::process`]. It owns the counters and the randomness source
//! used to pick conversational replies. It is not synchronized: a caller that
//! shares one session between tasks must serialize access itself.

use crate::{router::Strategy, telemetry::SessionSummary};
use chrono::{DateTime, Utc};
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Per-session counters.
///
/// Every field defaults to zero when missing from a persisted record, so a
/// partial record is repaired rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionStats {
    pub questions_asked: u64,
    /// Utterances answered by the generator.
    pub climate_questions: u64,
    /// Utterances handled by any other strategy.
    pub rejected_questions: u64,
    /// Seconds spent in answered turns.
    pub total_generation_time: f64,
}

impl SessionStats {
    pub fn record(&mut self, strategy: Strategy, generation_time: Duration) {
        self.questions_asked += 1;
        if strategy == Strategy::Answer {
            self.climate_questions += 1;
            self.total_generation_time += generation_time.as_secs_f64();
        } else {
            self.rejected_questions += 1;
        }
    }

    /// Mean seconds per answered question.
    pub fn average_generation_time(&self) -> f64 {
        self.total_generation_time / self.climate_questions.max(1) as f64
    }

    /// Share of questions that were answered.
    pub fn engagement(&self) -> f64 {
        self.climate_questions as f64 / self.questions_asked.max(1) as f64
    }
}

#[derive(Debug)]
pub struct Session {
    id: String,
    started_at: DateTime<Utc>,
    started: Instant,
    stats: SessionStats,
    rng: StdRng,
}

impl Session {
    /// A fresh session with a random id and an entropy-seeded rng.
    pub fn new() -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string())
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self::from_parts(id.into(), SessionStats::default(), StdRng::from_entropy())
    }

    /// A session whose conversational replies are reproducible.
    pub fn with_seed(id: impl Into<String>, seed: u64) -> Self {
        Self::from_parts(id.into(), SessionStats::default(), StdRng::seed_from_u64(seed))
    }

    /// Resumes a session from previously persisted counters.
    pub fn restore(id: impl Into<String>, stats: SessionStats) -> Self {
        Self::from_parts(id.into(), stats, StdRng::from_entropy())
    }

    fn from_parts(id: String, stats: SessionStats, rng: StdRng) -> Self {
        Self {
            id,
            started_at: Utc::now(),
            started: Instant::now(),
            stats,
            rng,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut SessionStats {
        &mut self.stats
    }

    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Clears the counters and restarts the clock, keeping the id.
    pub fn reset(&mut self) {
        self.stats = SessionStats::default();
        self.started_at = Utc::now();
        self.started = Instant::now();
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            timestamp: Utc::now(),
            session_id: self.id.clone(),
            total_questions: self.stats.questions_asked,
            answered: self.stats.climate_questions,
            redirected: self.stats.rejected_questions,
            total_generation_time: self.stats.total_generation_time,
            average_generation_time: self.stats.average_generation_time(),
            elapsed_secs: self.elapsed().as_secs_f64(),
            engagement: self.stats.engagement(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
