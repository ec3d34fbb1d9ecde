//! # Telemetry
//!
//! Structured records emitted once per processed utterance and once per
//! finished session, and the sinks that append them to daily files.
//! Sink failures are reported to the caller, which logs and ignores them.

use crate::{
    config::{TelemetryConfig, TelemetryFormat},
    errors::TelemetryError,
    router::Strategy,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    fmt::Debug,
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    sync::Mutex,
};

/// One processed utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub timestamp: DateTime<Utc>,
    pub session_id: String,
    pub question: String,
    pub response: String,
    pub routing_strategy: Strategy,
    pub is_in_domain: bool,
    pub confidence: f64,
    pub detection_reason: String,
    /// Seconds.
    pub generation_time: f64,
    /// Characters.
    pub question_length: usize,
    /// Characters.
    pub response_length: usize,
}

/// Aggregate view of a finished session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub timestamp: DateTime<Utc>,
    pub session_id: String,
    pub total_questions: u64,
    pub answered: u64,
    pub redirected: u64,
    pub total_generation_time: f64,
    pub average_generation_time: f64,
    pub elapsed_secs: f64,
    pub engagement: f64,
}

/// Destination for telemetry records.
pub trait TelemetrySink: Send + Sync + Debug {
    fn record_interaction(&self, record: &InteractionRecord) -> Result<(), TelemetryError>;
    fn record_summary(&self, summary: &SessionSummary) -> Result<(), TelemetryError>;
}

fn daily_file(dir: &Path, stem: &str, timestamp: &DateTime<Utc>, ext: &str) -> PathBuf {
    dir.join(format!("{stem}_{}.{ext}", timestamp.format("%Y%m%d")))
}

/// Appends one JSON object per line to `interactions_YYYYMMDD.jsonl` and
/// `session_summaries_YYYYMMDD.jsonl`.
#[derive(Debug)]
pub struct JsonlSink {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlSink {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, TelemetryError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    fn append<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), TelemetryError> {
        let mut line = serde_json::to_string(value)?;
        line.push('\n');
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }
}

impl TelemetrySink for JsonlSink {
    fn record_interaction(&self, record: &InteractionRecord) -> Result<(), TelemetryError> {
        let path = daily_file(&self.dir, "interactions", &record.timestamp, "jsonl");
        self.append(&path, record)
    }

    fn record_summary(&self, summary: &SessionSummary) -> Result<(), TelemetryError> {
        let path = daily_file(&self.dir, "session_summaries", &summary.timestamp, "jsonl");
        self.append(&path, summary)
    }
}

/// Appends rows to `interactions_YYYYMMDD.csv` and
/// `session_summaries_YYYYMMDD.csv`, writing a header into new files.
#[derive(Debug)]
pub struct CsvSink {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl CsvSink {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, TelemetryError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    fn append<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), TelemetryError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let is_new = !path.exists();
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(is_new)
            .from_writer(file);
        writer.serialize(value)?;
        writer.flush()?;
        Ok(())
    }
}

impl TelemetrySink for CsvSink {
    fn record_interaction(&self, record: &InteractionRecord) -> Result<(), TelemetryError> {
        let path = daily_file(&self.dir, "interactions", &record.timestamp, "csv");
        self.append(&path, record)
    }

    fn record_summary(&self, summary: &SessionSummary) -> Result<(), TelemetryError> {
        let path = daily_file(&self.dir, "session_summaries", &summary.timestamp, "csv");
        self.append(&path, summary)
    }
}

/// Creates the sink selected by the telemetry configuration, or `None` when
/// telemetry is disabled.
pub fn build_sink(
    config: &TelemetryConfig,
    log_dir: impl Into<PathBuf>,
) -> Result<Option<Box<dyn TelemetrySink>>, TelemetryError> {
    if !config.enabled {
        return Ok(None);
    }
    let sink: Box<dyn TelemetrySink> = match config.format {
        TelemetryFormat::Jsonl => Box::new(JsonlSink::new(log_dir)?),
        TelemetryFormat::Csv => Box::new(CsvSink::new(log_dir)?),
    };
    Ok(Some(sink))
}
