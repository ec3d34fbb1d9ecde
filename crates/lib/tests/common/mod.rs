#![allow(dead_code)]
//! # Common Test Utilities
//!
//! Shared helpers for the library tests: tracing setup, a scripted mock
//! generator and a couple of assistant constructors.

use async_trait::async_trait;
use climate_qa::{
    errors::{GenerationError, TelemetryError},
    Assistant, GenerationOptions, InteractionRecord, PostProcessor, ResponseGenerator, Session,
    SessionSummary, TelemetrySink,
};
use dotenvy::dotenv;
use std::sync::{Arc, Once, RwLock};

static INIT: Once = Once::new();

/// Initializes the tracing subscriber and loads .env for tests.
pub fn setup_tracing() {
    INIT.call_once(|| {
        dotenv().ok();
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

// --- Mock Generator for Logic Testing ---
#[derive(Clone, Debug)]
pub struct MockGenerator {
    pub call_history: Arc<RwLock<Vec<(String, GenerationOptions)>>>,
    pub responses: Arc<RwLock<Vec<String>>>,
    pub fail: bool,
}

impl MockGenerator {
    /// Replies with `responses` in order, then with a default answer.
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            call_history: Arc::new(RwLock::new(Vec::new())),
            responses: Arc::new(RwLock::new(responses.into_iter().rev().collect())),
            fail: false,
        }
    }

    /// A generator whose every call fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(vec![])
        }
    }

    pub fn calls(&self) -> usize {
        self.call_history.read().unwrap().len()
    }
}

#[async_trait]
impl ResponseGenerator for MockGenerator {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, GenerationError> {
        self.call_history
            .write()
            .unwrap()
            .push((prompt.to_string(), *options));

        if self.fail {
            return Err(GenerationError::Api("mock generator failure".to_string()));
        }
        if let Some(response) = self.responses.write().unwrap().pop() {
            Ok(response)
        } else {
            Ok("Global warming is the long-term rise in Earth's average temperature.".to_string())
        }
    }
}

// --- In-memory telemetry sink ---
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    pub interactions: Arc<RwLock<Vec<InteractionRecord>>>,
    pub summaries: Arc<RwLock<Vec<SessionSummary>>>,
}

impl TelemetrySink for RecordingSink {
    fn record_interaction(&self, record: &InteractionRecord) -> Result<(), TelemetryError> {
        self.interactions.write().unwrap().push(record.clone());
        Ok(())
    }

    fn record_summary(&self, summary: &SessionSummary) -> Result<(), TelemetryError> {
        self.summaries.write().unwrap().push(summary.clone());
        Ok(())
    }
}

/// A sink whose writes always fail.
#[derive(Clone, Debug, Default)]
pub struct BrokenSink;

impl TelemetrySink for BrokenSink {
    fn record_interaction(&self, _record: &InteractionRecord) -> Result<(), TelemetryError> {
        Err(TelemetryError::Io(std::io::Error::other("disk full")))
    }

    fn record_summary(&self, _summary: &SessionSummary) -> Result<(), TelemetryError> {
        Err(TelemetryError::Io(std::io::Error::other("disk full")))
    }
}

/// An assistant over the built-in lexicon with default post-processing.
pub fn assistant_with(generator: MockGenerator) -> Assistant {
    Assistant::builder()
        .generator(Box::new(generator))
        .post_processor(PostProcessor::default())
        .build()
        .expect("assistant builds with a generator")
}

/// A session with reproducible conversational replies.
pub fn seeded_session() -> Session {
    Session::with_seed("test-session", 7)
}
