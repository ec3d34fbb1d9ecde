//! # Test Utilities
//!
//! Mocks shared by the front-end crates' integration tests: a scripted
//! response generator and an in-memory telemetry sink.

use async_trait::async_trait;
use climate_qa::{
    errors::{GenerationError, TelemetryError},
    GenerationOptions, InteractionRecord, ResponseGenerator, SessionSummary, TelemetrySink,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// --- Mock Generator ---

/// Answers prompts from pre-programmed responses and records every call.
#[derive(Clone, Debug, Default)]
pub struct MockGenerator {
    responses: Arc<Mutex<HashMap<String, String>>>,
    calls: Arc<Mutex<Vec<String>>>,
    failing: bool,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// A generator whose every call fails with an API error.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Pre-programs a response for any prompt containing `key`.
    pub fn add_response(&self, key: &str, response: &str) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert(key.to_string(), response.to_string());
    }

    /// Retrieves the recorded prompts for assertion.
    pub fn get_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResponseGenerator for MockGenerator {
    async fn generate(
        &self,
        prompt: &str,
        _options: &GenerationOptions,
    ) -> Result<String, GenerationError> {
        self.calls.lock().unwrap().push(prompt.to_string());

        if self.failing {
            return Err(GenerationError::Api("mock generator failure".to_string()));
        }

        let responses = self.responses.lock().unwrap();
        let response = responses
            .iter()
            .find(|(key, _)| prompt.contains(key.as_str()))
            .map(|(_, response)| response.clone())
            .unwrap_or_else(|| {
                "Climate change is the long-term shift in global temperatures and weather patterns."
                    .to_string()
            });
        Ok(response)
    }
}

// --- Memory Sink ---

/// Keeps telemetry records in memory.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    interactions: Arc<Mutex<Vec<InteractionRecord>>>,
    summaries: Arc<Mutex<Vec<SessionSummary>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interactions(&self) -> Vec<InteractionRecord> {
        self.interactions.lock().unwrap().clone()
    }

    pub fn summaries(&self) -> Vec<SessionSummary> {
        self.summaries.lock().unwrap().clone()
    }
}

impl TelemetrySink for MemorySink {
    fn record_interaction(&self, record: &InteractionRecord) -> Result<(), TelemetryError> {
        self.interactions.lock().unwrap().push(record.clone());
        Ok(())
    }

    fn record_summary(&self, summary: &SessionSummary) -> Result<(), TelemetryError> {
        self.summaries.lock().unwrap().push(summary.clone());
        Ok(())
    }
}
