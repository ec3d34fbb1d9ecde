//! # Assistant
//!
//! The single entry point front ends call: process one utterance against a
//! [`Session`] and return the reply text with its routing metadata.

use crate::{
    config::AppConfig,
    constants::PROMPT_PREFIX,
    errors::{ConfigError, GenerationError, TelemetryError},
    lexicon::Lexicon,
    post_process::PostProcessor,
    providers::{
        ai::{GenerationOptions, ResponseGenerator},
        factory::create_generator,
    },
    router::{IntentRouter, Signals, Strategy},
    session::Session,
    telemetry::{build_sink, InteractionRecord, SessionSummary, TelemetrySink},
    templates::{
        pick, COMPLIMENT_RESPONSES, GENERATION_APOLOGY, GREETING_RESPONSES,
        LOW_CONFIDENCE_REDIRECT, OFF_DOMAIN_REJECTION_TEMPLATE, SCIENCE_BRIDGE_TEMPLATE,
    },
};
use chrono::Utc;
use serde::Serialize;
use std::{
    fmt,
    sync::Arc,
    time::{Duration, Instant},
};
use tracing::{error, info, warn};

/// Routing details returned alongside the reply text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplyMetadata {
    pub strategy: Strategy,
    pub is_in_domain: bool,
    pub confidence: f64,
    pub detection_reason: String,
    pub matched_categories: Vec<String>,
    pub matched_phrases: Vec<String>,
    pub off_domain_topic: Option<String>,
    /// Seconds spent in the generator; zero for every other strategy.
    pub generation_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub text: String,
    pub metadata: ReplyMetadata,
}

/// Routes utterances and builds replies. Shared freely between tasks.
pub struct Assistant {
    lexicon: Arc<Lexicon>,
    router: IntentRouter,
    generator: Box<dyn ResponseGenerator>,
    options: GenerationOptions,
    post_processor: PostProcessor,
    telemetry: Option<Box<dyn TelemetrySink>>,
}

impl fmt::Debug for Assistant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Assistant")
            .field("generator", &self.generator)
            .field("options", &self.options)
            .field("post_processor", &self.post_processor)
            .field("telemetry", &self.telemetry.is_some())
            .finish_non_exhaustive()
    }
}

impl Assistant {
    pub fn builder() -> AssistantBuilder {
        AssistantBuilder::new()
    }

    /// Builds an assistant from the application configuration: lexicon,
    /// generator, decoding options, post-processing and telemetry sink.
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        let lexicon = config
            .load_lexicon()
            .map_err(|e| ConfigError::Invalid("lexicon_path".to_string(), e.to_string()))?;
        let generator = create_generator(&config.generator)
            .map_err(|e| ConfigError::Invalid("generator".to_string(), e.to_string()))?;
        let options = config.generation.resolve()?;

        let mut builder = AssistantBuilder::new()
            .lexicon(Arc::new(lexicon))
            .generator(generator)
            .options(options)
            .post_processor(PostProcessor::new(config.post_processing.min_words))
            .science_bridge(config.science_bridge);

        let sink = build_sink(&config.telemetry, &config.log_dir)
            .map_err(|e| ConfigError::Invalid("log_dir".to_string(), e.to_string()))?;
        if let Some(sink) = sink {
            builder = builder.telemetry(sink);
        }

        builder
            .build()
            .map_err(|e| ConfigError::Invalid("generator".to_string(), e.to_string()))
    }

    pub fn lexicon(&self) -> &Arc<Lexicon> {
        &self.lexicon
    }

    pub fn router(&self) -> &IntentRouter {
        &self.router
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    /// Processes one utterance. Never fails: generator faults become a fixed
    /// apology and telemetry faults are only logged.
    pub async fn process(&self, session: &mut Session, utterance: &str) -> Reply {
        let (strategy, signals) = self.router.route(utterance);

        let (text, generation_time) = match strategy {
            Strategy::Answer => self.answer(utterance).await,
            Strategy::Greeting => (
                pick(GREETING_RESPONSES, session.rng_mut()).to_string(),
                Duration::ZERO,
            ),
            Strategy::Compliment => (
                pick(COMPLIMENT_RESPONSES, session.rng_mut()).to_string(),
                Duration::ZERO,
            ),
            Strategy::OffDomainReject => (off_domain_message(&signals), Duration::ZERO),
            Strategy::ScienceBridge => (science_bridge_message(&signals), Duration::ZERO),
            Strategy::LowConfidenceRedirect => {
                (LOW_CONFIDENCE_REDIRECT.to_string(), Duration::ZERO)
            }
        };

        session.stats_mut().record(strategy, generation_time);

        let metadata = ReplyMetadata {
            strategy,
            is_in_domain: signals.verdict.is_in_domain,
            confidence: signals.verdict.confidence,
            detection_reason: detection_reason(strategy, &signals),
            matched_categories: signals.verdict.matched_categories.clone(),
            matched_phrases: signals.verdict.matched_phrases.clone(),
            off_domain_topic: signals.off_domain.as_ref().map(|t| t.topic.clone()),
            generation_time: generation_time.as_secs_f64(),
        };

        self.emit(&InteractionRecord {
            timestamp: Utc::now(),
            session_id: session.id().to_string(),
            question: utterance.to_string(),
            response: text.clone(),
            routing_strategy: strategy,
            is_in_domain: metadata.is_in_domain,
            confidence: metadata.confidence,
            detection_reason: metadata.detection_reason.clone(),
            generation_time: metadata.generation_time,
            question_length: utterance.chars().count(),
            response_length: text.chars().count(),
        });

        Reply { text, metadata }
    }

    /// Ends a session: returns its summary and hands it to the telemetry sink.
    pub fn finish_session(&self, session: &Session) -> SessionSummary {
        let summary = session.summary();
        info!(
            session_id = %summary.session_id,
            total_questions = summary.total_questions,
            answered = summary.answered,
            "Session finished"
        );
        if let Some(sink) = &self.telemetry {
            if let Err(e) = sink.record_summary(&summary) {
                log_sink_failure(&e);
            }
        }
        summary
    }

    async fn answer(&self, utterance: &str) -> (String, Duration) {
        let question = utterance.trim();
        let prompt = format!("{PROMPT_PREFIX}{question}");
        let started = Instant::now();
        let result = self.generator.generate(&prompt, &self.options).await;
        let elapsed = started.elapsed();

        match result {
            Ok(raw) => (self.post_processor.clean(&raw, question), elapsed),
            Err(e) => {
                error!("Response generation failed: {}", e);
                (GENERATION_APOLOGY.to_string(), elapsed)
            }
        }
    }

    fn emit(&self, record: &InteractionRecord) {
        if let Some(sink) = &self.telemetry {
            if let Err(e) = sink.record_interaction(record) {
                log_sink_failure(&e);
            }
        }
    }
}

fn log_sink_failure(e: &TelemetryError) {
    warn!("Failed to write telemetry record: {}", e);
}

fn off_domain_message(signals: &Signals) -> String {
    let Some(topic) = &signals.off_domain else {
        return LOW_CONFIDENCE_REDIRECT.to_string();
    };
    let examples: Vec<&str> = topic
        .matched_phrases
        .iter()
        .take(3)
        .map(String::as_str)
        .collect();
    OFF_DOMAIN_REJECTION_TEMPLATE
        .replace("{topic}", &topic.display_name())
        .replace("{examples}", &examples.join(", "))
}

fn science_bridge_message(signals: &Signals) -> String {
    let Some(bridge) = &signals.science_bridge else {
        return LOW_CONFIDENCE_REDIRECT.to_string();
    };
    SCIENCE_BRIDGE_TEMPLATE
        .replace("{topic}", &bridge.topic)
        .replace("{explanation}", &bridge.explanation)
}

fn detection_reason(strategy: Strategy, signals: &Signals) -> String {
    match strategy {
        Strategy::Greeting => "Greeting detected".to_string(),
        Strategy::Compliment => "Compliment detected".to_string(),
        Strategy::OffDomainReject => match &signals.off_domain {
            Some(topic) => format!("Off-domain topic: {}", topic.topic),
            None => signals.verdict.reason(),
        },
        Strategy::ScienceBridge => match &signals.science_bridge {
            Some(bridge) => format!("Science bridge: {}", bridge.topic),
            None => signals.verdict.reason(),
        },
        Strategy::LowConfidenceRedirect | Strategy::Answer => signals.verdict.reason(),
    }
}

/// A builder for [`Assistant`].
///
/// Only the generator is required; everything else falls back to the
/// built-in lexicon, the balanced preset and default post-processing.
#[derive(Default)]
pub struct AssistantBuilder {
    lexicon: Option<Arc<Lexicon>>,
    generator: Option<Box<dyn ResponseGenerator>>,
    options: Option<GenerationOptions>,
    post_processor: Option<PostProcessor>,
    telemetry: Option<Box<dyn TelemetrySink>>,
    science_bridge: Option<bool>,
}

impl AssistantBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lexicon(mut self, lexicon: Arc<Lexicon>) -> Self {
        self.lexicon = Some(lexicon);
        self
    }

    pub fn generator(mut self, generator: Box<dyn ResponseGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn options(mut self, options: GenerationOptions) -> Self {
        self.options = Some(options);
        self
    }

    pub fn post_processor(mut self, post_processor: PostProcessor) -> Self {
        self.post_processor = Some(post_processor);
        self
    }

    pub fn telemetry(mut self, sink: Box<dyn TelemetrySink>) -> Self {
        self.telemetry = Some(sink);
        self
    }

    /// Enables or disables the science-bridge rule. Enabled by default.
    pub fn science_bridge(mut self, enabled: bool) -> Self {
        self.science_bridge = Some(enabled);
        self
    }

    /// Builds the `Assistant`, failing only when no generator was supplied.
    pub fn build(self) -> Result<Assistant, GenerationError> {
        let generator = self.generator.ok_or_else(|| {
            GenerationError::MissingConfig("a response generator is required".to_string())
        })?;
        let lexicon = self.lexicon.unwrap_or_else(|| Arc::new(Lexicon::built_in()));
        let router = IntentRouter::new(lexicon.clone(), self.science_bridge.unwrap_or(true));

        Ok(Assistant {
            lexicon,
            router,
            generator,
            options: self.options.unwrap_or_default(),
            post_processor: self.post_processor.unwrap_or_default(),
            telemetry: self.telemetry,
        })
    }
}
