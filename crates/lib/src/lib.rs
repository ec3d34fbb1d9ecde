//! # Climate QA
//!
//! A domain-restricted question-answering assistant for climate and
//! environment education. Each utterance is scored against a weighted
//! lexicon, checked for off-domain topics and conversational phrases, and
//! routed to exactly one response strategy. Only in-domain questions reach
//! the external response generator, whose output is cleaned before display.
//!
//! ```no_run
//! use climate_qa::{config::get_config, Assistant, Session};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = get_config(None)?;
//! let assistant = Assistant::from_config(&config)?;
//! let mut session = Session::new();
//! let reply = assistant.process(&mut session, "What is global warming?").await;
//! println!("{} ({})", reply.text, reply.metadata.strategy);
//! # Ok(())
//! # }
//! ```

pub mod assistant;
pub mod config;
pub mod constants;
pub mod conversational;
pub mod errors;
pub mod lexicon;
pub mod normalize;
pub mod post_process;
pub mod providers;
pub mod router;
pub mod scorer;
pub mod session;
pub mod telemetry;
pub mod templates;
pub mod topic;

pub use assistant::{Assistant, AssistantBuilder, Reply, ReplyMetadata};
pub use errors::{ConfigError, GenerationError, LexiconError, TelemetryError};
pub use lexicon::Lexicon;
pub use post_process::PostProcessor;
pub use providers::ai::{GenerationOptions, ResponseGenerator};
pub use router::{IntentRouter, Strategy};
pub use scorer::{RelevanceScorer, RelevanceVerdict};
pub use session::{Session, SessionStats};
pub use telemetry::{InteractionRecord, SessionSummary, TelemetrySink};
pub use topic::{OffDomainTopic, TopicDetector};
