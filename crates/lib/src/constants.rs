//! # Shared Constants
//!
//! Fixed thresholds of the classification pipeline and the default locations
//! used by the front ends. The thresholds are part of the routing policy and
//! are deliberately not configurable.

/// Raw-score ratio multiplier applied before clamping confidence to 1.0.
pub const CONFIDENCE_SCALE: f64 = 10.0;

/// An utterance is in-domain when its confidence is strictly above this value.
pub const IN_DOMAIN_THRESHOLD: f64 = 0.08;

/// Off-domain utterances are only rejected when confidence is below this value.
pub const OFF_DOMAIN_CONFIDENCE_CEILING: f64 = 0.2;

/// Utterances below this confidence are always redirected.
pub const LOW_CONFIDENCE_FLOOR: f64 = 0.05;

/// Greetings accepted anywhere in very short utterances.
pub const SHORT_GREETINGS: [&str; 3] = ["hi", "hello", "hey"];

/// Word limit for the short-utterance greeting relaxation.
pub const SHORT_GREETING_MAX_WORDS: usize = 2;

/// Default minimum word count for a generated answer.
pub const DEFAULT_MIN_ANSWER_WORDS: usize = 6;

/// Default directory for telemetry files.
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Server sessions without a question for this long are ended.
pub const DEFAULT_SESSION_IDLE_SECS: u64 = 1800;

/// How often the server looks for idle sessions.
pub const DEFAULT_SESSION_SWEEP_SECS: u64 = 60;

/// Prefix placed before the user question in the generation prompt.
pub const PROMPT_PREFIX: &str = "question: ";
