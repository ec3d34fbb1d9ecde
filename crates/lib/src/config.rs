//! # Application Configuration
//!
//! Configuration shared by every front end, loaded in layers with the
//! `config` crate:
//!
//! 1. Built-in defaults.
//! 2. A YAML file (`config.yml`, or `config.{GENERATOR_PROVIDER}.yml` when it
//!    is absent) with `${VAR}` placeholders substituted from the environment.
//! 3. `PORT` from the environment.
//! 4. `CLIMATE_QA_`-prefixed variables for nested keys, e.g.
//!    `CLIMATE_QA_GENERATOR__MODEL_NAME`.

use crate::{
    constants::{
        DEFAULT_LOG_DIR, DEFAULT_MIN_ANSWER_WORDS, DEFAULT_SESSION_IDLE_SECS,
        DEFAULT_SESSION_SWEEP_SECS,
    },
    errors::{ConfigError, LexiconError},
    lexicon::Lexicon,
    providers::ai::GenerationOptions,
};
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use regex::Regex;
use serde::Deserialize;
use std::{env, fs, path::Path, sync::LazyLock, time::Duration};
use tracing::info;

static ENV_PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}").expect("valid placeholder regex")
});

/// The root configuration structure, mapping directly to `config.yml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The port for the HTTP server. Overridden by the `PORT` env var.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory receiving telemetry files.
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub post_processing: PostProcessingConfig,
    /// Enables the science-bridge routing rule.
    #[serde(default = "default_true")]
    pub science_bridge: bool,
    /// Optional YAML lexicon replacing the built-in one.
    #[serde(default)]
    pub lexicon_path: Option<String>,
    #[serde(default)]
    pub sessions: SessionsConfig,
}

fn default_port() -> u16 {
    9090
}

fn default_log_dir() -> String {
    DEFAULT_LOG_DIR.to_string()
}

fn default_true() -> bool {
    true
}

/// Where and how interaction records are written.
#[derive(Debug, Deserialize, Clone)]
pub struct TelemetryConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub format: TelemetryFormat,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            format: TelemetryFormat::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TelemetryFormat {
    #[default]
    Jsonl,
    Csv,
}

/// Connection settings for the response generator.
#[derive(Debug, Deserialize, Clone)]
pub struct GeneratorConfig {
    /// `local`, `gemini` or `huggingface`.
    pub provider: String,
    /// Optional for Gemini, where it is derived from the model name.
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub model_name: Option<String>,
    /// Request timeout applied by the HTTP client.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl GeneratorConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// A decoding preset plus optional per-field overrides.
#[derive(Debug, Deserialize, Clone)]
pub struct GenerationConfig {
    #[serde(default = "default_preset")]
    pub preset: String,
    pub max_length: Option<u32>,
    pub min_length: Option<u32>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub top_k: Option<u32>,
    pub repetition_penalty: Option<f32>,
    pub num_beams: Option<u32>,
    /// Blocked n-gram size; `0` turns the block off.
    pub no_repeat_ngram_size: Option<u32>,
    pub sampling: Option<bool>,
}

fn default_preset() -> String {
    "balanced".to_string()
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            preset: default_preset(),
            max_length: None,
            min_length: None,
            temperature: None,
            top_p: None,
            top_k: None,
            repetition_penalty: None,
            num_beams: None,
            no_repeat_ngram_size: None,
            sampling: None,
        }
    }
}

impl GenerationConfig {
    /// Resolves the preset and applies the overrides.
    pub fn resolve(&self) -> Result<GenerationOptions, ConfigError> {
        let mut options = GenerationOptions::preset(&self.preset).ok_or_else(|| {
            ConfigError::Invalid("generation.preset".to_string(), self.preset.clone())
        })?;
        if let Some(v) = self.max_length {
            options.max_length = v;
        }
        if let Some(v) = self.min_length {
            options.min_length = v;
        }
        if let Some(v) = self.temperature {
            options.temperature = v;
        }
        if let Some(v) = self.top_p {
            options.top_p = v;
        }
        if let Some(v) = self.top_k {
            options.top_k = v;
        }
        if let Some(v) = self.repetition_penalty {
            options.repetition_penalty = v;
        }
        if let Some(v) = self.num_beams {
            options.num_beams = v;
        }
        if let Some(v) = self.no_repeat_ngram_size {
            options.no_repeat_ngram_size = (v > 0).then_some(v);
        }
        if let Some(v) = self.sampling {
            options.sampling = v;
        }
        Ok(options)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PostProcessingConfig {
    #[serde(default = "default_min_words")]
    pub min_words: usize,
}

fn default_min_words() -> usize {
    DEFAULT_MIN_ANSWER_WORDS
}

impl Default for PostProcessingConfig {
    fn default() -> Self {
        Self {
            min_words: default_min_words(),
        }
    }
}

/// Idle expiry of server sessions.
#[derive(Debug, Deserialize, Clone)]
pub struct SessionsConfig {
    #[serde(default = "default_idle_secs")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_sweep_secs")]
    pub sweep_interval_secs: u64,
}

fn default_idle_secs() -> u64 {
    DEFAULT_SESSION_IDLE_SECS
}

fn default_sweep_secs() -> u64 {
    DEFAULT_SESSION_SWEEP_SECS
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: default_idle_secs(),
            sweep_interval_secs: default_sweep_secs(),
        }
    }
}

impl SessionsConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    /// Never zero, so the sweep interval is always valid.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

impl AppConfig {
    /// The configured lexicon file, or the built-in lexicon.
    pub fn load_lexicon(&self) -> Result<Lexicon, LexiconError> {
        match &self.lexicon_path {
            Some(path) => Lexicon::from_path(path),
            None => Ok(Lexicon::built_in()),
        }
    }
}

// Reads a file and substitutes `${VAR}` placeholders from the environment.
// Returns Ok(None) if the file does not exist.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_string(), e))?;

    let expanded = ENV_PLACEHOLDER_RE.replace_all(&content, |caps: &regex::Captures| {
        env::var(&caps["var"]).unwrap_or_default()
    });

    Ok(Some(expanded.into_owned()))
}

/// Loads the application configuration from a file and environment variables.
///
/// With no override, `config.yml` in the working directory is used if present,
/// otherwise `config.{GENERATOR_PROVIDER}.yml` (default provider `local`).
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = ConfigBuilder::builder()
        .set_default("port", i64::from(default_port()))?
        .set_default("log_dir", default_log_dir())?;

    let main_config_path = match config_path_override {
        Some(path) => path.to_string(),
        None if Path::new("config.yml").exists() => {
            info!("Loading user-defined configuration from 'config.yml'.");
            "config.yml".to_string()
        }
        None => {
            let provider = env::var("GENERATOR_PROVIDER").unwrap_or_else(|_| "local".to_string());
            let fallback = format!("config.{provider}.yml");
            info!("'config.yml' not found. Falling back to '{fallback}' based on GENERATOR_PROVIDER='{provider}'.");
            fallback
        }
    };

    let main_content = read_and_substitute(&main_config_path)?.ok_or_else(|| {
        ConfigError::NotFound(format!(
            "Config file not found at '{main_config_path}'. Create 'config.yml' or set GENERATOR_PROVIDER to load a template ('local', 'gemini' or 'huggingface')."
        ))
    })?;
    builder = builder.add_source(File::from_str(&main_content, FileFormat::Yaml));

    if let Ok(port) = env::var("PORT") {
        builder = builder.set_override("port", port)?;
    }

    let settings = builder
        .add_source(
            Environment::with_prefix("CLIMATE_QA")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    let config: AppConfig = settings.try_deserialize()?;

    // Fail early rather than on the first answered question.
    config.generation.resolve()?;

    Ok(config)
}
