use thiserror::Error;

/// Errors raised while calling an external response generator.
///
/// These never leave `Assistant::process`; they are logged and replaced by
/// the fixed apology before a reply is returned.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to generator: {0}")]
    Request(reqwest::Error),
    #[error("Failed to deserialize generator response: {0}")]
    Deserialization(reqwest::Error),
    #[error("Generator API returned an error: {0}")]
    Api(String),
    #[error("Generator returned no text")]
    EmptyResponse,
    #[error("Generator is not configured: {0}")]
    MissingConfig(String),
    #[error("Unsupported generator provider: {0}")]
    UnsupportedProvider(String),
}

/// Errors raised while building a [`crate::lexicon::Lexicon`].
#[derive(Error, Debug)]
pub enum LexiconError {
    #[error("Duplicate category '{0}' in lexicon")]
    DuplicateCategory(String),
    #[error("Category '{0}' must have a positive weight, got {1}")]
    NonPositiveWeight(String, f64),
    #[error("Category '{0}' has no trigger phrases")]
    EmptyCategory(String),
    #[error("Lexicon groups overlap: {0}")]
    OverlappingGroups(String),
    #[error("Failed to parse lexicon YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Failed to read lexicon file: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by telemetry sinks.
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Telemetry I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize telemetry record: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to write CSV telemetry record: {0}")]
    Csv(#[from] csv::Error),
}

/// Errors raised while loading the application configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An error from the underlying `config` crate.
    #[error("Configuration error: {0}")]
    General(#[from] config::ConfigError),
    /// A required configuration file was not found.
    #[error("{0}")]
    NotFound(String),
    /// A value was present but could not be used.
    #[error("Invalid configuration value for '{0}': {1}")]
    Invalid(String, String),
    #[error("Failed to read config file '{0}': {1}")]
    Read(String, std::io::Error),
}
