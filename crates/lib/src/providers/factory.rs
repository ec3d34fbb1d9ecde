//! # Generator Factory
//!
//! Builds a response generator from its configuration. Living in the library
//! lets every front end (server, cli) create providers the same way.

use crate::{
    config::GeneratorConfig,
    errors::GenerationError,
    providers::ai::{
        gemini::GeminiGenerator, huggingface::HuggingFaceGenerator, local::LocalGenerator,
        ResponseGenerator,
    },
};
use tracing::info;

/// Creates the generator named by `config.provider`.
pub fn create_generator(
    config: &GeneratorConfig,
) -> Result<Box<dyn ResponseGenerator>, GenerationError> {
    let timeout = config.timeout();
    let generator: Box<dyn ResponseGenerator> = match config.provider.as_str() {
        "gemini" => {
            let api_key = api_key(config).ok_or_else(|| {
                GenerationError::MissingConfig(
                    "api_key is required for the gemini provider".to_string(),
                )
            })?;
            let api_url = match (&config.api_url, &config.model_name) {
                (Some(url), _) if !url.is_empty() => url.clone(),
                (_, Some(model)) => GeminiGenerator::url_for_model(model),
                _ => {
                    return Err(GenerationError::MissingConfig(
                        "gemini needs either api_url or model_name".to_string(),
                    ))
                }
            };
            info!("Configuring Gemini generator with URL: {}", api_url);
            Box::new(GeminiGenerator::new(api_url, api_key, timeout)?)
        }
        "local" => {
            let api_url = required_url(config)?;
            info!("Configuring local generator with URL: {}", api_url);
            Box::new(LocalGenerator::new(
                api_url,
                api_key(config),
                config.model_name.clone().filter(|m| !m.is_empty()),
                timeout,
            )?)
        }
        "huggingface" => {
            let api_url = required_url(config)?;
            info!("Configuring Hugging Face generator with URL: {}", api_url);
            Box::new(HuggingFaceGenerator::new(
                api_url,
                api_key(config),
                timeout,
            )?)
        }
        other => return Err(GenerationError::UnsupportedProvider(other.to_string())),
    };
    Ok(generator)
}

fn required_url(config: &GeneratorConfig) -> Result<String, GenerationError> {
    config
        .api_url
        .clone()
        .filter(|url| !url.is_empty())
        .ok_or_else(|| {
            GenerationError::MissingConfig(format!(
                "api_url is required for the {} provider",
                config.provider
            ))
        })
}

// Placeholders for unset variables are substituted as empty strings.
fn api_key(config: &GeneratorConfig) -> Option<String> {
    config.api_key.clone().filter(|key| !key.is_empty())
}
