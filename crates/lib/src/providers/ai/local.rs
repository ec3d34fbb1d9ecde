use crate::{
    errors::GenerationError,
    providers::ai::{GenerationOptions, ResponseGenerator},
    templates::GENERATOR_SYSTEM_PROMPT,
};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, time::Duration};
use tracing::debug;

// --- OpenAI-compatible request and response structures ---

#[derive(Serialize)]
struct LocalAiRequest<'a> {
    messages: Vec<LocalAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
    // Extension fields understood by llama.cpp, vLLM and similar servers.
    top_k: u32,
    repetition_penalty: f32,
    stream: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct LocalAiMessage {
    role: String,
    content: String,
}

#[derive(Deserialize, Debug)]
struct LocalAiResponse {
    choices: Vec<LocalAiChoice>,
}

#[derive(Deserialize, Debug)]
struct LocalAiChoice {
    message: LocalAiMessage,
}

// --- Local Provider implementation ---

/// A generator backed by a local or OpenAI-compatible chat-completions API.
#[derive(Clone, Debug)]
pub struct LocalGenerator {
    client: ReqwestClient,
    api_url: String,
    api_key: Option<String>,
    model: Option<String>,
}

impl LocalGenerator {
    /// Creates a new `LocalGenerator`.
    pub fn new(
        api_url: String,
        api_key: Option<String>,
        model: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, GenerationError> {
        let mut builder = ReqwestClient::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(GenerationError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_url,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl ResponseGenerator for LocalGenerator {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, GenerationError> {
        let messages = vec![
            LocalAiMessage {
                role: "system".to_string(),
                content: GENERATOR_SYSTEM_PROMPT.to_string(),
            },
            LocalAiMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            },
        ];

        let request_body = LocalAiRequest {
            messages,
            model: self.model.as_deref(),
            temperature: options.temperature,
            top_p: options.top_p,
            max_tokens: options.max_length,
            top_k: options.top_k,
            repetition_penalty: options.repetition_penalty,
            stream: false,
        };

        let mut request_builder = self.client.post(&self.api_url);

        if let Some(key) = &self.api_key {
            request_builder = request_builder.bearer_auth(key);
        }

        debug!(api_url = %self.api_url, "--> Sending prompt to local generator");

        let response = request_builder
            .json(&request_body)
            .send()
            .await
            .map_err(GenerationError::Request)?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api(error_text));
        }

        let local_ai_response: LocalAiResponse = response
            .json()
            .await
            .map_err(GenerationError::Deserialization)?;

        local_ai_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(GenerationError::EmptyResponse)
    }
}
