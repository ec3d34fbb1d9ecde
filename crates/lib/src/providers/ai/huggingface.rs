use crate::{
    errors::GenerationError,
    providers::ai::{GenerationOptions, ResponseGenerator},
};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, time::Duration};
use tracing::debug;

// --- Hugging Face inference request and response structures ---

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
    options: InferenceOptions,
}

#[derive(Serialize)]
struct InferenceParameters {
    max_length: u32,
    min_length: u32,
    temperature: f32,
    top_p: f32,
    top_k: u32,
    repetition_penalty: f32,
    num_beams: u32,
    do_sample: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    no_repeat_ngram_size: Option<u32>,
}

#[derive(Serialize)]
struct InferenceOptions {
    wait_for_model: bool,
}

#[derive(Deserialize, Debug)]
struct GeneratedText {
    generated_text: String,
}

/// Endpoints answer with either a list of generations or a single one.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum InferenceResponse {
    Many(Vec<GeneratedText>),
    One(GeneratedText),
}

// --- Hugging Face Provider implementation ---

/// A generator backed by a Hugging Face text2text inference endpoint, the
/// usual host for a fine-tuned sequence-to-sequence model.
///
/// Unlike the chat providers, the prompt is sent as-is with no system
/// instruction, and every decoding option is forwarded.
#[derive(Clone, Debug)]
pub struct HuggingFaceGenerator {
    client: ReqwestClient,
    api_url: String,
    api_key: Option<String>,
}

impl HuggingFaceGenerator {
    pub fn new(
        api_url: String,
        api_key: Option<String>,
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
        })
    }
}

#[async_trait]
impl ResponseGenerator for HuggingFaceGenerator {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, GenerationError> {
        let request_body = InferenceRequest {
            inputs: prompt,
            parameters: InferenceParameters {
                max_length: options.max_length,
                min_length: options.min_length,
                temperature: options.temperature,
                top_p: options.top_p,
                top_k: options.top_k,
                repetition_penalty: options.repetition_penalty,
                num_beams: options.num_beams,
                do_sample: options.sampling,
                no_repeat_ngram_size: options.no_repeat_ngram_size,
            },
            options: InferenceOptions {
                wait_for_model: true,
            },
        };

        let mut request_builder = self.client.post(&self.api_url);
        if let Some(key) = &self.api_key {
            request_builder = request_builder.bearer_auth(key);
        }

        debug!(api_url = %self.api_url, "--> Sending prompt to Hugging Face endpoint");

        let response = request_builder
            .json(&request_body)
            .send()
            .await
            .map_err(GenerationError::Request)?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api(error_text));
        }

        let inference: InferenceResponse = response
            .json()
            .await
            .map_err(GenerationError::Deserialization)?;

        match inference {
            InferenceResponse::Many(outputs) => outputs
                .into_iter()
                .next()
                .map(|o| o.generated_text)
                .ok_or(GenerationError::EmptyResponse),
            InferenceResponse::One(output) => Ok(output.generated_text),
        }
    }
}
