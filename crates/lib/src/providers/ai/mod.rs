pub mod gemini;
pub mod huggingface;
pub mod local;

use crate::errors::GenerationError;
use async_trait::async_trait;
use dyn_clone::DynClone;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Decoding parameters passed through to a response generator.
///
/// Providers map the fields they understand onto their own request format and
/// ignore the rest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    pub max_length: u32,
    pub min_length: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub repetition_penalty: f32,
    pub num_beams: u32,
    pub sampling: bool,
    #[serde(default)]
    pub no_repeat_ngram_size: Option<u32>,
}

impl GenerationOptions {
    /// Short, focused answers with strong anti-repetition.
    pub fn balanced() -> Self {
        Self {
            max_length: 70,
            min_length: 18,
            temperature: 0.5,
            top_p: 0.8,
            top_k: 40,
            repetition_penalty: 2.0,
            num_beams: 1,
            sampling: true,
            no_repeat_ngram_size: Some(3),
        }
    }

    /// Longer answers with lighter repetition control and two beams.
    pub fn standard() -> Self {
        Self {
            max_length: 100,
            min_length: 20,
            temperature: 0.7,
            top_p: 0.9,
            top_k: 50,
            repetition_penalty: 1.2,
            num_beams: 2,
            sampling: true,
            no_repeat_ngram_size: None,
        }
    }

    /// Looks up a named preset.
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "balanced" => Some(Self::balanced()),
            "standard" => Some(Self::standard()),
            _ => None,
        }
    }
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self::balanced()
    }
}

/// The external text-generation capability behind the `answer` strategy.
///
/// Given a prompt, an implementation returns the raw completion. It is
/// treated as one blocking call: no retries and no cancellation happen here.
#[async_trait]
pub trait ResponseGenerator: Send + Sync + Debug + DynClone {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, GenerationError>;
}

dyn_clone::clone_trait_object!(ResponseGenerator);
