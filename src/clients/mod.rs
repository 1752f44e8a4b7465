//! Generation backends
//!
//! The pipeline only sees the [`TextGenerator`] trait. Concrete clients are
//! built from [`Config`] once at startup and passed in.

pub mod gemini_client;
pub mod llm_client;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{Config, GenerationBackend};
use crate::error::PipelineResult;

pub use gemini_client::GeminiClient;
pub use llm_client::LlmClient;

/// Sampling options sent with every request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub top_p: f32,
    pub top_k: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_output_tokens: 2048,
            top_p: 0.95,
            top_k: 40,
        }
    }
}

/// A text-generation service
///
/// Implementations do not retry or time out on their own; failures come back
/// as `PipelineError::Generation` with the underlying cause attached.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Short backend name used in logs and errors
    fn name(&self) -> &str;

    /// Send one prompt and return the generated text
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> PipelineResult<String>;
}

/// Build the configured backend
pub fn build_generator(config: &Config) -> PipelineResult<Arc<dyn TextGenerator>> {
    let generator: Arc<dyn TextGenerator> = match config.validate()? {
        GenerationBackend::Gemini => Arc::new(GeminiClient::new(config)?),
        GenerationBackend::OpenAi => Arc::new(LlmClient::new(config)),
    };
    tracing::info!(
        "generation backend: {} (model {})",
        generator.name(),
        config.llm_model_name
    );
    Ok(generator)
}
