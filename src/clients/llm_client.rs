//! OpenAI-compatible generation client
//!
//! ## Stack
//! - `async-openai` for the chat completions call
//! - custom API base and model, so any compatible service works
//!   (Azure, Gemini's OpenAI endpoint, Doubao, local servers)
//!
//! The chat completions protocol has no top-k parameter; that option is
//! not sent.

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::clients::{GenerationOptions, TextGenerator};
use crate::config::Config;
use crate::error::{PipelineError, PipelineResult};

const BACKEND: &str = "openai";

/// OpenAI-compatible client
pub struct LlmClient {
    client: Client<OpenAIConfig>,
    model_name: String,
}

impl LlmClient {
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
        }
    }

    fn build_messages(&self, prompt: &str) -> PipelineResult<Vec<ChatCompletionRequestMessage>> {
        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| PipelineError::generation(BACKEND, e))?;
        Ok(vec![ChatCompletionRequestMessage::User(user_msg)])
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    fn name(&self) -> &str {
        BACKEND
    }

    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> PipelineResult<String> {
        debug!("calling LLM API, model: {}", self.model_name);
        debug!("prompt length: {} chars", prompt.len());

        let messages = self.build_messages(prompt)?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(options.temperature)
            .top_p(options.top_p)
            .max_tokens(options.max_output_tokens)
            .build()
            .map_err(|e| PipelineError::generation(BACKEND, e))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API call failed: {}", e);
            PipelineError::generation(BACKEND, e)
        })?;

        debug!("LLM API call succeeded");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| PipelineError::generation_msg(BACKEND, "LLM returned empty content"))?;

        Ok(content.trim().to_string())
    }
}
