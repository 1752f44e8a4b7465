//! Gemini `generateContent` client
//!
//! Talks to the native REST API so that all four sampling options, top-k
//! included, reach the model.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::clients::{GenerationOptions, TextGenerator};
use crate::config::Config;
use crate::error::{PipelineError, PipelineResult};
use crate::utils::logging::truncate_text;

const BACKEND: &str = "gemini";

/// The key travels in a header so it never shows up in URLs or error text
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    top_p: f32,
    top_k: u32,
}

impl From<&GenerationOptions> for GenerationConfig {
    fn from(options: &GenerationOptions) -> Self {
        Self {
            temperature: options.temperature,
            max_output_tokens: options.max_output_tokens,
            top_p: options.top_p,
            top_k: options.top_k,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Gemini client
pub struct GeminiClient {
    http: Client,
    api_key: String,
    api_base_url: String,
    model_name: String,
}

impl GeminiClient {
    pub fn new(config: &Config) -> PipelineResult<Self> {
        let http = Client::builder()
            .build()
            .map_err(|e| PipelineError::generation(BACKEND, e))?;

        Ok(Self {
            http,
            api_key: config.llm_api_key.clone(),
            api_base_url: config.llm_api_base_url.trim_end_matches('/').to_string(),
            model_name: config.llm_model_name.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.api_base_url, self.model_name)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    fn name(&self) -> &str {
        BACKEND
    }

    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> PipelineResult<String> {
        debug!("calling Gemini, model: {}", self.model_name);
        debug!("prompt length: {} chars", prompt.len());

        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: options.into(),
        };

        let response = self
            .http
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                warn!("Gemini request failed: {}", e);
                PipelineError::generation(BACKEND, e)
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| PipelineError::generation(BACKEND, e.without_url()))?;

        if !status.is_success() {
            warn!("Gemini returned {}: {}", status, truncate_text(&text, 200));
            return Err(PipelineError::generation_msg(
                BACKEND,
                format!("API request failed with code {}: {}", status.as_u16(), text),
            ));
        }

        extract_text(&text)
    }
}

/// Pull `candidates[0].content.parts[0].text` out of a response body
fn extract_text(body: &str) -> PipelineResult<String> {
    let parsed: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| PipelineError::generation(BACKEND, e))?;

    let candidate = parsed
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| PipelineError::generation_msg(BACKEND, "no candidates found in response"))?;

    candidate
        .content
        .and_then(|content| content.parts.into_iter().next())
        .and_then(|part| part.text)
        .ok_or_else(|| PipelineError::generation_msg(BACKEND, "no parts found in response"))
}
