use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

use crate::error::ConfigError;

/// Which generation backend to talk to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenerationBackend {
    /// Native Gemini `generateContent` API
    Gemini,
    /// Any OpenAI-compatible chat completions endpoint
    OpenAi,
}

impl FromStr for GenerationBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" => Ok(GenerationBackend::Gemini),
            "openai" | "openai-compatible" => Ok(GenerationBackend::OpenAi),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

/// Program configuration
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `gemini` or `openai`
    pub generation_backend: String,
    // --- LLM ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    // --- pipeline ---
    /// Chunk size in characters
    pub chunk_target_size: usize,
    /// Chunks handed to the chat prompt
    pub chat_context_chunks: usize,
    /// Chunks sampled for quiz generation
    pub quiz_sample_chunks: usize,
    /// Folder holding one TOML record per document
    pub document_folder: String,
    /// Owner recorded on documents added from the command line
    pub owner_id: String,
    /// Log prompts and raw responses at debug level
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            generation_backend: "gemini".to_string(),
            llm_api_key: String::new(),
            llm_api_base_url: "https://generativelanguage.googleapis.com/v1".to_string(),
            llm_model_name: "models/gemini-1.5-pro".to_string(),
            chunk_target_size: 1000,
            chat_context_chunks: 3,
            quiz_sample_chunks: 3,
            document_folder: "documents".to_string(),
            owner_id: "local".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// Defaults overridden by environment variables
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// TOML file, then environment variables on top
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileLoadFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::FileLoadFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(config.with_env_overrides())
    }

    /// Apply every set environment variable over the current values
    pub fn with_env_overrides(self) -> Self {
        let current = self;
        Self {
            generation_backend: std::env::var("LEARNIQ_BACKEND").unwrap_or(current.generation_backend),
            llm_api_key: std::env::var("LLM_API_KEY")
                .or_else(|_| std::env::var("GEMINI_API_KEY"))
                .unwrap_or(current.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(current.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(current.llm_model_name),
            chunk_target_size: env_or("CHUNK_TARGET_SIZE", current.chunk_target_size, "usize"),
            chat_context_chunks: env_or("CHAT_CONTEXT_CHUNKS", current.chat_context_chunks, "usize"),
            quiz_sample_chunks: env_or("QUIZ_SAMPLE_CHUNKS", current.quiz_sample_chunks, "usize"),
            document_folder: std::env::var("DOCUMENT_FOLDER").unwrap_or(current.document_folder),
            owner_id: std::env::var("LEARNIQ_OWNER").unwrap_or(current.owner_id),
            verbose_logging: env_or("VERBOSE_LOGGING", current.verbose_logging, "bool"),
        }
    }

    pub fn backend(&self) -> Result<GenerationBackend, ConfigError> {
        self.generation_backend.parse()
    }

    /// Fail early when the selected backend cannot work
    pub fn validate(&self) -> Result<GenerationBackend, ConfigError> {
        let backend = self.backend()?;
        if backend == GenerationBackend::Gemini && self.llm_api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey("gemini".to_string()));
        }
        Ok(backend)
    }
}

/// Parse an environment variable, keeping `current` when unset or invalid
fn env_or<T: FromStr>(var_name: &str, current: T, expected_type: &str) -> T {
    match std::env::var(var_name) {
        Ok(value) => match value.trim().parse() {
            Ok(parsed) => parsed,
            Err(_) => {
                let err = ConfigError::EnvVarParseFailed {
                    var_name: var_name.to_string(),
                    value,
                    expected_type: expected_type.to_string(),
                };
                tracing::warn!("⚠️ {}, using the default", err);
                current
            }
        },
        Err(_) => current,
    }
}
