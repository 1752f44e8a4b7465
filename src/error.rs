use std::fmt;

use thiserror::Error;

/// Boxed error cause carried by the wrapping variants.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Pipeline error type
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The document produced no text or no chunks
    #[error("nothing to process: {reason}")]
    NothingToProcess { reason: String },

    /// Transport / API failure from the generation backend
    #[error("generation failed ({backend}): {source}")]
    Generation {
        backend: String,
        #[source]
        source: BoxError,
    },

    /// The backend answered but the quiz parser recovered no question
    #[error("the generated quiz contained no parseable question")]
    EmptyQuiz,

    /// Operation is not valid in the current flow state
    #[error("invalid quiz state: expected {expected}, found {actual}")]
    InvalidState {
        expected: &'static str,
        actual: &'static str,
    },

    /// A generation result arrived after its document was replaced
    #[error("generation result belongs to a replaced document and was discarded")]
    StaleGeneration,

    /// No skill level yet; the quiz has not been completed
    #[error("no skill level yet: complete the quiz first")]
    LevelUnknown,

    /// Quiz grammar failed to compile
    #[error("invalid quiz pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Text extraction failed
    #[error("failed to extract text from {path}: {source}")]
    Extraction {
        path: String,
        #[source]
        source: BoxError,
    },

    /// No document with this identifier
    #[error("document not found: {id}")]
    DocumentNotFound { id: String },

    /// Document store read/write failure
    #[error("document store error ({path}): {source}")]
    Store {
        path: String,
        #[source]
        source: BoxError,
    },

    /// Configuration problem
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable present but unparsable
    #[error("environment variable {var_name} = '{value}' is not a valid {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },

    /// Config file could not be read or parsed
    #[error("cannot load config file {path}: {message}")]
    FileLoadFailed { path: String, message: String },

    /// Unknown generation backend name
    #[error("unknown generation backend '{0}' (expected 'gemini' or 'openai')")]
    UnknownBackend(String),

    /// API key missing for a backend that requires one
    #[error("no API key configured for the {0} backend")]
    MissingApiKey(String),
}

/// Why a quiz candidate was dropped by the parser
///
/// These never bubble up as errors; the parser logs them and moves on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Difficulty tag outside BEGINNER / INTERMEDIATE / ADVANCED
    UnknownDifficulty(String),
    /// Option line did not start with the expected `X)` marker
    MissingOptionMarker { letter: char },
    /// Correct-answer letter outside A-D
    InvalidAnswerLetter(String),
    /// Question or option text empty after trimming
    EmptyText(&'static str),
    /// A header / Correct: line without a complete question between them
    Incomplete,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnknownDifficulty(tag) => write!(f, "unknown difficulty tag '{}'", tag),
            SkipReason::MissingOptionMarker { letter } => {
                write!(f, "option {} is missing its '{})' marker", letter, letter)
            }
            SkipReason::InvalidAnswerLetter(letter) => {
                write!(f, "correct answer '{}' is not one of A-D", letter)
            }
            SkipReason::EmptyText(what) => write!(f, "{} is empty", what),
            SkipReason::Incomplete => write!(f, "incomplete question block"),
        }
    }
}

// ========== Convenience constructors ==========

impl PipelineError {
    /// No usable content in the loaded document
    pub fn nothing_to_process(reason: impl Into<String>) -> Self {
        PipelineError::NothingToProcess {
            reason: reason.into(),
        }
    }

    /// Wrap a backend failure
    pub fn generation(
        backend: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        PipelineError::Generation {
            backend: backend.into(),
            source: Box::new(source),
        }
    }

    /// Wrap a backend failure that only has a message
    pub fn generation_msg(backend: impl Into<String>, message: impl Into<String>) -> Self {
        let message: String = message.into();
        PipelineError::Generation {
            backend: backend.into(),
            source: message.into(),
        }
    }

    /// Wrap an extraction failure
    pub fn extraction(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        PipelineError::Extraction {
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// Wrap a document store failure
    pub fn store(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        PipelineError::Store {
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// True for failures the caller should read as "no content"
    pub fn is_nothing_to_process(&self) -> bool {
        matches!(self, PipelineError::NothingToProcess { .. })
    }
}

/// Pipeline result alias
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset by peer");
        let err = PipelineError::generation("gemini", io);

        assert!(err.to_string().contains("gemini"));
        let source = std::error::Error::source(&err).expect("source attached");
        assert_eq!(source.to_string(), "reset by peer");
    }

    #[test]
    fn test_nothing_to_process_is_distinct() {
        assert!(PipelineError::nothing_to_process("empty document").is_nothing_to_process());
        assert!(!PipelineError::EmptyQuiz.is_nothing_to_process());
    }

    #[test]
    fn test_config_error_converts() {
        let err: PipelineError = ConfigError::UnknownBackend("claude".into()).into();
        assert!(matches!(err, PipelineError::Config(_)));
    }
}
