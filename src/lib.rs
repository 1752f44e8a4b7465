//! # LearnIQ
//!
//! Reads a document, measures the learner with a generated quiz, then answers
//! questions about the document at the measured level.
//!
//! ## Architecture
//!
//! ### ① Clients & infrastructure
//! - `clients/` - text generation backends behind `TextGenerator`
//!   (`GeminiClient`, OpenAI-compatible `LlmClient`)
//! - `infrastructure/` - `TextExtractor` (plain text / PDF) and the TOML
//!   `DocumentStore`
//!
//! ### ② Services
//! - `services/` - pure, synchronous building blocks: `Chunker`,
//!   `relevance_ranker`, `QuizTextParser`, `level_evaluator`, `prompts`
//!
//! ### ③ Workflow
//! - `workflow/` - quiz state machine, `QuizSession`, chat requests
//!
//! ### ④ Orchestration
//! - `orchestrator/coordinator` - `PipelineCoordinator`, owns the active
//!   document and its quiz
//! - `orchestrator/app` - terminal driver
//!
//! ## Module layout

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// Re-export commonly used types
pub use clients::{GenerationOptions, TextGenerator};
pub use config::Config;
pub use error::{PipelineError, PipelineResult};
pub use models::{AnswerLetter, Chunk, QuestionRecord, SkillLevel};
pub use orchestrator::{App, PipelineCoordinator};
pub use workflow::{AnswerFeedback, QuizState};
