pub mod chunker;
pub mod level_evaluator;
pub mod prompts;
pub mod quiz_parser;
pub mod relevance_ranker;

pub use chunker::Chunker;
pub use quiz_parser::{ParseOutcome, QuizTextParser};
