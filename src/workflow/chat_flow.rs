//! Chat flow - workflow layer
//!
//! One question about the active document:
//! rank chunks → build the level-specific prompt → generate.
//!
//! Like [`QuizRequest`](crate::workflow::QuizRequest), a [`ChatRequest`] owns
//! its inputs so the coordinator is not borrowed while the backend works.

use std::sync::Arc;

use tracing::{debug, info};

use crate::clients::{GenerationOptions, TextGenerator};
use crate::error::{PipelineError, PipelineResult};
use crate::models::{Chunk, SkillLevel};
use crate::services::{prompts, relevance_ranker};
use crate::utils::truncate_text;
use crate::workflow::quiz_flow::join_context;

/// A chat generation call ready to run
pub struct ChatRequest {
    question: String,
    level: SkillLevel,
    prompt: String,
    generator: Arc<dyn TextGenerator>,
    options: GenerationOptions,
}

impl ChatRequest {
    /// Rank `chunks` against `question` and build the adaptive prompt
    pub(crate) fn new(
        question: &str,
        chunks: &[Chunk],
        context_size: usize,
        level: SkillLevel,
        generator: Arc<dyn TextGenerator>,
        options: GenerationOptions,
    ) -> Self {
        let ranked = relevance_ranker::rank(question, chunks, context_size);
        debug!(
            "[chat] context chunks: {:?}",
            ranked.iter().map(|c| c.index).collect::<Vec<_>>()
        );
        let context = join_context(ranked);

        Self {
            question: question.to_string(),
            level,
            prompt: prompts::adaptive_prompt(question, &context, level),
            generator,
            options,
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn level(&self) -> SkillLevel {
        self.level
    }

    /// Perform the generation call
    pub async fn run(self) -> PipelineResult<String> {
        info!(
            "[chat] ({}) {}",
            self.level,
            truncate_text(&self.question, 60)
        );
        let answer = self.generator.generate(&self.prompt, &self.options).await?;
        debug!("[chat] answer: {}", truncate_text(&answer, 80));
        Ok(answer)
    }
}

/// Text shown in place of an answer when generation failed
pub fn chat_error_message(err: &PipelineError) -> String {
    format!(
        "Sorry, I encountered an error while generating a response: {}",
        err
    )
}
