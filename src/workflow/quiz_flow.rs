//! Quiz flow - workflow layer
//!
//! State machine for one document's assessment quiz:
//!
//! ```text
//! NotStarted → Generating → Ready → InProgress → Complete
//!      ↑            │
//!      └── failure ─┘
//! ```
//!
//! The generation step is split into a [`QuizRequest`] that owns everything
//! it needs, so it can be awaited inline or spawned onto the runtime, and a
//! [`QuizResponse`] that the coordinator folds back into its state.

use std::fmt;
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::clients::{GenerationOptions, TextGenerator};
use crate::error::PipelineResult;
use crate::models::{Chunk, SkillLevel};
use crate::services::prompts;
use crate::utils::truncate_text;
use crate::workflow::quiz_session::QuizSession;

/// Where the quiz of the active document stands
#[derive(Debug, Clone, PartialEq, Default)]
pub enum QuizState {
    #[default]
    NotStarted,
    /// A generation request tagged with `epoch` is in flight
    Generating { epoch: u64 },
    /// Questions parsed, nothing answered yet
    Ready(QuizSession),
    /// At least one question answered
    InProgress(QuizSession),
    /// Every question answered
    Complete {
        session: QuizSession,
        level: SkillLevel,
    },
}

impl QuizState {
    pub fn name(&self) -> &'static str {
        match self {
            QuizState::NotStarted => "not started",
            QuizState::Generating { .. } => "generating",
            QuizState::Ready(_) => "ready",
            QuizState::InProgress(_) => "in progress",
            QuizState::Complete { .. } => "complete",
        }
    }

    pub fn session(&self) -> Option<&QuizSession> {
        match self {
            QuizState::Ready(session)
            | QuizState::InProgress(session)
            | QuizState::Complete { session, .. } => Some(session),
            QuizState::NotStarted | QuizState::Generating { .. } => None,
        }
    }
}

/// A quiz generation call ready to run
pub struct QuizRequest {
    pub(crate) epoch: u64,
    prompt: String,
    generator: Arc<dyn TextGenerator>,
    options: GenerationOptions,
}

impl QuizRequest {
    pub(crate) fn new(
        epoch: u64,
        context: &str,
        generator: Arc<dyn TextGenerator>,
        options: GenerationOptions,
    ) -> Self {
        Self {
            epoch,
            prompt: prompts::quiz_prompt(context),
            generator,
            options,
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Perform the generation call
    ///
    /// Owns all of its inputs, so `tokio::spawn(request.run())` works.
    pub async fn run(self) -> QuizResponse {
        debug!("[quiz] requesting quiz from {}", self.generator.name());
        let result = self.generator.generate(&self.prompt, &self.options).await;
        QuizResponse {
            epoch: self.epoch,
            result,
        }
    }
}

impl fmt::Debug for QuizRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizRequest")
            .field("epoch", &self.epoch)
            .field("generator", &self.generator.name())
            .field("prompt", &truncate_text(&self.prompt, 40))
            .finish()
    }
}

/// Outcome of a [`QuizRequest`]
#[derive(Debug)]
pub struct QuizResponse {
    pub(crate) epoch: u64,
    pub(crate) result: PipelineResult<String>,
}

/// Pick `sample_size` chunks uniformly at random without replacement
///
/// All chunks, in order, when there are no more than `sample_size`.
pub fn sample_chunks<'a, R: Rng + ?Sized>(
    chunks: &'a [Chunk],
    sample_size: usize,
    rng: &mut R,
) -> Vec<&'a Chunk> {
    if chunks.len() <= sample_size {
        return chunks.iter().collect();
    }
    chunks.choose_multiple(rng, sample_size).collect()
}

/// Join chunk contents with blank lines
pub fn join_context<'a>(chunks: impl IntoIterator<Item = &'a Chunk>) -> String {
    chunks
        .into_iter()
        .map(|c| c.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn chunks(n: usize) -> Vec<Chunk> {
        (0..n).map(|i| Chunk::new(i, format!("chunk {}", i))).collect()
    }

    #[test]
    fn test_small_documents_use_every_chunk() {
        let cs = chunks(2);
        let mut rng = StdRng::seed_from_u64(7);
        let picked: Vec<usize> = sample_chunks(&cs, 3, &mut rng).iter().map(|c| c.index).collect();
        assert_eq!(picked, vec![0, 1]);
    }

    #[test]
    fn test_sample_is_without_replacement() {
        let cs = chunks(10);
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let picked = sample_chunks(&cs, 3, &mut rng);
            assert_eq!(picked.len(), 3);
            let unique: HashSet<usize> = picked.iter().map(|c| c.index).collect();
            assert_eq!(unique.len(), 3);
        }
    }

    #[test]
    fn test_sample_covers_the_document() {
        let cs = chunks(6);
        let mut rng = StdRng::seed_from_u64(1);
        let mut seen = HashSet::new();
        for _ in 0..200 {
            for c in sample_chunks(&cs, 3, &mut rng) {
                seen.insert(c.index);
            }
        }
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn test_join_context() {
        let cs = chunks(2);
        assert_eq!(join_context(&cs), "chunk 0\n\nchunk 1");
    }

    struct Echo;

    #[async_trait::async_trait]
    impl TextGenerator for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        async fn generate(&self, prompt: &str, options: &GenerationOptions) -> PipelineResult<String> {
            Ok(format!("{} @ {}", prompt.len(), options.top_k))
        }
    }

    #[test]
    fn test_request_carries_epoch_and_options() {
        let request = QuizRequest::new(9, "Text about slices.", Arc::new(Echo), GenerationOptions::default());
        assert!(request.prompt().contains("Text content:\nText about slices."));
        let prompt_len = request.prompt().len();

        let shown = format!("{:?}", request);
        assert!(shown.contains("epoch: 9"));
        assert!(shown.contains("\"echo\""));

        let response = tokio_test::block_on(request.run());
        assert_eq!(response.epoch, 9);
        assert_eq!(response.result.unwrap(), format!("{} @ 40", prompt_len));
    }

    #[test]
    fn test_state_names_and_sessions() {
        assert_eq!(QuizState::default().name(), "not started");
        assert!(QuizState::Generating { epoch: 1 }.session().is_none());
        let ready = QuizState::Ready(QuizSession::new(Vec::new()));
        assert!(ready.session().is_some());
    }
}
