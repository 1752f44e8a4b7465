//! Pipeline coordinator - orchestration layer
//!
//! Owns the active document's chunks and its quiz state, and drives the two
//! flows over them:
//!
//! ```text
//! quiz:  Chunker → sample_chunks → TextGenerator → QuizTextParser → QuizSession
//! chat:  RelevanceRanker → adaptive prompt → TextGenerator
//! ```
//!
//! Generation is split into begin / run / finish so a caller can spawn the
//! slow part. Every step that mutates state takes `&mut self`, which keeps at
//! most one quiz transition in progress at a time. Requests are tagged with
//! the document epoch; results for a replaced document are discarded.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::clients::{GenerationOptions, TextGenerator};
use crate::config::Config;
use crate::error::{PipelineError, PipelineResult};
use crate::infrastructure::DocumentStore;
use crate::models::{AnswerLetter, Chunk, QuestionRecord, SkillLevel};
use crate::services::{prompts, Chunker, QuizTextParser};
use crate::utils::logging::{log_document_loaded, log_quiz_complete};
use crate::utils::truncate_text;
use crate::workflow::quiz_flow::{join_context, sample_chunks};
use crate::workflow::{AnswerFeedback, ChatRequest, QuizRequest, QuizResponse, QuizSession, QuizState};

/// Drives quiz generation and adaptive chat for one learner
pub struct PipelineCoordinator {
    generator: Arc<dyn TextGenerator>,
    parser: QuizTextParser,
    chunker: Chunker,
    options: GenerationOptions,
    chat_context_chunks: usize,
    quiz_sample_chunks: usize,
    verbose_logging: bool,
    // ---- active document ----
    chunks: Vec<Chunk>,
    epoch: u64,
    state: QuizState,
    /// Learner's level; outlives the document it was measured on
    level: Option<SkillLevel>,
}

impl PipelineCoordinator {
    pub fn new(generator: Arc<dyn TextGenerator>, config: &Config) -> PipelineResult<Self> {
        Ok(Self {
            generator,
            parser: QuizTextParser::new()?,
            chunker: Chunker::new(config.chunk_target_size),
            options: GenerationOptions::default(),
            chat_context_chunks: config.chat_context_chunks,
            quiz_sample_chunks: config.quiz_sample_chunks,
            verbose_logging: config.verbose_logging,
            chunks: Vec::new(),
            epoch: 0,
            state: QuizState::NotStarted,
            level: None,
        })
    }

    // ========== Document ==========

    /// Chunk `text` and make it the active document
    ///
    /// Resets the quiz but keeps the skill level, which was measured on an
    /// earlier document until a new quiz completes. On error the previous
    /// document stays active.
    pub fn load_text(&mut self, text: &str) -> PipelineResult<usize> {
        if text.trim().is_empty() {
            return Err(PipelineError::nothing_to_process("document has no text"));
        }
        let chunks = self.chunker.chunk(text);
        if chunks.is_empty() {
            return Err(PipelineError::nothing_to_process("document produced no chunks"));
        }

        self.chunks = chunks;
        self.epoch += 1;
        self.state = QuizState::NotStarted;
        debug!("document epoch {}", self.epoch);
        Ok(self.chunks.len())
    }

    /// Fetch a stored document's text and load it
    pub async fn load_document(
        &mut self,
        store: &dyn DocumentStore,
        document_id: &str,
    ) -> PipelineResult<usize> {
        let text = store.fetch_text(document_id).await?;
        let count = self.load_text(&text)?;
        log_document_loaded(&format!("[doc {}]", document_id), text.chars().count(), count);
        Ok(count)
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Incremented each time a document is loaded
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn state(&self) -> &QuizState {
        &self.state
    }

    // ========== Quiz ==========

    /// Sample the document and build the quiz request
    ///
    /// Allowed from `NotStarted`, and from `Generating` to reissue a request
    /// that was abandoned; whichever result comes back first wins.
    pub fn begin_quiz_generation(&mut self) -> PipelineResult<QuizRequest> {
        if self.chunks.is_empty() {
            return Err(PipelineError::nothing_to_process("no document loaded"));
        }
        match self.state {
            QuizState::NotStarted | QuizState::Generating { .. } => {}
            ref other => {
                return Err(PipelineError::InvalidState {
                    expected: "not started",
                    actual: other.name(),
                })
            }
        }

        let sample = sample_chunks(&self.chunks, self.quiz_sample_chunks, &mut rand::thread_rng());
        info!(
            "[quiz] sampling chunks {:?} of {}",
            sample.iter().map(|c| c.index).collect::<Vec<_>>(),
            self.chunks.len()
        );
        let context = join_context(sample);

        let request = QuizRequest::new(
            self.epoch,
            &context,
            Arc::clone(&self.generator),
            self.options,
        );
        if self.verbose_logging {
            debug!("[quiz] prompt: {}", truncate_text(request.prompt(), 200));
        }

        self.state = QuizState::Generating { epoch: self.epoch };
        Ok(request)
    }

    /// Fold a finished request back into the quiz state
    ///
    /// Returns the number of questions recovered. A failed call or a quiz
    /// without a single parseable question puts the quiz back to
    /// `NotStarted`.
    pub fn finish_quiz_generation(&mut self, response: QuizResponse) -> PipelineResult<usize> {
        let current = matches!(self.state, QuizState::Generating { epoch } if epoch == response.epoch);
        if !current {
            warn!(
                "⚠️ [quiz] discarding result for epoch {} (now {}, {})",
                response.epoch,
                self.epoch,
                self.state.name()
            );
            return Err(PipelineError::StaleGeneration);
        }

        let text = match response.result {
            Ok(text) => text,
            Err(e) => {
                error!("❌ [quiz] generation failed: {}", e);
                self.state = QuizState::NotStarted;
                return Err(e);
            }
        };
        if self.verbose_logging {
            debug!("[quiz] raw response: {}", truncate_text(&text, 500));
        }

        let questions = self.parser.parse(&text);
        if questions.is_empty() {
            error!("❌ [quiz] no parseable question in the response");
            self.state = QuizState::NotStarted;
            return Err(PipelineError::EmptyQuiz);
        }
        if questions.len() < prompts::QUIZ_QUESTION_COUNT {
            warn!(
                "⚠️ [quiz] only {}/{} questions usable",
                questions.len(),
                prompts::QUIZ_QUESTION_COUNT
            );
        }

        let count = questions.len();
        info!("✓ [quiz] {} questions ready", count);
        self.state = QuizState::Ready(QuizSession::new(questions));
        Ok(count)
    }

    /// begin → run → finish in one call
    pub async fn generate_quiz(&mut self) -> PipelineResult<usize> {
        let request = self.begin_quiz_generation()?;
        let response = request.run().await;
        self.finish_quiz_generation(response)
    }

    pub fn quiz_session(&self) -> Option<&QuizSession> {
        self.state.session()
    }

    /// Question waiting for an answer, if the quiz is underway
    pub fn current_question(&self) -> Option<&QuestionRecord> {
        match &self.state {
            QuizState::Ready(session) | QuizState::InProgress(session) => {
                session.current_question()
            }
            _ => None,
        }
    }

    /// Answer the current question
    ///
    /// The last answer completes the quiz and sets the learner's level.
    pub fn submit_answer(&mut self, letter: AnswerLetter) -> PipelineResult<AnswerFeedback> {
        let mut session = match std::mem::take(&mut self.state) {
            QuizState::Ready(session) | QuizState::InProgress(session) => session,
            other => {
                let actual = other.name();
                self.state = other;
                return Err(PipelineError::InvalidState {
                    expected: "ready or in progress",
                    actual,
                });
            }
        };

        let feedback = session.answer(letter);
        self.state = match session.level() {
            Some(level) => {
                log_quiz_complete(session.correct_count(), session.len(), level);
                self.level = Some(level);
                QuizState::Complete { session, level }
            }
            None => QuizState::InProgress(session),
        };

        feedback.ok_or(PipelineError::InvalidState {
            expected: "an unanswered question",
            actual: "complete",
        })
    }

    // ========== Chat ==========

    pub fn skill_level(&self) -> Option<SkillLevel> {
        self.level
    }

    /// Use a level measured earlier, e.g. restored from a profile
    pub fn set_skill_level(&mut self, level: SkillLevel) {
        self.level = Some(level);
    }

    pub fn welcome_message(&self) -> PipelineResult<String> {
        let level = self.level.ok_or(PipelineError::LevelUnknown)?;
        Ok(prompts::welcome_message(level))
    }

    /// Rank the document against `question` and build the chat request
    pub fn prepare_chat(&self, question: &str) -> PipelineResult<ChatRequest> {
        let level = self.level.ok_or(PipelineError::LevelUnknown)?;
        if self.chunks.is_empty() {
            return Err(PipelineError::nothing_to_process("no document loaded"));
        }
        let request = ChatRequest::new(
            question,
            &self.chunks,
            self.chat_context_chunks,
            level,
            Arc::clone(&self.generator),
            self.options,
        );
        if self.verbose_logging {
            debug!("[chat] prompt: {}", truncate_text(request.prompt(), 200));
        }
        Ok(request)
    }

    /// Answer a question about the active document at the learner's level
    pub async fn ask(&self, question: &str) -> PipelineResult<String> {
        self.prepare_chat(question)?.run().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Returns queued replies in order and keeps every prompt
    struct Scripted {
        replies: Mutex<VecDeque<PipelineResult<String>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl Scripted {
        fn new(replies: Vec<PipelineResult<String>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl TextGenerator for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn generate(&self, prompt: &str, _options: &GenerationOptions) -> PipelineResult<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(PipelineError::generation_msg("scripted", "no reply queued")))
        }
    }

    fn quiz_text(correct: [&str; 5]) -> String {
        let tags = ["BEGINNER", "BEGINNER", "INTERMEDIATE", "INTERMEDIATE", "ADVANCED"];
        tags.iter()
            .zip(correct)
            .enumerate()
            .map(|(i, (tag, answer))| {
                format!(
                    "{}. [{}] Question {}?\nA) one\nB) two\nC) three\nD) four\nCorrect: {}\n",
                    i + 1,
                    tag,
                    i + 1,
                    answer
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// 90 x "ownership" + 10 x "spaghetti", then 5 x "ownership" + 95 x "spaghetti"
    fn two_chunk_document() -> String {
        let mut words = Vec::new();
        words.extend(std::iter::repeat("ownership").take(90));
        words.extend(std::iter::repeat("spaghetti").take(10));
        words.extend(std::iter::repeat("ownership").take(5));
        words.extend(std::iter::repeat("spaghetti").take(95));
        words.join(" ")
    }

    fn coordinator(generator: Arc<Scripted>) -> PipelineCoordinator {
        PipelineCoordinator::new(generator, &Config::default()).unwrap()
    }

    #[test]
    fn test_empty_document_is_nothing_to_process() {
        let mut c = coordinator(Scripted::new(vec![]));
        let err = c.load_text("   \n\t ").unwrap_err();
        assert!(err.is_nothing_to_process());
        let err = c.begin_quiz_generation().unwrap_err();
        assert!(err.is_nothing_to_process());
    }

    #[tokio::test]
    async fn test_end_to_end_two_chunks_ranked_by_overlap() {
        let generator = Scripted::new(vec![
            Ok(quiz_text(["A", "B", "C", "D", "A"])),
            Ok("Ownership means one owner per value.".to_string()),
        ]);
        let mut c = coordinator(generator.clone());

        let text = two_chunk_document();
        assert_eq!(text.chars().count(), 1999);
        assert_eq!(c.load_text(&text).unwrap(), 2);

        assert_eq!(c.generate_quiz().await.unwrap(), 5);
        // two chunks <= sample size, so both are in the quiz prompt
        assert!(generator.prompts.lock().unwrap()[0].contains(&c.chunks()[1].content));

        for letter in [AnswerLetter::A, AnswerLetter::B, AnswerLetter::C, AnswerLetter::D] {
            assert!(c.submit_answer(letter).unwrap().correct);
        }
        let last = c.submit_answer(AnswerLetter::A).unwrap();
        assert_eq!(last.level, Some(SkillLevel::Advanced));
        assert!(matches!(c.state(), QuizState::Complete { .. }));

        let request = c.prepare_chat("What is ownership?").unwrap();
        let ownership_first = format!("{}\n\n{}", c.chunks()[0].content, c.chunks()[1].content);
        assert!(request.prompt().contains(&ownership_first));

        let answer = c.ask("What is ownership?").await.unwrap();
        assert_eq!(answer, "Ownership means one owner per value.");
    }

    #[tokio::test]
    async fn test_generation_failure_returns_to_not_started() {
        let generator = Scripted::new(vec![
            Err(PipelineError::generation_msg("scripted", "API request failed with code 503")),
            Ok("Sorry, I can't help with that.".to_string()),
            Ok(quiz_text(["A", "A", "A", "A", "A"])),
        ]);
        let mut c = coordinator(generator);
        c.load_text("Some text about traits and generics.").unwrap();

        let err = c.generate_quiz().await.unwrap_err();
        assert!(matches!(err, PipelineError::Generation { .. }));
        assert_eq!(c.state(), &QuizState::NotStarted);

        assert!(matches!(c.generate_quiz().await, Err(PipelineError::EmptyQuiz)));
        assert_eq!(c.state(), &QuizState::NotStarted);

        assert_eq!(c.generate_quiz().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_result_for_replaced_document_is_discarded() {
        let generator = Scripted::new(vec![Ok(quiz_text(["A", "B", "C", "D", "A"]))]);
        let mut c = coordinator(generator);
        c.load_text("First document.").unwrap();

        let request = c.begin_quiz_generation().unwrap();
        let response = tokio::spawn(request.run()).await.unwrap();

        c.load_text("Second document.").unwrap();
        assert!(matches!(
            c.finish_quiz_generation(response),
            Err(PipelineError::StaleGeneration)
        ));
        assert_eq!(c.state(), &QuizState::NotStarted);
        assert_eq!(c.epoch(), 2);
    }

    #[tokio::test]
    async fn test_answers_rejected_outside_the_quiz() {
        let mut c = coordinator(Scripted::new(vec![Ok(quiz_text(["B", "B", "B", "B", "B"]))]));
        assert!(matches!(
            c.submit_answer(AnswerLetter::A),
            Err(PipelineError::InvalidState { actual: "not started", .. })
        ));

        c.load_text("Closures capture their environment.").unwrap();
        c.generate_quiz().await.unwrap();
        assert!(matches!(
            c.begin_quiz_generation(),
            Err(PipelineError::InvalidState { actual: "ready", .. })
        ));

        for _ in 0..5 {
            c.submit_answer(AnswerLetter::A).unwrap();
        }
        assert_eq!(c.skill_level(), Some(SkillLevel::Beginner));
        assert!(matches!(
            c.submit_answer(AnswerLetter::A),
            Err(PipelineError::InvalidState { actual: "complete", .. })
        ));
        assert!(c.current_question().is_none());
    }

    #[tokio::test]
    async fn test_chat_needs_a_level() {
        let generator = Scripted::new(vec![Ok("answer".to_string())]);
        let mut c = coordinator(generator.clone());
        c.load_text("Iterators are lazy.").unwrap();

        assert!(matches!(c.ask("Are iterators lazy?").await, Err(PipelineError::LevelUnknown)));
        assert!(matches!(c.welcome_message(), Err(PipelineError::LevelUnknown)));

        c.set_skill_level(SkillLevel::Intermediate);
        assert!(c.welcome_message().unwrap().starts_with("Welcome to LearnIQ Chat!"));
        assert_eq!(c.ask("Are iterators lazy?").await.unwrap(), "answer");
        assert!(generator.prompts.lock().unwrap()[0].contains("Iterators are lazy."));
    }

    #[tokio::test]
    async fn test_level_survives_a_document_change() {
        let generator = Scripted::new(vec![Ok("answer".to_string())]);
        let mut c = coordinator(generator.clone());
        c.load_text("Iterators are lazy.").unwrap();
        c.set_skill_level(SkillLevel::Advanced);

        c.load_text("Closures capture their environment.").unwrap();
        assert_eq!(c.state(), &QuizState::NotStarted);
        assert_eq!(c.skill_level(), Some(SkillLevel::Advanced));

        assert_eq!(c.ask("What do closures capture?").await.unwrap(), "answer");
        let prompt = generator.prompts.lock().unwrap()[0].clone();
        assert!(prompt.contains("Closures capture their environment."));
        assert!(!prompt.contains("Iterators are lazy."));
    }
}
