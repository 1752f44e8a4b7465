//! Terminal driver - orchestration layer
//!
//! `learniq <file>` registers the file in the document store and opens it;
//! `learniq <document-id>` reopens a stored one. Without an argument the
//! learner's stored documents are listed.
//!
//! The quiz runs first on stdin, then chat questions are answered until EOF
//! or `exit`.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tracing::{error, info, warn};

use crate::clients::build_generator;
use crate::config::Config;
use crate::infrastructure::{FileTextExtractor, TomlDocumentStore};
use crate::models::{AnswerLetter, QuestionRecord};
use crate::orchestrator::PipelineCoordinator;
use crate::utils::logging::log_startup;
use crate::workflow::chat_error_message;

/// Application main structure
pub struct App {
    config: Config,
    store: TomlDocumentStore,
    coordinator: PipelineCoordinator,
}

impl App {
    /// Build the backend, open the store and create the coordinator
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let generator = build_generator(&config).context("cannot create the generation backend")?;
        let store = TomlDocumentStore::open(&config.document_folder, Arc::new(FileTextExtractor::new()))
            .await
            .with_context(|| format!("cannot open document folder {}", config.document_folder))?;
        let coordinator = PipelineCoordinator::new(generator, &config)?;

        Ok(Self {
            config,
            store,
            coordinator,
        })
    }

    /// Run the quiz and chat session for the document named on the command line
    pub async fn run(&mut self) -> Result<()> {
        let Some(target) = std::env::args().nth(1) else {
            return self.list_documents().await;
        };

        let document_id = self.resolve_document(&target).await?;
        self.coordinator
            .load_document(&self.store, &document_id)
            .await
            .with_context(|| format!("cannot load document {}", target))?;

        let mut input = BufReader::new(tokio::io::stdin()).lines();

        if !self.run_quiz(&mut input).await? {
            return Ok(());
        }
        self.run_chat(&mut input).await
    }

    /// Register a file path, or pass through an existing document id
    ///
    /// A file the learner opened before maps back to its stored record.
    async fn resolve_document(&self, target: &str) -> Result<String> {
        let path = Path::new(target);
        if !path.is_file() {
            return Ok(target.to_string());
        }

        let title = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(target)
            .to_string();
        let absolute = std::fs::canonicalize(path)
            .with_context(|| format!("cannot resolve {}", target))?;
        let record = self
            .store
            .register_file(&title, &absolute.display().to_string(), &self.config.owner_id)
            .await?;
        info!("✓ {} is document {}", target, record.id);
        Ok(record.id)
    }

    async fn list_documents(&self) -> Result<()> {
        let records = self.store.list_for_owner(&self.config.owner_id).await?;
        println!("usage: learniq <file | document-id>");
        if records.is_empty() {
            println!("\nNo documents yet.");
            return Ok(());
        }
        println!("\nYour documents:");
        for r in records {
            println!(
                "  {}  {}  (last opened {})",
                r.id,
                r.title,
                r.last_accessed.format("%Y-%m-%d %H:%M")
            );
        }
        Ok(())
    }

    // ========== Quiz ==========

    /// Returns false when stdin closed before the quiz finished
    async fn run_quiz(&mut self, input: &mut Lines<BufReader<Stdin>>) -> Result<bool> {
        println!("Generating your assessment quiz...");

        let request = self.coordinator.begin_quiz_generation()?;
        let response = tokio::spawn(request.run())
            .await
            .context("quiz generation task failed")?;
        let count = match self.coordinator.finish_quiz_generation(response) {
            Ok(count) => count,
            Err(e) => {
                error!("❌ quiz generation failed: {}", e);
                println!("Could not generate a quiz: {}", e);
                return Ok(false);
            }
        };

        println!("\nAnswer {} questions so the answers can match your level.\n", count);

        while let Some(question) = self.coordinator.current_question().cloned() {
            let number = self
                .coordinator
                .quiz_session()
                .map_or(1, |s| s.current_index() + 1);
            print_question(number, count, &question);

            let letter = loop {
                let Some(line) = prompt_line(input, "Your answer (A-D): ").await? else {
                    return Ok(false);
                };
                match line.parse::<AnswerLetter>() {
                    Ok(letter) => break letter,
                    Err(_) => println!("Please answer A, B, C or D."),
                }
            };

            let feedback = self.coordinator.submit_answer(letter)?;
            println!("{}", feedback);
            if !feedback.correct {
                println!("  {}) {}", feedback.correct_letter, question.correct_option());
            }
            println!();
            if let Some(level) = feedback.level {
                let correct = self.coordinator.quiz_session().map_or(0, |s| s.correct_count());
                println!("You got {}/{} right. Level: {}", correct, count, level);
            }
        }
        Ok(true)
    }

    // ========== Chat ==========

    async fn run_chat(&mut self, input: &mut Lines<BufReader<Stdin>>) -> Result<()> {
        println!("\n{}\n", self.coordinator.welcome_message()?);

        while let Some(line) = prompt_line(input, "> ").await? {
            let question = line.trim();
            if question.is_empty() {
                continue;
            }
            if question.eq_ignore_ascii_case("exit") {
                break;
            }

            match self.coordinator.ask(question).await {
                Ok(answer) => println!("\n{}\n", answer),
                Err(e) => {
                    warn!("⚠️ [chat] {}", e);
                    println!("\n{}\n", chat_error_message(&e));
                }
            }
        }

        info!("chat session ended");
        Ok(())
    }
}

fn print_question(number: usize, total: usize, question: &QuestionRecord) {
    println!("Question {}/{} [{}]", number, total, question.difficulty);
    println!("{}", question.question);
    for letter in AnswerLetter::ALL {
        println!("  {}) {}", letter, question.option(letter));
    }
}

/// Print a prompt and read one line; `None` on EOF
async fn prompt_line(input: &mut Lines<BufReader<Stdin>>, prompt: &str) -> Result<Option<String>> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(prompt.as_bytes()).await?;
    stdout.flush().await?;
    Ok(input.next_line().await?)
}
