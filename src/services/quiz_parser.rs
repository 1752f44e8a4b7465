//! Quiz text parser - service layer
//!
//! Turns the free-form quiz text returned by the generation backend into
//! `QuestionRecord`s. The expected layout is the one requested by
//! `prompts::quiz_prompt`:
//!
//! ```text
//! 1. [BEGINNER] What is...?
//! A) First option
//! B) Second option
//! C) Third option
//! D) Fourth option
//! Correct: A
//! ```
//!
//! The text is cut into candidate blocks at every line that starts with an
//! `N. [TAG]` header, and each block is matched on its own, so a malformed
//! question can neither abort the parse nor swallow the question after it.

use regex::Regex;
use tracing::{debug, warn};

use crate::error::SkipReason;
use crate::models::{AnswerLetter, QuestionRecord, SkillLevel};

/// Headers only count at the start of a line
const HEADER_PATTERN: &str = r"(?m)^[ \t]*\d+\.\s+\[([A-Z]+)\]";

const BLOCK_PATTERN: &str = r"(?s)\A[ \t]*\d+\.\s+\[([A-Z]+)\]\s+(.+?)\s*\n(A\)\s+.+?\n)(B\)\s+.+?\n)(C\)\s+.+?\n)(D\)\s+.+?)\s*\nCorrect:\s+(\S)";

/// Result of matching one candidate block
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    Matched(QuestionRecord),
    Skipped {
        /// 1-based position of the candidate in the text
        position: usize,
        reason: SkipReason,
    },
}

/// Template matcher for generated quizzes
#[derive(Debug, Clone)]
pub struct QuizTextParser {
    header: Regex,
    block: Regex,
}

impl QuizTextParser {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            header: Regex::new(HEADER_PATTERN)?,
            block: Regex::new(BLOCK_PATTERN)?,
        })
    }

    /// Parse every well-formed question, in source order
    ///
    /// Never fails; dropped candidates are logged.
    pub fn parse(&self, quiz_text: &str) -> Vec<QuestionRecord> {
        let outcomes = self.parse_candidates(quiz_text);
        let total = outcomes.len();

        let records: Vec<QuestionRecord> = outcomes
            .into_iter()
            .filter_map(|outcome| match outcome {
                ParseOutcome::Matched(record) => Some(record),
                ParseOutcome::Skipped { position, reason } => {
                    warn!("[quiz] skipping question {}: {}", position, reason);
                    None
                }
            })
            .collect();

        debug!("[quiz] parsed {}/{} candidate questions", records.len(), total);
        records
    }

    /// Match each candidate block and report what happened to it
    pub fn parse_candidates(&self, quiz_text: &str) -> Vec<ParseOutcome> {
        let starts: Vec<usize> = self
            .header
            .find_iter(quiz_text)
            .map(|m| m.start())
            .collect();

        starts
            .iter()
            .enumerate()
            .map(|(i, &start)| {
                let end = starts.get(i + 1).copied().unwrap_or(quiz_text.len());
                let position = i + 1;
                match self.parse_block(&quiz_text[start..end]) {
                    Ok(record) => ParseOutcome::Matched(record),
                    Err(reason) => ParseOutcome::Skipped { position, reason },
                }
            })
            .collect()
    }

    fn parse_block(&self, block: &str) -> Result<QuestionRecord, SkipReason> {
        let caps = self.block.captures(block).ok_or(SkipReason::Incomplete)?;

        let tag = &caps[1];
        let difficulty = match tag {
            "BEGINNER" | "INTERMEDIATE" | "ADVANCED" => tag
                .to_lowercase()
                .parse::<SkillLevel>()
                .map_err(|_| SkipReason::UnknownDifficulty(tag.to_string()))?,
            _ => return Err(SkipReason::UnknownDifficulty(tag.to_string())),
        };

        let question = caps[2].trim();
        if question.is_empty() {
            return Err(SkipReason::EmptyText("question"));
        }

        let mut options: [String; 4] = Default::default();
        for (slot, letter) in options.iter_mut().zip(AnswerLetter::ALL) {
            let raw = &caps[3 + letter.index()];
            *slot = strip_option_marker(raw, letter)?;
        }

        let answer = &caps[7];
        let correct = match answer {
            "A" | "B" | "C" | "D" => answer
                .parse::<AnswerLetter>()
                .map_err(|_| SkipReason::InvalidAnswerLetter(answer.to_string()))?,
            _ => return Err(SkipReason::InvalidAnswerLetter(answer.to_string())),
        };

        Ok(QuestionRecord::new(question, options, correct, difficulty))
    }
}

/// `"A) Paris\n"` -> `"Paris"`
fn strip_option_marker(raw: &str, letter: AnswerLetter) -> Result<String, SkipReason> {
    let marker = format!("{})", letter.as_char());
    let text = raw
        .trim()
        .strip_prefix(marker.as_str())
        .ok_or(SkipReason::MissingOptionMarker {
            letter: letter.as_char(),
        })?
        .trim();

    if text.is_empty() {
        return Err(SkipReason::EmptyText("option"));
    }
    Ok(text.to_string())
}
