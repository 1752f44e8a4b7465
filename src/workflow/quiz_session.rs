//! Quiz session
//!
//! The parsed questions plus the answers given so far, one per question in
//! order. `outcomes.len() <= questions.len()` always holds; the session is
//! finished once they are equal.

use std::fmt::Display;

use crate::models::{AnswerLetter, QuestionRecord, SkillLevel};
use crate::services::level_evaluator;

/// Result of answering one question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerFeedback {
    /// 1-based number of the answered question
    pub question_number: usize,
    pub correct: bool,
    pub correct_letter: AnswerLetter,
    /// Set once the last question has been answered
    pub level: Option<SkillLevel>,
}

impl Display for AnswerFeedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.correct {
            write!(f, "Correct!")
        } else {
            write!(f, "Incorrect. The correct answer is {}.", self.correct_letter)
        }
    }
}

/// Questions and accumulated outcomes
#[derive(Debug, Clone, PartialEq)]
pub struct QuizSession {
    questions: Vec<QuestionRecord>,
    outcomes: Vec<bool>,
}

impl QuizSession {
    pub fn new(questions: Vec<QuestionRecord>) -> Self {
        Self {
            questions,
            outcomes: Vec::new(),
        }
    }

    pub fn questions(&self) -> &[QuestionRecord] {
        &self.questions
    }

    pub fn outcomes(&self) -> &[bool] {
        &self.outcomes
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Index of the question waiting for an answer
    pub fn current_index(&self) -> usize {
        self.outcomes.len()
    }

    pub fn current_question(&self) -> Option<&QuestionRecord> {
        self.questions.get(self.current_index())
    }

    pub fn is_complete(&self) -> bool {
        self.outcomes.len() == self.questions.len()
    }

    pub fn correct_count(&self) -> usize {
        self.outcomes.iter().filter(|&&ok| ok).count()
    }

    /// Record an answer for the current question
    ///
    /// Returns `None` when every question is already answered.
    pub fn answer(&mut self, letter: AnswerLetter) -> Option<AnswerFeedback> {
        let question = self.current_question()?;
        let correct = letter == question.correct;
        let correct_letter = question.correct;

        self.outcomes.push(correct);

        Some(AnswerFeedback {
            question_number: self.outcomes.len(),
            correct,
            correct_letter,
            level: self.level(),
        })
    }

    /// Skill level, available once the session is complete
    pub fn level(&self) -> Option<SkillLevel> {
        self.is_complete()
            .then(|| level_evaluator::evaluate(&self.outcomes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(correct: AnswerLetter, difficulty: SkillLevel) -> QuestionRecord {
        QuestionRecord::new(
            "Q?",
            ["a".into(), "b".into(), "c".into(), "d".into()],
            correct,
            difficulty,
        )
    }

    fn five() -> QuizSession {
        QuizSession::new(vec![
            record(AnswerLetter::A, SkillLevel::Beginner),
            record(AnswerLetter::B, SkillLevel::Beginner),
            record(AnswerLetter::C, SkillLevel::Intermediate),
            record(AnswerLetter::D, SkillLevel::Intermediate),
            record(AnswerLetter::A, SkillLevel::Advanced),
        ])
    }

    #[test]
    fn test_answers_advance_in_order() {
        let mut session = five();
        assert_eq!(session.current_index(), 0);

        let fb = session.answer(AnswerLetter::A).unwrap();
        assert!(fb.correct);
        assert_eq!(fb.question_number, 1);
        assert_eq!(fb.level, None);

        let fb = session.answer(AnswerLetter::A).unwrap();
        assert!(!fb.correct);
        assert_eq!(fb.correct_letter, AnswerLetter::B);
        assert_eq!(fb.to_string(), "Incorrect. The correct answer is B.");
        assert_eq!(session.outcomes(), &[true, false]);
        assert_eq!(session.current_index(), 2);
    }

    #[test]
    fn test_final_answer_yields_level() {
        let mut session = five();
        for letter in [AnswerLetter::A, AnswerLetter::B, AnswerLetter::C] {
            assert_eq!(session.answer(letter).unwrap().level, None);
        }
        session.answer(AnswerLetter::A).unwrap();
        let last = session.answer(AnswerLetter::A).unwrap();

        assert!(session.is_complete());
        assert_eq!(session.correct_count(), 4);
        assert_eq!(last.level, Some(SkillLevel::Intermediate));
        assert_eq!(session.level(), Some(SkillLevel::Intermediate));
    }

    #[test]
    fn test_no_answers_past_the_end() {
        let mut session = QuizSession::new(vec![record(AnswerLetter::C, SkillLevel::Advanced)]);
        assert!(session.answer(AnswerLetter::C).is_some());
        assert!(session.answer(AnswerLetter::C).is_none());
        assert_eq!(session.outcomes().len(), session.len());
    }
}
