use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::SkillLevel;

/// Answer letter, positionally mapped to the four options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnswerLetter {
    A,
    B,
    C,
    D,
}

impl AnswerLetter {
    pub const ALL: [AnswerLetter; 4] = [
        AnswerLetter::A,
        AnswerLetter::B,
        AnswerLetter::C,
        AnswerLetter::D,
    ];

    /// Option position (A = 0 .. D = 3)
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_char(self) -> char {
        (b'A' + self as u8) as char
    }
}

impl TryFrom<char> for AnswerLetter {
    type Error = char;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c.to_ascii_uppercase() {
            'A' => Ok(AnswerLetter::A),
            'B' => Ok(AnswerLetter::B),
            'C' => Ok(AnswerLetter::C),
            'D' => Ok(AnswerLetter::D),
            _ => Err(c),
        }
    }
}

impl FromStr for AnswerLetter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                AnswerLetter::try_from(c).map_err(|c| format!("not an answer letter: {}", c))
            }
            _ => Err(format!("not an answer letter: {}", s)),
        }
    }
}

impl fmt::Display for AnswerLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// One parsed multiple-choice quiz item
///
/// Always carries exactly four options; `correct` indexes into them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub question: String,
    pub options: [String; 4],
    pub correct: AnswerLetter,
    pub difficulty: SkillLevel,
}

impl QuestionRecord {
    pub fn new(
        question: impl Into<String>,
        options: [String; 4],
        correct: AnswerLetter,
        difficulty: SkillLevel,
    ) -> Self {
        Self {
            question: question.into(),
            options,
            correct,
            difficulty,
        }
    }

    /// Whether `answer` is the correct letter (case-insensitive)
    pub fn is_correct(&self, answer: char) -> bool {
        AnswerLetter::try_from(answer).map_or(false, |letter| letter == self.correct)
    }

    pub fn option(&self, letter: AnswerLetter) -> &str {
        &self.options[letter.index()]
    }

    /// Text of the correct option
    pub fn correct_option(&self) -> &str {
        self.option(self.correct)
    }
}
