use serde::Serialize;
use thiserror::Error;

/// Every quiz question carries exactly this many answer options.
pub const OPTION_COUNT: usize = 4;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Errors that can occur while constructing a question.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text is empty")]
    EmptyText,

    #[error("expected {OPTION_COUNT} options, got {len}")]
    WrongOptionCount { len: usize },

    #[error("correct option index {index} is out of range 0..{OPTION_COUNT}")]
    CorrectOptionOutOfRange { index: usize },
}

//
// ─── QUESTION ─────────────────────────────────────────────────────────────────
//

/// A multiple-choice question, immutable once generated.
///
/// Construction validates the generation-collaborator contract: exactly
/// [`OPTION_COUNT`] options and an in-range correct index. Malformed
/// generator output never reaches a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    text: String,
    options: Vec<String>,
    correct_option: usize,
    explanation: String,
}

impl Question {
    /// Build a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyText` for blank question text,
    /// `QuestionError::WrongOptionCount` unless exactly [`OPTION_COUNT`]
    /// options are given, and `QuestionError::CorrectOptionOutOfRange`
    /// for a correct index outside `0..OPTION_COUNT`.
    pub fn new(
        text: impl Into<String>,
        options: Vec<String>,
        correct_option: usize,
        explanation: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if options.len() != OPTION_COUNT {
            return Err(QuestionError::WrongOptionCount { len: options.len() });
        }
        if correct_option >= OPTION_COUNT {
            return Err(QuestionError::CorrectOptionOutOfRange {
                index: correct_option,
            });
        }

        Ok(Self {
            text,
            options,
            correct_option,
            explanation: explanation.into(),
        })
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_option(&self) -> usize {
        self.correct_option
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// Whether the given option index is the correct one.
    #[must_use]
    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct_option
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
