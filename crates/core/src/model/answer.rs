use chrono::{DateTime, Utc};
use serde::Serialize;

/// How the user resolved the current question.
///
/// Skip and timeout are deliberately indistinguishable in the recorded
/// [`Answer`]: both leave no selected option and score as not correct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerChoice {
    /// An option was picked (0-based index into the question's options).
    Selected(usize),
    /// The user skipped the question.
    Skipped,
    /// The per-question countdown expired.
    TimedOut,
}

impl AnswerChoice {
    /// The selected option index, or `None` for skip/timeout.
    #[must_use]
    pub fn selected_option(&self) -> Option<usize> {
        match self {
            AnswerChoice::Selected(index) => Some(*index),
            AnswerChoice::Skipped | AnswerChoice::TimedOut => None,
        }
    }
}

/// Record of a single answered (or skipped) question, immutable once
/// appended to the session log.
///
/// `selected == None` is the skip/timeout sentinel, distinct from every
/// valid option index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Answer {
    pub question_index: usize,
    pub selected: Option<usize>,
    pub is_correct: bool,
    pub answered_at: DateTime<Utc>,
}

impl Answer {
    #[must_use]
    pub fn new(
        question_index: usize,
        selected: Option<usize>,
        is_correct: bool,
        answered_at: DateTime<Utc>,
    ) -> Self {
        Self {
            question_index,
            selected,
            is_correct,
            answered_at,
        }
    }

    /// Whether this answer records a skip or timeout.
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        self.selected.is_none()
    }
}
