use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::model::answer::{Answer, AnswerChoice};
use crate::model::question::{OPTION_COUNT, Question};
use crate::model::summary::SummarySection;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Rejected session transitions.
///
/// Every rejection leaves the session exactly as it was; a caller that
/// offered an action the current phase does not support may simply
/// discard the error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("operation not allowed in the {from:?} phase")]
    InvalidTransition { from: Phase },

    #[error("expected an answer for question {expected}, got one for question {got}")]
    QuestionMismatch { expected: usize, got: usize },

    #[error("option index {index} is out of range 0..{OPTION_COUNT}")]
    InvalidOption { index: usize },

    #[error("cannot start a quiz with no questions")]
    EmptyQuiz,
}

//
// ─── PHASE ────────────────────────────────────────────────────────────────────
//

/// The four mutually exclusive phases of a quiz session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Phase {
    #[default]
    Upload,
    Summary,
    Quiz,
    Results,
}

/// Aggregated view of quiz progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub is_complete: bool,
}

//
// ─── SESSION ──────────────────────────────────────────────────────────────────
//

/// The aggregate holding all state for one user's walk through the
/// upload → summary → quiz → results flow.
///
/// All mutation goes through the transition methods below; a rejected
/// transition never modifies any field. The presentation layer holds
/// the single mutable reference and re-renders on change.
#[derive(Debug, Clone, Default)]
pub struct Session {
    phase: Phase,
    document_name: Option<String>,
    document_text: Option<String>,
    summary: Vec<SummarySection>,
    questions: Vec<Question>,
    answers: Vec<Answer>,
    current: usize,
    quiz_started_at: Option<DateTime<Utc>>,
    quiz_completed_at: Option<DateTime<Utc>>,
}

impl Session {
    /// A fresh session in the `Upload` phase.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn document_name(&self) -> Option<&str> {
        self.document_name.as_deref()
    }

    #[must_use]
    pub fn document_text(&self) -> Option<&str> {
        self.document_text.as_deref()
    }

    #[must_use]
    pub fn summary(&self) -> &[SummarySection] {
        &self.summary
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    /// Index of the question currently awaiting an answer.
    ///
    /// Only meaningful while in the `Quiz` phase.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The question currently awaiting an answer, if any.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.phase == Phase::Quiz {
            self.questions.get(self.current)
        } else {
            None
        }
    }

    #[must_use]
    pub fn quiz_started_at(&self) -> Option<DateTime<Utc>> {
        self.quiz_started_at
    }

    #[must_use]
    pub fn quiz_completed_at(&self) -> Option<DateTime<Utc>> {
        self.quiz_completed_at
    }

    /// Whether the quiz has been answered to the end.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Results
    }

    /// Returns a summary of the current quiz progress.
    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        QuizProgress {
            total: self.questions.len(),
            answered: self.answers.len(),
            remaining: self.questions.len().saturating_sub(self.answers.len()),
            is_complete: self.is_complete(),
        }
    }

    /// Accept an extracted document and its summary: `Upload → Summary`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` outside the `Upload`
    /// phase. A failed extraction or summarization never reaches this
    /// method, so collaborator errors leave the session in `Upload`.
    pub fn apply_summary(
        &mut self,
        document_name: impl Into<String>,
        document_text: impl Into<String>,
        summary: Vec<SummarySection>,
    ) -> Result<(), SessionError> {
        if self.phase != Phase::Upload {
            return Err(SessionError::InvalidTransition { from: self.phase });
        }

        self.document_name = Some(document_name.into());
        self.document_text = Some(document_text.into());
        self.summary = summary;
        self.phase = Phase::Summary;
        Ok(())
    }

    /// Discard the current document and return to `Upload`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` outside the `Summary`
    /// phase.
    pub fn back_to_upload(&mut self) -> Result<(), SessionError> {
        if self.phase != Phase::Summary {
            return Err(SessionError::InvalidTransition { from: self.phase });
        }

        self.document_name = None;
        self.document_text = None;
        self.summary.clear();
        self.phase = Phase::Upload;
        Ok(())
    }

    /// Store generated questions and begin the quiz: `Summary → Quiz`.
    ///
    /// The answer log and question index are reset unconditionally, even
    /// if an earlier aborted attempt left them populated.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` outside the `Summary`
    /// phase and `SessionError::EmptyQuiz` for an empty question set.
    pub fn start_quiz(
        &mut self,
        questions: Vec<Question>,
        started_at: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        if self.phase != Phase::Summary {
            return Err(SessionError::InvalidTransition { from: self.phase });
        }
        if questions.is_empty() {
            return Err(SessionError::EmptyQuiz);
        }

        self.questions = questions;
        self.answers.clear();
        self.current = 0;
        self.quiz_started_at = Some(started_at);
        self.quiz_completed_at = None;
        self.phase = Phase::Quiz;
        Ok(())
    }

    /// Record an answer, skip, or timeout for the question at
    /// `question_index` and advance the quiz.
    ///
    /// Appends exactly one [`Answer`] per visit to a question index; a
    /// second submit for an index already answered (or any index other
    /// than the current one) is rejected without touching the log. The
    /// last question's answer moves the session to `Results` instead of
    /// advancing the index.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` outside the `Quiz`
    /// phase, `SessionError::QuestionMismatch` when `question_index` is
    /// not the current question, and `SessionError::InvalidOption` for
    /// a selected option outside `0..OPTION_COUNT`.
    pub fn submit_answer(
        &mut self,
        question_index: usize,
        choice: AnswerChoice,
        answered_at: DateTime<Utc>,
    ) -> Result<&Answer, SessionError> {
        if self.phase != Phase::Quiz {
            return Err(SessionError::InvalidTransition { from: self.phase });
        }
        if question_index != self.current {
            return Err(SessionError::QuestionMismatch {
                expected: self.current,
                got: question_index,
            });
        }
        if let Some(index) = choice.selected_option() {
            if index >= OPTION_COUNT {
                return Err(SessionError::InvalidOption { index });
            }
        }

        let Some(question) = self.questions.get(self.current) else {
            return Err(SessionError::InvalidTransition { from: self.phase });
        };
        let selected = choice.selected_option();
        let is_correct = selected.is_some_and(|index| question.is_correct(index));

        self.answers
            .push(Answer::new(question_index, selected, is_correct, answered_at));

        if self.current + 1 >= self.questions.len() {
            self.quiz_completed_at = Some(answered_at);
            self.phase = Phase::Results;
        } else {
            self.current += 1;
        }

        self.answers
            .last()
            .ok_or(SessionError::InvalidTransition { from: self.phase })
    }

    /// Restart the quiz over the same questions: `Results → Quiz`.
    ///
    /// Clears the answer log and question index while keeping the
    /// question set untouched.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` outside the `Results`
    /// phase.
    pub fn restart_quiz(&mut self, restarted_at: DateTime<Utc>) -> Result<(), SessionError> {
        if self.phase != Phase::Results {
            return Err(SessionError::InvalidTransition { from: self.phase });
        }

        self.answers.clear();
        self.current = 0;
        self.quiz_started_at = Some(restarted_at);
        self.quiz_completed_at = None;
        self.phase = Phase::Quiz;
        Ok(())
    }

    /// Drop all document and quiz state and return to `Upload`.
    ///
    /// Allowed from every phase.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
