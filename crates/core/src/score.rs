use serde::Serialize;
use thiserror::Error;

use crate::model::Answer;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScoreError {
    #[error("answer log ({answers}) is longer than the question set ({questions})")]
    TooManyAnswers { answers: usize, questions: usize },
}

/// Aggregate score for a quiz attempt.
///
/// A pure function of the question count and the answer log; the final
/// percentage is computed atomically here, presentation layers may
/// animate towards it but never recompute it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizScore {
    correct: usize,
    incorrect: usize,
    skipped: usize,
    total_questions: usize,
    percentage: u8,
}

impl QuizScore {
    /// Derive the score from an answer log.
    ///
    /// The percentage is `round(100 * correct / total_questions)`, and
    /// `0` for an empty question set.
    ///
    /// # Errors
    ///
    /// Returns `ScoreError::TooManyAnswers` if the log is longer than
    /// the question set.
    pub fn from_answers(total_questions: usize, answers: &[Answer]) -> Result<Self, ScoreError> {
        if answers.len() > total_questions {
            return Err(ScoreError::TooManyAnswers {
                answers: answers.len(),
                questions: total_questions,
            });
        }

        let correct = answers.iter().filter(|a| a.is_correct).count();
        let skipped = answers.iter().filter(|a| a.is_skipped()).count();
        let incorrect = answers.len() - correct - skipped;

        let percentage = if total_questions == 0 {
            0
        } else {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let rounded = (correct as f64 * 100.0 / total_questions as f64).round() as u8;
            rounded
        };

        Ok(Self {
            correct,
            incorrect,
            skipped,
            total_questions,
            percentage,
        })
    }

    #[must_use]
    pub fn correct(&self) -> usize {
        self.correct
    }

    #[must_use]
    pub fn incorrect(&self) -> usize {
        self.incorrect
    }

    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.total_questions
    }

    /// Final score in `[0, 100]`.
    #[must_use]
    pub fn percentage(&self) -> u8 {
        self.percentage
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
