use std::sync::Arc;

use gistify_core::Clock;
use gistify_core::model::{
    Answer, AnswerChoice, Phase, Question, Session, SessionError, SummarySection,
};
use gistify_core::report::QuizReport;
use gistify_core::score::QuizScore;

use crate::collaborators::{Document, QuizGenerator, Summarizer, TextExtractor};
use crate::error::WorkflowError;
use crate::quiz::timer::TimeoutEvent;

//
// ─── PHASE-TAGGED RESULTS ─────────────────────────────────────────────────────
//

/// A collaborator result stamped with the phase that was active when
/// the call was issued.
///
/// The presentation layer may reset or restart the session while a call
/// is in flight; applying a tagged result first compares the stamp with
/// the current phase and discards stale values instead of corrupting a
/// session that has moved on.
#[derive(Debug, Clone)]
pub struct Tagged<T> {
    issued_from: Phase,
    value: T,
}

impl<T> Tagged<T> {
    pub(crate) fn new(issued_from: Phase, value: T) -> Self {
        Self { issued_from, value }
    }

    #[must_use]
    pub fn issued_from(&self) -> Phase {
        self.issued_from
    }

    #[must_use]
    pub fn into_inner(self) -> T {
        self.value
    }
}

/// Whether a tagged result was applied or discarded as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    Stale,
}

/// Everything needed to move a session from `Upload` to `Summary`.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub document_name: String,
    pub text: String,
    pub summary: Vec<SummarySection>,
}

/// Result of answering a single question.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOutcome {
    pub answer: Answer,
    pub is_complete: bool,
    /// Set once the final answer lands.
    pub score: Option<QuizScore>,
}

//
// ─── WORKFLOW ─────────────────────────────────────────────────────────────────
//

/// Orchestrates collaborator calls and session transitions.
///
/// Collaborator calls are split into a `begin_*` step that runs the
/// async work and an `apply_*` step that commits the tagged result, so
/// a result arriving after the user navigated away is dropped rather
/// than applied to a stale phase.
#[derive(Clone)]
pub struct QuizWorkflow {
    clock: Clock,
    extractor: Arc<dyn TextExtractor>,
    summarizer: Arc<dyn Summarizer>,
    generator: Arc<dyn QuizGenerator>,
}

impl QuizWorkflow {
    #[must_use]
    pub fn new(
        clock: Clock,
        extractor: Arc<dyn TextExtractor>,
        summarizer: Arc<dyn Summarizer>,
        generator: Arc<dyn QuizGenerator>,
    ) -> Self {
        Self {
            clock,
            extractor,
            summarizer,
            generator,
        }
    }

    /// Extract and summarize an uploaded document.
    ///
    /// The session is read-only here; a collaborator failure surfaces
    /// as a retryable error with the session still in `Upload`.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Session` outside the `Upload` phase and
    /// extraction/summarization errors from the collaborators.
    pub async fn begin_upload(
        &self,
        session: &Session,
        document: Document,
    ) -> Result<Tagged<UploadOutcome>, WorkflowError> {
        if session.phase() != Phase::Upload {
            return Err(SessionError::InvalidTransition {
                from: session.phase(),
            }
            .into());
        }

        let text = self.extractor.extract_text(&document).await?;
        let summary = self.summarizer.summarize(&text).await?;

        Ok(Tagged::new(
            Phase::Upload,
            UploadOutcome {
                document_name: document.name,
                text,
                summary,
            },
        ))
    }

    /// Commit an upload outcome: `Upload → Summary`, or discard it if
    /// the session left `Upload` while the call was in flight.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Session` if the transition is rejected.
    pub fn apply_upload(
        &self,
        session: &mut Session,
        outcome: Tagged<UploadOutcome>,
    ) -> Result<Resolution, WorkflowError> {
        if outcome.issued_from() != session.phase() {
            return Ok(Resolution::Stale);
        }

        let outcome = outcome.into_inner();
        session.apply_summary(outcome.document_name, outcome.text, outcome.summary)?;
        Ok(Resolution::Applied)
    }

    /// Generate the quiz for the current summary.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Session` outside the `Summary` phase and
    /// generation errors from the collaborator; the session stays in
    /// `Summary` on failure.
    pub async fn begin_quiz(
        &self,
        session: &Session,
    ) -> Result<Tagged<Vec<Question>>, WorkflowError> {
        if session.phase() != Phase::Summary {
            return Err(SessionError::InvalidTransition {
                from: session.phase(),
            }
            .into());
        }

        let questions = self.generator.generate_quiz(session.summary()).await?;
        Ok(Tagged::new(Phase::Summary, questions))
    }

    /// Commit generated questions: `Summary → Quiz`, or discard them if
    /// the session left `Summary` while generation was in flight.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Session` if the transition is rejected.
    pub fn apply_quiz(
        &self,
        session: &mut Session,
        questions: Tagged<Vec<Question>>,
    ) -> Result<Resolution, WorkflowError> {
        if questions.issued_from() != session.phase() {
            return Ok(Resolution::Stale);
        }

        session.start_quiz(questions.into_inner(), self.clock.now())?;
        Ok(Resolution::Applied)
    }

    /// Answer, skip, or time out the question at `question_index`.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Session` for rejected transitions; the
    /// answer log is untouched on error.
    pub fn answer(
        &self,
        session: &mut Session,
        question_index: usize,
        choice: AnswerChoice,
    ) -> Result<AnswerOutcome, WorkflowError> {
        let answer = session
            .submit_answer(question_index, choice, self.clock.now())?
            .clone();

        let score = if session.is_complete() {
            Some(QuizScore::from_answers(
                session.questions().len(),
                session.answers(),
            )?)
        } else {
            None
        };

        Ok(AnswerOutcome {
            answer,
            is_complete: session.is_complete(),
            score,
        })
    }

    /// Feed a countdown expiry through the ordinary answer transition.
    ///
    /// A timeout for a question that was answered while the timer ran
    /// (or after the quiz moved on) resolves to `Stale` with no state
    /// change.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Score` only if score derivation fails on
    /// completion.
    pub fn apply_timeout(
        &self,
        session: &mut Session,
        event: TimeoutEvent,
    ) -> Result<Resolution, WorkflowError> {
        if session.phase() != Phase::Quiz || session.current_index() != event.question_index {
            return Ok(Resolution::Stale);
        }

        self.answer(session, event.question_index, AnswerChoice::TimedOut)?;
        Ok(Resolution::Applied)
    }

    /// Restart the quiz over the same questions.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Session` outside the `Results` phase.
    pub fn restart(&self, session: &mut Session) -> Result<(), WorkflowError> {
        session.restart_quiz(self.clock.now())?;
        Ok(())
    }

    /// Compute the final score for a finished quiz.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Session` before the quiz is finished.
    pub fn score(&self, session: &Session) -> Result<QuizScore, WorkflowError> {
        if !session.is_complete() {
            return Err(SessionError::InvalidTransition {
                from: session.phase(),
            }
            .into());
        }
        Ok(QuizScore::from_answers(
            session.questions().len(),
            session.answers(),
        )?)
    }

    /// Render the downloadable report for a finished quiz.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Report` before the quiz is finished.
    pub fn export(&self, session: &Session) -> Result<QuizReport, WorkflowError> {
        Ok(QuizReport::from_session(session)?)
    }
}
