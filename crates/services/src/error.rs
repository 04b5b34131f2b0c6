//! Shared error types for the services crate.

use thiserror::Error;

use gistify_core::model::{QuestionError, SessionError};
use gistify_core::report::ReportError;
use gistify_core::score::ScoreError;

/// Errors emitted by the chat completions client.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatError {
    #[error("AI service is not configured")]
    Disabled,
    #[error("AI service returned an empty response")]
    EmptyResponse,
    #[error("AI request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by text extraction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExtractionError {
    #[error("document has no extractable text")]
    NoText,
    #[error("document is not valid UTF-8 text")]
    InvalidEncoding,
}

/// Errors emitted by the summarization collaborator.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SummarizationError {
    #[error("summarizer returned no sections")]
    EmptySummary,
    #[error("summarizer returned malformed JSON: {0}")]
    MalformedResponse(#[from] serde_json::Error),
    #[error(transparent)]
    Chat(#[from] ChatError),
}

/// Errors emitted by the quiz generation collaborator.
///
/// Malformed generator output is rejected here instead of propagating
/// into the session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizGenerationError {
    #[error("expected {expected} questions, got {got}")]
    WrongQuestionCount { expected: usize, got: usize },
    #[error("generator returned malformed JSON: {0}")]
    MalformedResponse(#[from] serde_json::Error),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Chat(#[from] ChatError),
}

/// Errors emitted by the quiz workflow.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WorkflowError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error(transparent)]
    Summarization(#[from] SummarizationError),
    #[error(transparent)]
    QuizGeneration(#[from] QuizGenerationError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Score(#[from] ScoreError),
    #[error(transparent)]
    Report(#[from] ReportError),
}
