//! Collaborator contracts for the upload → summary → quiz flow.
//!
//! The core only depends on these traits; implementations talk to the
//! outside world (file contents, an OpenAI-compatible chat service).

mod ai;
mod extract;

use async_trait::async_trait;

use gistify_core::model::{Question, SummarySection};

use crate::error::{ExtractionError, QuizGenerationError, SummarizationError};

pub use ai::{AiQuizGenerator, AiSummarizer, ChatClient, ChatConfig, QUIZ_LENGTH};
pub use extract::PlainTextExtractor;

/// An uploaded document: a display name plus raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Document {
    #[must_use]
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// Produces plain text from an uploaded document.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extract the document's text.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError` when the document has no extractable
    /// text.
    async fn extract_text(&self, document: &Document) -> Result<String, ExtractionError>;
}

/// Produces an ordered, titled, bullet-pointed summary from plain text.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize the given text into sections.
    ///
    /// # Errors
    ///
    /// Returns `SummarizationError` for transport failures or malformed
    /// responses.
    async fn summarize(&self, text: &str) -> Result<Vec<SummarySection>, SummarizationError>;
}

/// Produces a fixed-size multiple-choice quiz from a summary.
#[async_trait]
pub trait QuizGenerator: Send + Sync {
    /// Generate the quiz for the given summary.
    ///
    /// Implementations must validate the response shape (question
    /// count, option count, correct index) before returning it.
    ///
    /// # Errors
    ///
    /// Returns `QuizGenerationError` for transport failures or
    /// malformed responses.
    async fn generate_quiz(
        &self,
        summary: &[SummarySection],
    ) -> Result<Vec<Question>, QuizGenerationError>;
}
