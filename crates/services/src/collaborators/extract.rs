use async_trait::async_trait;

use crate::collaborators::{Document, TextExtractor};
use crate::error::ExtractionError;

/// Extractor for plain-text documents.
///
/// PDF parsing lives with the front end that accepts the upload; by the
/// time a document reaches this layer its bytes are expected to be
/// UTF-8 text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TextExtractor for PlainTextExtractor {
    async fn extract_text(&self, document: &Document) -> Result<String, ExtractionError> {
        let text =
            std::str::from_utf8(&document.bytes).map_err(|_| ExtractionError::InvalidEncoding)?;
        let text = text.trim();
        if text.is_empty() {
            return Err(ExtractionError::NoText);
        }
        Ok(text.to_owned())
    }
}
