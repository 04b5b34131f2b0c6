use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use gistify_core::model::{Question, SummarySection};

use crate::collaborators::{QuizGenerator, Summarizer};
use crate::error::{ChatError, QuizGenerationError, SummarizationError};

/// Number of questions requested from the generator per quiz.
pub const QUIZ_LENGTH: usize = 10;

//
// ─── CHAT CLIENT ──────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug)]
pub struct ChatConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl ChatConfig {
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("GISTIFY_AI_API_KEY").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        let base_url =
            env::var("GISTIFY_AI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
        let model = env::var("GISTIFY_AI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());
        Some(Self {
            base_url,
            api_key,
            model,
        })
    }
}

/// Minimal OpenAI-compatible chat completions client shared by the
/// summarization and quiz generation collaborators.
#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    config: Option<ChatConfig>,
}

impl ChatClient {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(ChatConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<ChatConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }

    /// Send a single-turn prompt and return the model's reply text.
    ///
    /// # Errors
    ///
    /// Returns `ChatError` when the client is disabled, the request
    /// fails, or the response is empty.
    pub async fn complete(&self, prompt: &str) -> Result<String, ChatError> {
        let config = self.config.as_ref().ok_or(ChatError::Disabled)?;

        let url = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));
        let payload = ChatRequest {
            model: config.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: prompt.to_string(),
            }],
            temperature: 0.2,
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ChatError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(ChatError::EmptyResponse)?;

        Ok(content.trim().to_string())
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

/// Chat models often wrap JSON replies in a markdown code fence.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

//
// ─── SUMMARIZER ───────────────────────────────────────────────────────────────
//

/// AI-backed summarization collaborator.
#[derive(Clone)]
pub struct AiSummarizer {
    chat: ChatClient,
}

impl AiSummarizer {
    #[must_use]
    pub fn new(chat: ChatClient) -> Self {
        Self { chat }
    }

    #[must_use]
    pub fn from_env() -> Self {
        Self::new(ChatClient::from_env())
    }

    fn prompt(text: &str) -> String {
        format!(
            "Summarize the following document as JSON: an array of sections, \
             each an object with a \"title\" string and a \"points\" array of \
             short bullet-point strings. Respond with JSON only.\n\n{text}"
        )
    }

    fn parse(content: &str) -> Result<Vec<SummarySection>, SummarizationError> {
        let sections: Vec<SummarySection> = serde_json::from_str(strip_code_fence(content))?;
        if sections.is_empty() {
            return Err(SummarizationError::EmptySummary);
        }
        Ok(sections)
    }
}

#[async_trait]
impl Summarizer for AiSummarizer {
    async fn summarize(&self, text: &str) -> Result<Vec<SummarySection>, SummarizationError> {
        let content = self.chat.complete(&Self::prompt(text)).await?;
        Self::parse(&content)
    }
}

//
// ─── QUIZ GENERATOR ───────────────────────────────────────────────────────────
//

/// Wire shape of one generated question, validated into
/// [`Question`] before it can reach a session.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuestion {
    question: String,
    options: Vec<String>,
    correct_answer: usize,
    explanation: String,
}

/// AI-backed quiz generation collaborator.
#[derive(Clone)]
pub struct AiQuizGenerator {
    chat: ChatClient,
    question_count: usize,
}

impl AiQuizGenerator {
    #[must_use]
    pub fn new(chat: ChatClient) -> Self {
        Self {
            chat,
            question_count: QUIZ_LENGTH,
        }
    }

    #[must_use]
    pub fn from_env() -> Self {
        Self::new(ChatClient::from_env())
    }

    #[must_use]
    pub fn with_question_count(mut self, question_count: usize) -> Self {
        self.question_count = question_count;
        self
    }

    fn prompt(&self, summary: &[SummarySection]) -> String {
        let mut outline = String::new();
        for section in summary {
            outline.push_str(&format!("{}\n", section.title));
            for point in &section.points {
                outline.push_str(&format!("- {point}\n"));
            }
        }
        format!(
            "Create exactly {count} multiple-choice questions from the summary \
             below. Respond with JSON only: an array of objects with a \
             \"question\" string, an \"options\" array of exactly 4 strings, a \
             \"correctAnswer\" index (0-3), and an \"explanation\" string.\n\n{outline}",
            count = self.question_count
        )
    }

    fn parse(content: &str, expected: usize) -> Result<Vec<Question>, QuizGenerationError> {
        let raw: Vec<RawQuestion> = serde_json::from_str(strip_code_fence(content))?;
        if raw.len() != expected {
            return Err(QuizGenerationError::WrongQuestionCount {
                expected,
                got: raw.len(),
            });
        }

        raw.into_iter()
            .map(|question| {
                Question::new(
                    question.question,
                    question.options,
                    question.correct_answer,
                    question.explanation,
                )
                .map_err(QuizGenerationError::from)
            })
            .collect()
    }
}

#[async_trait]
impl QuizGenerator for AiQuizGenerator {
    async fn generate_quiz(
        &self,
        summary: &[SummarySection],
    ) -> Result<Vec<Question>, QuizGenerationError> {
        let content = self.chat.complete(&self.prompt(summary)).await?;
        Self::parse(&content, self.question_count)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use gistify_core::model::QuestionError;

    #[test]
    fn code_fence_is_stripped() {
        assert_eq!(strip_code_fence("```json\n[1, 2]\n```"), "[1, 2]");
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("  [1]  "), "[1]");
    }

    #[test]
    fn summary_sections_parse_from_json() {
        let content = r#"```json
        [{"title": "Intro", "points": ["one", "two"]}]
        ```"#;
        let sections = AiSummarizer::parse(content).unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Intro");
        assert_eq!(sections[0].points, vec!["one", "two"]);
    }

    #[test]
    fn empty_summary_is_rejected() {
        let err = AiSummarizer::parse("[]").unwrap_err();
        assert!(matches!(err, SummarizationError::EmptySummary));
    }

    #[test]
    fn malformed_summary_json_is_rejected() {
        let err = AiSummarizer::parse("not json").unwrap_err();
        assert!(matches!(err, SummarizationError::MalformedResponse(_)));
    }

    fn question_json(options: &str, correct: usize) -> String {
        format!(
            r#"[{{"question": "Q", "options": {options}, "correctAnswer": {correct}, "explanation": "E"}}]"#
        )
    }

    #[test]
    fn valid_questions_parse_and_validate() {
        let content = question_json(r#"["a", "b", "c", "d"]"#, 1);
        let questions = AiQuizGenerator::parse(&content, 1).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].correct_option(), 1);
    }

    #[test]
    fn wrong_question_count_is_rejected() {
        let content = question_json(r#"["a", "b", "c", "d"]"#, 0);
        let err = AiQuizGenerator::parse(&content, 10).unwrap_err();
        assert!(matches!(
            err,
            QuizGenerationError::WrongQuestionCount {
                expected: 10,
                got: 1
            }
        ));
    }

    #[test]
    fn three_option_question_is_rejected() {
        let content = question_json(r#"["a", "b", "c"]"#, 0);
        let err = AiQuizGenerator::parse(&content, 1).unwrap_err();
        assert!(matches!(
            err,
            QuizGenerationError::Question(QuestionError::WrongOptionCount { len: 3 })
        ));
    }

    #[test]
    fn out_of_range_correct_index_is_rejected() {
        let content = question_json(r#"["a", "b", "c", "d"]"#, 7);
        let err = AiQuizGenerator::parse(&content, 1).unwrap_err();
        assert!(matches!(
            err,
            QuizGenerationError::Question(QuestionError::CorrectOptionOutOfRange { index: 7 })
        ));
    }

    #[test]
    fn malformed_question_json_is_rejected() {
        let err = AiQuizGenerator::parse("{\"oops\": true}", 1).unwrap_err();
        assert!(matches!(err, QuizGenerationError::MalformedResponse(_)));
    }
}
