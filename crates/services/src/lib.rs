#![forbid(unsafe_code)]

pub mod collaborators;
pub mod error;
pub mod quiz;

pub use gistify_core::Clock;

pub use error::{
    ChatError, ExtractionError, QuizGenerationError, SummarizationError, WorkflowError,
};

pub use collaborators::{
    AiQuizGenerator, AiSummarizer, ChatClient, ChatConfig, Document, PlainTextExtractor,
    QUIZ_LENGTH, QuizGenerator, Summarizer, TextExtractor,
};

pub use quiz::{
    AnswerOutcome, ArmedTimer, QUESTION_TIME_LIMIT, QuestionTimer, QuizWorkflow, Resolution,
    Tagged, TimeoutEvent, UploadOutcome,
};
