mod timer;
mod workflow;

// Public API of the quiz orchestration subsystem.
pub use crate::error::WorkflowError;
pub use timer::{ArmedTimer, QUESTION_TIME_LIMIT, QuestionTimer, TimeoutEvent};
pub use workflow::{AnswerOutcome, QuizWorkflow, Resolution, Tagged, UploadOutcome};
