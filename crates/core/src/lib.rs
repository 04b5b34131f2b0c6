#![forbid(unsafe_code)]

pub mod model;
pub mod report;
pub mod score;
pub mod time;

pub use model::{
    Answer, AnswerChoice, OPTION_COUNT, Phase, Question, QuestionError, QuizProgress, Session,
    SessionError, SummarySection,
};
pub use report::{QuizReport, ReportError};
pub use score::{QuizScore, ScoreError};
pub use time::Clock;
