mod answer;
mod question;
mod session;
mod summary;

pub use answer::{Answer, AnswerChoice};
pub use question::{OPTION_COUNT, Question, QuestionError};
pub use session::{Phase, QuizProgress, Session, SessionError};
pub use summary::SummarySection;
