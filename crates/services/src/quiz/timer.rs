use std::time::Duration;

use gistify_core::model::{Phase, Session};

/// Time allowed per question before it counts as a timeout.
pub const QUESTION_TIME_LIMIT: Duration = Duration::from_secs(30);

/// Per-question countdown.
///
/// The timer is armed against the current question of a session in the
/// `Quiz` phase; its expiry is just another answer event fed through
/// `QuizWorkflow::apply_timeout`. Cancelling on submit or skip is
/// dropping the armed future.
#[derive(Debug, Clone, Copy)]
pub struct QuestionTimer {
    limit: Duration,
}

impl Default for QuestionTimer {
    fn default() -> Self {
        Self {
            limit: QUESTION_TIME_LIMIT,
        }
    }
}

impl QuestionTimer {
    #[must_use]
    pub fn new(limit: Duration) -> Self {
        Self { limit }
    }

    #[must_use]
    pub fn limit(&self) -> Duration {
        self.limit
    }

    /// Arm the countdown for the session's current question.
    ///
    /// Returns `None` outside the `Quiz` phase; there is nothing to
    /// time then.
    #[must_use]
    pub fn arm(&self, session: &Session) -> Option<ArmedTimer> {
        if session.phase() != Phase::Quiz {
            return None;
        }
        Some(ArmedTimer {
            limit: self.limit,
            question_index: session.current_index(),
        })
    }
}

/// A running countdown for one specific question.
#[derive(Debug)]
pub struct ArmedTimer {
    limit: Duration,
    question_index: usize,
}

impl ArmedTimer {
    #[must_use]
    pub fn question_index(&self) -> usize {
        self.question_index
    }

    /// Wait out the countdown and produce the timeout event.
    pub async fn expired(self) -> TimeoutEvent {
        tokio::time::sleep(self.limit).await;
        TimeoutEvent {
            question_index: self.question_index,
        }
    }
}

/// Countdown expiry for the question that was current when the timer
/// was armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutEvent {
    pub question_index: usize,
}
