use chrono::{DateTime, Utc};

/// A simple clock abstraction for deterministic time in services and tests.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Default,
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// Returns a clock that uses the current system time.
    #[must_use]
    pub fn default_clock() -> Self {
        Self::Default
    }

    /// Returns a clock fixed at the given timestamp.
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    /// Returns the current time according to the clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::Default => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }
}

/// Deterministic timestamp for tests and doc examples (2024-03-01T00:00:00Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_709_251_200;

/// Returns a deterministic `DateTime<Utc>` for tests and doc examples.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

/// Returns a `Clock` fixed at the deterministic test timestamp.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}
