use chrono::{DateTime, Duration, Utc};

/// Where services read the current time from.
///
/// Test results and scenario completions are stamped with `now()`. Tests pin
/// it with [`fixed_clock`] so stored records compare equal across runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Clock {
    #[default]
    System,
    Fixed(DateTime<Utc>),
}

impl Clock {
    #[must_use]
    pub fn system() -> Self {
        Self::System
    }

    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match *self {
            Self::System => Utc::now(),
            Self::Fixed(at) => at,
        }
    }

    /// Same clock, `delta` later. A system clock stays a system clock.
    #[must_use]
    pub fn advanced_by(self, delta: Duration) -> Self {
        match self {
            Self::Fixed(at) => Self::Fixed(at + delta),
            Self::System => Self::System,
        }
    }
}

/// Unix seconds of [`fixed_now`], 2023-11-14T22:13:20Z.
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(FIXED_TEST_TIMESTAMP)
}

#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}
