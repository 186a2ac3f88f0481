use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::TestResultId;

/// Minimum share of correct answers, in percent, needed to pass a knowledge test.
pub const PASS_THRESHOLD_PERCENT: u32 = 80;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TestResultError {
    #[error("a test must contain at least one question")]
    NoQuestions,

    #[error("score {score} exceeds total questions {total}")]
    ScoreExceedsTotal { score: u32, total: u32 },
}

//
// ─── PASS RULE ─────────────────────────────────────────────────────────────────
//

/// Returns true when `score` out of `total` reaches [`PASS_THRESHOLD_PERCENT`].
///
/// Evaluated as `score * 100 >= total * 80` in integer arithmetic, so there is no
/// rounding step: 8/10 passes, 7/10 fails, 6/7 passes, 5/7 fails.
#[must_use]
pub fn meets_pass_threshold(score: u32, total: u32) -> bool {
    u64::from(score) * 100 >= u64::from(total) * u64::from(PASS_THRESHOLD_PERCENT)
}

//
// ─── TEST RESULT ───────────────────────────────────────────────────────────────
//

/// Outcome of one completed knowledge test. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestResult {
    id: TestResultId,
    taken_at: DateTime<Utc>,
    score: u32,
    total_questions: u32,
}

impl TestResult {
    /// Create a result for a finished test.
    ///
    /// # Errors
    ///
    /// Returns `TestResultError::NoQuestions` if `total_questions` is zero.
    /// Returns `TestResultError::ScoreExceedsTotal` if `score > total_questions`.
    pub fn new(
        id: TestResultId,
        taken_at: DateTime<Utc>,
        score: u32,
        total_questions: u32,
    ) -> Result<Self, TestResultError> {
        if total_questions == 0 {
            return Err(TestResultError::NoQuestions);
        }
        if score > total_questions {
            return Err(TestResultError::ScoreExceedsTotal {
                score,
                total: total_questions,
            });
        }
        Ok(Self {
            id,
            taken_at,
            score,
            total_questions,
        })
    }

    #[must_use]
    pub fn id(&self) -> TestResultId {
        self.id
    }

    #[must_use]
    pub fn taken_at(&self) -> DateTime<Utc> {
        self.taken_at
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        meets_pass_threshold(self.score, self.total_questions)
    }

    /// Whole-number percentage of correct answers, truncated.
    #[must_use]
    pub fn percentage(&self) -> u32 {
        let pct = u64::from(self.score) * 100 / u64::from(self.total_questions);
        u32::try_from(pct).unwrap_or(100)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
