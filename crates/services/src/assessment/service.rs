use std::sync::Arc;

use rand::Rng;
use rand::seq::SliceRandom;

use rescue_core::model::{Question, TestResult, TestResultId};
use rescue_core::{Catalog, Clock};

use super::session::TestSession;
use crate::error::AssessmentError;
use crate::progress_service::ProgressService;

/// Number of questions drawn for one test.
pub const DEFAULT_SAMPLE_SIZE: usize = 10;

/// Starts knowledge tests and records their results.
#[derive(Clone)]
pub struct AssessmentService {
    clock: Clock,
    catalog: Arc<Catalog>,
    progress: Arc<ProgressService>,
    sample_size: usize,
}

impl AssessmentService {
    #[must_use]
    pub fn new(clock: Clock, catalog: Arc<Catalog>, progress: Arc<ProgressService>) -> Self {
        Self {
            clock,
            catalog,
            progress,
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }

    /// Override how many questions a test draws. Zero is treated as one.
    #[must_use]
    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size.max(1);
        self
    }

    #[must_use]
    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    /// Start a test over a random sample of the question pool.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::EmptyPool` if the catalog has no questions.
    pub fn start_test(&self) -> Result<TestSession, AssessmentError> {
        self.start_test_with_rng(&mut rand::rng())
    }

    /// Like [`start_test`](Self::start_test) with a caller-provided RNG.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::EmptyPool` if the catalog has no questions.
    pub fn start_test_with_rng<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<TestSession, AssessmentError> {
        let questions = sample_questions(self.catalog.questions(), self.sample_size, rng);
        let session = TestSession::new(questions, self.clock.now())?;
        log::debug!("started test with {} questions", session.total_questions());
        Ok(session)
    }

    /// Score a finished test and append it to the progress history.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::Incomplete` if the test still has unanswered
    /// questions.
    pub async fn finish_test(&self, session: TestSession) -> Result<TestResult, AssessmentError> {
        let result = session.into_result(TestResultId::generate(), self.clock.now())?;
        self.progress.save_test_result(result.clone()).await;
        Ok(result)
    }
}

/// Uniform sample of `size` distinct questions without replacement, in random
/// order. Takes the whole pool when it is smaller than `size`.
fn sample_questions<R: Rng + ?Sized>(
    pool: &[Question],
    size: usize,
    rng: &mut R,
) -> Vec<Question> {
    let mut questions = pool.to_vec();
    questions.shuffle(rng);
    questions.truncate(size);
    questions
}
