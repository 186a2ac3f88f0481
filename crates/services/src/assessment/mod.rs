//! Randomly sampled knowledge tests.

mod service;
mod session;

pub use service::{AssessmentService, DEFAULT_SAMPLE_SIZE};
pub use session::{AnsweredQuestion, TestSession};
