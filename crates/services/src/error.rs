//! Shared error types for the services crate.

use thiserror::Error;

use rescue_core::CatalogError;
use rescue_core::model::{
    EquipmentId, LessonId, OptionId, QuestionId, ScenarioId, ScenarioStepId, TestResultError,
};
use storage::sqlite::SqliteInitError;

/// Errors emitted by `ProgressService`.
///
/// Persistence failures never appear here; they are logged and swallowed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressServiceError {
    #[error("unknown lesson: {0}")]
    UnknownLesson(LessonId),
    #[error("unknown scenario: {0}")]
    UnknownScenario(ScenarioId),
    #[error("step {index} is out of range for lesson {lesson} ({total} steps)")]
    StepOutOfRange {
        lesson: LessonId,
        index: usize,
        total: usize,
    },
}

/// Errors emitted by the knowledge test flow.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AssessmentError {
    #[error("no questions available for a test")]
    EmptyPool,
    #[error("test already completed")]
    Completed,
    #[error("option {option} is not an answer of question {question}")]
    UnknownOption {
        question: QuestionId,
        option: OptionId,
    },
    #[error("test is not finished: {answered} of {total} questions answered")]
    Incomplete { answered: usize, total: usize },
    #[error(transparent)]
    Result(#[from] TestResultError),
}

/// Errors emitted by the scenario walkthrough.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ScenarioError {
    #[error("unknown scenario: {0}")]
    UnknownScenario(ScenarioId),
    #[error("scenario run already completed")]
    Completed,
    #[error("option {option} is not an answer of step {step}")]
    UnknownOption {
        step: ScenarioStepId,
        option: OptionId,
    },
    #[error("scenario run is not finished: {answered} of {total} steps answered")]
    Incomplete { answered: usize, total: usize },
    #[error(transparent)]
    Progress(#[from] ProgressServiceError),
}

/// Errors emitted by `ChecklistService`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ChecklistError {
    #[error("unknown equipment item: {0}")]
    UnknownItem(EquipmentId),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
