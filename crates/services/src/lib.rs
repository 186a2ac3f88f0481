#![forbid(unsafe_code)]

pub mod answer;
pub mod app_services;
pub mod assessment;
pub mod checklist_service;
pub mod error;
pub mod overview;
pub mod progress_service;
pub mod scenarios;

pub use rescue_core::Clock;

pub use answer::{AnswerFeedback, WalkthroughProgress};
pub use app_services::AppServices;
pub use assessment::{AnsweredQuestion, AssessmentService, DEFAULT_SAMPLE_SIZE, TestSession};
pub use checklist_service::{ChecklistService, ChecklistSummary};
pub use error::{
    AppServicesError, AssessmentError, ChecklistError, ProgressServiceError, ScenarioError,
};
pub use overview::{LessonStatus, ProgressOverview, ScenarioStatus};
pub use progress_service::ProgressService;
pub use scenarios::{ScenarioOutcome, ScenarioRun, ScenarioService};
