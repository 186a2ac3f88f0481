mod checklist;
mod choice;
pub mod emergency;
mod equipment;
mod ids;
mod lesson;
mod progress;
mod question;
mod scenario;
mod test_result;

pub use checklist::EquipmentChecklist;
pub use choice::{ChoiceOption, MultipleChoice};
pub use emergency::{EmergencyStep, HypothermiaStage, Severity};
pub use equipment::{EquipmentCategory, EquipmentItem};
pub use ids::{
    EquipmentId, LessonId, OptionId, ParseIdError, QuestionId, ScenarioId, ScenarioStepId,
    SectionId, StepId, TestResultId,
};
pub use lesson::{Lesson, LessonSection, LessonStep};
pub use progress::{KnowledgeLevel, UserProgress};
pub use question::Question;
pub use scenario::{Difficulty, Scenario, ScenarioStep};
pub use test_result::{
    PASS_THRESHOLD_PERCENT, TestResult, TestResultError, meets_pass_threshold,
};
