use serde::Serialize;

use rescue_core::Catalog;
use rescue_core::model::{Difficulty, KnowledgeLevel, LessonId, ScenarioId, UserProgress};

/// Completion state of one lesson, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LessonStatus {
    pub id: LessonId,
    pub title: String,
    pub completed: bool,
    /// Last step index the user reached, if any.
    pub position: Option<u32>,
    pub total_steps: usize,
}

/// Completion state of one scenario, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioStatus {
    pub id: ScenarioId,
    pub title: String,
    pub difficulty: Difficulty,
    pub completed: bool,
}

/// Read-only progress snapshot for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressOverview {
    pub completed_lessons: usize,
    pub total_lessons: usize,
    pub completed_scenarios: usize,
    pub total_scenarios: usize,
    pub tests_taken: usize,
    pub tests_passed: usize,
    pub total_score: u64,
    pub best_percentage: Option<u32>,
    pub knowledge_level: KnowledgeLevel,
    /// 0.0 to 100.0.
    pub overall_progress: f64,
    pub lessons: Vec<LessonStatus>,
    pub scenarios: Vec<ScenarioStatus>,
}

impl ProgressOverview {
    #[must_use]
    pub fn build(catalog: &Catalog, progress: &UserProgress) -> Self {
        let lessons = catalog
            .lessons()
            .iter()
            .map(|lesson| LessonStatus {
                id: lesson.id().clone(),
                title: lesson.title().to_owned(),
                completed: progress.is_lesson_completed(lesson.id()),
                position: progress.lesson_position(lesson.id()),
                total_steps: lesson.total_steps(),
            })
            .collect::<Vec<_>>();
        let scenarios = catalog
            .scenarios()
            .iter()
            .map(|scenario| ScenarioStatus {
                id: scenario.id().clone(),
                title: scenario.title().to_owned(),
                difficulty: scenario.difficulty(),
                completed: progress.is_scenario_completed(scenario.id()),
            })
            .collect::<Vec<_>>();

        Self {
            completed_lessons: lessons.iter().filter(|l| l.completed).count(),
            total_lessons: lessons.len(),
            completed_scenarios: scenarios.iter().filter(|s| s.completed).count(),
            total_scenarios: scenarios.len(),
            tests_taken: progress.test_results().len(),
            tests_passed: progress.passed_test_count(),
            total_score: progress.total_score(),
            best_percentage: progress.best_percentage(),
            knowledge_level: progress.knowledge_level(),
            overall_progress: progress
                .overall_progress(catalog.lesson_count(), catalog.scenario_count()),
            lessons,
            scenarios,
        }
    }

    /// Overall progress truncated to a whole percent.
    #[must_use]
    pub fn overall_percent(&self) -> u32 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let pct = self.overall_progress.clamp(0.0, 100.0) as u32;
        pct
    }

    #[must_use]
    pub fn is_everything_completed(&self) -> bool {
        self.completed_lessons == self.total_lessons
            && self.completed_scenarios == self.total_scenarios
    }
}
