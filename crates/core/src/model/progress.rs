use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::model::ids::{LessonId, ScenarioId};
use crate::model::test_result::TestResult;

//
// ─── KNOWLEDGE LEVEL ───────────────────────────────────────────────────────────
//

/// Tier summarising completions and passed tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KnowledgeLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl KnowledgeLevel {
    /// Derives the level from the number of completed lessons + scenarios and the
    /// number of passed tests.
    ///
    /// Checked most-advanced first; the first matching tier wins:
    /// - `Expert`: `completed >= 12` and `passed_tests >= 3`
    /// - `Advanced`: `completed >= 8` and `passed_tests >= 2`
    /// - `Intermediate`: `completed >= 4` or `passed_tests >= 1`
    /// - `Beginner` otherwise
    #[must_use]
    pub fn from_counts(completed: usize, passed_tests: usize) -> Self {
        if completed >= 12 && passed_tests >= 3 {
            KnowledgeLevel::Expert
        } else if completed >= 8 && passed_tests >= 2 {
            KnowledgeLevel::Advanced
        } else if completed >= 4 || passed_tests >= 1 {
            KnowledgeLevel::Intermediate
        } else {
            KnowledgeLevel::Beginner
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            KnowledgeLevel::Beginner => "Beginner",
            KnowledgeLevel::Intermediate => "Intermediate",
            KnowledgeLevel::Advanced => "Advanced",
            KnowledgeLevel::Expert => "Expert",
        }
    }
}

impl std::fmt::Display for KnowledgeLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

//
// ─── USER PROGRESS ─────────────────────────────────────────────────────────────
//

/// Everything the learner has achieved so far.
///
/// Only the raw facts are stored: completed ids, the chronological list of test
/// results and per-lesson resume positions. Knowledge level, total score and the
/// number of scenarios passed are computed from those facts on every read, so they
/// can never drift out of date after a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserProgress {
    completed_lessons: BTreeSet<LessonId>,
    completed_scenarios: BTreeSet<ScenarioId>,
    test_results: Vec<TestResult>,
    lesson_positions: BTreeMap<LessonId, u32>,
}

impl UserProgress {
    /// Fresh, empty progress.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrate progress from persisted storage.
    ///
    /// `test_results` must already be in chronological order.
    #[must_use]
    pub fn from_persisted(
        completed_lessons: impl IntoIterator<Item = LessonId>,
        completed_scenarios: impl IntoIterator<Item = ScenarioId>,
        test_results: Vec<TestResult>,
        lesson_positions: impl IntoIterator<Item = (LessonId, u32)>,
    ) -> Self {
        Self {
            completed_lessons: completed_lessons.into_iter().collect(),
            completed_scenarios: completed_scenarios.into_iter().collect(),
            test_results,
            lesson_positions: lesson_positions.into_iter().collect(),
        }
    }

    // ─── mutations ─────────────────────────────────────────────────────────────

    /// Returns true if the lesson was not completed before.
    pub fn mark_lesson_completed(&mut self, lesson_id: LessonId) -> bool {
        self.completed_lessons.insert(lesson_id)
    }

    /// Returns true if the scenario was not completed before.
    pub fn mark_scenario_completed(&mut self, scenario_id: ScenarioId) -> bool {
        self.completed_scenarios.insert(scenario_id)
    }

    /// Appends a result; history is append-only.
    pub fn record_test_result(&mut self, result: TestResult) {
        self.test_results.push(result);
    }

    pub fn set_lesson_position(&mut self, lesson_id: LessonId, step_index: u32) {
        self.lesson_positions.insert(lesson_id, step_index);
    }

    /// Drops completions and positions whose ids fail `is_known_*`.
    ///
    /// Returns the number of entries removed.
    pub fn retain_known(
        &mut self,
        is_known_lesson: impl Fn(&LessonId) -> bool,
        is_known_scenario: impl Fn(&ScenarioId) -> bool,
    ) -> usize {
        let before = self.completed_lessons.len()
            + self.completed_scenarios.len()
            + self.lesson_positions.len();
        self.completed_lessons.retain(|id| is_known_lesson(id));
        self.completed_scenarios.retain(|id| is_known_scenario(id));
        self.lesson_positions.retain(|id, _| is_known_lesson(id));
        let after = self.completed_lessons.len()
            + self.completed_scenarios.len()
            + self.lesson_positions.len();
        before - after
    }

    // ─── accessors ─────────────────────────────────────────────────────────────

    #[must_use]
    pub fn completed_lessons(&self) -> &BTreeSet<LessonId> {
        &self.completed_lessons
    }

    #[must_use]
    pub fn completed_scenarios(&self) -> &BTreeSet<ScenarioId> {
        &self.completed_scenarios
    }

    /// Results in the order they were recorded.
    #[must_use]
    pub fn test_results(&self) -> &[TestResult] {
        &self.test_results
    }

    #[must_use]
    pub fn lesson_positions(&self) -> &BTreeMap<LessonId, u32> {
        &self.lesson_positions
    }

    #[must_use]
    pub fn lesson_position(&self, lesson_id: &LessonId) -> Option<u32> {
        self.lesson_positions.get(lesson_id).copied()
    }

    #[must_use]
    pub fn is_lesson_completed(&self, lesson_id: &LessonId) -> bool {
        self.completed_lessons.contains(lesson_id)
    }

    #[must_use]
    pub fn is_scenario_completed(&self, scenario_id: &ScenarioId) -> bool {
        self.completed_scenarios.contains(scenario_id)
    }

    /// Completed lessons plus completed scenarios.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.completed_lessons.len() + self.completed_scenarios.len()
    }

    #[must_use]
    pub fn scenarios_passed(&self) -> usize {
        self.completed_scenarios.len()
    }

    pub fn passed_tests(&self) -> impl Iterator<Item = &TestResult> {
        self.test_results.iter().filter(|r| r.passed())
    }

    #[must_use]
    pub fn passed_test_count(&self) -> usize {
        self.passed_tests().count()
    }

    /// Sum of the scores of passed tests.
    #[must_use]
    pub fn total_score(&self) -> u64 {
        self.passed_tests().map(|r| u64::from(r.score())).sum()
    }

    #[must_use]
    pub fn best_percentage(&self) -> Option<u32> {
        self.test_results.iter().map(TestResult::percentage).max()
    }

    #[must_use]
    pub fn knowledge_level(&self) -> KnowledgeLevel {
        KnowledgeLevel::from_counts(self.completed_count(), self.passed_test_count())
    }

    /// Percentage of catalog items (lessons + scenarios) completed.
    ///
    /// Returns `0.0` for an empty catalog.
    #[must_use]
    pub fn overall_progress(&self, lesson_count: usize, scenario_count: usize) -> f64 {
        let total = lesson_count + scenario_count;
        if total == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let pct = self.completed_count() as f64 / total as f64 * 100.0;
        pct
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TestResultId;
    use crate::time::fixed_now;

    fn result(score: u32, total: u32) -> TestResult {
        TestResult::new(TestResultId::generate(), fixed_now(), score, total).unwrap()
    }

    #[test]
    fn level_boundaries() {
        let level = KnowledgeLevel::from_counts;
        assert_eq!(level(0, 0), KnowledgeLevel::Beginner);
        assert_eq!(level(3, 0), KnowledgeLevel::Beginner);
        assert_eq!(level(4, 0), KnowledgeLevel::Intermediate);
        assert_eq!(level(0, 1), KnowledgeLevel::Intermediate);
        assert_eq!(level(8, 1), KnowledgeLevel::Intermediate);
        assert_eq!(level(8, 2), KnowledgeLevel::Advanced);
        assert_eq!(level(12, 2), KnowledgeLevel::Advanced);
        assert_eq!(level(12, 3), KnowledgeLevel::Expert);
        assert_eq!(level(11, 9), KnowledgeLevel::Advanced);
        assert_eq!(level(7, 5), KnowledgeLevel::Intermediate);
    }

    #[test]
    fn marking_twice_is_a_noop() {
        let mut progress = UserProgress::new();
        assert!(progress.mark_lesson_completed(LessonId::new("lesson_1")));
        assert!(!progress.mark_lesson_completed(LessonId::new("lesson_1")));
        assert_eq!(progress.completed_lessons().len(), 1);
    }

    #[test]
    fn scenarios_passed_mirrors_completed_set() {
        let mut progress = UserProgress::new();
        progress.mark_scenario_completed(ScenarioId::new("scenario_1"));
        progress.mark_scenario_completed(ScenarioId::new("scenario_2"));
        progress.mark_scenario_completed(ScenarioId::new("scenario_1"));
        assert_eq!(progress.scenarios_passed(), 2);
    }

    #[test]
    fn total_score_counts_only_passed_tests() {
        let mut progress = UserProgress::new();
        progress.record_test_result(result(9, 10));
        progress.record_test_result(result(7, 10));
        progress.record_test_result(result(8, 10));

        assert_eq!(progress.total_score(), 17);
        assert_eq!(progress.passed_test_count(), 2);
        assert_eq!(progress.best_percentage(), Some(90));
        assert_eq!(progress.test_results()[1].score(), 7);
    }

    #[test]
    fn level_follows_mutations() {
        let mut progress = UserProgress::new();
        assert_eq!(progress.knowledge_level(), KnowledgeLevel::Beginner);

        progress.record_test_result(result(3, 10));
        assert_eq!(progress.knowledge_level(), KnowledgeLevel::Beginner);

        progress.record_test_result(result(10, 10));
        assert_eq!(progress.knowledge_level(), KnowledgeLevel::Intermediate);
    }

    #[test]
    fn overall_progress_bounds() {
        let mut progress = UserProgress::new();
        assert!((progress.overall_progress(6, 8) - 0.0).abs() < f64::EPSILON);

        for i in 1..=6 {
            progress.mark_lesson_completed(LessonId::new(format!("lesson_{i}")));
        }
        for i in 1..=8 {
            progress.mark_scenario_completed(ScenarioId::new(format!("scenario_{i}")));
        }
        let full = progress.overall_progress(6, 8);
        assert!((full - 100.0).abs() < f64::EPSILON);
        assert!((progress.overall_progress(0, 0) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn retain_known_prunes_stale_ids() {
        let mut progress = UserProgress::new();
        progress.mark_lesson_completed(LessonId::new("lesson_1"));
        progress.mark_lesson_completed(LessonId::new("lesson_99"));
        progress.set_lesson_position(LessonId::new("lesson_99"), 2);
        progress.mark_scenario_completed(ScenarioId::new("scenario_1"));

        let removed = progress.retain_known(
            |id| id.as_str() == "lesson_1",
            |id| id.as_str() == "scenario_1",
        );

        assert_eq!(removed, 2);
        assert_eq!(progress.completed_count(), 2);
        assert_eq!(progress.lesson_position(&LessonId::new("lesson_99")), None);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn level_is_monotone_in_both_counts(done in 0usize..20, tests in 0usize..6) {
                let level = KnowledgeLevel::from_counts(done, tests);
                prop_assert!(KnowledgeLevel::from_counts(done + 1, tests) >= level);
                prop_assert!(KnowledgeLevel::from_counts(done, tests + 1) >= level);
            }

            #[test]
            fn overall_progress_never_decreases(lessons in prop::collection::vec(1u8..=6, 0..12),
                                                scenarios in prop::collection::vec(1u8..=8, 0..16)) {
                let mut progress = UserProgress::new();
                let mut last = progress.overall_progress(6, 8);
                for i in lessons {
                    progress.mark_lesson_completed(LessonId::new(format!("lesson_{i}")));
                    let now = progress.overall_progress(6, 8);
                    prop_assert!(now >= last);
                    last = now;
                }
                for i in scenarios {
                    progress.mark_scenario_completed(ScenarioId::new(format!("scenario_{i}")));
                    let now = progress.overall_progress(6, 8);
                    prop_assert!(now >= last);
                    last = now;
                }
                prop_assert!(last <= 100.0);
            }
        }
    }
}
