use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::Mutex as AsyncMutex;

use rescue_core::Catalog;
use rescue_core::model::{KnowledgeLevel, LessonId, ScenarioId, TestResult, UserProgress};
use storage::repository::{ProgressRecord, ProgressRepository};

use crate::error::ProgressServiceError;
use crate::overview::ProgressOverview;

/// Sole owner of the user's mutable progress.
///
/// Every mutation updates the in-memory state first and then writes the whole
/// record through the repository. Write failures are logged and swallowed; the
/// in-memory state stays authoritative for the session.
///
/// Mutations are serialized by `write_gate` from update through persist, so the
/// last record written is always the newest one.
pub struct ProgressService {
    catalog: Arc<Catalog>,
    repo: Arc<dyn ProgressRepository>,
    state: Mutex<UserProgress>,
    write_gate: AsyncMutex<()>,
}

impl ProgressService {
    /// Load persisted progress, falling back to a fresh record.
    ///
    /// A missing or unreadable record yields empty progress. Invalid test
    /// results and ids that no longer exist in the catalog are dropped.
    pub async fn load(catalog: Arc<Catalog>, repo: Arc<dyn ProgressRepository>) -> Self {
        let mut progress = match repo.load_progress().await {
            Ok(Some(record)) => record.into_progress(),
            Ok(None) => UserProgress::new(),
            Err(err) => {
                log::warn!("failed to load progress, starting fresh: {err}");
                UserProgress::new()
            }
        };

        let dropped = progress.retain_known(
            |id| catalog.lesson(id).is_some(),
            |id| catalog.scenario(id).is_some(),
        );
        if dropped > 0 {
            log::debug!("dropped {dropped} progress entries with unknown ids");
        }

        Self {
            catalog,
            repo,
            state: Mutex::new(progress),
            write_gate: AsyncMutex::new(()),
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Copy of the current progress.
    #[must_use]
    pub fn snapshot(&self) -> UserProgress {
        self.lock().clone()
    }

    #[must_use]
    pub fn knowledge_level(&self) -> KnowledgeLevel {
        self.lock().knowledge_level()
    }

    #[must_use]
    pub fn overview(&self) -> ProgressOverview {
        ProgressOverview::build(&self.catalog, &self.lock())
    }

    /// Mark a lesson as completed. Marking it again is a no-op.
    ///
    /// Returns true if the lesson was newly completed.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::UnknownLesson` if the catalog has no such lesson.
    pub async fn mark_lesson_completed(
        &self,
        lesson_id: &LessonId,
    ) -> Result<bool, ProgressServiceError> {
        if self.catalog.lesson(lesson_id).is_none() {
            return Err(ProgressServiceError::UnknownLesson(lesson_id.clone()));
        }
        let _gate = self.write_gate.lock().await;
        let (inserted, record) = self.update(|p| p.mark_lesson_completed(lesson_id.clone()));
        log::debug!("lesson {lesson_id} completed (new: {inserted})");
        self.persist(&record).await;
        Ok(inserted)
    }

    /// Mark a scenario as completed. Marking it again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::UnknownScenario` if the catalog has no such scenario.
    pub async fn mark_scenario_completed(
        &self,
        scenario_id: &ScenarioId,
    ) -> Result<bool, ProgressServiceError> {
        if self.catalog.scenario(scenario_id).is_none() {
            return Err(ProgressServiceError::UnknownScenario(scenario_id.clone()));
        }
        let _gate = self.write_gate.lock().await;
        let (inserted, record) = self.update(|p| p.mark_scenario_completed(scenario_id.clone()));
        log::debug!("scenario {scenario_id} completed (new: {inserted})");
        self.persist(&record).await;
        Ok(inserted)
    }

    /// Append a finished test to the history.
    pub async fn save_test_result(&self, result: TestResult) {
        log::debug!(
            "saving test result {}: {}/{} (passed: {})",
            result.id(),
            result.score(),
            result.total_questions(),
            result.passed()
        );
        let _gate = self.write_gate.lock().await;
        let ((), record) = self.update(|p| p.record_test_result(result));
        self.persist(&record).await;
    }

    /// Replace all progress with a fresh empty record.
    pub async fn reset_progress(&self) {
        let _gate = self.write_gate.lock().await;
        let ((), record) = self.update(|p| *p = UserProgress::new());
        log::debug!("progress reset");
        self.persist(&record).await;
    }

    /// Remember the step a user reached inside a lesson.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::UnknownLesson` for an unknown lesson and
    /// `ProgressServiceError::StepOutOfRange` if `step_index` is not a step of it.
    pub async fn record_lesson_position(
        &self,
        lesson_id: &LessonId,
        step_index: usize,
    ) -> Result<(), ProgressServiceError> {
        let Some(lesson) = self.catalog.lesson(lesson_id) else {
            return Err(ProgressServiceError::UnknownLesson(lesson_id.clone()));
        };
        let out_of_range = || ProgressServiceError::StepOutOfRange {
            lesson: lesson_id.clone(),
            index: step_index,
            total: lesson.total_steps(),
        };
        if lesson.step_at(step_index).is_none() {
            return Err(out_of_range());
        }
        let index = u32::try_from(step_index).map_err(|_| out_of_range())?;

        let _gate = self.write_gate.lock().await;
        let ((), record) = self.update(|p| p.set_lesson_position(lesson_id.clone(), index));
        self.persist(&record).await;
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, UserProgress> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `f` under the lock and capture the record to persist.
    ///
    /// Callers hold `write_gate` until the record is persisted.
    fn update<R>(&self, f: impl FnOnce(&mut UserProgress) -> R) -> (R, ProgressRecord) {
        let mut guard = self.lock();
        let out = f(&mut *guard);
        (out, ProgressRecord::from_progress(&guard))
    }

    async fn persist(&self, record: &ProgressRecord) {
        if let Err(err) = self.repo.save_progress(record).await {
            log::warn!("failed to persist progress: {err}");
        }
    }
}

impl fmt::Debug for ProgressService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressService")
            .field("progress", &*self.lock())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rescue_core::model::TestResultId;
    use rescue_core::time::fixed_now;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;
    use storage::repository::{InMemoryRepository, PROGRESS_KEY, StorageError};

    /// Delays its first save so a second writer can overtake it.
    struct SlowFirstSave {
        inner: InMemoryRepository,
        first: AtomicBool,
    }

    #[async_trait]
    impl ProgressRepository for SlowFirstSave {
        async fn load_progress(&self) -> Result<Option<ProgressRecord>, StorageError> {
            self.inner.load_progress().await
        }

        async fn save_progress(&self, record: &ProgressRecord) -> Result<(), StorageError> {
            if self.first.swap(false, Ordering::SeqCst) {
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
            self.inner.save_progress(record).await
        }
    }

    async fn service_with(repo: &InMemoryRepository) -> ProgressService {
        let catalog = Arc::new(Catalog::builtin().unwrap());
        ProgressService::load(catalog, Arc::new(repo.clone())).await
    }

    fn result(score: u32) -> TestResult {
        TestResult::new(TestResultId::generate(), fixed_now(), score, 10).unwrap()
    }

    #[tokio::test]
    async fn marking_lesson_twice_is_idempotent() {
        let repo = InMemoryRepository::new();
        let service = service_with(&repo).await;
        let id = LessonId::new("lesson_1");

        assert!(service.mark_lesson_completed(&id).await.unwrap());
        assert!(!service.mark_lesson_completed(&id).await.unwrap());
        assert_eq!(service.snapshot().completed_lessons().len(), 1);
    }

    #[tokio::test]
    async fn unknown_ids_are_rejected() {
        let repo = InMemoryRepository::new();
        let service = service_with(&repo).await;

        let err = service
            .mark_lesson_completed(&LessonId::new("lesson_99"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ProgressServiceError::UnknownLesson(LessonId::new("lesson_99"))
        );
        let err = service
            .mark_scenario_completed(&ScenarioId::new("nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProgressServiceError::UnknownScenario(_)));
        assert_eq!(service.snapshot(), UserProgress::new());
        assert!(repo.get_raw(PROGRESS_KEY).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_results_drive_score_and_level() {
        let repo = InMemoryRepository::new();
        let service = service_with(&repo).await;

        service.save_test_result(result(7)).await;
        assert_eq!(service.knowledge_level(), KnowledgeLevel::Beginner);
        assert_eq!(service.snapshot().total_score(), 0);

        service.save_test_result(result(8)).await;
        assert_eq!(service.knowledge_level(), KnowledgeLevel::Intermediate);
        assert_eq!(service.snapshot().total_score(), 8);
        assert_eq!(service.snapshot().test_results().len(), 2);
    }

    #[tokio::test]
    async fn mutations_are_persisted_and_reloaded() {
        let repo = InMemoryRepository::new();
        let service = service_with(&repo).await;
        service
            .mark_lesson_completed(&LessonId::new("lesson_3"))
            .await
            .unwrap();
        service
            .mark_scenario_completed(&ScenarioId::new("scenario_5"))
            .await
            .unwrap();
        service.save_test_result(result(10)).await;
        service
            .record_lesson_position(&LessonId::new("lesson_4"), 2)
            .await
            .unwrap();

        let reloaded = service_with(&repo).await;
        assert_eq!(reloaded.snapshot(), service.snapshot());
    }

    #[tokio::test]
    async fn reset_yields_fresh_progress() {
        let repo = InMemoryRepository::new();
        let service = service_with(&repo).await;
        service
            .mark_lesson_completed(&LessonId::new("lesson_1"))
            .await
            .unwrap();
        service.save_test_result(result(9)).await;

        service.reset_progress().await;

        assert_eq!(service.snapshot(), UserProgress::new());
        let reloaded = service_with(&repo).await;
        assert_eq!(reloaded.snapshot(), UserProgress::new());
    }

    #[tokio::test]
    async fn lesson_position_bounds_are_checked() {
        let repo = InMemoryRepository::new();
        let service = service_with(&repo).await;
        let lesson = LessonId::new("lesson_1");

        service.record_lesson_position(&lesson, 4).await.unwrap();
        assert_eq!(service.snapshot().lesson_position(&lesson), Some(4));

        let err = service.record_lesson_position(&lesson, 5).await.unwrap_err();
        assert_eq!(
            err,
            ProgressServiceError::StepOutOfRange {
                lesson: lesson.clone(),
                index: 5,
                total: 5,
            }
        );
        assert_eq!(service.snapshot().lesson_position(&lesson), Some(4));
    }

    #[tokio::test]
    async fn corrupt_record_loads_as_empty_progress() {
        let repo = InMemoryRepository::new();
        repo.put_raw(PROGRESS_KEY, "{\"completed_lessons\": 42").unwrap();

        let service = service_with(&repo).await;
        assert_eq!(service.snapshot(), UserProgress::new());
    }

    #[tokio::test]
    async fn unknown_persisted_ids_are_dropped_on_load() {
        let repo = InMemoryRepository::new();
        repo.put_raw(
            PROGRESS_KEY,
            r#"{"completed_lessons":["lesson_1","lesson_gone"],"completed_scenarios":["scenario_old"]}"#,
        )
        .unwrap();

        let service = service_with(&repo).await;
        let progress = service.snapshot();
        assert_eq!(progress.completed_lessons().len(), 1);
        assert!(progress.is_lesson_completed(&LessonId::new("lesson_1")));
        assert!(progress.completed_scenarios().is_empty());
    }

    #[tokio::test]
    async fn invalid_test_result_does_not_discard_progress() {
        let repo = InMemoryRepository::new();
        let valid = TestResultId::generate();
        let invalid = TestResultId::generate();
        let raw = format!(
            r#"{{
                "completed_lessons": ["lesson_1", "lesson_2", "lesson_3", "lesson_4"],
                "completed_scenarios": ["scenario_1"],
                "test_results": [
                    {{"id": "{valid}", "taken_at": "2024-01-01T12:00:00Z", "score": 9, "total_questions": 10}},
                    {{"id": "{invalid}", "taken_at": "2024-01-01T12:05:00Z", "score": 3, "total_questions": 0}}
                ]
            }}"#
        );
        repo.put_raw(PROGRESS_KEY, raw).unwrap();

        let progress = service_with(&repo).await.snapshot();
        assert_eq!(progress.completed_lessons().len(), 4);
        assert_eq!(progress.completed_scenarios().len(), 1);
        assert_eq!(progress.test_results().len(), 1);
        assert_eq!(progress.test_results()[0].id(), valid);
        assert_eq!(progress.knowledge_level(), KnowledgeLevel::Intermediate);
    }

    #[tokio::test]
    async fn concurrent_mutations_persist_latest_record() {
        let inner = InMemoryRepository::new();
        let repo = Arc::new(SlowFirstSave {
            inner: inner.clone(),
            first: AtomicBool::new(true),
        });
        let catalog = Arc::new(Catalog::builtin().unwrap());
        let service = ProgressService::load(catalog, repo).await;
        let first = LessonId::new("lesson_1");
        let second = LessonId::new("lesson_2");

        let (a, b) = tokio::join!(
            service.mark_lesson_completed(&first),
            service.mark_lesson_completed(&second)
        );
        assert!(a.unwrap());
        assert!(b.unwrap());

        let stored = inner.load_progress().await.unwrap().unwrap();
        assert!(stored.completed_lessons.contains(&first));
        assert!(stored.completed_lessons.contains(&second));
    }
}
