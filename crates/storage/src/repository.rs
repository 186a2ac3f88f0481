use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rescue_core::model::{
    EquipmentChecklist, EquipmentId, LessonId, ScenarioId, TestResult, TestResultError,
    TestResultId, UserProgress,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Key of the persisted `UserProgress` record.
pub const PROGRESS_KEY: &str = "user_progress";

/// Key of the persisted equipment checklist record.
pub const CHECKLIST_KEY: &str = "checked_equipment";

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

//
// ─── RECORDS ───────────────────────────────────────────────────────────────────
//

/// Persisted shape of a single test result.
///
/// `passed` is not stored; it is re-derived from score and total on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResultRecord {
    pub id: TestResultId,
    pub taken_at: DateTime<Utc>,
    pub score: u32,
    pub total_questions: u32,
}

impl TestResultRecord {
    #[must_use]
    pub fn from_result(result: &TestResult) -> Self {
        Self {
            id: result.id(),
            taken_at: result.taken_at(),
            score: result.score(),
            total_questions: result.total_questions(),
        }
    }

    /// Convert the record back into a domain `TestResult`.
    ///
    /// # Errors
    ///
    /// Returns `TestResultError` if the stored counts are inconsistent.
    pub fn into_result(self) -> Result<TestResult, TestResultError> {
        TestResult::new(self.id, self.taken_at, self.score, self.total_questions)
    }
}

/// Persisted shape of `UserProgress`.
///
/// Every field defaults when absent and unknown fields are ignored, so records
/// written by older or newer builds still load. Derived values (knowledge level,
/// total score) are never written.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressRecord {
    pub completed_lessons: Vec<LessonId>,
    pub completed_scenarios: Vec<ScenarioId>,
    pub test_results: Vec<TestResultRecord>,
    pub lesson_positions: BTreeMap<LessonId, u32>,
}

impl ProgressRecord {
    #[must_use]
    pub fn from_progress(progress: &UserProgress) -> Self {
        Self {
            completed_lessons: progress.completed_lessons().iter().cloned().collect(),
            completed_scenarios: progress.completed_scenarios().iter().cloned().collect(),
            test_results: progress
                .test_results()
                .iter()
                .map(TestResultRecord::from_result)
                .collect(),
            lesson_positions: progress.lesson_positions().clone(),
        }
    }

    /// Convert the record back into domain `UserProgress`.
    ///
    /// Invalid test results are skipped one by one; the rest of the record is kept.
    #[must_use]
    pub fn into_progress(self) -> UserProgress {
        let results = self
            .test_results
            .into_iter()
            .filter_map(|record| {
                let id = record.id;
                record
                    .into_result()
                    .inspect_err(|err| log::warn!("skipping invalid test result {id}: {err}"))
                    .ok()
            })
            .collect();
        UserProgress::from_persisted(
            self.completed_lessons,
            self.completed_scenarios,
            results,
            self.lesson_positions,
        )
    }
}

/// Persisted shape of the equipment checklist.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChecklistRecord {
    pub checked: Vec<EquipmentId>,
}

impl ChecklistRecord {
    #[must_use]
    pub fn from_checklist(checklist: &EquipmentChecklist) -> Self {
        Self {
            checked: checklist.checked().iter().cloned().collect(),
        }
    }

    #[must_use]
    pub fn into_checklist(self) -> EquipmentChecklist {
        EquipmentChecklist::from_persisted(self.checked)
    }
}

/// Encode a record as JSON text.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if encoding fails.
pub fn encode_record<T: Serialize>(record: &T) -> Result<String, StorageError> {
    serde_json::to_string(record).map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Decode a record from JSON text.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if the text is not a valid record.
pub fn decode_record<T: DeserializeOwned>(raw: &str) -> Result<T, StorageError> {
    serde_json::from_str(raw).map_err(|e| StorageError::Serialization(e.to_string()))
}

//
// ─── CONTRACTS ─────────────────────────────────────────────────────────────────
//

/// Repository contract for the single progress record.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Fetch the stored progress record.
    ///
    /// Returns `Ok(None)` on first launch.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the stored record is corrupt, or
    /// `StorageError::Connection` if the backend is unavailable.
    async fn load_progress(&self) -> Result<Option<ProgressRecord>, StorageError>;

    /// Replace the stored progress record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn save_progress(&self, record: &ProgressRecord) -> Result<(), StorageError>;
}

/// Repository contract for the equipment checklist record.
#[async_trait]
pub trait ChecklistRepository: Send + Sync {
    /// Fetch the stored checklist, `Ok(None)` if nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record is corrupt or the backend fails.
    async fn load_checklist(&self) -> Result<Option<ChecklistRecord>, StorageError>;

    /// Replace the stored checklist.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn save_checklist(&self, record: &ChecklistRecord) -> Result<(), StorageError>;
}

//
// ─── IN-MEMORY ─────────────────────────────────────────────────────────────────
//

/// Simple in-memory key-value repository for testing and prototyping.
///
/// Values are kept as encoded JSON so the same (de)serialization path runs as
/// with `SQLite`.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Store raw text under `key`, bypassing encoding.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn put_raw(&self, key: &str, value: impl Into<String>) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), value.into());
        Ok(())
    }

    /// Raw stored text under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        self.get_raw(key)?
            .map(|raw| decode_record(&raw))
            .transpose()
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn load_progress(&self) -> Result<Option<ProgressRecord>, StorageError> {
        self.load(PROGRESS_KEY)
    }

    async fn save_progress(&self, record: &ProgressRecord) -> Result<(), StorageError> {
        self.put_raw(PROGRESS_KEY, encode_record(record)?)
    }
}

#[async_trait]
impl ChecklistRepository for InMemoryRepository {
    async fn load_checklist(&self) -> Result<Option<ChecklistRecord>, StorageError> {
        self.load(CHECKLIST_KEY)
    }

    async fn save_checklist(&self, record: &ChecklistRecord) -> Result<(), StorageError> {
        self.put_raw(CHECKLIST_KEY, encode_record(record)?)
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
    pub checklist: Arc<dyn ChecklistRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_repository(InMemoryRepository::new())
    }

    /// Use one repository value for every record kind.
    #[must_use]
    pub fn from_repository<R>(repo: R) -> Self
    where
        R: ProgressRepository + ChecklistRepository + Clone + 'static,
    {
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo.clone());
        let checklist: Arc<dyn ChecklistRepository> = Arc::new(repo);
        Self {
            progress,
            checklist,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rescue_core::time::fixed_now;

    fn sample_progress() -> UserProgress {
        let mut progress = UserProgress::new();
        progress.mark_lesson_completed(LessonId::new("lesson_2"));
        progress.mark_lesson_completed(LessonId::new("lesson_1"));
        progress.mark_scenario_completed(ScenarioId::new("scenario_4"));
        progress.set_lesson_position(LessonId::new("lesson_3"), 2);
        for (minutes, score) in [(0, 9), (5, 6), (10, 10)] {
            let result = TestResult::new(
                TestResultId::generate(),
                fixed_now() + chrono::Duration::minutes(minutes),
                score,
                10,
            )
            .unwrap();
            progress.record_test_result(result);
        }
        progress
    }

    #[tokio::test]
    async fn round_trips_progress() {
        let repo = InMemoryRepository::new();
        let progress = sample_progress();

        repo.save_progress(&ProgressRecord::from_progress(&progress))
            .await
            .unwrap();
        let loaded = repo
            .load_progress()
            .await
            .unwrap()
            .unwrap()
            .into_progress();

        assert_eq!(loaded, progress);
        assert_eq!(loaded.knowledge_level(), progress.knowledge_level());
        assert_eq!(loaded.test_results()[1].score(), 6);
    }

    #[tokio::test]
    async fn missing_record_is_none() {
        let repo = InMemoryRepository::new();
        assert!(repo.load_progress().await.unwrap().is_none());
        assert!(repo.load_checklist().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn corrupt_record_is_a_serialization_error() {
        let repo = InMemoryRepository::new();
        repo.put_raw(PROGRESS_KEY, "{not json").unwrap();
        let err = repo.load_progress().await.unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }

    #[test]
    fn record_tolerates_missing_and_unknown_fields() {
        let record: ProgressRecord = decode_record(
            r#"{"completed_lessons":["lesson_1"],"knowledge_level":"Expert","total_score":99}"#,
        )
        .unwrap();
        assert_eq!(record.completed_lessons, vec![LessonId::new("lesson_1")]);
        assert!(record.test_results.is_empty());
        assert!(record.lesson_positions.is_empty());
    }

    #[test]
    fn invalid_test_result_is_skipped_alone() {
        let valid = TestResultId::generate();
        let record = ProgressRecord {
            completed_lessons: vec![LessonId::new("lesson_1")],
            test_results: vec![
                TestResultRecord {
                    id: TestResultId::generate(),
                    taken_at: fixed_now(),
                    score: 3,
                    total_questions: 0,
                },
                TestResultRecord {
                    id: valid,
                    taken_at: fixed_now(),
                    score: 9,
                    total_questions: 10,
                },
            ],
            ..ProgressRecord::default()
        };

        let progress = record.into_progress();
        assert!(progress.is_lesson_completed(&LessonId::new("lesson_1")));
        assert_eq!(progress.test_results().len(), 1);
        assert_eq!(progress.test_results()[0].id(), valid);
    }

    #[tokio::test]
    async fn checklist_round_trips() {
        let repo = InMemoryRepository::new();
        let mut checklist = EquipmentChecklist::new();
        checklist.toggle(EquipmentId::new("eq_whistle"));
        checklist.toggle(EquipmentId::new("eq_ice_picks"));

        repo.save_checklist(&ChecklistRecord::from_checklist(&checklist))
            .await
            .unwrap();
        let loaded = repo
            .load_checklist()
            .await
            .unwrap()
            .unwrap()
            .into_checklist();
        assert_eq!(loaded, checklist);
    }
}
