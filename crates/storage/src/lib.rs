#![forbid(unsafe_code)]

pub mod repository;
pub mod sqlite;

pub use repository::{
    CHECKLIST_KEY, ChecklistRecord, ChecklistRepository, InMemoryRepository, PROGRESS_KEY,
    ProgressRecord, ProgressRepository, Storage, StorageError, TestResultRecord,
};
pub use sqlite::{SqliteInitError, SqliteRepository};
