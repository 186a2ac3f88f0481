use async_trait::async_trait;

use crate::repository::{PROGRESS_KEY, ProgressRecord, ProgressRepository, StorageError};

use super::SqliteRepository;

#[async_trait]
impl ProgressRepository for SqliteRepository {
    async fn load_progress(&self) -> Result<Option<ProgressRecord>, StorageError> {
        self.load_record(PROGRESS_KEY).await
    }

    async fn save_progress(&self, record: &ProgressRecord) -> Result<(), StorageError> {
        self.save_record(PROGRESS_KEY, record).await
    }
}
