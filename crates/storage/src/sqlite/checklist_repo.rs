use async_trait::async_trait;

use crate::repository::{CHECKLIST_KEY, ChecklistRecord, ChecklistRepository, StorageError};

use super::SqliteRepository;

#[async_trait]
impl ChecklistRepository for SqliteRepository {
    async fn load_checklist(&self) -> Result<Option<ChecklistRecord>, StorageError> {
        self.load_record(CHECKLIST_KEY).await
    }

    async fn save_checklist(&self, record: &ChecklistRecord) -> Result<(), StorageError> {
        self.save_record(CHECKLIST_KEY, record).await
    }
}
