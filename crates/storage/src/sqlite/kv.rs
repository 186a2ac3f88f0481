use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::Row;

use crate::repository::{StorageError, decode_record, encode_record};

use super::SqliteRepository;

impl SqliteRepository {
    /// Raw JSON text stored under `key`.
    pub(crate) async fn get_value(&self, key: &str) -> Result<Option<String>, StorageError> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let value: String = row
            .try_get("value")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        Ok(Some(value))
    }

    /// Insert or replace the JSON text stored under `key`.
    pub(crate) async fn put_value(&self, key: &str, value: &str) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            ",
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }

    pub(crate) async fn load_record<T: DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<T>, StorageError> {
        match self.get_value(key).await? {
            Some(raw) => decode_record(&raw).map(Some),
            None => Ok(None),
        }
    }

    pub(crate) async fn save_record<T: Serialize + Sync>(
        &self,
        key: &str,
        record: &T,
    ) -> Result<(), StorageError> {
        let raw = encode_record(record)?;
        self.put_value(key, &raw).await
    }
}
