use super::Storage;
use crate::db::DatabaseManager;
use crate::domain::RecordKind;
use crate::error::{FarmError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Database storage implementation using Turso/libSQL with a single
/// JSON-document `records` table
pub struct DatabaseStorage {
    db: Arc<DatabaseManager>,
}

impl DatabaseStorage {
    /// Wrap an opened manager, running migrations first.
    pub async fn new(db_manager: DatabaseManager) -> Result<Self> {
        db_manager.run_migrations().await?;
        Ok(Self {
            db: Arc::new(db_manager),
        })
    }

    fn decode(kind: RecordKind, data: &str) -> Result<Value> {
        serde_json::from_str(data).map_err(|e| FarmError::Database {
            message: format!("Failed to deserialize {kind}: {e}"),
        })
    }
}

#[async_trait]
impl Storage for DatabaseStorage {
    async fn put_record(&self, kind: RecordKind, id: Uuid, data: Value) -> Result<()> {
        let encoded = serde_json::to_string(&data).map_err(|e| FarmError::Database {
            message: format!("Failed to serialize {kind}: {e}"),
        })?;
        self.db
            .upsert_record(kind.as_str(), &id.to_string(), &encoded)
            .await?;
        debug!("Stored {} with id {}", kind, id);
        Ok(())
    }

    async fn get_record(&self, kind: RecordKind, id: Uuid) -> Result<Option<Value>> {
        self.db
            .get_record(kind.as_str(), &id.to_string())
            .await?
            .map(|data| Self::decode(kind, &data))
            .transpose()
    }

    async fn list_records(&self, kind: RecordKind) -> Result<Vec<Value>> {
        self.db
            .list_records(kind.as_str())
            .await?
            .iter()
            .map(|data| Self::decode(kind, data))
            .collect()
    }

    async fn delete_record(&self, kind: RecordKind, id: Uuid) -> Result<bool> {
        self.db.delete_record(kind.as_str(), &id.to_string()).await
    }

    async fn clear_all(&self) -> Result<()> {
        self.db.clear_all_data().await
    }
}
