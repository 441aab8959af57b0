//! Persistence backends. Records are stored as JSON documents keyed by
//! kind and id; typed access lives in [`crate::app::records::FarmRecords`].
pub mod in_memory;

#[cfg(feature = "db")]
pub mod database;

pub use in_memory::InMemoryStorage;

#[cfg(feature = "db")]
pub use database::DatabaseStorage;

use crate::config::{Config, StorageBackend};
use crate::domain::RecordKind;
use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Storage trait for persisting farm records
#[async_trait]
pub trait Storage: Send + Sync {
    /// Insert or replace a record.
    async fn put_record(&self, kind: RecordKind, id: Uuid, data: Value) -> Result<()>;

    async fn get_record(&self, kind: RecordKind, id: Uuid) -> Result<Option<Value>>;

    /// All records of one kind, in insertion order.
    async fn list_records(&self, kind: RecordKind) -> Result<Vec<Value>>;

    /// Returns whether a record was removed.
    async fn delete_record(&self, kind: RecordKind, id: Uuid) -> Result<bool>;

    async fn count_records(&self, kind: RecordKind) -> Result<usize> {
        Ok(self.list_records(kind).await?.len())
    }

    /// Drop everything (useful for development)
    async fn clear_all(&self) -> Result<()>;
}

/// Open the configured backend. `force_database` comes from the CLI flag.
pub async fn open_storage(config: &Config, force_database: bool) -> Result<Arc<dyn Storage>> {
    let backend = if force_database {
        StorageBackend::Database
    } else {
        config.storage.backend
    };

    match backend {
        StorageBackend::Memory => {
            info!("Using in-memory storage (data will not persist)");
            Ok(Arc::new(InMemoryStorage::new()))
        }
        #[cfg(feature = "db")]
        StorageBackend::Database => {
            info!("Initializing database storage...");
            let manager = crate::db::DatabaseManager::new(&config.database).await?;
            let storage = DatabaseStorage::new(manager).await?;
            info!("Database storage initialized successfully");
            Ok(Arc::new(storage))
        }
        #[cfg(not(feature = "db"))]
        StorageBackend::Database => Err(crate::error::FarmError::Config(
            "Database feature not enabled. Rebuild with --features db".to_string(),
        )),
    }
}
