use crate::domain::{Record, RecordKind};
use crate::error::{FarmError, Result};
use crate::storage::Storage;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Typed access to the record store.
#[derive(Clone)]
pub struct FarmRecords {
    storage: Arc<dyn Storage>,
}

impl FarmRecords {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Store a record as-is.
    pub async fn insert<T: Record>(&self, record: &T) -> Result<()> {
        let data = serde_json::to_value(record)?;
        self.storage.put_record(T::KIND, record.id(), data).await
    }

    /// Store a record after bumping its modified timestamp.
    pub async fn save<T: Record>(&self, record: &mut T) -> Result<()> {
        if let Some(timestamps) = record.timestamps_mut() {
            timestamps.touch();
        }
        self.insert(record).await?;
        debug!("Saved {} {}", T::KIND, record.id());
        Ok(())
    }

    pub async fn get<T: Record>(&self, id: Uuid) -> Result<Option<T>> {
        match self.storage.get_record(T::KIND, id).await? {
            Some(data) => Ok(Some(serde_json::from_value(data)?)),
            None => Ok(None),
        }
    }

    /// Like [`FarmRecords::get`], but a miss is a `NotFound` error.
    pub async fn fetch<T: Record>(&self, id: Uuid) -> Result<T> {
        self.get(id)
            .await?
            .ok_or_else(|| FarmError::not_found(T::KIND.as_str(), id.to_string()))
    }

    pub async fn all<T: Record>(&self) -> Result<Vec<T>> {
        self.storage
            .list_records(T::KIND)
            .await?
            .into_iter()
            .map(|data| serde_json::from_value(data).map_err(FarmError::from))
            .collect()
    }

    pub async fn exists(&self, kind: RecordKind, id: Uuid) -> Result<bool> {
        Ok(self.storage.get_record(kind, id).await?.is_some())
    }

    pub async fn count(&self, kind: RecordKind) -> Result<usize> {
        self.storage.count_records(kind).await
    }

    pub async fn remove<T: Record>(&self, id: Uuid) -> Result<bool> {
        self.storage.delete_record(T::KIND, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Farm, Genus};
    use crate::storage::InMemoryStorage;

    #[tokio::test]
    async fn test_typed_round_trip() {
        let records = FarmRecords::new(Arc::new(InMemoryStorage::new()));
        let goat = Genus::new("Goat");
        records.insert(&goat).await.unwrap();

        let loaded: Genus = records.fetch(goat.id).await.unwrap();
        assert_eq!(loaded.info.slug, "goat");
        assert_eq!(records.all::<Genus>().await.unwrap().len(), 1);

        let missing = records.fetch::<Genus>(Uuid::new_v4()).await.unwrap_err();
        assert!(missing.is_not_found());
    }

    #[tokio::test]
    async fn test_save_touches_modified() {
        let records = FarmRecords::new(Arc::new(InMemoryStorage::new()));
        let mut farm = Farm::new("Home Place", true);
        let before = farm.timestamps.modified;
        records.save(&mut farm).await.unwrap();

        let loaded: Farm = records.fetch(farm.id).await.unwrap();
        assert!(loaded.timestamps.modified >= before);
        assert_eq!(loaded.timestamps.created, farm.timestamps.created);
    }
}
