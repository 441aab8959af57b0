use super::Storage;
use crate::domain::RecordKind;
use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

#[derive(Default)]
struct Table {
    rows: HashMap<Uuid, Value>,
    /// id -> insertion sequence, so listings are stable
    order: HashMap<Uuid, u64>,
}

/// In-memory storage implementation for development/testing
#[derive(Default)]
pub struct InMemoryStorage {
    tables: RwLock<BTreeMap<RecordKind, Table>>,
    sequence: RwLock<u64>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn put_record(&self, kind: RecordKind, id: Uuid, data: Value) -> Result<()> {
        let mut tables = self.tables.write().await;
        let table = tables.entry(kind).or_default();

        if !table.order.contains_key(&id) {
            let mut sequence = self.sequence.write().await;
            *sequence += 1;
            table.order.insert(id, *sequence);
        }
        table.rows.insert(id, data);

        debug!("Stored {} with id {}", kind, id);
        Ok(())
    }

    async fn get_record(&self, kind: RecordKind, id: Uuid) -> Result<Option<Value>> {
        let tables = self.tables.read().await;
        Ok(tables.get(&kind).and_then(|t| t.rows.get(&id)).cloned())
    }

    async fn list_records(&self, kind: RecordKind) -> Result<Vec<Value>> {
        let tables = self.tables.read().await;
        let Some(table) = tables.get(&kind) else {
            return Ok(Vec::new());
        };

        let mut ids: Vec<(&u64, &Uuid)> = table.order.iter().map(|(id, seq)| (seq, id)).collect();
        ids.sort();
        Ok(ids
            .into_iter()
            .filter_map(|(_, id)| table.rows.get(id).cloned())
            .collect())
    }

    async fn delete_record(&self, kind: RecordKind, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let Some(table) = tables.get_mut(&kind) else {
            return Ok(false);
        };
        table.order.remove(&id);
        let removed = table.rows.remove(&id).is_some();
        if removed {
            debug!("Deleted {} with id {}", kind, id);
        }
        Ok(removed)
    }

    async fn count_records(&self, kind: RecordKind) -> Result<usize> {
        let tables = self.tables.read().await;
        Ok(tables.get(&kind).map_or(0, |t| t.rows.len()))
    }

    async fn clear_all(&self) -> Result<()> {
        self.tables.write().await.clear();
        debug!("Cleared in-memory storage");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_put_get_list_delete() {
        let storage = InMemoryStorage::new();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        storage
            .put_record(RecordKind::Genus, second, json!({"title": "Goat"}))
            .await
            .unwrap();
        storage
            .put_record(RecordKind::Genus, first, json!({"title": "Sheep"}))
            .await
            .unwrap();
        // Replacing keeps the original position
        storage
            .put_record(RecordKind::Genus, second, json!({"title": "Goats"}))
            .await
            .unwrap();

        let listed = storage.list_records(RecordKind::Genus).await.unwrap();
        assert_eq!(listed, vec![json!({"title": "Goats"}), json!({"title": "Sheep"})]);
        assert_eq!(storage.count_records(RecordKind::Genus).await.unwrap(), 2);
        assert!(storage.list_records(RecordKind::Breed).await.unwrap().is_empty());

        assert!(storage.delete_record(RecordKind::Genus, first).await.unwrap());
        assert!(!storage.delete_record(RecordKind::Genus, first).await.unwrap());
        assert!(storage.get_record(RecordKind::Genus, first).await.unwrap().is_none());

        storage.clear_all().await.unwrap();
        assert_eq!(storage.count_records(RecordKind::Genus).await.unwrap(), 0);
    }
}
