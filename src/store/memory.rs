use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{validate_table_name, StoreError, StoreResult, TableEntity, TableStore};

type Table = BTreeMap<(String, String), TableEntity>;

/// In-process store used for demos and tests. Behaves like the SQLite
/// backend, including "table already exists" and "table not found".
#[derive(Default)]
pub struct MemoryTableStore {
    tables: RwLock<HashMap<String, Table>>,
    offline: AtomicBool,
}

impl MemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// While offline every call fails with [`StoreError::Unavailable`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self, table: &str) -> StoreResult<()> {
        validate_table_name(table)?;
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable);
        }
        Ok(())
    }
}

#[async_trait]
impl TableStore for MemoryTableStore {
    async fn create_table(&self, table: &str) -> StoreResult<()> {
        self.check_online(table)?;
        let mut tables = self.tables.write().await;
        if tables.contains_key(table) {
            return Err(StoreError::TableAlreadyExists(table.to_string()));
        }
        tables.insert(table.to_string(), Table::new());
        Ok(())
    }

    async fn query_partition(
        &self,
        table: &str,
        partition_key: &str,
    ) -> StoreResult<Vec<TableEntity>> {
        self.check_online(table)?;
        let tables = self.tables.read().await;
        let rows = tables
            .get(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;

        Ok(rows
            .values()
            .filter(|e| e.partition_key == partition_key)
            .cloned()
            .collect())
    }

    async fn get_entity(
        &self,
        table: &str,
        partition_key: &str,
        row_key: &str,
    ) -> StoreResult<Option<TableEntity>> {
        self.check_online(table)?;
        let tables = self.tables.read().await;
        let rows = tables
            .get(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;

        Ok(rows
            .get(&(partition_key.to_string(), row_key.to_string()))
            .cloned())
    }

    async fn upsert_entity(&self, table: &str, entity: &TableEntity) -> StoreResult<()> {
        self.check_online(table)?;
        let mut tables = self.tables.write().await;
        let rows = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;

        rows.insert(
            (entity.partition_key.clone(), entity.row_key.clone()),
            entity.clone(),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_create_table_twice_reports_existing() {
        let store = MemoryTableStore::new();
        store.create_table("sessions").await.unwrap();
        let err = store.create_table("sessions").await.unwrap_err();
        assert!(matches!(err, StoreError::TableAlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_offline_fails_every_call() {
        let store = MemoryTableStore::new();
        store.create_table("sessions").await.unwrap();
        store.set_offline(true);

        assert!(matches!(
            store.get_entity("sessions", "u", "1").await,
            Err(StoreError::Unavailable)
        ));
        assert!(matches!(
            store.upsert_entity("sessions", &TableEntity::new("u", "1")).await,
            Err(StoreError::Unavailable)
        ));

        store.set_offline(false);
        assert!(store.get_entity("sessions", "u", "1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalid_table_name_rejected() {
        let store = MemoryTableStore::new();
        assert_err!(store.create_table("fit-sessions").await);
        assert_err!(store.create_table("ab").await);
        assert_ok!(store.create_table("abc").await);
    }

    #[tokio::test]
    async fn test_missing_table_is_an_error() {
        let store = MemoryTableStore::new();
        let err = store.query_partition("sessions", "a").await.unwrap_err();
        assert!(matches!(err, StoreError::TableNotFound(_)));
    }

    #[tokio::test]
    async fn test_upsert_replaces_whole_row() {
        let store = MemoryTableStore::new();
        store.create_table("sessions").await.unwrap();

        let first = TableEntity::new("u", "1").with("a", "1").with("b", "2");
        store.upsert_entity("sessions", &first).await.unwrap();
        let second = TableEntity::new("u", "1").with("a", "3");
        store.upsert_entity("sessions", &second).await.unwrap();

        let got = store.get_entity("sessions", "u", "1").await.unwrap().unwrap();
        assert_eq!(got, second);
        assert_eq!(got.property("b"), None);
    }

    #[tokio::test]
    async fn test_query_partition_is_scoped() {
        let store = MemoryTableStore::new();
        store.create_table("sessions").await.unwrap();
        for (pk, rk) in [("a", "1"), ("a", "2"), ("b", "1")] {
            store
                .upsert_entity("sessions", &TableEntity::new(pk, rk))
                .await
                .unwrap();
        }

        let rows = store.query_partition("sessions", "a").await.unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|e| e.partition_key == "a"));
    }
}
