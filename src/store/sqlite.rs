use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{types::Type, OptionalExtension, Row};

use super::{validate_table_name, StoreError, StoreResult, TableEntity, TableStore};
use crate::db::DbPool;

/// Each logical table is a SQLite table keyed by `(partition_key, row_key)`
/// with the properties stored as one JSON object.
#[derive(Clone)]
pub struct SqliteTableStore {
    pool: DbPool,
}

impl SqliteTableStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Decodes a row selected by column name.
trait FromEntityRow: Sized {
    fn from_row(row: &Row) -> rusqlite::Result<Self>;
}

impl FromEntityRow for TableEntity {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let raw: String = row.get("properties")?;
        let properties: BTreeMap<String, String> = serde_json::from_str(&raw)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;
        Ok(Self {
            partition_key: row.get("partition_key")?,
            row_key: row.get("row_key")?,
            properties,
        })
    }
}

/// Schema errors surface as `SqliteFailure` or, when rejected while
/// preparing, as `SqlInputError`; both carry SQLite's message text.
fn classify(table: &str, err: rusqlite::Error) -> StoreError {
    let msg = err.to_string();
    if msg.contains("already exists") {
        StoreError::TableAlreadyExists(table.to_string())
    } else if msg.contains("no such table") {
        StoreError::TableNotFound(table.to_string())
    } else if let rusqlite::Error::FromSqlConversionFailure(..) = err {
        StoreError::Corrupt(msg)
    } else {
        StoreError::Database(err)
    }
}

#[async_trait]
impl TableStore for SqliteTableStore {
    async fn create_table(&self, table: &str) -> StoreResult<()> {
        validate_table_name(table)?;
        let pool = self.pool.clone();
        let table = table.to_string();

        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            conn.execute(
                &format!(
                    "CREATE TABLE \"{table}\" (
                        partition_key TEXT NOT NULL,
                        row_key TEXT NOT NULL,
                        properties TEXT NOT NULL,
                        updated_at TEXT NOT NULL,
                        PRIMARY KEY (partition_key, row_key)
                    )"
                ),
                [],
            )
            .map_err(|e| classify(&table, e))?;
            Ok(())
        })
        .await
        .map_err(|e| StoreError::Internal(e.to_string()))?
    }

    async fn query_partition(
        &self,
        table: &str,
        partition_key: &str,
    ) -> StoreResult<Vec<TableEntity>> {
        validate_table_name(table)?;
        let pool = self.pool.clone();
        let table = table.to_string();
        let partition_key = partition_key.to_string();

        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT partition_key, row_key, properties FROM \"{table}\"
                     WHERE partition_key = ? ORDER BY row_key"
                ))
                .map_err(|e| classify(&table, e))?;
            let entities = stmt
                .query_map([&partition_key], TableEntity::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(|e| classify(&table, e))?;
            Ok(entities)
        })
        .await
        .map_err(|e| StoreError::Internal(e.to_string()))?
    }

    async fn get_entity(
        &self,
        table: &str,
        partition_key: &str,
        row_key: &str,
    ) -> StoreResult<Option<TableEntity>> {
        validate_table_name(table)?;
        let pool = self.pool.clone();
        let table = table.to_string();
        let partition_key = partition_key.to_string();
        let row_key = row_key.to_string();

        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT partition_key, row_key, properties FROM \"{table}\"
                     WHERE partition_key = ? AND row_key = ?"
                ))
                .map_err(|e| classify(&table, e))?;
            let entity = stmt
                .query_row([&partition_key, &row_key], TableEntity::from_row)
                .optional()
                .map_err(|e| classify(&table, e))?;
            Ok(entity)
        })
        .await
        .map_err(|e| StoreError::Internal(e.to_string()))?
    }

    async fn upsert_entity(&self, table: &str, entity: &TableEntity) -> StoreResult<()> {
        validate_table_name(table)?;
        let pool = self.pool.clone();
        let table = table.to_string();
        let entity = entity.clone();
        let properties = serde_json::to_string(&entity.properties)
            .map_err(|e| StoreError::Internal(e.to_string()))?;
        let now = Utc::now();

        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            conn.execute(
                &format!(
                    "INSERT INTO \"{table}\" (partition_key, row_key, properties, updated_at)
                     VALUES (?, ?, ?, ?)
                     ON CONFLICT(partition_key, row_key)
                     DO UPDATE SET properties = excluded.properties,
                                   updated_at = excluded.updated_at"
                ),
                rusqlite::params![entity.partition_key, entity.row_key, properties, now],
            )
            .map_err(|e| classify(&table, e))?;
            Ok(())
        })
        .await
        .map_err(|e| StoreError::Internal(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::db::create_memory_pool;
    use crate::store::TableClient;

    fn store() -> SqliteTableStore {
        SqliteTableStore::new(create_memory_pool().unwrap())
    }

    #[tokio::test]
    async fn test_create_table_twice_reports_existing() {
        let store = store();
        store.create_table("FitnessSessions").await.unwrap();
        let err = store.create_table("FitnessSessions").await.unwrap_err();
        assert!(matches!(err, StoreError::TableAlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_query_missing_table() {
        let store = store();
        let err = store.query_partition("releases", "2026").await.unwrap_err();
        assert!(matches!(err, StoreError::TableNotFound(_)));
    }

    #[tokio::test]
    async fn test_upsert_and_get() {
        let store = store();
        store.create_table("releases").await.unwrap();

        let entity = TableEntity::new("2026", "2026.01.01")
            .with("title", "New Year Launch")
            .with("apps", "[\"nina-fit\"]");
        store.upsert_entity("releases", &entity).await.unwrap();

        let got = store
            .get_entity("releases", "2026", "2026.01.01")
            .await
            .unwrap();
        assert_eq!(got, Some(entity));

        let missing = store.get_entity("releases", "2026", "nope").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_upsert_replaces_existing_row() {
        let store = store();
        store.create_table("releases").await.unwrap();

        store
            .upsert_entity("releases", &TableEntity::new("2026", "a").with("title", "Old"))
            .await
            .unwrap();
        store
            .upsert_entity("releases", &TableEntity::new("2026", "a").with("title", "New"))
            .await
            .unwrap();

        let rows = store.query_partition("releases", "2026").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].property("title"), Some("New"));
    }

    #[tokio::test]
    async fn test_query_partition_orders_by_row_key() {
        let store = store();
        store.create_table("releases").await.unwrap();
        for rk in ["c", "a", "b"] {
            store
                .upsert_entity("releases", &TableEntity::new("2026", rk))
                .await
                .unwrap();
        }
        store
            .upsert_entity("releases", &TableEntity::new("2025", "z"))
            .await
            .unwrap();

        let keys: Vec<_> = store
            .query_partition("releases", "2026")
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.row_key)
            .collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_client_lists_twice_over_sqlite() {
        let client = TableClient::new(Arc::new(store()), "releases");

        assert!(client.list("2026").await.unwrap().is_empty());
        client
            .upsert(&TableEntity::new("2026", "a").with("title", "A"))
            .await
            .unwrap();
        assert_eq!(client.list("2026").await.unwrap().len(), 1);
    }

    #[test]
    fn test_classify_schema_errors() {
        let missing = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(1),
            Some("no such table: releases".to_string()),
        );
        assert!(matches!(
            classify("releases", missing),
            StoreError::TableNotFound(_)
        ));

        let other = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(5),
            Some("database is locked".to_string()),
        );
        assert!(matches!(classify("releases", other), StoreError::Database(_)));
    }

    #[tokio::test]
    async fn test_invalid_table_name_rejected() {
        let store = store();
        let err = store.create_table("x\"; DROP").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidTableName(_)));
    }
}
