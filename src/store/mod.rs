//! Two-key table store.
//!
//! Rows are addressed by `(partition_key, row_key)` and carry a flat map of
//! string properties. Structured values are serialized by the caller (see
//! [`crate::models::TableRecord`]).

pub mod memory;
pub mod sqlite;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

pub use memory::MemoryTableStore;
pub use sqlite::SqliteTableStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Table already exists: {0}")]
    TableAlreadyExists(String),

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Invalid table name: {0}")]
    InvalidTableName(String),

    #[error("Corrupt entity: {0}")]
    Corrupt(String),

    #[error("Store unavailable")]
    Unavailable,

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableEntity {
    pub partition_key: String,
    pub row_key: String,
    pub properties: BTreeMap<String, String>,
}

impl TableEntity {
    pub fn new(partition_key: impl Into<String>, row_key: impl Into<String>) -> Self {
        Self {
            partition_key: partition_key.into(),
            row_key: row_key.into(),
            properties: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}

/// Backend seam. Implementations address tables by name; callers normally go
/// through [`TableClient`], which provisions the table on demand.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Fails with [`StoreError::TableAlreadyExists`] when the table is present.
    async fn create_table(&self, table: &str) -> StoreResult<()>;

    async fn query_partition(&self, table: &str, partition_key: &str)
        -> StoreResult<Vec<TableEntity>>;

    async fn get_entity(
        &self,
        table: &str,
        partition_key: &str,
        row_key: &str,
    ) -> StoreResult<Option<TableEntity>>;

    /// Insert or replace the whole row.
    async fn upsert_entity(&self, table: &str, entity: &TableEntity) -> StoreResult<()>;
}

/// Table names follow the managed-table rules: alphanumeric, leading letter,
/// 3 to 63 characters.
pub fn validate_table_name(name: &str) -> StoreResult<()> {
    let valid = (3..=63).contains(&name.len())
        && name.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
        && name.chars().all(|c| c.is_ascii_alphanumeric());

    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidTableName(name.to_string()))
    }
}

/// A store bound to one table.
#[derive(Clone)]
pub struct TableClient {
    store: Arc<dyn TableStore>,
    table: String,
}

impl TableClient {
    pub fn new(store: Arc<dyn TableStore>, table: impl Into<String>) -> Self {
        Self {
            store,
            table: table.into(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Provision the table. An existing table counts as success; any other
    /// failure is logged and ignored so the following call can still try.
    pub async fn ensure_table(&self) {
        match self.store.create_table(&self.table).await {
            Ok(()) => tracing::info!("Created table {}", self.table),
            Err(StoreError::TableAlreadyExists(_)) => {}
            Err(e) => tracing::warn!("Error ensuring table {} exists: {}", self.table, e),
        }
    }

    pub async fn list(&self, partition_key: &str) -> StoreResult<Vec<TableEntity>> {
        self.ensure_table().await;
        self.store.query_partition(&self.table, partition_key).await
    }

    pub async fn get(
        &self,
        partition_key: &str,
        row_key: &str,
    ) -> StoreResult<Option<TableEntity>> {
        self.ensure_table().await;
        self.store
            .get_entity(&self.table, partition_key, row_key)
            .await
    }

    pub async fn upsert(&self, entity: &TableEntity) -> StoreResult<()> {
        self.ensure_table().await;
        self.store.upsert_entity(&self.table, entity).await
    }
}
