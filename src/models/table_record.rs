use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;

use crate::store::{StoreError, TableEntity};

/// Maps a domain value onto a flat table row and back.
pub trait TableRecord: Sized {
    fn to_entity(&self) -> TableEntity;

    /// Fails only on missing or unreadable scalar fields. Structured fields
    /// are repaired to their empty value, see [`json_field`].
    fn from_entity(entity: TableEntity) -> Result<Self, StoreError>;
}

/// Parse a JSON-encoded property. Missing or malformed text yields the empty
/// value and a warning: the stored data is lost for this read.
pub fn json_field<T: DeserializeOwned + Default>(entity: &TableEntity, key: &str) -> T {
    let Some(raw) = entity.property(key) else {
        return T::default();
    };

    match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(
                "Discarding malformed {} on {}/{}: {}",
                key,
                entity.partition_key,
                entity.row_key,
                e
            );
            T::default()
        }
    }
}

pub fn text_field(entity: &TableEntity, key: &str) -> String {
    entity.property(key).unwrap_or_default().to_string()
}

/// Dates are written as `YYYY-MM-DD`; RFC 3339 timestamps are read too and
/// reduced to their UTC date.
pub fn date_field(entity: &TableEntity, key: &str) -> Result<NaiveDate, StoreError> {
    let raw = entity.property(key).ok_or_else(|| {
        StoreError::Corrupt(format!(
            "{}/{} has no {}",
            entity.partition_key, entity.row_key, key
        ))
    })?;

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|d| d.with_timezone(&Utc).date_naive()))
        .map_err(|e| {
            StoreError::Corrupt(format!(
                "{}/{} has unreadable {} {:?}: {}",
                entity.partition_key, entity.row_key, key, raw, e
            ))
        })
}
