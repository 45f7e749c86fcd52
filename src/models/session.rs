use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::table_record::{date_field, json_field};
use super::{ExerciseRecord, TableRecord};
use crate::store::{StoreError, TableEntity};

/// A day of training. Stored with partition = user, row = id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub date: NaiveDate,
    /// Insertion order.
    pub exercises: Vec<ExerciseRecord>,
}

impl Session {
    /// A fresh, empty session whose id is its date.
    pub fn start(user_id: &str, date: NaiveDate) -> Self {
        Self {
            id: date.format("%Y-%m-%d").to_string(),
            user_id: user_id.to_string(),
            date,
            exercises: Vec::new(),
        }
    }

    /// Parses ids of the strict form `YYYY-MM-DD`.
    pub fn date_from_id(id: &str) -> Option<NaiveDate> {
        let bytes = id.as_bytes();
        if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
            return None;
        }
        NaiveDate::parse_from_str(id, "%Y-%m-%d").ok()
    }

    pub fn record(&self, record_id: &str) -> Option<&ExerciseRecord> {
        self.exercises.iter().find(|r| r.id == record_id)
    }

    /// Replace the record with the same id in place, or append it.
    /// Returns `true` when an existing record was replaced.
    pub fn upsert_record(&mut self, record: ExerciseRecord) -> bool {
        match self.exercises.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => {
                *existing = record;
                true
            }
            None => {
                self.exercises.push(record);
                false
            }
        }
    }

    pub fn remove_record(&mut self, record_id: &str) -> Option<ExerciseRecord> {
        let index = self.exercises.iter().position(|r| r.id == record_id)?;
        Some(self.exercises.remove(index))
    }
}

impl TableRecord for Session {
    fn to_entity(&self) -> TableEntity {
        // Serializing plain records cannot fail; fall back to an empty list
        // rather than panic.
        let exercises =
            serde_json::to_string(&self.exercises).unwrap_or_else(|_| "[]".to_string());

        TableEntity::new(&self.user_id, &self.id)
            .with("date", self.date.format("%Y-%m-%d").to_string())
            .with("exercises", exercises)
    }

    fn from_entity(entity: TableEntity) -> Result<Self, StoreError> {
        let date = date_field(&entity, "date")?;
        let exercises = json_field(&entity, "exercises");

        Ok(Self {
            id: entity.row_key,
            user_id: entity.partition_key,
            date,
            exercises,
        })
    }
}
