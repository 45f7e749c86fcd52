use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::table_record::{date_field, json_field, text_field};
use super::TableRecord;
use crate::store::{StoreError, TableEntity};

/// A release note. Stored with partition = year, row = id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
    pub id: String,
    pub year: String,
    pub title: String,
    pub date: NaiveDate,
    pub apps: Vec<String>,
    /// Markdown.
    pub body: String,
}

impl TableRecord for Release {
    fn to_entity(&self) -> TableEntity {
        let apps = serde_json::to_string(&self.apps).unwrap_or_else(|_| "[]".to_string());

        TableEntity::new(&self.year, &self.id)
            .with("title", &self.title)
            .with("date", self.date.format("%Y-%m-%d").to_string())
            .with("apps", apps)
            .with("body", &self.body)
    }

    fn from_entity(entity: TableEntity) -> Result<Self, StoreError> {
        let date = date_field(&entity, "date")?;
        let apps = json_field(&entity, "apps");
        let title = text_field(&entity, "title");
        let body = text_field(&entity, "body");

        Ok(Self {
            id: entity.row_key,
            year: entity.partition_key,
            title,
            date,
            apps,
            body,
        })
    }
}
