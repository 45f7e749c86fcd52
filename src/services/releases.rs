use std::cmp::Ordering;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Release, TableRecord};
use crate::store::{StoreError, StoreResult, TableClient, TableEntity, TableStore};

pub const DEFAULT_RELEASES_TABLE: &str = "releases";

/// Year that the built-in example releases belong to.
pub const FIXTURE_YEAR: &str = "2026";

/// Where a listing came from. Fixtures are served whenever the store cannot
/// be read, so callers can label the data as a demo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Store,
    Fixtures,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReleaseList {
    pub releases: Vec<Release>,
    pub source: DataSource,
}

impl ReleaseList {
    pub fn is_fixture(&self) -> bool {
        self.source == DataSource::Fixtures
    }
}

#[derive(Clone)]
pub struct ReleaseService {
    table: Option<TableClient>,
}

impl ReleaseService {
    pub fn new(store: Arc<dyn TableStore>, table: &str) -> Self {
        Self {
            table: Some(TableClient::new(store, table)),
        }
    }

    pub fn unconfigured() -> Self {
        Self { table: None }
    }

    /// Releases of a year, oldest first.
    pub async fn list(&self, year: &str) -> ReleaseList {
        let Some(table) = &self.table else {
            tracing::warn!("Release store not configured, serving example releases for {}", year);
            return fixture_list(year);
        };

        let entities = match table.list(year).await {
            Ok(entities) => entities,
            Err(e) => {
                tracing::warn!(
                    "Failed to fetch releases for {}, serving example releases: {}",
                    year,
                    e
                );
                return fixture_list(year);
            }
        };

        let mut releases: Vec<Release> = entities.into_iter().filter_map(to_release).collect();
        sort_releases(&mut releases);

        ReleaseList {
            releases,
            source: DataSource::Store,
        }
    }

    pub async fn get_one(&self, year: &str, id: &str) -> Option<Release> {
        let Some(table) = &self.table else {
            return find_fixture(year, id);
        };

        match table.get(year, id).await {
            Ok(entity) => entity.and_then(to_release),
            Err(e) => {
                tracing::warn!(
                    "Error getting release {}/{}, serving example release: {}",
                    year,
                    id,
                    e
                );
                find_fixture(year, id)
            }
        }
    }

    /// Publish or replace a release. No route writes releases; this is the
    /// seeding hook for whatever populates the table.
    pub async fn save(&self, release: &Release) -> StoreResult<()> {
        let Some(table) = &self.table else {
            return Err(StoreError::Unavailable);
        };
        table.upsert(&release.to_entity()).await
    }
}

fn to_release(entity: TableEntity) -> Option<Release> {
    let key = format!("{}/{}", entity.partition_key, entity.row_key);
    Release::from_entity(entity)
        .map_err(|e| tracing::warn!("Skipping release {}: {}", key, e))
        .ok()
}

/// Date ascending, then by the id's leading number, then by id text.
pub fn sort_releases(releases: &mut [Release]) {
    releases.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| compare_ids(&a.id, &b.id)));
}

fn compare_ids(a: &str, b: &str) -> Ordering {
    match (leading_number(a), leading_number(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        _ => a.cmp(b),
    }
}

fn leading_number(id: &str) -> Option<u64> {
    let digits: String = id.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

fn fixture_list(year: &str) -> ReleaseList {
    let mut releases = fixtures(year);
    sort_releases(&mut releases);
    ReleaseList {
        releases,
        source: DataSource::Fixtures,
    }
}

fn find_fixture(year: &str, id: &str) -> Option<Release> {
    fixtures(year).into_iter().find(|r| r.id == id)
}

/// Example releases served when the store is unreachable.
pub fn fixtures(year: &str) -> Vec<Release> {
    if year != FIXTURE_YEAR {
        return Vec::new();
    }

    let entries: [(&str, &str, (u32, u32), &[&str], &str); 6] = [
        (
            "2026.12.25",
            "Holiday Special",
            (12, 25),
            &["nina-fit", "nina-quick"],
            "# Holiday Update\n\nSpecial holiday themes and quick actions added!",
        ),
        (
            "2026.11.15",
            "Performance Boost",
            (11, 15),
            &["nina-journal"],
            "# Performance Update\n\nOptimized rendering for large journals.",
        ),
        (
            "2026.10.01",
            "Autumn Refresh",
            (10, 1),
            &["nina-fit"],
            "# Autumn Refresh\n\nNew workout plans for the season.",
        ),
        (
            "2026.08.20",
            "Back to School",
            (8, 20),
            &["nina-journal", "nina-quick"],
            "# Back to School\n\nGet organized with new journal templates.",
        ),
        (
            "2026.05.05",
            "May Update",
            (5, 5),
            &["nina-fit"],
            "# May Update\n\nGetting ready for summer.",
        ),
        (
            "2026.01.01",
            "New Year Launch",
            (1, 1),
            &["nina-journal", "nina-fit"],
            "# New Year Launch\n\nInitial release of the 2026 suite.",
        ),
    ];

    entries
        .iter()
        .filter_map(|(id, title, (month, day), apps, body)| {
            Some(Release {
                id: id.to_string(),
                year: year.to_string(),
                title: title.to_string(),
                date: NaiveDate::from_ymd_opt(2026, *month, *day)?,
                apps: apps.iter().map(|a| a.to_string()).collect(),
                body: body.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryTableStore;

    fn release(id: &str, date: (i32, u32, u32)) -> Release {
        Release {
            id: id.to_string(),
            year: date.0.to_string(),
            title: format!("Release {}", id),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            apps: vec!["nina-fit".to_string()],
            body: "body".to_string(),
        }
    }

    #[test]
    fn test_fixtures_only_for_fixture_year() {
        assert_eq!(fixtures("2026").len(), 6);
        assert!(fixtures("2025").is_empty());
    }

    #[test]
    fn test_sort_releases_ascending_with_numeric_tie_break() {
        let mut releases = vec![
            release("10", (2026, 3, 1)),
            release("9", (2026, 3, 1)),
            release("1", (2026, 1, 1)),
        ];
        sort_releases(&mut releases);
        let ids: Vec<_> = releases.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "9", "10"]);
    }

    #[tokio::test]
    async fn test_list_from_store() {
        let service =
            ReleaseService::new(Arc::new(MemoryTableStore::new()), DEFAULT_RELEASES_TABLE);
        service.save(&release("2", (2025, 6, 1))).await.unwrap();
        service.save(&release("1", (2025, 2, 1))).await.unwrap();

        let list = service.list("2025").await;
        assert_eq!(list.source, DataSource::Store);
        let ids: Vec<_> = list.releases.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[tokio::test]
    async fn test_empty_store_is_not_a_fallback() {
        let service =
            ReleaseService::new(Arc::new(MemoryTableStore::new()), DEFAULT_RELEASES_TABLE);
        let list = service.list("2026").await;
        assert_eq!(list.source, DataSource::Store);
        assert!(list.releases.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_store_falls_back_to_fixtures() {
        let store = Arc::new(MemoryTableStore::new());
        store.set_offline(true);
        let service = ReleaseService::new(store, DEFAULT_RELEASES_TABLE);

        let list = service.list("2026").await;
        assert!(list.is_fixture());
        assert_eq!(list.releases.len(), 6);
        assert_eq!(list.releases[0].id, "2026.01.01");
        assert_eq!(list.releases[5].id, "2026.12.25");

        let one = service.get_one("2026", "2026.05.05").await.unwrap();
        assert_eq!(one.title, "May Update");
    }

    #[tokio::test]
    async fn test_unconfigured_store_serves_fixtures() {
        let service = ReleaseService::unconfigured();
        assert!(service.list("2026").await.is_fixture());
        assert!(service.get_one("2026", "2026.10.01").await.is_some());
        assert!(service.get_one("2026", "missing").await.is_none());
    }

    #[tokio::test]
    async fn test_get_one_not_found_does_not_fall_back() {
        let service =
            ReleaseService::new(Arc::new(MemoryTableStore::new()), DEFAULT_RELEASES_TABLE);
        assert!(service.get_one("2026", "2026.05.05").await.is_none());
    }
}
