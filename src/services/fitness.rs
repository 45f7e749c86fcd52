use std::sync::Arc;

use crate::models::{Session, TableRecord};
use crate::store::{StoreError, StoreResult, TableClient, TableEntity, TableStore};

pub const DEFAULT_FITNESS_TABLE: &str = "FitnessSessions";

/// Sessions keyed by (user, session id). Reads never fail: errors are logged
/// and read as "nothing there". Writes report their failure.
#[derive(Clone)]
pub struct FitnessService {
    table: Option<TableClient>,
}

impl FitnessService {
    pub fn new(store: Arc<dyn TableStore>, table: &str) -> Self {
        Self {
            table: Some(TableClient::new(store, table)),
        }
    }

    /// A service with no backing store: reads are empty, writes fail.
    pub fn unconfigured() -> Self {
        Self { table: None }
    }

    /// All of a user's sessions, newest first.
    pub async fn list_for_user(&self, user_id: &str) -> Vec<Session> {
        let Some(table) = &self.table else {
            tracing::warn!("Fitness store not configured, no sessions for {}", user_id);
            return Vec::new();
        };

        let entities = match table.list(user_id).await {
            Ok(entities) => entities,
            Err(e) => {
                tracing::error!("Failed to fetch sessions for {}: {}", user_id, e);
                return Vec::new();
            }
        };

        let mut sessions: Vec<Session> = entities
            .into_iter()
            .filter_map(to_session)
            .filter(|s| s.user_id == user_id)
            .collect();

        sessions.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
        sessions
    }

    pub async fn get_one(&self, user_id: &str, session_id: &str) -> Option<Session> {
        let table = self.table.as_ref()?;

        match table.get(user_id, session_id).await {
            Ok(entity) => entity.and_then(to_session),
            Err(e) => {
                tracing::error!("Error fetching session {}/{}: {}", user_id, session_id, e);
                None
            }
        }
    }

    /// Replace the stored session. Last write wins.
    pub async fn save(&self, session: &Session) -> StoreResult<()> {
        let Some(table) = &self.table else {
            tracing::warn!("No fitness store available to save session {}", session.id);
            return Err(StoreError::Unavailable);
        };

        table.upsert(&session.to_entity()).await.map_err(|e| {
            tracing::error!("Error saving session {}/{}: {}", session.user_id, session.id, e);
            e
        })?;

        tracing::debug!(
            "Saved session {}/{} with {} records",
            session.user_id,
            session.id,
            session.exercises.len()
        );
        Ok(())
    }
}

fn to_session(entity: TableEntity) -> Option<Session> {
    let key = format!("{}/{}", entity.partition_key, entity.row_key);
    Session::from_entity(entity)
        .map_err(|e| tracing::warn!("Skipping session {}: {}", key, e))
        .ok()
}
