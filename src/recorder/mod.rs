//! Exercise-entry state machine.
//!
//! ```text
//! summary --open_catalog--> select-exercise --select_exercise--> record-exercise
//!    ^  \--------------------edit_record------------------------------/  |
//!    +---------------- cancel / complete_save -----------------------------+
//! ```
//!
//! Saving is optimistic: the local session changes first and the record is
//! marked [`RecordStatus::Pending`] until the store answers. A failed write
//! leaves the record in place marked [`RecordStatus::Failed`].

pub mod draft;
pub mod stopwatch;

use std::collections::HashMap;

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;

use crate::catalog;
use crate::models::{ExerciseRecord, Session};
use crate::services::FitnessService;
use crate::store::StoreResult;

pub use draft::Draft;
pub use stopwatch::Stopwatch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum View {
    Summary,
    SelectExercise,
    RecordExercise,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            View::Summary => "summary",
            View::SelectExercise => "select-exercise",
            View::RecordExercise => "record-exercise",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Pending,
    Committed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Saving,
    Saved,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Committed,
    Failed(String),
}

impl SaveOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, SaveOutcome::Committed)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RecorderError {
    #[error("cannot {action} from the {} view", from.as_str())]
    InvalidTransition { from: View, action: &'static str },

    #[error("Unknown exercise: {0}")]
    UnknownExercise(String),

    #[error("Record not found: {0}")]
    UnknownRecord(String),

    #[error("No record is being edited")]
    NotEditing,

    #[error("Exercise has no stopwatch")]
    NoStopwatch,

    #[error("A save is already in flight")]
    SaveInFlight,

    #[error("No save is in flight")]
    NoSaveInFlight,
}

pub type Result<T> = std::result::Result<T, RecorderError>;

/// The snapshot handed to the store by [`SessionRecorder::begin_save`] or
/// [`SessionRecorder::begin_delete`].
#[derive(Debug, Clone)]
pub struct PendingSave {
    pub session: Session,
    /// The written record; `None` for deletions.
    pub record_id: Option<String>,
}

/// A summary row.
#[derive(Debug, Clone, Copy)]
pub struct SummaryEntry<'a> {
    pub record: &'a ExerciseRecord,
    pub status: RecordStatus,
}

pub struct SessionRecorder {
    session: Session,
    view: View,
    draft: Option<Draft>,
    statuses: HashMap<String, RecordStatus>,
    sync: SyncState,
    in_flight: Option<Option<String>>,
}

impl SessionRecorder {
    /// Records already in the session count as committed.
    pub fn new(session: Session) -> Self {
        let statuses = session
            .exercises
            .iter()
            .map(|r| (r.id.clone(), RecordStatus::Committed))
            .collect();

        Self {
            session,
            view: View::Summary,
            draft: None,
            statuses,
            sync: SyncState::Idle,
            in_flight: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn into_session(self) -> Session {
        self.session
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn draft(&self) -> Option<&Draft> {
        self.draft.as_ref()
    }

    pub fn draft_mut(&mut self) -> Result<&mut Draft> {
        self.require(View::RecordExercise, "edit the draft")?;
        self.draft.as_mut().ok_or(RecorderError::InvalidTransition {
            from: self.view,
            action: "edit the draft",
        })
    }

    pub fn sync_state(&self) -> &SyncState {
        &self.sync
    }

    /// The save control is disabled while this is true.
    pub fn is_saving(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn status(&self, record_id: &str) -> Option<RecordStatus> {
        self.statuses.get(record_id).copied()
    }

    pub fn record_count(&self) -> usize {
        self.session.exercises.len()
    }

    /// Most recently added first.
    pub fn summary(&self) -> Vec<SummaryEntry<'_>> {
        self.session
            .exercises
            .iter()
            .rev()
            .map(|record| SummaryEntry {
                record,
                status: self.status(&record.id).unwrap_or(RecordStatus::Committed),
            })
            .collect()
    }

    pub fn open_catalog(&mut self) -> Result<()> {
        self.require(View::Summary, "open the catalog")?;
        self.view = View::SelectExercise;
        Ok(())
    }

    /// Start a new record with catalog defaults.
    pub fn select_exercise(&mut self, exercise_id: &str) -> Result<()> {
        self.require(View::SelectExercise, "select an exercise")?;
        let def = catalog::find(exercise_id)
            .ok_or_else(|| RecorderError::UnknownExercise(exercise_id.to_string()))?;

        self.draft = Some(Draft::new(def));
        self.view = View::RecordExercise;
        Ok(())
    }

    /// Load an existing record into the draft for replacement.
    pub fn edit_record(&mut self, record_id: &str) -> Result<()> {
        self.require(View::Summary, "edit a record")?;
        let record = self
            .session
            .record(record_id)
            .ok_or_else(|| RecorderError::UnknownRecord(record_id.to_string()))?;
        let def = catalog::find(&record.exercise_id)
            .ok_or_else(|| RecorderError::UnknownExercise(record.exercise_id.clone()))?;

        self.draft = Some(Draft::from_record(def, record));
        self.view = View::RecordExercise;
        Ok(())
    }

    /// Back to the summary from anywhere, dropping the draft and stopping the
    /// stopwatch.
    pub fn cancel(&mut self) {
        self.leave_to_summary();
    }

    /// Start the draft's stopwatch at `now` (unix seconds).
    pub fn start_stopwatch(&mut self, now: i64) -> Result<()> {
        let draft = self.draft_mut()?;
        if !draft.exercise.uses_stopwatch() {
            return Err(RecorderError::NoStopwatch);
        }
        draft.start_stopwatch(now);
        Ok(())
    }

    /// Apply the draft to the local session and hand back what must be
    /// persisted. Call [`complete_save`](Self::complete_save) with the result.
    pub fn begin_save(&mut self) -> Result<PendingSave> {
        if self.is_saving() {
            return Err(RecorderError::SaveInFlight);
        }
        let draft = self.draft_mut()?;
        draft.pause_stopwatch(Utc::now().timestamp());
        let draft = draft.clone();

        let created_at = draft
            .editing_record_id
            .as_deref()
            .and_then(|id| self.session.record(id))
            .map(|r| r.timestamp);
        let record = draft.to_record(created_at);
        let record_id = record.id.clone();

        self.session.upsert_record(record);
        self.statuses.insert(record_id.clone(), RecordStatus::Pending);
        self.sync = SyncState::Saving;
        self.in_flight = Some(Some(record_id.clone()));

        Ok(PendingSave {
            session: self.session.clone(),
            record_id: Some(record_id),
        })
    }

    /// Remove the record being edited from the local session.
    pub fn begin_delete(&mut self) -> Result<PendingSave> {
        if self.is_saving() {
            return Err(RecorderError::SaveInFlight);
        }
        let record_id = self
            .draft_mut()?
            .editing_record_id
            .clone()
            .ok_or(RecorderError::NotEditing)?;

        self.session
            .remove_record(&record_id)
            .ok_or_else(|| RecorderError::UnknownRecord(record_id.clone()))?;
        self.statuses.remove(&record_id);
        self.sync = SyncState::Saving;
        self.in_flight = Some(None);

        Ok(PendingSave {
            session: self.session.clone(),
            record_id: None,
        })
    }

    /// Settle the in-flight write and return to the summary.
    pub fn complete_save(&mut self, result: StoreResult<()>) -> Result<SaveOutcome> {
        let record_id = self.in_flight.take().ok_or(RecorderError::NoSaveInFlight)?;

        let outcome = match result {
            Ok(()) => SaveOutcome::Committed,
            Err(e) => {
                tracing::warn!("Failed to save session {}: {}", self.session.id, e);
                SaveOutcome::Failed(e.to_string())
            }
        };

        if let Some(id) = record_id {
            let status = match outcome {
                SaveOutcome::Committed => RecordStatus::Committed,
                SaveOutcome::Failed(_) => RecordStatus::Failed,
            };
            self.statuses.insert(id, status);
        }
        self.sync = match &outcome {
            SaveOutcome::Committed => SyncState::Saved,
            SaveOutcome::Failed(msg) => SyncState::Failed(msg.clone()),
        };

        self.leave_to_summary();
        Ok(outcome)
    }

    pub async fn save_record(&mut self, service: &FitnessService) -> Result<SaveOutcome> {
        let pending = self.begin_save()?;
        let result = service.save(&pending.session).await;
        self.complete_save(result)
    }

    /// Only available while editing an existing record.
    pub async fn delete_record(&mut self, service: &FitnessService) -> Result<SaveOutcome> {
        let pending = self.begin_delete()?;
        let result = service.save(&pending.session).await;
        self.complete_save(result)
    }

    fn leave_to_summary(&mut self) {
        self.view = View::Summary;
        self.draft = None;
    }

    fn require(&self, expected: View, action: &'static str) -> Result<()> {
        if self.view == expected {
            Ok(())
        } else {
            Err(RecorderError::InvalidTransition {
                from: self.view,
                action,
            })
        }
    }
}
