use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::stopwatch::Stopwatch;
use crate::models::{ExerciseDefinition, ExerciseRecord, InputKind};

/// Step of the weight ± controls, in kg.
pub const WEIGHT_STEP: f64 = 5.0;

/// In-progress values of the record-exercise view.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub exercise: &'static ExerciseDefinition,
    /// Set when replacing an existing record.
    pub editing_record_id: Option<String>,
    pub value: u32,
    pub weight: f64,
    pub multiplier: u32,
    pub distance: f64,
    /// Unix second the stopwatch was started; `None` while paused.
    pub stopwatch_started: Option<i64>,
}

impl Draft {
    pub fn new(exercise: &'static ExerciseDefinition) -> Self {
        Self {
            exercise,
            editing_record_id: None,
            value: 0,
            weight: exercise.default_weight.unwrap_or(0.0),
            multiplier: 1,
            distance: 0.0,
            stopwatch_started: None,
        }
    }

    pub fn from_record(exercise: &'static ExerciseDefinition, record: &ExerciseRecord) -> Self {
        Self {
            exercise,
            editing_record_id: Some(record.id.clone()),
            value: record.value,
            weight: record.weight.unwrap_or(0.0),
            multiplier: record.sets(),
            distance: record.distance.unwrap_or(0.0),
            stopwatch_started: None,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing_record_id.is_some()
    }

    /// A picked value replaces the count and stops the stopwatch.
    pub fn set_value(&mut self, value: u32) {
        self.value = value;
        self.stopwatch_started = None;
    }

    pub fn adjust_value(&mut self, delta: i64) {
        self.value = (i64::from(self.value) + delta).clamp(0, i64::from(u32::MAX)) as u32;
    }

    /// The stopwatch over `value`.
    pub fn stopwatch(&self) -> Stopwatch {
        match self.stopwatch_started {
            Some(started_at) => Stopwatch::running(self.value, started_at),
            None => Stopwatch::new(self.value),
        }
    }

    fn update_stopwatch(&mut self, f: impl FnOnce(&mut Stopwatch)) {
        let mut watch = self.stopwatch();
        f(&mut watch);
        self.value = watch.base();
        self.stopwatch_started = watch.started_at();
    }

    pub fn start_stopwatch(&mut self, now: i64) {
        self.update_stopwatch(|w| w.start(now));
    }

    pub fn pause_stopwatch(&mut self, now: i64) {
        self.update_stopwatch(|w| w.pause(now));
    }

    pub fn toggle_stopwatch(&mut self, now: i64) {
        self.update_stopwatch(|w| w.toggle(now));
    }

    pub fn reset_stopwatch(&mut self) {
        self.update_stopwatch(Stopwatch::reset);
    }

    /// At least one set.
    pub fn set_multiplier(&mut self, multiplier: u32) {
        self.multiplier = multiplier.max(1);
    }

    pub fn adjust_multiplier(&mut self, delta: i64) {
        self.multiplier = (i64::from(self.multiplier) + delta).clamp(1, i64::from(u32::MAX)) as u32;
    }

    pub fn set_weight(&mut self, weight: f64) {
        self.weight = non_negative(weight);
    }

    /// Moves the weight by `steps` increments of [`WEIGHT_STEP`].
    pub fn adjust_weight(&mut self, steps: i64) {
        self.set_weight(self.weight + steps as f64 * WEIGHT_STEP);
    }

    pub fn set_distance(&mut self, distance: f64) {
        self.distance = non_negative(distance);
    }

    /// Build the record to store. Editing keeps the record id and, when
    /// given, the original creation time.
    pub fn to_record(&self, created_at: Option<DateTime<Utc>>) -> ExerciseRecord {
        let kind = self.exercise.kind;

        ExerciseRecord {
            id: self
                .editing_record_id
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            exercise_id: self.exercise.id.to_string(),
            kind,
            value: self.value,
            weight: (kind == InputKind::RepsWeight).then_some(self.weight),
            multiplier: (self.multiplier > 1).then_some(self.multiplier),
            distance: (kind == InputKind::TimeDistance).then_some(self.distance),
            timestamp: created_at.unwrap_or_else(Utc::now),
        }
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    fn draft(id: &str) -> Draft {
        Draft::new(catalog::find(id).unwrap())
    }

    #[test]
    fn test_counters_clamp() {
        let mut d = draft("pushups");
        d.adjust_value(-1);
        assert_eq!(d.value, 0);
        d.adjust_multiplier(-3);
        assert_eq!(d.multiplier, 1);
        d.set_multiplier(0);
        assert_eq!(d.multiplier, 1);
    }

    #[test]
    fn test_stopwatch_folds_into_value() {
        let mut d = draft("planks");
        d.set_value(10);
        d.start_stopwatch(1_000);
        assert_eq!(d.stopwatch_started, Some(1_000));
        assert_eq!(d.stopwatch().seconds_at(1_020), 30);

        d.adjust_value(15);
        assert_eq!(d.stopwatch().seconds_at(1_020), 45);

        d.pause_stopwatch(1_020);
        assert_eq!(d.value, 45);
        assert_eq!(d.stopwatch_started, None);

        d.toggle_stopwatch(2_000);
        d.set_value(60);
        assert_eq!(d.stopwatch_started, None);

        d.start_stopwatch(3_000);
        d.reset_stopwatch();
        assert_eq!((d.value, d.stopwatch_started), (0, None));
    }

    #[test]
    fn test_weight_steps() {
        let mut d = draft("dumbbell-curls");
        assert_eq!(d.weight, 10.0);
        d.adjust_weight(-1);
        assert_eq!(d.weight, 5.0);
        d.adjust_weight(-2);
        assert_eq!(d.weight, 0.0);
        d.set_weight(f64::NAN);
        assert_eq!(d.weight, 0.0);
    }

    #[test]
    fn test_plain_reps_record_has_no_weight() {
        let mut d = draft("pushups");
        d.set_value(10);
        let record = d.to_record(None);
        assert_eq!(record.kind, InputKind::Reps);
        assert_eq!(record.weight, None);
        assert_eq!(record.multiplier, None);
        assert_eq!(record.distance, None);
    }

    #[test]
    fn test_weighted_record_has_weight() {
        let mut d = draft("goblet-squats");
        d.set_value(8);
        let record = d.to_record(None);
        assert_eq!(record.value, 8);
        assert_eq!(record.weight, Some(12.0));
    }

    #[test]
    fn test_editing_keeps_identity() {
        let mut d = draft("pushups");
        d.set_value(10);
        let created = d.to_record(None);

        let mut edit = Draft::from_record(catalog::find("pushups").unwrap(), &created);
        edit.set_value(12);
        let replaced = edit.to_record(Some(created.timestamp));

        assert!(edit.is_editing());
        assert_eq!(replaced.id, created.id);
        assert_eq!(replaced.timestamp, created.timestamp);
        assert_eq!(replaced.value, 12);
    }

    #[test]
    fn test_new_records_get_fresh_ids() {
        let d = draft("squats");
        assert_ne!(d.to_record(None).id, d.to_record(None).id);
    }
}
