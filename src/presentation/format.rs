use crate::catalog;
use crate::models::{ExerciseRecord, InputKind, TimeUnit};
use crate::recorder::RecordStatus;

/// `"1m 5s"`, or `"45s"` under a minute.
pub fn format_duration(seconds: u32) -> String {
    let (m, s) = (seconds / 60, seconds % 60);
    if m > 0 {
        format!("{}m {}s", m, s)
    } else {
        format!("{}s", s)
    }
}

/// One row of the session summary, ready to print.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordLine {
    pub id: String,
    pub label: String,
    /// `"2x"` when more than one set was logged, else empty.
    pub sets_prefix: String,
    pub value: String,
    pub caption: &'static str,
    pub detail: Option<String>,
    pub badge: Option<&'static str>,
}

impl RecordLine {
    pub fn new(record: &ExerciseRecord, status: RecordStatus) -> Self {
        let unit = catalog::find(&record.exercise_id)
            .map(|def| def.time_unit())
            .unwrap_or_default();

        let sets_prefix = match record.multiplier {
            Some(n) if n > 1 => format!("{}x", n),
            _ => String::new(),
        };

        let (value, caption, detail) = match record.kind {
            InputKind::Reps => (record.value.to_string(), "Reps", None),
            InputKind::RepsWeight => (
                record.value.to_string(),
                "Reps",
                record.weight.map(|w| format!("{} kg", w)),
            ),
            InputKind::Time if unit == TimeUnit::Minutes => {
                (format!("{}m", record.value), "Minutes", None)
            }
            InputKind::Time => (format_duration(record.value), "Duration", None),
            InputKind::TimeDistance => (
                format!("{} km", record.distance.unwrap_or(0.0)),
                "Distance & Time",
                Some(format!("{}m", record.value)),
            ),
        };

        let badge = match status {
            RecordStatus::Pending => Some("Saving"),
            RecordStatus::Failed => Some("Not saved"),
            RecordStatus::Committed => None,
        };

        Self {
            id: record.id.clone(),
            label: catalog::label_for(&record.exercise_id).to_string(),
            sets_prefix,
            value,
            caption,
            detail,
            badge,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(exercise_id: &str, kind: InputKind, value: u32) -> ExerciseRecord {
        ExerciseRecord {
            id: "r1".to_string(),
            exercise_id: exercise_id.to_string(),
            kind,
            value,
            weight: None,
            multiplier: None,
            distance: None,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(45), "45s");
        assert_eq!(format_duration(60), "1m 0s");
        assert_eq!(format_duration(125), "2m 5s");
    }

    #[test]
    fn test_reps_with_sets() {
        let mut r = record("pushups", InputKind::Reps, 10);
        r.multiplier = Some(2);
        let line = RecordLine::new(&r, RecordStatus::Committed);
        assert_eq!(line.label, "Pushups");
        assert_eq!(line.sets_prefix, "2x");
        assert_eq!(line.value, "10");
        assert_eq!(line.caption, "Reps");
        assert_eq!(line.badge, None);
    }

    #[test]
    fn test_weighted() {
        let mut r = record("goblet-squats", InputKind::RepsWeight, 8);
        r.weight = Some(12.5);
        let line = RecordLine::new(&r, RecordStatus::Committed);
        assert_eq!(line.sets_prefix, "");
        assert_eq!(line.detail.as_deref(), Some("12.5 kg"));
    }

    #[test]
    fn test_timed_units() {
        let planks = RecordLine::new(
            &record("planks", InputKind::Time, 75),
            RecordStatus::Committed,
        );
        assert_eq!(planks.value, "1m 15s");
        assert_eq!(planks.caption, "Duration");

        let stretch =
            RecordLine::new(&record("stretching", InputKind::Time, 20), RecordStatus::Committed);
        assert_eq!(stretch.value, "20m");
        assert_eq!(stretch.caption, "Minutes");
    }

    #[test]
    fn test_distance() {
        let mut r = record("running", InputKind::TimeDistance, 30);
        r.distance = Some(5.0);
        let line = RecordLine::new(&r, RecordStatus::Failed);
        assert_eq!(line.value, "5 km");
        assert_eq!(line.detail.as_deref(), Some("30m"));
        assert_eq!(line.caption, "Distance & Time");
        assert_eq!(line.badge, Some("Not saved"));
    }
}
