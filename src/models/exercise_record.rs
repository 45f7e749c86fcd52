use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::InputKind;

/// One logged performance, stored inside its session's `exercises` blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseRecord {
    pub id: String,
    pub exercise_id: String,
    #[serde(rename = "type")]
    pub kind: InputKind,
    /// Reps, seconds, or minutes.
    pub value: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Sets; only stored when greater than one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<u32>,
    /// Kilometres.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl ExerciseRecord {
    pub fn sets(&self) -> u32 {
        self.multiplier.unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_fields_are_omitted() {
        let record = ExerciseRecord {
            id: "r1".to_string(),
            exercise_id: "pushups".to_string(),
            kind: InputKind::Reps,
            value: 10,
            weight: None,
            multiplier: None,
            distance: None,
            timestamp: Utc::now(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["exerciseId"], "pushups");
        assert_eq!(json["type"], "reps");
        assert!(json.get("weight").is_none());
        assert!(json.get("multiplier").is_none());
        assert!(json.get("distance").is_none());
        assert_eq!(record.sets(), 1);
    }

    #[test]
    fn test_reads_stored_shape() {
        let json = r#"{
            "id": "abc",
            "exerciseId": "running",
            "type": "time-distance",
            "value": 20,
            "distance": 5,
            "timestamp": "2026-01-01T07:30:00.000Z"
        }"#;

        let record: ExerciseRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.kind, InputKind::TimeDistance);
        assert_eq!(record.distance, Some(5.0));
        assert_eq!(record.weight, None);
    }
}
