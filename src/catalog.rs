//! Static exercise catalog.

use crate::models::{ExerciseDefinition, InputKind, TimeUnit};

pub const EXERCISES: &[ExerciseDefinition] = &[
    ExerciseDefinition {
        id: "scapular-stretch",
        label: "Scapular Stretch",
        kind: InputKind::Reps,
        default_values: &[5, 10, 15],
        default_distances: &[],
        default_weight: None,
        time_unit: None,
        image: None,
    },
    ExerciseDefinition {
        id: "pushups",
        label: "Pushups",
        kind: InputKind::Reps,
        default_values: &[5, 10, 15, 20],
        default_distances: &[],
        default_weight: None,
        time_unit: None,
        image: None,
    },
    ExerciseDefinition {
        id: "bycicle-crunches",
        label: "Bicycle Crunches",
        kind: InputKind::Reps,
        default_values: &[10, 20, 30],
        default_distances: &[],
        default_weight: None,
        time_unit: None,
        image: None,
    },
    ExerciseDefinition {
        id: "reverse-crunches",
        label: "Reverse Crunches",
        kind: InputKind::Reps,
        default_values: &[10, 20, 30],
        default_distances: &[],
        default_weight: None,
        time_unit: None,
        image: None,
    },
    ExerciseDefinition {
        id: "squats",
        label: "Squats",
        kind: InputKind::Reps,
        default_values: &[10, 20, 30],
        default_distances: &[],
        default_weight: None,
        time_unit: None,
        image: None,
    },
    ExerciseDefinition {
        id: "goblet-squats",
        label: "Goblet Squats",
        kind: InputKind::RepsWeight,
        default_values: &[8, 10, 12],
        default_distances: &[],
        default_weight: Some(12.0),
        time_unit: None,
        image: None,
    },
    ExerciseDefinition {
        id: "dumbbell-curls",
        label: "Dumbbell Curls",
        kind: InputKind::RepsWeight,
        default_values: &[8, 10, 12, 15],
        default_distances: &[],
        default_weight: Some(10.0),
        time_unit: None,
        image: None,
    },
    ExerciseDefinition {
        id: "planks",
        label: "Planks",
        kind: InputKind::Time,
        default_values: &[15, 30, 45, 60],
        default_distances: &[],
        default_weight: None,
        time_unit: Some(TimeUnit::Seconds),
        image: None,
    },
    ExerciseDefinition {
        id: "calf-raises",
        label: "Calf Raises",
        kind: InputKind::Reps,
        default_values: &[10, 15, 20, 30],
        default_distances: &[],
        default_weight: None,
        time_unit: None,
        image: None,
    },
    ExerciseDefinition {
        id: "pull-ups",
        label: "Pull Ups",
        kind: InputKind::Reps,
        default_values: &[1, 3, 5, 10],
        default_distances: &[],
        default_weight: None,
        time_unit: None,
        image: None,
    },
    ExerciseDefinition {
        id: "stretching",
        label: "Stretching",
        kind: InputKind::Time,
        default_values: &[5, 10, 15, 20],
        default_distances: &[],
        default_weight: None,
        time_unit: Some(TimeUnit::Minutes),
        image: None,
    },
    ExerciseDefinition {
        id: "running",
        label: "Running",
        kind: InputKind::TimeDistance,
        default_values: &[15, 20, 30, 45, 60],
        default_distances: &[1.0, 3.0, 5.0, 10.0, 21.1],
        default_weight: None,
        time_unit: Some(TimeUnit::Minutes),
        image: None,
    },
];

pub fn find(id: &str) -> Option<&'static ExerciseDefinition> {
    EXERCISES.iter().find(|e| e.id == id)
}

/// Label for a stored exercise id; records whose exercise left the catalog
/// show their raw id.
pub fn label_for(id: &str) -> &str {
    find(id).map(|e| e.label).unwrap_or(id)
}
