use serde::{Deserialize, Serialize};

/// Shape of the input surface and of the stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputKind {
    /// Rep count.
    Reps,
    /// Rep count with a weight in kg.
    RepsWeight,
    /// Duration, in the definition's [`TimeUnit`].
    Time,
    /// Duration in minutes with a distance in km.
    TimeDistance,
}

impl InputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputKind::Reps => "reps",
            InputKind::RepsWeight => "reps-weight",
            InputKind::Time => "time",
            InputKind::TimeDistance => "time-distance",
        }
    }

    pub fn has_weight(&self) -> bool {
        matches!(self, InputKind::RepsWeight)
    }

    pub fn has_distance(&self) -> bool {
        matches!(self, InputKind::TimeDistance)
    }

    pub fn is_timed(&self) -> bool {
        matches!(self, InputKind::Time | InputKind::TimeDistance)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    #[default]
    Seconds,
    Minutes,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseDefinition {
    pub id: &'static str,
    pub label: &'static str,
    pub kind: InputKind,
    /// Quick-pick values: reps, seconds or minutes depending on `kind`.
    pub default_values: &'static [u32],
    /// Quick-pick distances in km.
    pub default_distances: &'static [f64],
    pub default_weight: Option<f64>,
    pub time_unit: Option<TimeUnit>,
    /// Thumbnail URL shown in the exercise picker.
    pub image: Option<&'static str>,
}

impl ExerciseDefinition {
    pub fn time_unit(&self) -> TimeUnit {
        match self.kind {
            // Distance entries are always logged in minutes.
            InputKind::TimeDistance => TimeUnit::Minutes,
            _ => self.time_unit.unwrap_or_default(),
        }
    }

    /// Only second-based timed exercises get the stopwatch.
    pub fn uses_stopwatch(&self) -> bool {
        self.kind == InputKind::Time && self.time_unit() == TimeUnit::Seconds
    }

    /// Plain counters and second-based timers track sets; minute-based
    /// entries do not.
    pub fn tracks_sets(&self) -> bool {
        match self.kind {
            InputKind::Reps | InputKind::RepsWeight => true,
            InputKind::Time => self.time_unit() == TimeUnit::Seconds,
            InputKind::TimeDistance => false,
        }
    }
}
