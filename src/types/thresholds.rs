//! Significance thresholds applied by the aggregator.

use serde::{Deserialize, Serialize};

use crate::{AnalyzerError, Result};

/// Default threshold for condition labels.
pub const DEFAULT_CONDITION_THRESHOLD: f32 = 0.3;
/// Default threshold for time-constraint labels.
pub const DEFAULT_TIME_CONSTRAINT_THRESHOLD: f32 = 0.3;
/// Default threshold for sentence sub-task labels.
pub const DEFAULT_SUB_TASK_THRESHOLD: f32 = 0.4;

/// Minimum normalized scores for a label to count as significant.
///
/// A label is significant when its score is strictly greater than the
/// threshold. The defaults are the behavioural reference values; changing
/// them changes classification output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    #[serde(default = "default_condition")]
    pub condition: f32,
    #[serde(default = "default_time_constraint")]
    pub time_constraint: f32,
    #[serde(default = "default_sub_task")]
    pub sub_task: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            condition: DEFAULT_CONDITION_THRESHOLD,
            time_constraint: DEFAULT_TIME_CONSTRAINT_THRESHOLD,
            sub_task: DEFAULT_SUB_TASK_THRESHOLD,
        }
    }
}

fn default_condition() -> f32 {
    DEFAULT_CONDITION_THRESHOLD
}

fn default_time_constraint() -> f32 {
    DEFAULT_TIME_CONSTRAINT_THRESHOLD
}

fn default_sub_task() -> f32 {
    DEFAULT_SUB_TASK_THRESHOLD
}

impl Thresholds {
    pub fn condition(mut self, value: f32) -> Self {
        self.condition = value;
        self
    }

    pub fn time_constraint(mut self, value: f32) -> Self {
        self.time_constraint = value;
        self
    }

    pub fn sub_task(mut self, value: f32) -> Self {
        self.sub_task = value;
        self
    }

    /// Reject thresholds outside `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("condition", self.condition),
            ("time_constraint", self.time_constraint),
            ("sub_task", self.sub_task),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(AnalyzerError::Configuration(format!(
                    "threshold '{name}' must be within [0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_policy() {
        let t = Thresholds::default();
        assert_eq!(t.condition, 0.3);
        assert_eq!(t.time_constraint, 0.3);
        assert_eq!(t.sub_task, 0.4);
        assert!(t.validate().is_ok());
    }

    #[test]
    fn out_of_range_is_rejected() {
        let err = Thresholds::default().sub_task(1.5).validate().unwrap_err();
        assert!(err.to_string().contains("sub_task"));

        assert!(Thresholds::default().condition(f32::NAN).validate().is_err());
    }
}
