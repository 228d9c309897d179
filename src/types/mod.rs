//! Public types for the MT799 analyzer.

mod inference;
mod label;
mod message;
mod thresholds;

pub use inference::{NliLabel, NliResult};
pub use label::{LabelHypothesis, LabelSet, ScoredLabel};
pub use message::{StructuredMessage, SubTask, TimeConstraint};
pub use thresholds::{
    DEFAULT_CONDITION_THRESHOLD, DEFAULT_SUB_TASK_THRESHOLD, DEFAULT_TIME_CONSTRAINT_THRESHOLD,
    Thresholds,
};
