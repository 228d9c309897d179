//! Analysis output types.

use serde::{Deserialize, Serialize};

use super::ScoredLabel;

/// A sentence-level task found in the narrative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubTask {
    /// Top sub-task label for the sentence.
    #[serde(rename = "type")]
    pub task_type: String,
    /// Source sentence, trimmed.
    pub text: String,
    /// Normalized score of `task_type`.
    pub confidence: f32,
    /// Other labels above the sub-task threshold, highest first.
    #[serde(default)]
    pub related_tasks: Vec<ScoredLabel>,
}

/// A time constraint referenced by the message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeConstraint {
    #[serde(rename = "type")]
    pub constraint_type: String,
    pub confidence: f32,
}

/// Structured intent extracted from one MT799 message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredMessage {
    /// The raw input, untouched by narrative extraction.
    pub original_text: String,
    /// Highest-ranked main operation label.
    pub main_task: String,
    /// Whether any condition label cleared its threshold.
    pub has_conditional_actions: bool,
    /// Condition labels that cleared the threshold, highest first.
    #[serde(default)]
    pub conditions: Vec<ScoredLabel>,
    #[serde(default)]
    pub sub_tasks: Vec<SubTask>,
    #[serde(default)]
    pub time_constraints: Vec<TimeConstraint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_fields_serialize_as_type() {
        let task = SubTask {
            task_type: "payment_instruction".into(),
            text: "Pay the beneficiary".into(),
            confidence: 0.7,
            related_tasks: vec![],
        };
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["type"], "payment_instruction");

        let constraint = TimeConstraint {
            constraint_type: "deadline".into(),
            confidence: 0.5,
        };
        let json = serde_json::to_value(&constraint).unwrap();
        assert_eq!(json["type"], "deadline");
    }

    #[test]
    fn missing_collections_default_to_empty() {
        let json = r#"{
            "original_text": "raw",
            "main_task": "info",
            "has_conditional_actions": false
        }"#;
        let message: StructuredMessage = serde_json::from_str(json).unwrap();
        assert!(message.sub_tasks.is_empty());
        assert!(message.time_constraints.is_empty());
        assert!(message.conditions.is_empty());
    }
}
