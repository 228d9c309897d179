//! Natural language inference types.

use serde::{Deserialize, Serialize};

/// Class probabilities from one NLI forward pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NliResult {
    pub entailment: f32,
    pub contradiction: f32,
    pub neutral: f32,
    pub label: NliLabel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NliLabel {
    Entailment,
    Contradiction,
    Neutral,
}

impl NliResult {
    /// Build a result from class probabilities, picking the argmax label.
    ///
    /// On ties the priority order is `Entailment` > `Contradiction` > `Neutral`.
    pub fn from_probabilities(entailment: f32, contradiction: f32, neutral: f32) -> Self {
        let label = if entailment >= contradiction && entailment >= neutral {
            NliLabel::Entailment
        } else if contradiction >= neutral {
            NliLabel::Contradiction
        } else {
            NliLabel::Neutral
        };
        Self {
            entailment,
            contradiction,
            neutral,
            label,
        }
    }
}
