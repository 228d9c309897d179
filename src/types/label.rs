//! Label sets and scored labels.
//!
//! A [`LabelSet`] is one classification axis: an ordered sequence of
//! `(label, hypothesis)` pairs. Declaration order is significant, it breaks
//! ties when two labels receive the same score.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{AnalyzerError, Result};

/// A label identifier paired with its natural-language hypothesis template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelHypothesis {
    /// Label identifier reported in results (e.g. `"extend_or_pay"`).
    pub label: String,
    /// Hypothesis scored against the text by the entailment oracle.
    pub hypothesis: String,
}

/// Ordered, immutable set of labels for one classification axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSet {
    name: String,
    entries: Vec<LabelHypothesis>,
}

impl LabelSet {
    /// Build a label set, validating it.
    ///
    /// Fails with [`AnalyzerError::Configuration`] when the set is empty,
    /// a label is blank or repeated, or a hypothesis is blank.
    pub fn new<L, H>(
        name: impl Into<String>,
        entries: impl IntoIterator<Item = (L, H)>,
    ) -> Result<Self>
    where
        L: Into<String>,
        H: Into<String>,
    {
        let name = name.into();
        let entries: Vec<LabelHypothesis> = entries
            .into_iter()
            .map(|(label, hypothesis)| LabelHypothesis {
                label: label.into(),
                hypothesis: hypothesis.into(),
            })
            .collect();

        if entries.is_empty() {
            return Err(AnalyzerError::Configuration(format!(
                "label set '{name}' has no labels"
            )));
        }

        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if entry.label.trim().is_empty() {
                return Err(AnalyzerError::Configuration(format!(
                    "label set '{name}' contains a blank label"
                )));
            }
            if entry.hypothesis.trim().is_empty() {
                return Err(AnalyzerError::Configuration(format!(
                    "label '{}' in set '{name}' has a blank hypothesis",
                    entry.label
                )));
            }
            if !seen.insert(entry.label.as_str()) {
                return Err(AnalyzerError::Configuration(format!(
                    "label '{}' appears more than once in set '{name}'",
                    entry.label
                )));
            }
        }

        Ok(Self { name, entries })
    }

    /// Build a built-in label set without validation.
    ///
    /// Only used for the catalogs in [`crate::labels`], which are checked by
    /// their own tests.
    pub(crate) fn from_static(name: &str, entries: &[(&str, &str)]) -> Self {
        Self {
            name: name.to_string(),
            entries: entries
                .iter()
                .map(|(label, hypothesis)| LabelHypothesis {
                    label: (*label).to_string(),
                    hypothesis: (*hypothesis).to_string(),
                })
                .collect(),
        }
    }

    /// Name of the classification axis (used in logs).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false` for a validated set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &LabelHypothesis> {
        self.entries.iter()
    }

    /// Label identifiers in declaration order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.label.as_str())
    }

    /// Hypothesis template for a label.
    pub fn hypothesis(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.hypothesis.as_str())
    }

    /// Declaration position of a label.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.label == label)
    }
}

/// A label with its normalized score from one classification pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredLabel {
    pub label: String,
    /// Normalized score in `[0, 1]`; scores of one pass sum to 1.
    pub score: f32,
}

impl ScoredLabel {
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}
