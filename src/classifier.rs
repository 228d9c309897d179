//! Zero-shot classification over an entailment oracle.
//!
//! Each label's hypothesis is scored against the text independently. The
//! raw entailment probabilities are then divided by their sum, turning a
//! set of independent binary judgments into one relative distribution over
//! the label set. Labels are ranked by that distribution, ties going to
//! the label declared first.
//!
//! # Concurrency
//!
//! Every oracle call acquires a permit from a semaphore owned by the
//! classifier, so the limit holds across concurrent passes, not just
//! within one. Oracles that do not advertise concurrency get a single
//! permit; the semaphore is fair, so calls then reach the oracle in the
//! order they were issued.

use std::sync::Arc;
use std::time::Instant;

use futures_util::future::try_join_all;
use tokio::sync::Semaphore;
use tracing::{debug, instrument, warn};

use crate::oracle::EntailmentOracle;
use crate::telemetry;
use crate::types::{LabelSet, ScoredLabel};
use crate::{AnalyzerError, Result};

/// Default bound on in-flight oracle calls for concurrent oracles.
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// Ranks label sets against text using an [`EntailmentOracle`].
pub struct ZeroShotClassifier {
    oracle: Arc<dyn EntailmentOracle>,
    permits: Arc<Semaphore>,
    concurrency: usize,
}

impl ZeroShotClassifier {
    /// Create a classifier allowing up to `max_concurrency` in-flight calls.
    ///
    /// The limit is forced to 1 unless the oracle reports
    /// [`supports_concurrency`](EntailmentOracle::supports_concurrency).
    pub fn new(oracle: Arc<dyn EntailmentOracle>, max_concurrency: usize) -> Result<Self> {
        if max_concurrency == 0 {
            return Err(AnalyzerError::Configuration(
                "max_concurrency must be at least 1".to_string(),
            ));
        }
        let concurrency = if oracle.supports_concurrency() {
            max_concurrency
        } else {
            1
        };
        Ok(Self {
            oracle,
            permits: Arc::new(Semaphore::new(concurrency)),
            concurrency,
        })
    }

    /// Name of the underlying oracle.
    pub fn oracle_name(&self) -> &str {
        self.oracle.name()
    }

    /// Effective bound on in-flight oracle calls.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Score `text` against every label in `labels`.
    ///
    /// Returns one [`ScoredLabel`] per label, sorted by descending score,
    /// with scores summing to 1. Any oracle failure aborts the pass: calls
    /// still in flight are dropped and no partial ranking is returned.
    #[instrument(
        skip(self, text, labels),
        fields(label_set = labels.name(), labels = labels.len(), text_len = text.len())
    )]
    pub async fn classify(&self, text: &str, labels: &LabelSet) -> Result<Vec<ScoredLabel>> {
        let calls = labels
            .iter()
            .map(|entry| self.score_hypothesis(text, &entry.hypothesis));
        let outcome = try_join_all(calls).await;

        let status = if outcome.is_ok() { "ok" } else { "error" };
        metrics::counter!(telemetry::CLASSIFICATIONS_TOTAL,
            "label_set" => labels.name().to_owned(),
            "status" => status,
        )
        .increment(1);

        let raw = outcome?;
        let ranked = rank(labels, &raw);
        if let Some(top) = ranked.first() {
            debug!(top = %top.label, score = top.score, "classification pass complete");
        }
        Ok(ranked)
    }

    /// One oracle call, bounded by the classifier's permits.
    async fn score_hypothesis(&self, premise: &str, hypothesis: &str) -> Result<f32> {
        let start = Instant::now();
        let result = match self.permits.acquire().await {
            Ok(_permit) => self.oracle.score(premise, hypothesis).await,
            Err(_) => Err(AnalyzerError::OracleUnavailable(
                "oracle permits closed".to_string(),
            )),
        }
        .and_then(|score| check_score(self.oracle.name(), score));

        let status = if result.is_ok() { "ok" } else { "error" };
        metrics::counter!(telemetry::ORACLE_CALLS_TOTAL,
            "oracle" => self.oracle.name().to_owned(),
            "status" => status,
        )
        .increment(1);
        metrics::histogram!(telemetry::ORACLE_CALL_DURATION_SECONDS,
            "oracle" => self.oracle.name().to_owned(),
        )
        .record(start.elapsed().as_secs_f64());

        result
    }
}

/// Reject oracle outputs that are not probabilities.
fn check_score(oracle: &str, score: f32) -> Result<f32> {
    if score.is_finite() && (0.0..=1.0).contains(&score) {
        Ok(score)
    } else {
        Err(AnalyzerError::Inference(format!(
            "oracle {oracle} returned {score}, expected a probability in [0, 1]"
        )))
    }
}

/// Divide each raw score by the sum of all raw scores.
///
/// A zero sum (every hypothesis scored 0) yields the uniform distribution,
/// so the output always sums to 1.
pub fn normalize_scores(raw: &[f32]) -> Vec<f32> {
    if raw.is_empty() {
        return Vec::new();
    }
    let total: f32 = raw.iter().sum();
    if total > 0.0 {
        raw.iter().map(|s| s / total).collect()
    } else {
        warn!(labels = raw.len(), "oracle scored every label 0, using uniform distribution");
        vec![1.0 / raw.len() as f32; raw.len()]
    }
}

/// Pair normalized scores with labels and sort descending.
///
/// `raw` is in declaration order; the stable sort keeps that order among
/// equal scores.
pub(crate) fn rank(labels: &LabelSet, raw: &[f32]) -> Vec<ScoredLabel> {
    let mut ranked: Vec<ScoredLabel> = labels
        .labels()
        .zip(normalize_scores(raw))
        .map(|(label, score)| ScoredLabel::new(label, score))
        .collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> LabelSet {
        LabelSet::new("demo", [("a", "A"), ("b", "B"), ("c", "C")]).unwrap()
    }

    #[test]
    fn normalize_sums_to_one() {
        let normalized = normalize_scores(&[0.2, 0.6, 0.2]);
        let sum: f32 = normalized.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!((normalized[1] - 0.6).abs() < 1e-6);
    }

    #[test]
    fn normalize_zero_sum_is_uniform() {
        let normalized = normalize_scores(&[0.0, 0.0, 0.0, 0.0]);
        assert_eq!(normalized, vec![0.25; 4]);
    }

    #[test]
    fn rank_sorts_descending() {
        let ranked = rank(&labels(), &[0.1, 0.5, 0.4]);
        let order: Vec<_> = ranked.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(order, vec!["b", "c", "a"]);
    }

    #[test]
    fn rank_ties_follow_declaration_order() {
        let ranked = rank(&labels(), &[0.3, 0.3, 0.3]);
        let order: Vec<_> = ranked.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "c"]);

        let ranked = rank(&labels(), &[0.1, 0.45, 0.45]);
        let order: Vec<_> = ranked.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(order, vec!["b", "c", "a"]);
    }

    #[test]
    fn check_score_rejects_non_probabilities() {
        assert!(check_score("t", 0.5).is_ok());
        assert!(check_score("t", 0.0).is_ok());
        assert!(check_score("t", 1.0).is_ok());
        assert!(check_score("t", -0.1).is_err());
        assert!(check_score("t", 1.2).is_err());
        assert!(check_score("t", f32::NAN).is_err());
    }
}
