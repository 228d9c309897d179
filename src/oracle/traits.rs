//! Oracle traits.
//!
//! The classifier only ever talks to an [`EntailmentOracle`]: one premise,
//! one hypothesis, one probability. Backends that produce the full
//! three-way NLI distribution implement [`NliProvider`] instead and are
//! adapted with [`NliOracle`], which keeps the entailment probability.
//!
//! # Concurrency
//!
//! Oracles are `Send + Sync`, but that only means they can be shared. An
//! oracle that can actually serve overlapping `score` calls (a remote
//! endpoint, a pool of sessions) says so through
//! [`supports_concurrency`](EntailmentOracle::supports_concurrency). The
//! classifier serializes calls to every other oracle.

use std::sync::Arc;

use async_trait::async_trait;

use crate::Result;
use crate::types::NliResult;

// ============================================================================
// Entailment Oracle
// ============================================================================

/// Scores how strongly a premise entails a hypothesis.
#[async_trait]
pub trait EntailmentOracle: Send + Sync {
    /// Oracle name for logging/metrics.
    fn name(&self) -> &str;

    /// Whether overlapping `score` calls are safe and useful.
    ///
    /// Defaults to `false`; the classifier then issues one call at a time.
    fn supports_concurrency(&self) -> bool {
        false
    }

    /// Probability in `[0, 1]` that `premise` entails `hypothesis`.
    ///
    /// Returns [`OracleUnavailable`](crate::AnalyzerError::OracleUnavailable)
    /// when the backend cannot be reached and
    /// [`Inference`](crate::AnalyzerError::Inference) when it cannot score
    /// the input.
    async fn score(&self, premise: &str, hypothesis: &str) -> Result<f32>;
}

#[async_trait]
impl<T: EntailmentOracle + ?Sized> EntailmentOracle for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn supports_concurrency(&self) -> bool {
        (**self).supports_concurrency()
    }

    async fn score(&self, premise: &str, hypothesis: &str) -> Result<f32> {
        (**self).score(premise, hypothesis).await
    }
}

// ============================================================================
// NLI Provider
// ============================================================================

/// Provider for natural language inference.
#[async_trait]
pub trait NliProvider: Send + Sync {
    /// Provider name for logging/debugging.
    fn name(&self) -> &str;

    /// Whether overlapping `infer_nli` calls are safe and useful.
    fn supports_concurrency(&self) -> bool {
        false
    }

    /// Infer entailment/contradiction/neutral between premise and hypothesis.
    async fn infer_nli(&self, premise: &str, hypothesis: &str) -> Result<NliResult>;
}

/// Adapts an [`NliProvider`] into an [`EntailmentOracle`].
///
/// The oracle score is the entailment class probability, already
/// softmax-normalized by the provider over its three classes.
pub struct NliOracle {
    inner: Arc<dyn NliProvider>,
}

impl NliOracle {
    pub fn new(inner: Arc<dyn NliProvider>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl EntailmentOracle for NliOracle {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn supports_concurrency(&self) -> bool {
        self.inner.supports_concurrency()
    }

    async fn score(&self, premise: &str, hypothesis: &str) -> Result<f32> {
        let result = self.inner.infer_nli(premise, hypothesis).await?;
        Ok(result.entailment)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AnalyzerError;

    struct MockNliProvider {
        result: NliResult,
    }

    #[async_trait]
    impl NliProvider for MockNliProvider {
        fn name(&self) -> &str {
            "mock-nli"
        }

        async fn infer_nli(&self, _premise: &str, _hypothesis: &str) -> Result<NliResult> {
            Ok(self.result.clone())
        }
    }

    struct DownNliProvider;

    #[async_trait]
    impl NliProvider for DownNliProvider {
        fn name(&self) -> &str {
            "down"
        }

        async fn infer_nli(&self, _premise: &str, _hypothesis: &str) -> Result<NliResult> {
            Err(AnalyzerError::OracleUnavailable("session closed".into()))
        }
    }

    #[tokio::test]
    async fn nli_oracle_returns_entailment_probability() {
        let provider = Arc::new(MockNliProvider {
            result: NliResult::from_probabilities(0.82, 0.03, 0.15),
        });
        let oracle = NliOracle::new(provider);

        let score = oracle.score("premise", "hypothesis").await.unwrap();
        assert!((score - 0.82).abs() < f32::EPSILON);
        assert_eq!(oracle.name(), "mock-nli");
        assert!(!oracle.supports_concurrency());
    }

    #[tokio::test]
    async fn nli_oracle_propagates_provider_errors() {
        let oracle = NliOracle::new(Arc::new(DownNliProvider));
        let err = oracle.score("p", "h").await.unwrap_err();
        assert!(err.is_oracle_failure());
    }
}
