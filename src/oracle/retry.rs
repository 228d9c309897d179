//! Retry configuration and the retrying oracle decorator.
//!
//! The analysis pipeline never retries on its own: a failed oracle call
//! aborts the whole `analyze` call. Callers that would rather absorb
//! transient backend hiccups wrap their oracle in [`RetryingOracle`].

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use super::traits::EntailmentOracle;
use crate::telemetry;
use crate::{AnalyzerError, Result};

/// Configuration for retry behaviour on transient oracle errors.
///
/// Uses exponential backoff:
///
/// ```rust
/// # use mt799_intent::oracle::RetryConfig;
/// # use std::time::Duration;
/// let config = RetryConfig::new()
///     .max_attempts(5)
///     .initial_delay(Duration::from_millis(200));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial call).
    /// 1 = no retry. Default: 3.
    pub max_attempts: u32,
    /// Base delay before the first retry. Default: 500ms.
    #[serde(with = "millis", rename = "initial_delay_ms")]
    pub initial_delay: Duration,
    /// Maximum delay between retries (caps exponential growth). Default: 30s.
    #[serde(with = "millis", rename = "max_delay_ms")]
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config that disables retries (single attempt).
    pub fn disabled() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Set maximum attempts (including the initial call).
    pub fn max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = n;
        self
    }

    /// Set the base delay before the first retry.
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the maximum delay between retries.
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Whether this config performs any retry at all.
    pub fn is_enabled(&self) -> bool {
        self.max_attempts > 1
    }

    /// Calculate the delay for a given attempt number (0-indexed).
    ///
    /// Uses exponential backoff: `initial_delay * 2^attempt`, capped at `max_delay`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay = self
            .initial_delay
            .saturating_mul(2u32.saturating_pow(attempt));
        delay.min(self.max_delay)
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

// ============================================================================
// Shared retry helper
// ============================================================================

/// Execute an async operation with retry logic.
///
/// Retries on transient errors (as classified by [`AnalyzerError::is_transient()`])
/// up to `config.max_attempts`, using exponential backoff. Permanent errors
/// are returned immediately without retry.
pub(crate) async fn with_retry<F, Fut, T>(config: &RetryConfig, oracle_name: &str, f: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut last_err = None;
    for attempt in 0..config.max_attempts.max(1) {
        match f().await {
            Ok(result) => return Ok(result),
            Err(e) if e.is_transient() => {
                if attempt + 1 < config.max_attempts {
                    metrics::counter!(telemetry::RETRIES_TOTAL,
                        "oracle" => oracle_name.to_owned(),
                    )
                    .increment(1);
                    let delay = config.delay_for_attempt(attempt);
                    warn!(
                        oracle = oracle_name,
                        attempt = attempt + 1,
                        max_attempts = config.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "retrying after transient oracle error"
                    );
                    tokio::time::sleep(delay).await;
                }
                last_err = Some(e);
            }
            Err(e) => return Err(e), // permanent error, no retry
        }
    }
    Err(last_err.unwrap_or_else(|| {
        AnalyzerError::OracleUnavailable(format!("{oracle_name}: retries exhausted"))
    }))
}

// ============================================================================
// RetryingOracle
// ============================================================================

/// Decorator that wraps an [`EntailmentOracle`] with retry logic.
///
/// On transient errors, retries with exponential backoff up to
/// `config.max_attempts`. Permanent errors are returned immediately.
pub struct RetryingOracle {
    inner: Arc<dyn EntailmentOracle>,
    config: RetryConfig,
}

impl RetryingOracle {
    /// Wrap an oracle with retry logic.
    pub fn new(inner: Arc<dyn EntailmentOracle>, config: RetryConfig) -> Self {
        Self { inner, config }
    }
}

#[async_trait]
impl EntailmentOracle for RetryingOracle {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn supports_concurrency(&self) -> bool {
        self.inner.supports_concurrency()
    }

    async fn score(&self, premise: &str, hypothesis: &str) -> Result<f32> {
        with_retry(&self.config, self.inner.name(), || {
            self.inner.score(premise, hypothesis)
        })
        .await
    }
}
