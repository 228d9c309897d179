//! Opt-in score cache for entailment oracles.
//!
//! Oracle scores are deterministic for a given model, so repeated
//! `(premise, hypothesis)` pairs can be served from memory. This pays off
//! for MT799 traffic, where the same boilerplate sentences ("Please advise",
//! "Regards") recur across messages and every sentence is scored against the
//! full sub-task label set.
//!
//! [`CachingOracle`] sits between the classifier and the real oracle. A hit
//! never reaches the backend. Failed calls are not cached.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use serde::Deserialize;

use super::traits::EntailmentOracle;
use crate::Result;
use crate::telemetry;

/// Configuration for the score cache.
///
/// ```rust
/// # use mt799_intent::oracle::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .max_entries(10_000)
///     .ttl(Duration::from_secs(3600));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of cached scores. Default: 10,000.
    pub max_entries: u64,
    /// Time-to-live for cached scores. Default: 1 hour.
    #[serde(with = "secs", rename = "ttl_secs")]
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            ttl: Duration::from_secs(3600),
        }
    }
}

impl CacheConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of cached scores.
    pub fn max_entries(mut self, n: u64) -> Self {
        self.max_entries = n;
        self
    }

    /// Set the time-to-live for cached scores.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

mod secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}

/// Decorator that memoizes oracle scores in a moka LRU + TTL cache.
pub struct CachingOracle {
    inner: Arc<dyn EntailmentOracle>,
    cache: Cache<u64, f32>,
}

impl CachingOracle {
    /// Wrap an oracle with a score cache.
    pub fn new(inner: Arc<dyn EntailmentOracle>, config: &CacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_entries)
            .time_to_live(config.ttl)
            .build();
        Self { inner, cache }
    }

    /// Number of cached scores (approximate; pending maintenance may lag).
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

#[async_trait]
impl EntailmentOracle for CachingOracle {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn supports_concurrency(&self) -> bool {
        self.inner.supports_concurrency()
    }

    async fn score(&self, premise: &str, hypothesis: &str) -> Result<f32> {
        let key = cache_key(self.inner.name(), premise, hypothesis);
        if let Some(score) = self.cache.get(&key).await {
            metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
            return Ok(score);
        }
        metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);

        let score = self.inner.score(premise, hypothesis).await?;
        self.cache.insert(key, score).await;
        Ok(score)
    }
}

/// Compute a cache key from oracle name, premise and hypothesis.
///
/// `DefaultHasher` is deterministic within a process lifetime, which is
/// all an in-memory cache needs.
fn cache_key(oracle: &str, premise: &str, hypothesis: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    oracle.hash(&mut hasher);
    premise.hash(&mut hasher);
    hypothesis.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_key_deterministic() {
        let k1 = cache_key("nli", "premise", "hypothesis");
        let k2 = cache_key("nli", "premise", "hypothesis");
        assert_eq!(k1, k2);
    }

    #[test]
    fn cache_key_differs_on_oracle() {
        assert_ne!(cache_key("a", "p", "h"), cache_key("b", "p", "h"));
    }

    #[test]
    fn cache_key_order_matters() {
        let k1 = cache_key("nli", "premise", "hypothesis");
        let k2 = cache_key("nli", "hypothesis", "premise");
        assert_ne!(k1, k2);
    }

    #[test]
    fn config_parses_ttl_secs() {
        let config: CacheConfig = toml::from_str("ttl_secs = 60").unwrap();
        assert_eq!(config.ttl, Duration::from_secs(60));
        assert_eq!(config.max_entries, 10_000);
    }
}
