use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use mt799_intent::oracle::{CacheConfig, CachingOracle, EntailmentOracle};
use mt799_intent::{AnalyzerError, MessageAnalyzer, Result};

/// Mock oracle counting calls; fails while `failing` is set.
struct CountingOracle {
    calls: AtomicU32,
    failing: AtomicU32,
}

impl CountingOracle {
    fn new() -> Self {
        Self {
            calls: AtomicU32::new(0),
            failing: AtomicU32::new(0),
        }
    }

    fn failing_for(self, n: u32) -> Self {
        self.failing.store(n, Ordering::SeqCst);
        self
    }

    fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EntailmentOracle for CountingOracle {
    fn name(&self) -> &str {
        "counting"
    }

    async fn score(&self, premise: &str, hypothesis: &str) -> Result<f32> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) > 0 {
            self.failing.fetch_sub(1, Ordering::SeqCst);
            return Err(AnalyzerError::OracleUnavailable("down".into()));
        }
        Ok(((premise.len() + hypothesis.len()) % 10) as f32 / 10.0)
    }
}

#[tokio::test]
async fn repeated_pair_hits_cache() {
    let inner = Arc::new(CountingOracle::new());
    let oracle = CachingOracle::new(inner.clone(), &CacheConfig::new());

    let first = oracle.score("Please advise", "This part requests an extension").await.unwrap();
    let second = oracle.score("Please advise", "This part requests an extension").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(inner.call_count(), 1);
}

#[tokio::test]
async fn different_pairs_miss_cache() {
    let inner = Arc::new(CountingOracle::new());
    let oracle = CachingOracle::new(inner.clone(), &CacheConfig::new());

    oracle.score("a", "h1").await.unwrap();
    oracle.score("a", "h2").await.unwrap();
    oracle.score("b", "h1").await.unwrap();
    assert_eq!(inner.call_count(), 3);
}

#[tokio::test]
async fn failures_are_not_cached() {
    let inner = Arc::new(CountingOracle::new().failing_for(1));
    let oracle = CachingOracle::new(inner.clone(), &CacheConfig::new());

    assert!(oracle.score("p", "h").await.is_err());
    assert!(oracle.score("p", "h").await.is_ok());
    assert!(oracle.score("p", "h").await.is_ok());
    assert_eq!(inner.call_count(), 2);
}

#[tokio::test]
async fn analyzer_reuses_scores_across_messages() {
    let inner = Arc::new(CountingOracle::new());
    let analyzer = MessageAnalyzer::builder()
        .oracle(inner.clone())
        .score_cache(CacheConfig::new().max_entries(1_000))
        .build()
        .unwrap();

    let first = analyzer.analyze("Please advise.", false).await.unwrap();
    let calls = inner.call_count();
    assert_eq!(calls, 5 + 4 + 4 + 5);

    let second = analyzer.analyze("Please advise.", false).await.unwrap();
    assert_eq!(inner.call_count(), calls);
    assert_eq!(first, second);
}
