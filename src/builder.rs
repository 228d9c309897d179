//! Builder for configuring analyzer instances

use std::sync::Arc;
use std::time::Duration;

#[cfg(feature = "local-inference")]
use std::path::PathBuf;

use tracing::{info, warn};

use crate::analyzer::MessageAnalyzer;
use crate::classifier::{DEFAULT_MAX_CONCURRENCY, ZeroShotClassifier};
use crate::config::AnalyzerConfig;
use crate::labels::{LabelCatalog, LabelLanguage};
use crate::oracle::{
    CacheConfig, CachingOracle, EntailmentOracle, NliOracle, NliProvider, RetryConfig,
    RetryingOracle,
};
#[cfg(feature = "local-inference")]
use crate::oracle::{Device, LocalNliModel, LocalNliProvider};
use crate::types::Thresholds;
use crate::{AnalyzerError, Result};

/// Builder for configuring [`MessageAnalyzer`] instances.
///
/// An oracle is required: either an explicit one via [`oracle`](Self::oracle)
/// or [`nli_provider`](Self::nli_provider), or (feature `local-inference`) a
/// local ONNX model via `local_nli`. An explicit oracle wins over a local
/// model.
pub struct AnalyzerBuilder {
    oracle: Option<Arc<dyn EntailmentOracle>>,
    catalog: LabelCatalog,
    thresholds: Thresholds,
    max_concurrency: usize,
    extract_narrative_only: bool,
    timeout: Option<Duration>,
    retry: Option<RetryConfig>,
    score_cache: Option<CacheConfig>,
    #[cfg(feature = "local-inference")]
    local_nli_model: Option<LocalNliModel>,
    #[cfg(feature = "local-inference")]
    device: Device,
    #[cfg(feature = "local-inference")]
    cache_dir: Option<PathBuf>,
}

impl Default for AnalyzerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalyzerBuilder {
    pub fn new() -> Self {
        Self {
            oracle: None,
            catalog: LabelCatalog::default(),
            thresholds: Thresholds::default(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            extract_narrative_only: false,
            timeout: None,
            retry: None,
            score_cache: None,
            #[cfg(feature = "local-inference")]
            local_nli_model: None,
            #[cfg(feature = "local-inference")]
            device: Device::default(),
            #[cfg(feature = "local-inference")]
            cache_dir: None,
        }
    }

    /// Start from a loaded configuration file.
    ///
    /// Builder calls made afterwards override the file's values. The
    /// oracle itself still has to be supplied unless the `[local]` section
    /// is present and the `local-inference` feature is enabled.
    pub fn from_config(config: &AnalyzerConfig) -> Result<Self> {
        config.validate()?;
        let analysis = &config.analysis;
        let mut builder = Self::new()
            .language(analysis.language)
            .thresholds(config.thresholds)
            .max_concurrency(analysis.max_concurrency)
            .extract_narrative_only(analysis.extract_narrative_only);
        builder.timeout = analysis.timeout_secs.map(Duration::from_secs);
        builder.retry = config.retry.clone();
        builder.score_cache = config.cache.clone();

        if let Some(local) = &config.local {
            #[cfg(feature = "local-inference")]
            {
                builder = builder
                    .local_nli(LocalNliModel::from_name(&local.model)?)
                    .device(Device::from_config(&local.device)?);
                if let Some(dir) = &local.models_dir {
                    builder = builder.cache_dir(dir.clone());
                }
            }
            #[cfg(not(feature = "local-inference"))]
            warn!(
                model = %local.model,
                "[local] section ignored: built without the local-inference feature"
            );
        }
        Ok(builder)
    }

    /// Use an entailment oracle directly.
    pub fn oracle(mut self, oracle: Arc<dyn EntailmentOracle>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    /// Use a three-way NLI provider, keeping its entailment probability.
    pub fn nli_provider(self, provider: Arc<dyn NliProvider>) -> Self {
        self.oracle(Arc::new(NliOracle::new(provider)))
    }

    /// Replace the label catalog.
    pub fn labels(mut self, catalog: LabelCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Use the built-in catalog for a hypothesis language (default: English).
    pub fn language(self, language: LabelLanguage) -> Self {
        self.labels(LabelCatalog::for_language(language))
    }

    /// Set significance thresholds.
    pub fn thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Bound in-flight oracle calls (default: 4). Ignored for oracles that
    /// do not support concurrency.
    pub fn max_concurrency(mut self, n: usize) -> Self {
        self.max_concurrency = n;
        self
    }

    /// Default for [`MessageAnalyzer::analyze_default`] (default: false).
    pub fn extract_narrative_only(mut self, enabled: bool) -> Self {
        self.extract_narrative_only = enabled;
        self
    }

    /// Abort an analysis that runs longer than `timeout`.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Retry transient oracle failures.
    pub fn retry(mut self, config: RetryConfig) -> Self {
        self.retry = Some(config);
        self
    }

    /// Cache oracle scores by `(premise, hypothesis)`.
    pub fn score_cache(mut self, config: CacheConfig) -> Self {
        self.score_cache = Some(config);
        self
    }

    /// Use a local ONNX NLI model as the oracle.
    #[cfg(feature = "local-inference")]
    pub fn local_nli(mut self, model: LocalNliModel) -> Self {
        self.local_nli_model = Some(model);
        self
    }

    /// Set the device for local inference (default: CPU).
    #[cfg(feature = "local-inference")]
    pub fn device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    /// Set the cache directory for model downloads.
    #[cfg(feature = "local-inference")]
    pub fn cache_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(path.into());
        self
    }

    /// Build the analyzer.
    ///
    /// Decorators wrap the oracle in a fixed order: retry innermost, then
    /// the score cache, so a cache hit never enters the retry loop.
    pub fn build(self) -> Result<MessageAnalyzer> {
        self.thresholds.validate()?;

        let mut oracle = self.resolve_oracle()?;

        if let Some(retry) = self.retry.filter(RetryConfig::is_enabled) {
            oracle = Arc::new(RetryingOracle::new(oracle, retry));
        }
        if let Some(cache) = &self.score_cache {
            oracle = Arc::new(CachingOracle::new(oracle, cache));
        }

        let classifier = ZeroShotClassifier::new(oracle, self.max_concurrency)?;
        info!(
            oracle = classifier.oracle_name(),
            concurrency = classifier.concurrency(),
            "analyzer ready"
        );

        Ok(MessageAnalyzer::new(
            classifier,
            self.catalog,
            self.thresholds,
            self.extract_narrative_only,
            self.timeout,
        ))
    }

    fn resolve_oracle(&self) -> Result<Arc<dyn EntailmentOracle>> {
        if let Some(oracle) = &self.oracle {
            #[cfg(feature = "local-inference")]
            if self.local_nli_model.is_some() {
                warn!(oracle = oracle.name(), "explicit oracle overrides local NLI model");
            }
            return Ok(oracle.clone());
        }

        #[cfg(feature = "local-inference")]
        if let Some(model) = &self.local_nli_model {
            let provider = LocalNliProvider::new(
                model.clone(),
                self.device,
                self.cache_dir.as_deref(),
            )?;
            return Ok(Arc::new(NliOracle::new(Arc::new(provider))));
        }

        Err(AnalyzerError::Configuration(
            "no entailment oracle configured".to_string(),
        ))
    }
}
