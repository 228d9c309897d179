//! Configuration loading.
//!
//! Configuration is loaded from TOML with the following resolution order:
//! 1. explicit path (e.g. `--config <path>`), which must exist
//! 2. `~/.mt799/config.toml` (user)
//! 3. `/etc/mt799/config.toml` (system)
//!
//! When no file is found the built-in defaults apply. Every section and
//! key is optional:
//!
//! ```toml
//! [analysis]
//! extract_narrative_only = true
//! max_concurrency = 4
//! timeout_secs = 30
//! language = "en"
//!
//! [thresholds]
//! condition = 0.3
//! time_constraint = 0.3
//! sub_task = 0.4
//!
//! [retry]
//! max_attempts = 3
//! initial_delay_ms = 500
//! max_delay_ms = 30000
//!
//! [cache]
//! max_entries = 10000
//! ttl_secs = 3600
//!
//! [local]
//! model = "mdeberta-v3-base-xnli"
//! device = "cpu"
//! models_dir = "/var/cache/mt799/models"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::classifier::DEFAULT_MAX_CONCURRENCY;
use crate::labels::LabelLanguage;
use crate::oracle::{CacheConfig, RetryConfig};
use crate::types::Thresholds;
use crate::{AnalyzerError, Result};

/// Analyzer configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzerConfig {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub thresholds: Thresholds,
    /// Retry transient oracle failures. Absent means no retry.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
    /// Score cache. Absent means no cache.
    #[serde(default)]
    pub cache: Option<CacheConfig>,
    /// Local ONNX oracle (feature `local-inference`).
    #[serde(default)]
    pub local: Option<LocalConfig>,
}

/// Analysis behaviour.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    /// Classify the extracted narrative instead of the whole message
    /// (default: false).
    #[serde(default)]
    pub extract_narrative_only: bool,
    /// Maximum in-flight oracle calls (default: 4).
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    /// Abort an analysis after this many seconds (default: no limit).
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Hypothesis language (default: "en").
    #[serde(default)]
    pub language: LabelLanguage,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            extract_narrative_only: false,
            max_concurrency: default_max_concurrency(),
            timeout_secs: None,
            language: LabelLanguage::default(),
        }
    }
}

fn default_max_concurrency() -> usize {
    DEFAULT_MAX_CONCURRENCY
}

/// Local inference configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LocalConfig {
    /// Model name (default: "mdeberta-v3-base-xnli").
    #[serde(default = "default_model")]
    pub model: String,
    /// Device to use: "cpu", "cuda" or "cuda:N" (default: "cpu").
    #[serde(default = "default_device")]
    pub device: String,
    /// Directory for model downloads.
    #[serde(default)]
    pub models_dir: Option<PathBuf>,
}

fn default_model() -> String {
    "mdeberta-v3-base-xnli".to_string()
}

fn default_device() -> String {
    "cpu".to_string()
}

impl AnalyzerConfig {
    /// Load configuration from the standard locations.
    ///
    /// Resolution order:
    /// 1. Explicit path (if provided)
    /// 2. `~/.mt799/config.toml`
    /// 3. `/etc/mt799/config.toml`
    /// 4. Built-in defaults
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::from_file(&path),
            None => {
                debug!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load and validate a specific file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            AnalyzerError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| {
            AnalyzerError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })?;
        config.validate()?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        self.thresholds.validate()?;
        if self.analysis.max_concurrency == 0 {
            return Err(AnalyzerError::Configuration(
                "analysis.max_concurrency must be at least 1".to_string(),
            ));
        }
        if self.analysis.timeout_secs == Some(0) {
            return Err(AnalyzerError::Configuration(
                "analysis.timeout_secs must be positive".to_string(),
            ));
        }
        if self.retry.as_ref().is_some_and(|r| r.max_attempts == 0) {
            return Err(AnalyzerError::Configuration(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.cache.as_ref().is_some_and(|c| c.max_entries == 0) {
            return Err(AnalyzerError::Configuration(
                "cache.max_entries must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(AnalyzerError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".mt799").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/mt799/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: AnalyzerConfig = toml::from_str("").unwrap();
        assert!(!config.analysis.extract_narrative_only);
        assert_eq!(config.analysis.max_concurrency, DEFAULT_MAX_CONCURRENCY);
        assert_eq!(config.analysis.timeout_secs, None);
        assert_eq!(config.analysis.language, LabelLanguage::En);
        assert_eq!(config.thresholds, Thresholds::default());
        assert!(config.retry.is_none());
        assert!(config.cache.is_none());
        assert!(config.local.is_none());
    }

    #[test]
    fn local_section_defaults() {
        let config: AnalyzerConfig = toml::from_str("[local]\n").unwrap();
        let local = config.local.unwrap();
        assert_eq!(local.model, "mdeberta-v3-base-xnli");
        assert_eq!(local.device, "cpu");
        assert!(local.models_dir.is_none());
    }

    #[test]
    fn validate_rejects_zero_concurrency() {
        let config: AnalyzerConfig =
            toml::from_str("[analysis]\nmax_concurrency = 0\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(AnalyzerError::Configuration(_))
        ));
    }

    #[test]
    fn validate_rejects_out_of_range_threshold() {
        let config: AnalyzerConfig = toml::from_str("[thresholds]\nsub_task = 1.5\n").unwrap();
        assert!(config.validate().is_err());
    }
}
