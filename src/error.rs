//! Analyzer error types

use std::time::Duration;

/// Analyzer error types
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    // Oracle errors
    /// The entailment backend could not be reached (session busy, remote
    /// endpoint down). Safe to retry.
    #[error("entailment oracle unavailable: {0}")]
    OracleUnavailable(String),

    /// The oracle failed to produce a score: malformed input, invalid model
    /// artifact, or an out-of-range probability.
    #[error("inference error: {0}")]
    Inference(String),

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    // Cancellation
    #[error("analysis timed out after {0:?}")]
    Timeout(Duration),
}

impl AnalyzerError {
    /// Whether this error came from the entailment oracle.
    ///
    /// Any oracle failure aborts the whole analysis; no partial
    /// [`StructuredMessage`](crate::StructuredMessage) is produced.
    pub fn is_oracle_failure(&self) -> bool {
        matches!(
            self,
            AnalyzerError::OracleUnavailable(_) | AnalyzerError::Inference(_)
        )
    }

    /// Whether a retry of the same oracle call could succeed.
    ///
    /// Only consulted by [`RetryingOracle`](crate::oracle::RetryingOracle);
    /// the analysis pipeline itself never retries.
    pub fn is_transient(&self) -> bool {
        matches!(self, AnalyzerError::OracleUnavailable(_))
    }
}

/// Result type alias for analyzer operations
pub type Result<T> = std::result::Result<T, AnalyzerError>;
