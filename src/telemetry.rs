//! Telemetry metric name constants.
//!
//! Centralised metric names for analyzer operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `mt799_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `oracle`: oracle name (e.g. "onnx-nli")
//! - `label_set`: classification axis (e.g. "main_operation")
//! - `status`: outcome: "ok" or "error"

/// Total entailment oracle calls issued by the classifier.
///
/// Labels: `oracle`, `status` ("ok" | "error").
pub const ORACLE_CALLS_TOTAL: &str = "mt799_oracle_calls_total";

/// Oracle call duration in seconds, including time queued for a permit.
///
/// Labels: `oracle`.
pub const ORACLE_CALL_DURATION_SECONDS: &str = "mt799_oracle_call_duration_seconds";

/// Total classification passes.
///
/// Labels: `label_set`, `status`.
pub const CLASSIFICATIONS_TOTAL: &str = "mt799_classifications_total";

/// Total `analyze` calls.
///
/// Labels: `status` ("ok" | "error" | "timeout").
pub const ANALYSES_TOTAL: &str = "mt799_analyses_total";

/// End-to-end `analyze` duration in seconds.
pub const ANALYSIS_DURATION_SECONDS: &str = "mt799_analysis_duration_seconds";

/// Sentences whose sub-task scores never cleared the threshold.
pub const SENTENCES_DROPPED_TOTAL: &str = "mt799_sentences_dropped_total";

/// Total retry attempts (not counting the initial call).
///
/// Labels: `oracle`.
pub const RETRIES_TOTAL: &str = "mt799_oracle_retries_total";

/// Total score cache hits.
pub const CACHE_HITS_TOTAL: &str = "mt799_score_cache_hits_total";

/// Total score cache misses.
pub const CACHE_MISSES_TOTAL: &str = "mt799_score_cache_misses_total";
