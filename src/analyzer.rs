//! Message analysis: four classification passes folded into one
//! [`StructuredMessage`].
//!
//! ```text
//! raw message ──► extract_narrative (optional) ──► text
//!                                                   │
//!        ┌──────────────────┬───────────────────────┼──────────────────────┐
//!        ▼                  ▼                       ▼                      ▼
//!  main operation       conditions          time constraints     segment ──► sub-task
//!   (top label)      (score > 0.3 → any?)    (score > 0.3)       per sentence (> 0.4)
//!        └──────────────────┴───────────────────────┴──────────────────────┘
//!                                           │
//!                                           ▼
//!                                   StructuredMessage
//! ```
//!
//! The passes are independent and run concurrently; the classifier's
//! permits bound what actually reaches the oracle. The analyzer keeps no
//! state between messages.

use std::borrow::Cow;
use std::time::{Duration, Instant};

use futures_util::future::{try_join_all, try_join4};
use tracing::{debug, instrument};

use crate::builder::AnalyzerBuilder;
use crate::classifier::ZeroShotClassifier;
use crate::labels::LabelCatalog;
use crate::narrative::extract_narrative;
use crate::segment::segment;
use crate::telemetry;
use crate::types::{ScoredLabel, StructuredMessage, SubTask, Thresholds, TimeConstraint};
use crate::{AnalyzerError, Result};

/// Classifies MT799 messages into [`StructuredMessage`]s.
///
/// Build one with [`MessageAnalyzer::builder()`] and share it; `analyze`
/// takes `&self`.
pub struct MessageAnalyzer {
    classifier: ZeroShotClassifier,
    catalog: LabelCatalog,
    thresholds: Thresholds,
    extract_narrative_only: bool,
    timeout: Option<Duration>,
}

impl MessageAnalyzer {
    /// Create a new builder for configuring the analyzer.
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    pub(crate) fn new(
        classifier: ZeroShotClassifier,
        catalog: LabelCatalog,
        thresholds: Thresholds,
        extract_narrative_only: bool,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            classifier,
            catalog,
            thresholds,
            extract_narrative_only,
            timeout,
        }
    }

    pub fn classifier(&self) -> &ZeroShotClassifier {
        &self.classifier
    }

    pub fn catalog(&self) -> &LabelCatalog {
        &self.catalog
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Analyze a raw message.
    ///
    /// With `extract_narrative_only`, classification runs on the narrative
    /// isolated by [`extract_narrative`]; otherwise on the raw text. Either
    /// way `original_text` holds the raw input.
    ///
    /// Any oracle failure aborts the call and no message is returned.
    /// Dropping the future cancels every in-flight oracle call.
    pub async fn analyze(
        &self,
        raw_message: &str,
        extract_narrative_only: bool,
    ) -> Result<StructuredMessage> {
        let start = Instant::now();
        let outcome = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.run(raw_message, extract_narrative_only))
                .await
                .unwrap_or(Err(AnalyzerError::Timeout(limit))),
            None => self.run(raw_message, extract_narrative_only).await,
        };

        let status = match &outcome {
            Ok(_) => "ok",
            Err(AnalyzerError::Timeout(_)) => "timeout",
            Err(_) => "error",
        };
        metrics::counter!(telemetry::ANALYSES_TOTAL, "status" => status).increment(1);
        metrics::histogram!(telemetry::ANALYSIS_DURATION_SECONDS)
            .record(start.elapsed().as_secs_f64());

        outcome
    }

    /// Analyze using the configured narrative-extraction default.
    pub async fn analyze_default(&self, raw_message: &str) -> Result<StructuredMessage> {
        self.analyze(raw_message, self.extract_narrative_only).await
    }

    #[instrument(
        skip(self, raw_message),
        fields(oracle = self.classifier.oracle_name(), raw_len = raw_message.len())
    )]
    async fn run(
        &self,
        raw_message: &str,
        extract_narrative_only: bool,
    ) -> Result<StructuredMessage> {
        let text: Cow<'_, str> = if extract_narrative_only {
            Cow::Owned(extract_narrative(raw_message))
        } else {
            Cow::Borrowed(raw_message)
        };
        let sentences = segment(&text);
        debug!(
            text_len = text.len(),
            sentences = sentences.len(),
            "starting classification passes"
        );

        let (main, conditions, times, sub_tasks) = try_join4(
            self.classifier.classify(&text, &self.catalog.main_operation),
            self.classifier.classify(&text, &self.catalog.condition),
            self.classifier.classify(&text, &self.catalog.time_constraint),
            self.sub_tasks(&sentences),
        )
        .await?;

        let main_task = main
            .into_iter()
            .next()
            .map(|top| top.label)
            .ok_or_else(|| {
                AnalyzerError::Configuration("main operation label set is empty".to_string())
            })?;

        let conditions = significant(conditions, self.thresholds.condition);
        let time_constraints = significant(times, self.thresholds.time_constraint)
            .into_iter()
            .map(|s| TimeConstraint {
                constraint_type: s.label,
                confidence: s.score,
            })
            .collect();

        Ok(StructuredMessage {
            original_text: raw_message.to_string(),
            main_task,
            has_conditional_actions: !conditions.is_empty(),
            conditions,
            sub_tasks,
            time_constraints,
        })
    }

    /// Sub-task pass over every sentence.
    async fn sub_tasks(&self, sentences: &[String]) -> Result<Vec<SubTask>> {
        let passes = try_join_all(
            sentences
                .iter()
                .map(|sentence| self.classifier.classify(sentence, &self.catalog.sub_task)),
        )
        .await?;

        let mut sub_tasks = Vec::with_capacity(sentences.len());
        for (sentence, ranked) in sentences.iter().zip(passes) {
            match sub_task_for(sentence, ranked, self.thresholds.sub_task) {
                Some(task) => sub_tasks.push(task),
                None => {
                    debug!(sentence = %sentence, "no sub-task label above threshold, dropping sentence");
                    metrics::counter!(telemetry::SENTENCES_DROPPED_TOTAL).increment(1);
                }
            }
        }
        Ok(sub_tasks)
    }
}

/// Keep labels scoring strictly above `threshold`, preserving rank order.
fn significant(ranked: Vec<ScoredLabel>, threshold: f32) -> Vec<ScoredLabel> {
    ranked.into_iter().filter(|s| s.score > threshold).collect()
}

/// Build a sub-task from a ranked pass, or `None` if nothing is significant.
fn sub_task_for(sentence: &str, ranked: Vec<ScoredLabel>, threshold: f32) -> Option<SubTask> {
    let mut significant = significant(ranked, threshold).into_iter();
    let top = significant.next()?;
    Some(SubTask {
        task_type: top.label,
        text: sentence.to_string(),
        confidence: top.score,
        related_tasks: significant.collect(),
    })
}
