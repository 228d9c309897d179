//! mt799-intent - Zero-shot intent classification for SWIFT MT799 messages
//!
//! MT799 is the free-format interbank message. This crate turns one into a
//! [`StructuredMessage`]: the main operation requested, whether actions are
//! conditional, which time constraints apply, and a sub-task per sentence.
//!
//! Classification is zero-shot: every label is phrased as a natural-language
//! hypothesis and scored by an [`EntailmentOracle`] (typically an NLI model),
//! so no task-specific training is needed.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use mt799_intent::{MessageAnalyzer, oracle::EntailmentOracle};
//!
//! # async fn run(oracle: Arc<dyn EntailmentOracle>) -> mt799_intent::Result<()> {
//! let analyzer = MessageAnalyzer::builder()
//!     .oracle(oracle)
//!     .build()?;
//!
//! let message = analyzer
//!     .analyze(":20:REF123\n:77E:Please extend the guarantee or pay.", true)
//!     .await?;
//!
//! println!("{}", message.main_task);
//! # Ok(())
//! # }
//! ```
//!
//! # Local inference (requires `local-inference` feature)
//!
//! ```rust,ignore
//! use mt799_intent::{MessageAnalyzer, oracle::LocalNliModel};
//!
//! let analyzer = MessageAnalyzer::builder()
//!     .local_nli(LocalNliModel::MDebertaV3BaseXnli)
//!     .build()?;
//! ```

pub mod analyzer;
pub mod builder;
pub mod classifier;
pub mod config;
pub mod error;
pub mod labels;
pub mod narrative;
pub mod oracle;
pub mod segment;
pub mod telemetry;
pub mod types;
pub mod version;

// Re-export main types at crate root
pub use analyzer::MessageAnalyzer;
pub use builder::AnalyzerBuilder;
pub use classifier::{ZeroShotClassifier, normalize_scores};
pub use config::AnalyzerConfig;
pub use error::{AnalyzerError, Result};
pub use labels::{LabelCatalog, LabelLanguage};
pub use narrative::extract_narrative;
pub use oracle::{EntailmentOracle, NliProvider};
pub use segment::segment;
pub use version::{PKG_VERSION, build_commit, version_string};

// Re-export all types
pub use types::{
    LabelHypothesis, LabelSet, NliLabel, NliResult, ScoredLabel, StructuredMessage, SubTask,
    Thresholds, TimeConstraint,
};
