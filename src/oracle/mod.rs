//! Entailment oracles and their decorators.
//!
//! The classifier is written against [`EntailmentOracle`] alone. Everything
//! else in this module is optional plumbing around it:
//!
//! - [`NliOracle`] adapts any three-way [`NliProvider`]
//! - [`RetryingOracle`] retries transient backend failures
//! - [`CachingOracle`] memoizes deterministic scores
//! - `LocalNliProvider` (feature `local-inference`) runs an ONNX model
//!
//! Decorators compose by wrapping:
//!
//! ```rust,ignore
//! let oracle: Arc<dyn EntailmentOracle> = Arc::new(NliOracle::new(provider));
//! let oracle = Arc::new(RetryingOracle::new(oracle, RetryConfig::new()));
//! let oracle = Arc::new(CachingOracle::new(oracle, &CacheConfig::new()));
//! ```

pub mod cache;
pub mod device;
#[cfg(feature = "local-inference")]
pub mod onnx_nli;
pub mod retry;
pub mod traits;

pub use cache::{CacheConfig, CachingOracle};
pub use device::Device;
#[cfg(feature = "local-inference")]
pub use onnx_nli::{LocalNliModel, LocalNliProvider, NliModelInfo, OnnxNliProvider};
pub use retry::{RetryConfig, RetryingOracle};
pub use traits::{EntailmentOracle, NliOracle, NliProvider};
