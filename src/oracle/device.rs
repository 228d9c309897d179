//! Device configuration for local inference.

#[cfg(not(feature = "cuda"))]
use tracing::warn;

use crate::error::{AnalyzerError, Result};

/// Compute device for local inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Device {
    /// CPU execution (default).
    #[default]
    Cpu,

    /// CUDA GPU execution.
    #[cfg(feature = "cuda")]
    Cuda {
        /// GPU device ID (0-indexed).
        device_id: u32,
    },
}

impl Device {
    /// Create CPU device.
    pub fn cpu() -> Self {
        Self::Cpu
    }

    /// Create CUDA device with the given device ID.
    #[cfg(feature = "cuda")]
    pub fn cuda(device_id: u32) -> Self {
        Self::Cuda { device_id }
    }

    /// Parse a config value (`"cpu"`, `"cuda"`, `"cuda:1"`).
    ///
    /// CUDA values fall back to CPU with a warning when the `cuda` feature
    /// is off. Anything else is a configuration error.
    pub fn from_config(value: &str) -> Result<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("cpu") {
            return Ok(Self::Cpu);
        }
        let Some(rest) = value.strip_prefix("cuda") else {
            return Err(AnalyzerError::Configuration(format!(
                "unknown device '{value}' (expected cpu, cuda or cuda:N)"
            )));
        };
        let device_id = match rest {
            "" => 0,
            _ => rest
                .strip_prefix(':')
                .and_then(|id| id.parse::<u32>().ok())
                .ok_or_else(|| {
                    AnalyzerError::Configuration(format!("invalid CUDA device '{value}'"))
                })?,
        };

        #[cfg(feature = "cuda")]
        {
            Ok(Self::Cuda { device_id })
        }
        #[cfg(not(feature = "cuda"))]
        {
            warn!(
                device_id,
                "CUDA requested but built without the cuda feature, using CPU"
            );
            Ok(Self::Cpu)
        }
    }

    /// Get the device name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cpu => "CPU",
            #[cfg(feature = "cuda")]
            Self::Cuda { .. } => "CUDA",
        }
    }
}
