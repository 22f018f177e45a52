//! # Engine Options
//!
//! Configuration consumed by engine constructors.
//!
//! Every recognized option is an explicit field with a documented default,
//! validated up front by [`EngineOptions::validate`]. Building an engine from
//! validated options (model loading, parallelism topology, dtype resolution)
//! is the engine implementation's concern, not this crate's.

use std::fmt;
use std::str::FromStr;

use crate::error::{InferenceError, Result};

/// Numeric precision mode for model weights and activations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dtype {
    /// Defer to the precision recorded in the model's own configuration.
    #[default]
    Auto,
    /// IEEE 754 half precision.
    Float16,
    /// Brain floating point.
    BFloat16,
    /// IEEE 754 single precision.
    Float32,
}

impl FromStr for Dtype {
    type Err = InferenceError;

    /// Parses the conventional dtype spellings, case-insensitively.
    ///
    /// Accepts `auto`, `float16`/`half`, `bfloat16`, and `float32`/`float`.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Dtype::Auto),
            "float16" | "half" => Ok(Dtype::Float16),
            "bfloat16" => Ok(Dtype::BFloat16),
            "float32" | "float" => Ok(Dtype::Float32),
            other => Err(InferenceError::InvalidConfig(format!(
                "unknown dtype: {other}"
            ))),
        }
    }
}

impl fmt::Display for Dtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dtype::Auto => "auto",
            Dtype::Float16 => "float16",
            Dtype::BFloat16 => "bfloat16",
            Dtype::Float32 => "float32",
        };
        write!(f, "{name}")
    }
}

/// Options for constructing an inference engine.
///
/// The driver itself never builds an engine; it takes a ready handle. These
/// options exist so engine implementations share one enumerated, validated
/// configuration surface instead of an open-ended bag of key-value pairs.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Name or path of the model to load.
    pub model: String,
    /// Number of devices for tensor-parallel execution.
    pub tensor_parallel_size: usize,
    /// Precision for weights and activations.
    pub dtype: Dtype,
    /// Seed for the sampling RNG.
    pub seed: u64,
    /// Upper bound on sequences resident in one engine batch.
    pub max_num_seqs: usize,
    /// Fraction of device memory the engine may claim for weights and cache.
    pub gpu_memory_utilization: f32,
    /// Token count per attention-cache block.
    pub block_size: usize,
    /// Suppress the engine's periodic throughput statistics.
    ///
    /// Defaults to `true`: offline batch runs poll the engine in a tight
    /// loop, where stat logging is noise unless explicitly requested.
    pub disable_log_stats: bool,
}

impl EngineOptions {
    /// Creates options for `model` with the documented defaults.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            tensor_parallel_size: 1,
            dtype: Dtype::Auto,
            seed: 0,
            max_num_seqs: 256,
            gpu_memory_utilization: 0.90,
            block_size: 16,
            disable_log_stats: true,
        }
    }

    /// Checks every field against its documented range.
    ///
    /// # Errors
    ///
    /// Returns [`InferenceError::InvalidConfig`] naming the offending field.
    /// Engines are expected to call this before committing any resources.
    pub fn validate(&self) -> Result<()> {
        if self.model.is_empty() {
            return Err(InferenceError::InvalidConfig(
                "model must not be empty".into(),
            ));
        }
        if self.tensor_parallel_size == 0 {
            return Err(InferenceError::InvalidConfig(
                "tensor_parallel_size must be at least 1".into(),
            ));
        }
        if self.max_num_seqs == 0 {
            return Err(InferenceError::InvalidConfig(
                "max_num_seqs must be at least 1".into(),
            ));
        }
        if !(self.gpu_memory_utilization > 0.0 && self.gpu_memory_utilization <= 1.0) {
            return Err(InferenceError::InvalidConfig(format!(
                "gpu_memory_utilization must be in (0, 1], got {}",
                self.gpu_memory_utilization
            )));
        }
        if !matches!(self.block_size, 8 | 16 | 32) {
            return Err(InferenceError::InvalidConfig(format!(
                "block_size must be 8, 16, or 32, got {}",
                self.block_size
            )));
        }
        Ok(())
    }
}
