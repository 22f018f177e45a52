//! # Sampling Parameters
//!
//! The parameter bundle controlling how output tokens are chosen during
//! generation. One bundle applies uniformly to every request in a batch
//! submitted through [`generate`](crate::OfflineInference::generate); there
//! are no per-request overrides at that entry point.

use crate::error::{InferenceError, Result};

/// Generation controls for a single request.
///
/// The defaults describe plain sampling with a short completion cap:
/// full-temperature sampling over the whole distribution, sixteen generated
/// tokens at most, and no stop sequences.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingParams {
    /// Randomness of token selection. `0.0` selects greedily.
    pub temperature: f32,
    /// Nucleus sampling cutoff, the cumulative probability mass to keep.
    pub top_p: f32,
    /// Restrict sampling to the `k` most likely tokens. `None` disables.
    pub top_k: Option<usize>,
    /// Maximum number of tokens to generate for the request.
    pub max_tokens: usize,
    /// Strings that terminate generation when produced.
    pub stop: Vec<String>,
    /// Penalty on tokens already present in the output, by presence.
    pub presence_penalty: f32,
    /// Penalty on tokens already present in the output, by count.
    pub frequency_penalty: f32,
    /// Keep generating past the end-of-sequence token.
    pub ignore_eos: bool,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 1.0,
            top_p: 1.0,
            top_k: None,
            max_tokens: 16,
            stop: Vec::new(),
            presence_penalty: 0.0,
            frequency_penalty: 0.0,
            ignore_eos: false,
        }
    }
}

impl SamplingParams {
    /// Checks every field against its documented range.
    ///
    /// # Errors
    ///
    /// Returns [`InferenceError::InvalidArgument`] naming the offending
    /// field. Validation runs once per batch, before any request is
    /// submitted.
    pub fn validate(&self) -> Result<()> {
        if self.temperature < 0.0 {
            return Err(InferenceError::InvalidArgument(format!(
                "temperature must be non-negative, got {}",
                self.temperature
            )));
        }
        if !(self.top_p > 0.0 && self.top_p <= 1.0) {
            return Err(InferenceError::InvalidArgument(format!(
                "top_p must be in (0, 1], got {}",
                self.top_p
            )));
        }
        if self.top_k == Some(0) {
            return Err(InferenceError::InvalidArgument(
                "top_k must be at least 1 when set".into(),
            ));
        }
        if self.max_tokens == 0 {
            return Err(InferenceError::InvalidArgument(
                "max_tokens must be at least 1".into(),
            ));
        }
        for (name, value) in [
            ("presence_penalty", self.presence_penalty),
            ("frequency_penalty", self.frequency_penalty),
        ] {
            if !(-2.0..=2.0).contains(&value) {
                return Err(InferenceError::InvalidArgument(format!(
                    "{name} must be in [-2, 2], got {value}"
                )));
            }
        }
        Ok(())
    }
}
