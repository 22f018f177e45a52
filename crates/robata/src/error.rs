//! # Error Types
//!
//! This module defines the error surface for the crate.
//!
//! Errors split into two layers:
//!
//! - [`InferenceError`] - the crate-level error returned from driver entry
//!   points. Input validation problems are reported before anything reaches
//!   an engine, so they are always recoverable by fixing the call and
//!   retrying.
//! - [`EngineError`] - an opaque failure produced by an engine
//!   implementation. The driver performs no retry or recovery of its own;
//!   engine failures pass through unmodified, wrapped only in
//!   [`InferenceError::Engine`] with the original error retained as the
//!   source.

use thiserror::Error;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, InferenceError>;

/// Result type returned by [`Engine`](crate::engine::Engine) operations.
pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Errors surfaced by the offline inference driver.
#[derive(Debug, Error)]
pub enum InferenceError {
    /// The caller supplied unusable generation input.
    ///
    /// Raised synchronously before any request is submitted, so the engine
    /// is left untouched. Covers missing input (neither prompts nor token
    /// IDs), mismatched prompt/token-ID batch lengths, and out-of-range
    /// sampling parameters.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Engine construction options failed validation.
    ///
    /// Raised by [`EngineOptions::validate`](crate::EngineOptions::validate)
    /// before any engine is built from the options.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An engine implementation reported a failure.
    ///
    /// The underlying error is engine-defined and passed through without
    /// interpretation. Engine state, and any finished outputs the engine had
    /// not yet returned, are undefined after this.
    #[error("engine failure")]
    Engine(#[from] EngineError),
}

/// Opaque failure reported by an [`Engine`](crate::engine::Engine)
/// implementation.
///
/// Engines own their failure modes; the driver only carries them. A message
/// is always present, and implementations may attach their native error as a
/// source for downstream inspection.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct EngineError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl EngineError {
    /// Creates an engine error from a message alone.
    pub fn msg(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an engine error wrapping an engine-native error.
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// The engine-supplied failure message.
    pub fn message(&self) -> &str {
        &self.message
    }
}
