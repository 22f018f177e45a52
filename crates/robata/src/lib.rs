//! # Robata
//!
//! An offline **batch**-inference driver for continuous-batching LLM
//! engines.
//!
//! ## Overview
//!
//! This library is the synchronous front end of a batched text-generation
//! system: hand it a batch of prompts (or pre-tokenized inputs) and
//! sampling parameters, and it submits every input as an independent
//! request to an underlying engine, advances that engine step by step
//! until nothing is left unfinished, and returns one finished result per
//! request.
//!
//! The engine itself - scheduling, attention-cache management, model
//! execution - is an external collaborator consumed through the
//! [`Engine`](engine::Engine) trait. The driver's job is the protocol
//! around it:
//!
//! - Unique, strictly increasing request-ID assignment
//! - Input normalization and all-or-nothing validation
//! - The run-to-completion poll loop
//! - Progress accounting through an injected observer
//!
//! ## Architecture
//!
//! ### Ordering
//!
//! Requests are submitted strictly in input order, but the engine batches
//! and schedules internally, so requests may finish in any order. The
//! returned list reflects **completion order** - this is a documented
//! property, not a defect. Results remain request-addressable through
//! their IDs.
//!
//! ### Shared engine state
//!
//! The engine handle is owned explicitly by the driver and persists across
//! calls. A call never assumes isolation: requests left unfinished by an
//! earlier call are drained, counted in progress totals, and returned
//! alongside the new batch.
//!
//! ### Error surface
//!
//! Bad input fails with [`InferenceError::InvalidArgument`] before
//! anything reaches the engine. Engine failures pass through unmodified
//! as [`InferenceError::Engine`]; the driver performs no retry and
//! returns no partial results.
//!
//! # Example
//!
//! ```
//! use robata::{OfflineInference, SamplingParams};
//! use robata::engine::mock::MockEngine;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> robata::Result<()> {
//! let mut llm = OfflineInference::new(MockEngine::new());
//!
//! let sampling = SamplingParams {
//!     max_tokens: 32,
//!     ..SamplingParams::default()
//! };
//! let outputs = llm
//!     .generate(Some(vec!["hello", "world"].into()), Some(sampling), None, true)
//!     .await?;
//!
//! for output in &outputs {
//!     println!("{} -> {}", output.request_id, output.text);
//! }
//! # assert_eq!(outputs.len(), 2);
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod offline;
mod request;
mod sampling;

pub mod engine;
pub mod progress;
pub mod tokenizer;

pub use config::{Dtype, EngineOptions};
pub use error::{EngineError, EngineResult, InferenceError, Result};
pub use offline::OfflineInference;
pub use request::{PromptInput, RequestCounter, RequestOutput};
pub use sampling::SamplingParams;
