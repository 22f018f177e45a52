//! # Offline Batched Generation
//!
//! The run-to-completion front end over a continuous-batching engine.
//!
//! ## Overview
//!
//! [`OfflineInference`] takes a batch of prompts (or pre-tokenized inputs),
//! submits each as an independent engine request under a fresh monotonic ID,
//! then polls the engine step by step until it reports nothing unfinished.
//! The engine decides all scheduling; the driver only guarantees that every
//! request is submitted in input order and accounted for exactly once in the
//! returned list, which is ordered by completion time.
//!
//! This surface is meant for offline batch work. It blocks until the whole
//! batch (plus anything the engine still held from earlier calls) is done -
//! there is no cancellation, timeout, or partial-result path.
//!
//! # Example
//!
//! ```
//! use robata::OfflineInference;
//! use robata::engine::mock::MockEngine;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> robata::Result<()> {
//! let mut llm = OfflineInference::new(MockEngine::new());
//!
//! let outputs = llm
//!     .generate(Some(vec!["first prompt", "second prompt"].into()), None, None, false)
//!     .await?;
//!
//! assert_eq!(outputs.len(), 2);
//! assert!(outputs.iter().all(|output| output.finished));
//! # Ok(())
//! # }
//! ```

mod inference;

pub use inference::OfflineInference;
