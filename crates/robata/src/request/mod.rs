//! # Request Plumbing
//!
//! Everything between the caller's raw input and the engine's request queue:
//!
//! - [`RequestCounter`] - issues the unique, strictly increasing request IDs
//!   the driver tags submissions with
//! - [`PromptInput`] and the crate-internal normalization pass - validation
//!   and reshaping of caller input into per-request tuples
//! - [`RequestOutput`] - the finished-result entity handed back to callers

mod counter;
mod normalize;
mod output;

pub use counter::RequestCounter;
pub use normalize::PromptInput;
pub use output::RequestOutput;

pub(crate) use normalize::{NormalizedRequest, normalize};
