//! # Tokenizer Capability
//!
//! A minimal capability interface for the tokenizer an engine carries.
//!
//! The driver never tokenizes anything itself; it only exposes get/replace
//! delegation so callers can swap the object an engine uses. Real engines
//! will typically wrap a learned-vocabulary tokenizer behind this trait; the
//! bundled [`ByteLevelTokenizer`] is the file-free default used by the mock
//! engine and tests.

mod byte_level;

pub use byte_level::ByteLevelTokenizer;

/// Encoding and decoding between text and token IDs.
///
/// Implementations must be usable behind a shared reference from the engine
/// and replaceable at runtime through
/// [`OfflineInference::set_tokenizer`](crate::OfflineInference::set_tokenizer).
pub trait Tokenizer: Send + Sync {
    /// Converts text into its token-ID sequence.
    fn encode(&self, text: &str) -> Vec<u32>;

    /// Converts a token-ID sequence back into text.
    fn decode(&self, token_ids: &[u32]) -> String;
}
