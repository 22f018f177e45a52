use async_trait::async_trait;

use crate::error::EngineResult;
use crate::request::RequestOutput;
use crate::sampling::SamplingParams;
use crate::tokenizer::Tokenizer;

/// # Engine
///
/// A continuous-batching inference engine, as seen by the driver.
///
/// Implementations accept independent generation requests and advance all of
/// them through an internal batch on every [`step`](Engine::step). The
/// driver makes no assumption about scheduling: requests may finish in any
/// order relative to submission, and an engine may still hold unfinished
/// requests from earlier driver calls when new ones arrive.
///
/// ## Contract
///
/// - [`add_request`](Engine::add_request) registers a new logical request
///   under a caller-allocated unique ID and returns without waiting for any
///   part of generation to happen.
/// - [`step`](Engine::step) performs one engine-internal unit of work across
///   every in-flight request and reports zero or more outputs, each tagged
///   with its `finished` state. It must remain safe to call repeatedly until
///   [`has_unfinished_requests`](Engine::has_unfinished_requests) turns
///   false.
/// - [`num_unfinished_requests`](Engine::num_unfinished_requests) is read
///   only for progress totals and must count requests from prior calls that
///   have not yet completed.
/// - The engine owns the tokenizer object; the accessors exist so the
///   driver can delegate get/replace without logic of its own.
///
/// Failures are engine-defined: any [`EngineError`](crate::EngineError)
/// returned from `add_request` or `step` is passed through to the driver's
/// caller unmodified, with no retry.
#[async_trait]
pub trait Engine: Send {
    /// Registers a new request under `request_id`.
    ///
    /// # Parameters
    ///
    /// * `request_id` - Pre-allocated unique identifier for the request
    /// * `prompt` - Prompt text, absent when the caller supplied only
    ///   pre-tokenized input
    /// * `sampling` - Generation controls for this request
    /// * `token_ids` - Pre-tokenized prompt, absent when the engine should
    ///   tokenize `prompt` itself
    ///
    /// Must not block waiting for the request to make progress.
    async fn add_request(
        &mut self,
        request_id: String,
        prompt: Option<String>,
        sampling: SamplingParams,
        token_ids: Option<Vec<u32>>,
    ) -> EngineResult<()>;

    /// Advances every in-flight request by one unit of work.
    ///
    /// # Returns
    ///
    /// Zero or more outputs produced during the step. Only outputs whose
    /// `finished` flag is set represent terminal results; engines are free
    /// to also surface unfinished intermediates.
    async fn step(&mut self) -> EngineResult<Vec<RequestOutput>>;

    /// Whether any request has not yet reached a terminal state.
    fn has_unfinished_requests(&self) -> bool;

    /// Number of requests not yet in a terminal state.
    fn num_unfinished_requests(&self) -> usize;

    /// The tokenizer this engine reads and writes text with.
    fn tokenizer(&self) -> &dyn Tokenizer;

    /// Replaces the tokenizer this engine reads and writes text with.
    fn set_tokenizer(&mut self, tokenizer: Box<dyn Tokenizer>);
}
