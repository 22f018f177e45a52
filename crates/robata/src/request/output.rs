/// The result of one generation request.
///
/// Created by the engine and surfaced through step results. The driver
/// collects outputs whose `finished` flag is set and hands them to the
/// caller untouched; generated content is an opaque engine payload from the
/// driver's point of view. Once returned, an output is caller-owned and
/// never mutated again.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOutput {
    /// Identifier of the originating request.
    pub request_id: String,
    /// The prompt the request was submitted with, when one was given.
    pub prompt: Option<String>,
    /// Generated text.
    pub text: String,
    /// Generated token IDs.
    pub token_ids: Vec<u32>,
    /// Whether the request reached a terminal state.
    ///
    /// The driver's result list contains only finished outputs; engines may
    /// additionally report unfinished intermediates from a step.
    pub finished: bool,
}
