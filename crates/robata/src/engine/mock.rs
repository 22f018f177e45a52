//! Deterministic scripted engine.
//!
//! `MockEngine` implements the [`Engine`] contract with fully predictable
//! behavior so driver semantics can be pinned down in tests: which requests
//! finish on which step is decided by an explicit plan, submissions are
//! counted, and a step can be armed to fail. Generation is an echo - the
//! output repeats the prompt (or the decoded token IDs) through the engine's
//! tokenizer, truncated to the request's `max_tokens`.

use std::collections::VecDeque;

use async_trait::async_trait;

use super::Engine;
use crate::error::{EngineError, EngineResult};
use crate::request::RequestOutput;
use crate::sampling::SamplingParams;
use crate::tokenizer::{ByteLevelTokenizer, Tokenizer};

struct Pending {
    request_id: String,
    prompt: Option<String>,
    token_ids: Option<Vec<u32>>,
    sampling: SamplingParams,
    /// Position in global submission order, the index finish plans refer to.
    submission_index: usize,
}

/// A scripted in-memory [`Engine`] for tests, doctests, and demos.
///
/// Each entry of the finish plan lists, in output order, the submission
/// indices to finish on that step. Once the plan is exhausted (or when no
/// plan was given), every step finishes all remaining requests in
/// submission order, so the driver's poll loop always terminates.
///
/// ```
/// use robata::engine::{Engine, mock::MockEngine};
/// use robata::SamplingParams;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// // Finish the second submission first, then the other two.
/// let mut engine = MockEngine::with_plan(vec![vec![1], vec![0, 2]]);
/// for (id, prompt) in [("0", "a"), ("1", "b"), ("2", "c")] {
///     engine
///         .add_request(id.into(), Some(prompt.into()), SamplingParams::default(), None)
///         .await
///         .unwrap();
/// }
///
/// let first = engine.step().await.unwrap();
/// assert_eq!(first.len(), 1);
/// assert_eq!(first[0].request_id, "1");
/// assert!(engine.has_unfinished_requests());
/// # }
/// ```
pub struct MockEngine {
    tokenizer: Box<dyn Tokenizer>,
    pending: Vec<Pending>,
    plan: VecDeque<Vec<usize>>,
    fail_on_step: Option<usize>,
    submissions: usize,
    steps_taken: usize,
}

impl MockEngine {
    /// Creates an engine that finishes everything pending on every step.
    pub fn new() -> Self {
        Self::with_plan(Vec::new())
    }

    /// Creates an engine with an explicit finish plan.
    ///
    /// # Parameters
    ///
    /// * `plan` - One entry per step; each entry lists the submission
    ///   indices to finish on that step, in the order their outputs should
    ///   be reported. Indices that are unknown or already finished are
    ///   skipped. An empty entry makes a step report nothing.
    pub fn with_plan(plan: Vec<Vec<usize>>) -> Self {
        Self {
            tokenizer: Box::new(ByteLevelTokenizer::new()),
            pending: Vec::new(),
            plan: plan.into(),
            fail_on_step: None,
            submissions: 0,
            steps_taken: 0,
        }
    }

    /// Arms the engine to fail the `step`-th call to [`Engine::step`]
    /// (zero-based).
    pub fn fail_on_step(mut self, step: usize) -> Self {
        self.fail_on_step = Some(step);
        self
    }

    /// Total number of `add_request` calls the engine has ever seen.
    pub fn submission_count(&self) -> usize {
        self.submissions
    }

    /// Number of `step` calls the engine has serviced.
    pub fn steps_taken(&self) -> usize {
        self.steps_taken
    }

    fn finish(&mut self, position: usize) -> RequestOutput {
        let pending = self.pending.remove(position);
        let echoed = match (&pending.prompt, &pending.token_ids) {
            (Some(prompt), _) => prompt.clone(),
            (None, Some(ids)) => self.tokenizer.decode(ids),
            (None, None) => String::new(),
        };
        let mut token_ids = self.tokenizer.encode(&echoed);
        token_ids.truncate(pending.sampling.max_tokens);
        let text = self.tokenizer.decode(&token_ids);
        RequestOutput {
            request_id: pending.request_id,
            prompt: pending.prompt,
            text,
            token_ids,
            finished: true,
        }
    }
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Engine for MockEngine {
    async fn add_request(
        &mut self,
        request_id: String,
        prompt: Option<String>,
        sampling: SamplingParams,
        token_ids: Option<Vec<u32>>,
    ) -> EngineResult<()> {
        self.pending.push(Pending {
            request_id,
            prompt,
            token_ids,
            sampling,
            submission_index: self.submissions,
        });
        self.submissions += 1;
        Ok(())
    }

    async fn step(&mut self) -> EngineResult<Vec<RequestOutput>> {
        if self.fail_on_step == Some(self.steps_taken) {
            return Err(EngineError::msg("mock engine armed to fail this step"));
        }
        self.steps_taken += 1;

        let to_finish: Vec<usize> = match self.plan.pop_front() {
            Some(indices) => indices,
            // Plan exhausted: drain everything so polling always terminates.
            None => self.pending.iter().map(|p| p.submission_index).collect(),
        };

        let mut outputs = Vec::with_capacity(to_finish.len());
        for index in to_finish {
            if let Some(position) = self
                .pending
                .iter()
                .position(|p| p.submission_index == index)
            {
                outputs.push(self.finish(position));
            }
        }
        Ok(outputs)
    }

    fn has_unfinished_requests(&self) -> bool {
        !self.pending.is_empty()
    }

    fn num_unfinished_requests(&self) -> usize {
        self.pending.len()
    }

    fn tokenizer(&self) -> &dyn Tokenizer {
        self.tokenizer.as_ref()
    }

    fn set_tokenizer(&mut self, tokenizer: Box<dyn Tokenizer>) {
        self.tokenizer = tokenizer;
    }
}
