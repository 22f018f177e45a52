use tracing::{debug, info};

use crate::engine::Engine;
use crate::error::Result;
use crate::progress::{LogProgress, NoProgress, ProgressObserver};
use crate::request::{NormalizedRequest, PromptInput, RequestCounter, RequestOutput, normalize};
use crate::sampling::SamplingParams;
use crate::tokenizer::Tokenizer;

/// Run-to-completion driver over a continuous-batching [`Engine`].
///
/// The engine handle is an explicit constructor parameter and lives as long
/// as the driver; it is the sole shared mutable resource across repeated
/// [`generate`](OfflineInference::generate) calls. Requests an earlier call
/// left unfinished persist inside the engine and are drained, and counted in
/// progress totals, by the next call.
pub struct OfflineInference<E: Engine> {
    engine: E,
    request_counter: RequestCounter,
    progress: Box<dyn ProgressObserver>,
}

impl<E: Engine> OfflineInference<E> {
    /// Creates a driver over `engine`, reporting progress through
    /// [`LogProgress`] when a call asks for it.
    pub fn new(engine: E) -> Self {
        Self::with_observer(engine, Box::new(LogProgress::new()))
    }

    /// Creates a driver with an injected progress observer.
    ///
    /// The observer is only consulted by calls made with
    /// `report_progress = true`; disabled calls use a no-op instead.
    pub fn with_observer(engine: E, observer: Box<dyn ProgressObserver>) -> Self {
        Self {
            engine,
            request_counter: RequestCounter::new(),
            progress: observer,
        }
    }

    /// The underlying engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Mutable access to the underlying engine.
    ///
    /// The driver does not assume isolation: requests registered here
    /// directly are drained and reported like any others on the next
    /// [`generate`](OfflineInference::generate) call.
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// The tokenizer used by the engine. Pure delegation.
    pub fn tokenizer(&self) -> &dyn Tokenizer {
        self.engine.tokenizer()
    }

    /// Replaces the tokenizer used by the engine. Pure delegation.
    pub fn set_tokenizer(&mut self, tokenizer: Box<dyn Tokenizer>) {
        self.engine.set_tokenizer(tokenizer);
    }

    /// Generates completions for a batch of prompts and/or pre-tokenized
    /// inputs.
    ///
    /// Input is validated all-or-nothing: on bad input the call fails before
    /// a single request reaches the engine. Valid requests are submitted in
    /// input order, each under a fresh strictly-increasing ID, and the
    /// engine is then stepped until it reports no unfinished requests.
    ///
    /// # Parameters
    ///
    /// * `prompts` - A single prompt or an ordered batch; may be omitted
    ///   when `token_ids` carries the inputs
    /// * `sampling` - Generation controls applied identically to every
    ///   request in the batch; defaults to [`SamplingParams::default`]
    /// * `token_ids` - Pre-tokenized inputs; when both inputs are given
    ///   their lengths must match and elements pair positionally
    /// * `report_progress` - Whether to feed the driver's progress observer
    ///   during the poll loop
    ///
    /// # Returns
    ///
    /// All finished outputs, ordered by completion time. The engine's
    /// scheduling decides that order; it is unrelated to submission order.
    /// Requests left unfinished by earlier calls drain here too, so the
    /// list can be longer than the batch just submitted.
    ///
    /// # Errors
    ///
    /// [`InvalidArgument`](crate::InferenceError::InvalidArgument) when
    /// neither input is present, when both are present with mismatched
    /// lengths, or when the sampling configuration is out of range - in all
    /// cases before anything was submitted.
    /// [`Engine`](crate::InferenceError::Engine) when the engine fails
    /// during submission or stepping; the failure passes through unmodified
    /// and no partial results are returned.
    ///
    /// # Example
    ///
    /// ```
    /// use robata::{OfflineInference, SamplingParams};
    /// use robata::engine::mock::MockEngine;
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() -> robata::Result<()> {
    /// let mut llm = OfflineInference::new(MockEngine::new());
    ///
    /// let sampling = SamplingParams {
    ///     max_tokens: 32,
    ///     ..SamplingParams::default()
    /// };
    /// let outputs = llm
    ///     .generate(Some("a prompt".into()), Some(sampling), None, false)
    ///     .await?;
    ///
    /// assert_eq!(outputs.len(), 1);
    /// assert_eq!(outputs[0].request_id, "0");
    /// # Ok(())
    /// # }
    /// ```
    pub async fn generate(
        &mut self,
        prompts: Option<PromptInput>,
        sampling: Option<SamplingParams>,
        token_ids: Option<Vec<Vec<u32>>>,
        report_progress: bool,
    ) -> Result<Vec<RequestOutput>> {
        let requests = normalize(prompts, sampling, token_ids)?;
        info!(batch_size = requests.len(), "submitting generation batch");
        for request in requests {
            self.add_request(request).await?;
        }
        self.run_engine(report_progress).await
    }

    /// Assigns a fresh ID and registers one request with the engine.
    async fn add_request(&mut self, request: NormalizedRequest) -> Result<()> {
        let request_id = self.request_counter.next_id();
        debug!(%request_id, "queueing request");
        self.engine
            .add_request(
                request_id,
                request.prompt,
                request.sampling,
                request.token_ids,
            )
            .await?;
        Ok(())
    }

    /// Polls the engine to quiescence, collecting finished outputs.
    async fn run_engine(&mut self, report_progress: bool) -> Result<Vec<RequestOutput>> {
        let mut disabled = NoProgress;
        let progress: &mut dyn ProgressObserver = if report_progress {
            self.progress.as_mut()
        } else {
            &mut disabled
        };
        // Totals come from the engine, not the batch: requests still in
        // flight from earlier calls surface through this loop as well.
        progress.start(self.engine.num_unfinished_requests());

        let mut outputs = Vec::new();
        while self.engine.has_unfinished_requests() {
            let step_outputs = self.engine.step().await?;
            for output in step_outputs {
                if output.finished {
                    progress.advance(1);
                    outputs.push(output);
                }
            }
        }
        progress.finish();
        debug!(finished = outputs.len(), "engine drained");
        Ok(outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    use crate::engine::mock::MockEngine;
    use crate::error::InferenceError;
    use crate::tokenizer::ByteLevelTokenizer;

    /// Records every observer call for assertion.
    #[derive(Debug, Default)]
    struct ProgressLog {
        starts: Vec<usize>,
        advances: usize,
        finishes: usize,
    }

    struct RecordingObserver(Arc<Mutex<ProgressLog>>);

    impl RecordingObserver {
        fn new() -> (Self, Arc<Mutex<ProgressLog>>) {
            let log = Arc::new(Mutex::new(ProgressLog::default()));
            (Self(log.clone()), log)
        }
    }

    impl ProgressObserver for RecordingObserver {
        fn start(&mut self, total: usize) {
            self.0.lock().unwrap().starts.push(total);
        }

        fn advance(&mut self, n: usize) {
            self.0.lock().unwrap().advances += n;
        }

        fn finish(&mut self) {
            self.0.lock().unwrap().finishes += 1;
        }
    }

    /// Tokenizer stub that ignores its input entirely.
    struct StubTokenizer;

    impl Tokenizer for StubTokenizer {
        fn encode(&self, _text: &str) -> Vec<u32> {
            vec![42]
        }

        fn decode(&self, _token_ids: &[u32]) -> String {
            "stub".into()
        }
    }

    #[tokio::test]
    async fn test_one_output_per_prompt_with_unique_ids() {
        let mut llm = OfflineInference::new(MockEngine::new());
        let outputs = llm
            .generate(Some(vec!["a", "b", "c"].into()), None, None, false)
            .await
            .unwrap();

        assert_eq!(outputs.len(), 3);
        assert!(outputs.iter().all(|o| o.finished));
        let ids: HashSet<_> = outputs.iter().map(|o| o.request_id.clone()).collect();
        assert_eq!(ids.len(), 3);
    }

    #[tokio::test]
    async fn test_bare_prompt_equals_singleton_batch() {
        let mut bare = OfflineInference::new(MockEngine::new());
        let mut listed = OfflineInference::new(MockEngine::new());

        let from_bare = bare.generate(Some("x".into()), None, None, false).await.unwrap();
        let from_listed = listed
            .generate(Some(vec!["x"].into()), None, None, false)
            .await
            .unwrap();

        assert_eq!(from_bare, from_listed);
    }

    #[tokio::test]
    async fn test_missing_input_fails_before_submission() {
        let mut llm = OfflineInference::new(MockEngine::new());
        let result = llm.generate(None, None, None, false).await;

        assert!(matches!(result, Err(InferenceError::InvalidArgument(_))));
        assert_eq!(llm.engine().submission_count(), 0);
    }

    #[tokio::test]
    async fn test_mismatched_lengths_fail_before_submission() {
        let mut llm = OfflineInference::new(MockEngine::new());
        let result = llm
            .generate(
                Some(vec!["x", "y"].into()),
                None,
                Some(vec![vec![1], vec![2], vec![3]]),
                false,
            )
            .await;

        assert!(matches!(result, Err(InferenceError::InvalidArgument(_))));
        assert_eq!(llm.engine().submission_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_sampling_fails_before_submission() {
        let mut llm = OfflineInference::new(MockEngine::new());
        let sampling = SamplingParams {
            max_tokens: 0,
            ..SamplingParams::default()
        };
        let result = llm
            .generate(Some("a".into()), Some(sampling), None, false)
            .await;

        assert!(matches!(result, Err(InferenceError::InvalidArgument(_))));
        assert_eq!(llm.engine().submission_count(), 0);
    }

    #[tokio::test]
    async fn test_completion_order_is_engine_order() {
        // The engine finishes the second submission before the first.
        let engine = MockEngine::with_plan(vec![vec![1], vec![0, 2]]);
        let mut llm = OfflineInference::new(engine);

        let outputs = llm
            .generate(Some(vec!["a", "b", "c"].into()), None, None, false)
            .await
            .unwrap();

        let ids: Vec<_> = outputs.iter().map(|o| o.request_id.as_str()).collect();
        assert_eq!(ids, ["1", "0", "2"]);
    }

    #[tokio::test]
    async fn test_finish_order_scenario() {
        // "b" on step 1; "a" and "c" on step 2.
        let engine = MockEngine::with_plan(vec![vec![1], vec![0, 2]]);
        let mut llm = OfflineInference::new(engine);

        let outputs = llm
            .generate(Some(vec!["a", "b", "c"].into()), None, None, false)
            .await
            .unwrap();

        assert_eq!(outputs.len(), 3);
        assert!(outputs.iter().all(|o| o.finished));
        assert_eq!(outputs[0].prompt.as_deref(), Some("b"));
        assert_eq!(outputs[1].prompt.as_deref(), Some("a"));
        assert_eq!(outputs[2].prompt.as_deref(), Some("c"));
    }

    #[tokio::test]
    async fn test_progress_counts_match_finished_outputs() {
        let (observer, log) = RecordingObserver::new();
        let mut llm = OfflineInference::with_observer(MockEngine::new(), Box::new(observer));

        let outputs = llm
            .generate(Some(vec!["a", "b", "c"].into()), None, None, true)
            .await
            .unwrap();

        let log = log.lock().unwrap();
        assert_eq!(log.starts, vec![3]);
        assert_eq!(log.advances, outputs.len());
        assert_eq!(log.finishes, 1);
    }

    #[tokio::test]
    async fn test_progress_disabled_never_touches_observer() {
        let (observer, log) = RecordingObserver::new();
        let mut llm = OfflineInference::with_observer(MockEngine::new(), Box::new(observer));

        llm.generate(Some(vec!["a", "b"].into()), None, None, false)
            .await
            .unwrap();

        let log = log.lock().unwrap();
        assert!(log.starts.is_empty());
        assert_eq!(log.advances, 0);
        assert_eq!(log.finishes, 0);
    }

    #[tokio::test]
    async fn test_progress_total_includes_preexisting_requests() {
        let (observer, log) = RecordingObserver::new();
        let mut llm = OfflineInference::with_observer(MockEngine::new(), Box::new(observer));

        // A request the engine already holds from some earlier interaction.
        llm.engine_mut()
            .add_request(
                "leftover".into(),
                Some("old".into()),
                SamplingParams::default(),
                None,
            )
            .await
            .unwrap();

        let outputs = llm
            .generate(Some(vec!["a", "b"].into()), None, None, true)
            .await
            .unwrap();

        // The leftover drains through the same loop, so it is counted in
        // the total and present in the results.
        assert_eq!(outputs.len(), 3);
        let log = log.lock().unwrap();
        assert_eq!(log.starts, vec![3]);
        assert_eq!(log.advances, 3);
        assert_eq!(log.finishes, 1);
    }

    #[tokio::test]
    async fn test_ids_distinct_across_calls() {
        let mut llm = OfflineInference::new(MockEngine::new());
        let mut all_ids = HashSet::new();

        for _ in 0..3 {
            let outputs = llm
                .generate(Some(vec!["a", "b"].into()), None, None, false)
                .await
                .unwrap();
            for output in outputs {
                assert!(
                    all_ids.insert(output.request_id),
                    "request id reissued across calls"
                );
            }
        }
        assert_eq!(all_ids.len(), 6);
    }

    #[tokio::test]
    async fn test_engine_failure_propagates_unmodified() {
        let engine = MockEngine::with_plan(vec![vec![]]).fail_on_step(1);
        let mut llm = OfflineInference::new(engine);

        let result = llm.generate(Some("a".into()), None, None, false).await;
        match result {
            Err(InferenceError::Engine(engine_err)) => {
                assert_eq!(engine_err.message(), "mock engine armed to fail this step");
            }
            other => panic!("expected engine failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_token_ids_only_generation() {
        let mut llm = OfflineInference::new(MockEngine::new());
        let ids = ByteLevelTokenizer::new().encode("hi");

        let outputs = llm
            .generate(None, None, Some(vec![ids]), false)
            .await
            .unwrap();

        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].prompt, None);
        assert_eq!(outputs[0].text, "hi");
    }

    #[tokio::test]
    async fn test_empty_batch_returns_empty() {
        let mut llm = OfflineInference::new(MockEngine::new());
        let outputs = llm
            .generate(Some(Vec::<String>::new().into()), None, None, false)
            .await
            .unwrap();

        assert!(outputs.is_empty());
        assert_eq!(llm.engine().submission_count(), 0);
        assert_eq!(llm.engine().steps_taken(), 0);
    }

    #[tokio::test]
    async fn test_tokenizer_accessors_delegate_to_engine() {
        let mut llm = OfflineInference::new(MockEngine::new());
        assert_eq!(llm.tokenizer().decode(&[104, 105]), "hi");

        llm.set_tokenizer(Box::new(StubTokenizer));
        assert_eq!(llm.tokenizer().decode(&[104, 105]), "stub");

        // The replacement flows through generation as well.
        let outputs = llm
            .generate(Some("anything".into()), None, None, false)
            .await
            .unwrap();
        assert_eq!(outputs[0].text, "stub");
    }
}
