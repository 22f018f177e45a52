use crate::error::{InferenceError, Result};
use crate::sampling::SamplingParams;

/// Prompt input for a generation call.
///
/// A bare string is accepted anywhere a batch is, and behaves exactly like a
/// one-element batch. The `From` conversions cover the spellings callers
/// actually write:
///
/// ```
/// use robata::PromptInput;
///
/// let single: PromptInput = "hello".into();
/// let batch: PromptInput = vec!["a", "b"].into();
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum PromptInput {
    /// A single prompt, treated as a batch of one.
    Single(String),
    /// An ordered batch of prompts.
    Batch(Vec<String>),
}

impl PromptInput {
    fn into_batch(self) -> Vec<String> {
        match self {
            PromptInput::Single(prompt) => vec![prompt],
            PromptInput::Batch(prompts) => prompts,
        }
    }
}

impl From<&str> for PromptInput {
    fn from(prompt: &str) -> Self {
        PromptInput::Single(prompt.to_owned())
    }
}

impl From<String> for PromptInput {
    fn from(prompt: String) -> Self {
        PromptInput::Single(prompt)
    }
}

impl From<Vec<String>> for PromptInput {
    fn from(prompts: Vec<String>) -> Self {
        PromptInput::Batch(prompts)
    }
}

impl From<Vec<&str>> for PromptInput {
    fn from(prompts: Vec<&str>) -> Self {
        PromptInput::Batch(prompts.into_iter().map(str::to_owned).collect())
    }
}

/// One validated request, ready for ID assignment and submission.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NormalizedRequest {
    pub(crate) prompt: Option<String>,
    pub(crate) token_ids: Option<Vec<u32>>,
    pub(crate) sampling: SamplingParams,
}

/// Validates and reshapes caller input into per-request tuples.
///
/// All-or-nothing: any failure is reported before a single request exists,
/// so nothing ever reaches the engine on bad input. Pure reshaping
/// otherwise, with no engine-facing side effects.
///
/// Rules:
/// - at least one of `prompts` / `token_ids` must be present
/// - when both are present their lengths must match exactly; elements pair
///   positionally
/// - an omitted sampling configuration falls back to
///   [`SamplingParams::default`], applied identically to every request
pub(crate) fn normalize(
    prompts: Option<PromptInput>,
    sampling: Option<SamplingParams>,
    token_ids: Option<Vec<Vec<u32>>>,
) -> Result<Vec<NormalizedRequest>> {
    if prompts.is_none() && token_ids.is_none() {
        return Err(InferenceError::InvalidArgument(
            "either prompts or token IDs must be provided".into(),
        ));
    }

    let prompts = prompts.map(PromptInput::into_batch);
    if let (Some(prompts), Some(token_ids)) = (&prompts, &token_ids) {
        if prompts.len() != token_ids.len() {
            return Err(InferenceError::InvalidArgument(format!(
                "prompt and token-ID batch lengths must match, got {} and {}",
                prompts.len(),
                token_ids.len()
            )));
        }
    }

    let sampling = sampling.unwrap_or_default();
    sampling.validate()?;

    let batch_size = prompts
        .as_ref()
        .map(Vec::len)
        .or_else(|| token_ids.as_ref().map(Vec::len))
        .unwrap_or(0);

    let mut prompt_iter = prompts.map(Vec::into_iter);
    let mut ids_iter = token_ids.map(Vec::into_iter);
    let mut requests = Vec::with_capacity(batch_size);
    for _ in 0..batch_size {
        requests.push(NormalizedRequest {
            prompt: prompt_iter.as_mut().and_then(Iterator::next),
            token_ids: ids_iter.as_mut().and_then(Iterator::next),
            sampling: sampling.clone(),
        });
    }
    Ok(requests)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_input_rejected() {
        let result = normalize(None, None, None);
        assert!(matches!(
            result,
            Err(InferenceError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_bare_prompt_is_a_batch_of_one() {
        let requests = normalize(Some("hello".into()), None, None).unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].prompt.as_deref(), Some("hello"));
        assert_eq!(requests[0].token_ids, None);
    }

    #[test]
    fn test_bare_prompt_matches_singleton_list() {
        let single = normalize(Some("hello".into()), None, None).unwrap();
        let listed = normalize(Some(vec!["hello"].into()), None, None).unwrap();
        assert_eq!(single, listed);
    }

    #[test]
    fn test_token_ids_alone_accepted() {
        let requests = normalize(None, None, Some(vec![vec![1, 2], vec![3]])).unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].prompt, None);
        assert_eq!(requests[0].token_ids, Some(vec![1, 2]));
        assert_eq!(requests[1].token_ids, Some(vec![3]));
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let result = normalize(
            Some(vec!["x", "y"].into()),
            None,
            Some(vec![vec![1], vec![2], vec![3]]),
        );
        assert!(matches!(
            result,
            Err(InferenceError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_both_inputs_pair_positionally() {
        let requests = normalize(
            Some(vec!["x", "y"].into()),
            None,
            Some(vec![vec![10], vec![20, 21]]),
        )
        .unwrap();
        assert_eq!(requests[0].prompt.as_deref(), Some("x"));
        assert_eq!(requests[0].token_ids, Some(vec![10]));
        assert_eq!(requests[1].prompt.as_deref(), Some("y"));
        assert_eq!(requests[1].token_ids, Some(vec![20, 21]));
    }

    #[test]
    fn test_default_sampling_applied_to_every_request() {
        let requests = normalize(Some(vec!["a", "b"].into()), None, None).unwrap();
        for request in &requests {
            assert_eq!(request.sampling, SamplingParams::default());
        }
    }

    #[test]
    fn test_explicit_sampling_shared_across_batch() {
        let params = SamplingParams {
            max_tokens: 64,
            ..SamplingParams::default()
        };
        let requests =
            normalize(Some(vec!["a", "b"].into()), Some(params.clone()), None).unwrap();
        assert!(requests.iter().all(|r| r.sampling == params));
    }

    #[test]
    fn test_invalid_sampling_rejected_before_any_request() {
        let params = SamplingParams {
            max_tokens: 0,
            ..SamplingParams::default()
        };
        let result = normalize(Some("a".into()), Some(params), None);
        assert!(matches!(
            result,
            Err(InferenceError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_empty_batch_normalizes_to_nothing() {
        let requests = normalize(Some(Vec::<String>::new().into()), None, None).unwrap();
        assert!(requests.is_empty());
    }
}
