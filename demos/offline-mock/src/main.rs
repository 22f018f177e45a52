//! Drives a batch of prompts through the offline driver over the scripted
//! mock engine, with progress reporting on. Run with `RUST_LOG=debug` to see
//! the per-request events.

use robata::engine::mock::MockEngine;
use robata::{EngineOptions, OfflineInference, SamplingParams};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> robata::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // A real deployment would hand these options to an engine constructor.
    let options = EngineOptions::new("mock-echo");
    options.validate()?;
    tracing::info!(model = %options.model, dtype = %options.dtype, "engine options validated");

    // Finish the middle prompt first to make completion ordering visible.
    let engine = MockEngine::with_plan(vec![vec![1], vec![0, 2]]);
    let mut llm = OfflineInference::new(engine);

    let sampling = SamplingParams {
        max_tokens: 32,
        ..SamplingParams::default()
    };
    let outputs = llm
        .generate(
            Some(vec!["the first prompt", "a second prompt", "one more"].into()),
            Some(sampling),
            None,
            true,
        )
        .await?;

    for output in &outputs {
        println!(
            "request {} finished: {:?} -> {:?}",
            output.request_id,
            output.prompt.as_deref().unwrap_or(""),
            output.text
        );
    }
    Ok(())
}
