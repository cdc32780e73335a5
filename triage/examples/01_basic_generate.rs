//! Minimal end-to-end run: one mock provider, one request, one cache hit.
//!
//! Run with: `cargo run -p triage --example 01_basic_generate`

use std::sync::Arc;

use triage::{GenerationRequest, TaskType, Triage};
use triage_mock::MockAdapter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let orchestrator = Triage::builder()
        .with_adapter(Arc::new(MockAdapter::new()))
        .build()?;

    let req = GenerationRequest::new(
        TaskType::SoapNote,
        "Draft a SOAP note for post-op day 2, pain improving.",
        "nurse-17",
    )
    .aux("patient", "demo-0001");

    let outcome = orchestrator.execute(req.clone()).await?;
    println!(
        "provider={:?} fallback={} cached={} confidence={:.2}",
        outcome.provider, outcome.used_fallback, outcome.from_cache, outcome.confidence
    );
    println!("--- response ---\n{}", outcome.text);

    // The identical request is served from the cache.
    let cached = orchestrator.execute(req).await?;
    println!(
        "second call cached={} latency_ms={}",
        cached.from_cache, cached.latency_ms
    );

    Ok(())
}
