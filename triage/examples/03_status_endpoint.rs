//! Render the status report the way a health endpoint would serve it.
//!
//! Run with: `cargo run -p triage --example 03_status_endpoint`

use std::sync::Arc;

use triage::{GenerationRequest, TaskType, Triage};
use triage_mock::MockAdapter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let orchestrator = Triage::builder()
        .with_adapter(Arc::new(MockAdapter::new()))
        .build()?;

    for task in [
        TaskType::NursingAssessment,
        TaskType::SoapNote,
        TaskType::DischargeSummary,
    ] {
        let req = GenerationRequest::new(task, format!("Generate a {task} draft."), "nurse-17");
        let _ = orchestrator.execute(req).await?;
    }

    let report = orchestrator.status().await;
    println!("{}", serde_json::to_string_pretty(&report)?);

    orchestrator.clear_cache().await;
    orchestrator.reset_breakers();
    println!(
        "after admin reset: cache_entries={}",
        orchestrator.status().await.cache_entries
    );

    Ok(())
}
