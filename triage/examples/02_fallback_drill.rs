//! Failure drill: the primary provider is forced down and the orchestrator
//! rides the fallback, then the breaker short-circuits further attempts.
//!
//! Run with: `cargo run -p triage --example 02_fallback_drill`

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use triage::{
    BreakerConfig, GenerateRequest, GenerateResponse, GenerationRequest, ProviderAdapter,
    ProviderKey, TaskType, Triage, TriageError,
};
use triage_mock::MockAdapter;

/// A provider that is always down.
struct DownAdapter;

#[async_trait]
impl ProviderAdapter for DownAdapter {
    fn name(&self) -> &'static str {
        "primary"
    }

    async fn generate(&self, _req: &GenerateRequest) -> Result<GenerateResponse, TriageError> {
        Err(TriageError::provider("primary", "connection refused"))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let orchestrator = Triage::builder()
        .with_adapter(Arc::new(DownAdapter))
        .with_adapter(Arc::new(MockAdapter::named("backup")))
        .default_provider(ProviderKey::new("primary"))
        .fallback_provider(ProviderKey::new("backup"))
        .breaker(BreakerConfig {
            threshold: 2,
            open_timeout: Duration::from_secs(30),
        })
        .build()?;

    for i in 1..=3 {
        let req = GenerationRequest::new(
            TaskType::RiskAssessment,
            format!("Summarize fall risk, round {i}."),
            "charge-nurse",
        );
        match orchestrator.execute(req).await {
            Ok(outcome) => println!(
                "round {i}: served by {:?} (fallback={})",
                outcome.provider, outcome.used_fallback
            ),
            Err(e) => println!("round {i}: failed: {e}"),
        }
    }

    let report = orchestrator.status().await;
    for (name, status) in &report.providers {
        println!(
            "{name}: {:?} failures={} requests={}",
            status.breaker.status,
            status.breaker.consecutive_failures,
            status.metrics.total_requests
        );
    }

    Ok(())
}
