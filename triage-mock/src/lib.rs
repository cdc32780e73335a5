//! Mock provider adapter with deterministic fixture data.

use async_trait::async_trait;
use triage_core::{GenerateRequest, GenerateResponse, ProviderAdapter, TaskType, TriageError};

mod fixtures;

/// Mock adapter for CI-safe examples. Provides deterministic responses from
/// static fixtures.
pub struct MockAdapter {
    name: &'static str,
}

impl Default for MockAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAdapter {
    /// Adapter registered under the default name `triage-mock`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            name: "triage-mock",
        }
    }

    /// Adapter registered under a custom name, so examples can stand up
    /// several "providers" backed by the same fixtures.
    #[must_use]
    pub const fn named(name: &'static str) -> Self {
        Self { name }
    }

    fn maybe_fail(&self, prompt: &str, task: TaskType) -> Result<(), TriageError> {
        if prompt.contains("FAIL") {
            return Err(TriageError::provider(
                self.name,
                format!("forced failure: {task}"),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for MockAdapter {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn generate(&self, req: &GenerateRequest) -> Result<GenerateResponse, TriageError> {
        self.maybe_fail(&req.prompt, req.task)?;
        if req.prompt.contains("TIMEOUT") {
            // Simulate latency; the orchestrator may time out depending on
            // its configuration. Keep short to avoid slowing tests.
            tokio::time::sleep(std::time::Duration::from_millis(200)).await;
        }

        let text = fixtures::text_for(req.task);
        Ok(GenerateResponse {
            text: text.to_string(),
            model: req.config.model.clone(),
            prompt_tokens: Some(u32::try_from(req.prompt.len() / 4).unwrap_or(u32::MAX)),
            completion_tokens: Some(u32::try_from(text.len() / 4).unwrap_or(u32::MAX)),
        })
    }
}
