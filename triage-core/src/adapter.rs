use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use triage_types::{TaskConfig, TaskType, TriageError};

/// A single generation attempt handed to a provider adapter.
///
/// The orchestrator resolves the per-task configuration before the adapter is
/// invoked; adapters forward `config` fields to their wire format without
/// interpreting them further.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// The documentation task being generated.
    pub task: TaskType,
    /// Fully assembled prompt text.
    pub prompt: String,
    /// Model parameters for this task type.
    pub config: TaskConfig,
}

/// A provider adapter's successful reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Raw response text, unparsed.
    pub text: String,
    /// Model that actually served the request.
    pub model: String,
    /// Prompt tokens consumed, when the provider reports usage.
    pub prompt_tokens: Option<u32>,
    /// Completion tokens produced, when the provider reports usage.
    pub completion_tokens: Option<u32>,
}

impl GenerateResponse {
    /// Total tokens consumed, when the provider reported both sides.
    #[must_use]
    pub fn total_tokens(&self) -> Option<u32> {
        match (self.prompt_tokens, self.completion_tokens) {
            (Some(p), Some(c)) => Some(p + c),
            _ => None,
        }
    }
}

/// Contract implemented by every outbound text-generation backend.
///
/// Adapters own their transport, authentication, and wire formats; the
/// orchestrator owns timeouts, retries across providers, and all shared
/// protection state. An adapter must therefore be cancel-safe: the
/// orchestrator may drop the `generate` future when a deadline fires.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Stable provider name used for routing, metrics, and breaker state.
    fn name(&self) -> &'static str;

    /// Produce text for the given request.
    ///
    /// # Errors
    /// Implementations should tag failures with their own name via
    /// [`TriageError::provider`] so aggregated reports identify the source.
    async fn generate(&self, req: &GenerateRequest) -> Result<GenerateResponse, TriageError>;
}
