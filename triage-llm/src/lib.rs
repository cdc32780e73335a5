//! triage-llm
//!
//! Provider adapters that implement the `triage_core` contract on top of
//! real LLM HTTP APIs. Transport and wire formats live here; timeouts,
//! fallback, and shared protection state stay in the orchestrator.
#![warn(missing_docs)]

/// Anthropic messages API adapter.
pub mod anthropic;
/// OpenAI-compatible chat completions adapter.
pub mod openai;

pub use anthropic::AnthropicAdapter;
pub use openai::OpenAiAdapter;

use triage_core::TriageError;

/// Map an HTTP status class onto a provider-tagged error.
///
/// Every variant is a `Provider` failure from the orchestrator's point of
/// view; the message distinguishes auth problems (fix the key) from
/// transient upstream conditions (let the breaker and fallback handle it).
pub(crate) fn error_for_status(provider: &'static str, status: reqwest::StatusCode) -> TriageError {
    let msg = match status.as_u16() {
        401 | 403 => "authentication failed".to_string(),
        429 => "provider rate limit exceeded".to_string(),
        500..=599 => format!("upstream server error: {status}"),
        other => format!("unexpected status: {other}"),
    };
    TriageError::provider(provider, msg)
}
