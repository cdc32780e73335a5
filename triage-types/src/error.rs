use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the triage workspace.
///
/// This covers input validation, caller-quota rejections, breaker
/// short-circuits, provider-tagged failures, deadline expiries, and an
/// aggregate for multi-provider attempts.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TriageError {
    /// Invalid input argument; rejected before any side effects.
    #[error("invalid argument: {0}")]
    Validation(String),

    /// The caller exhausted its request budget for the current window.
    #[error("rate limit exceeded: limit={limit} window_ms={window_ms} retry_after_ms={retry_after_ms}")]
    RateLimitExceeded {
        /// Allowed number of requests in the window.
        limit: u64,
        /// Window length in milliseconds.
        window_ms: u64,
        /// Milliseconds until the current window ends and admission resumes.
        retry_after_ms: u64,
    },

    /// The provider's circuit is open; the call was rejected without
    /// contacting the provider.
    #[error("{provider} unavailable: circuit open, retry_in_ms={retry_in_ms}")]
    ServiceUnavailable {
        /// Provider whose circuit is open.
        provider: String,
        /// Milliseconds until the breaker admits a trial request.
        retry_in_ms: u64,
    },

    /// An individual provider adapter returned an error.
    #[error("{provider} failed: {msg}")]
    Provider {
        /// Provider name that failed.
        provider: String,
        /// Human-readable error message.
        msg: String,
    },

    /// An individual provider call exceeded the configured timeout.
    #[error("provider timed out: {provider}")]
    ProviderTimeout {
        /// Provider name that timed out.
        provider: String,
    },

    /// The caller-supplied deadline expired before a provider responded.
    #[error("request cancelled after {elapsed_ms}ms")]
    Cancelled {
        /// Milliseconds elapsed when the deadline fired.
        elapsed_ms: u64,
    },

    /// Primary and fallback attempts both failed; contains the individual
    /// failures in attempt order.
    #[error("all providers failed: {0:?}")]
    AllProvidersFailed(Vec<TriageError>),
}

impl TriageError {
    /// Helper: build a `Validation` error from any message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Helper: build a `Provider` error with the provider name and message.
    pub fn provider(provider: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `ProviderTimeout` error.
    pub fn provider_timeout(provider: impl Into<String>) -> Self {
        Self::ProviderTimeout {
            provider: provider.into(),
        }
    }

    /// Helper: build a `ServiceUnavailable` error.
    pub fn service_unavailable(provider: impl Into<String>, retry_in_ms: u64) -> Self {
        Self::ServiceUnavailable {
            provider: provider.into(),
            retry_in_ms,
        }
    }

    /// Returns true if retrying the same request later could succeed.
    ///
    /// Validation failures are permanent for a given input. Aggregates are
    /// classified based on their contents.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Validation(_) => false,
            Self::AllProvidersFailed(inner) => inner.iter().any(Self::is_retryable),
            _ => true,
        }
    }

    /// Flatten nested `AllProvidersFailed` structures into a plain vector.
    ///
    /// This preserves other error variants as-is and unwraps recursively.
    #[must_use]
    pub fn flatten(self) -> Vec<Self> {
        match self {
            Self::AllProvidersFailed(list) => list.into_iter().flat_map(Self::flatten).collect(),
            other => vec![other],
        }
    }
}
