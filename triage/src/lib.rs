//! Triage orchestrates outbound generation requests across AI providers.
//!
//! Overview
//! - Routes requests to adapters that implement the `triage_core` contract.
//! - Charges a per-caller rate limit before any provider work happens.
//! - Serves repeated requests from a bounded TTL cache.
//! - Picks the primary provider from rolling success-rate and latency
//!   metrics, then gates the call behind a per-provider circuit breaker.
//! - On failure or an open circuit, attempts the single configured fallback
//!   provider and aggregates both errors if that fails too.
//!
//! Key behaviors and trade-offs
//! - Rate limiting is charged per logical request, before the cache lookup:
//!   it protects the caller's quota regardless of cache outcome. Cache hits
//!   skip the provider-facing protections (breaker, metrics) entirely.
//! - Selection never consults breaker state; a selected-but-open provider
//!   short-circuits downstream and produces a clean fallback path.
//! - Completed attempts (including timeouts and cancellations) always update
//!   metrics and the breaker before an error is returned; validation and
//!   rate-limit rejections precede those components and update nothing.
//! - This layer never retries beyond the one configured fallback; further
//!   retries are the caller's policy decision.
//!
//! Examples
//! Building an orchestrator with two providers and executing a request:
//! ```rust,ignore
//! use std::sync::Arc;
//! use triage::{GenerationRequest, ProviderKey, TaskType, Triage};
//!
//! let orchestrator = Triage::builder()
//!     .with_adapter(Arc::new(primary))
//!     .with_adapter(Arc::new(backup))
//!     .default_provider(ProviderKey::new("primary"))
//!     .fallback_provider(ProviderKey::new("backup"))
//!     .build()?;
//!
//! let outcome = orchestrator
//!     .execute(GenerationRequest::new(
//!         TaskType::NursingAssessment,
//!         "Admission assessment for ...",
//!         "nurse-17",
//!     ))
//!     .await?;
//! assert!(outcome.confidence <= 1.0);
//! ```
//!
//! Observability and administration:
//! ```rust,ignore
//! let report = orchestrator.status().await;
//! orchestrator.reset_breakers();
//! orchestrator.clear_cache().await;
//! ```
#![warn(missing_docs)]

mod confidence;
pub(crate) mod core;
mod execute;
mod selector;

pub use core::{Triage, TriageBuilder};
pub use execute::{GenerationRequest, RequestOutcome};

// Re-export core types for convenience
pub use triage_core::{
    BreakerConfig,
    BreakerSnapshot,
    BreakerStatus,
    CacheConfig,
    ConfidenceConfig,
    GenerateRequest,
    GenerateResponse,
    GenerationPayload,
    ProviderAdapter,
    ProviderKey,
    ProviderMetricsSnapshot,
    ProviderStatus,
    RateLimitConfig,
    SelectorConfig,
    StatusReport,
    TaskConfig,
    TaskType,
    TriageConfig,
    TriageError,
};
