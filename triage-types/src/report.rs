//! Snapshot DTOs for the health/observability surface.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Circuit breaker state machine positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakerStatus {
    /// Requests pass through; consecutive failures are counted.
    Closed,
    /// Requests are rejected without contacting the provider.
    Open,
    /// A single trial request is in flight.
    HalfOpen,
}

/// Point-in-time view of one provider's circuit breaker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakerSnapshot {
    /// Current state machine position.
    pub status: BreakerStatus,
    /// Consecutive failures observed since the last success.
    pub consecutive_failures: u32,
    /// Milliseconds since the most recent failure, if any.
    pub last_failure_age_ms: Option<u64>,
}

/// Rolling request counters for one provider.
///
/// Totals are updated exactly once per completed attempt; the average uses an
/// incremental mean so no per-request history is retained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ProviderMetricsSnapshot {
    /// Completed attempts, successful or not.
    pub total_requests: u64,
    /// Completed attempts that failed.
    pub total_errors: u64,
    /// Sum of observed latencies in milliseconds.
    pub total_response_time_ms: u64,
    /// Incrementally maintained mean latency in milliseconds.
    pub avg_response_time_ms: f64,
}

impl ProviderMetricsSnapshot {
    /// Fraction of completed attempts that succeeded.
    ///
    /// A provider with no traffic scores 1.0 so cold providers are not
    /// penalized during selection.
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        if self.total_requests == 0 {
            return 1.0;
        }
        let successes = self.total_requests - self.total_errors;
        successes as f64 / self.total_requests as f64
    }
}

/// Combined per-provider view: metrics plus breaker state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderStatus {
    /// Rolling request counters.
    pub metrics: ProviderMetricsSnapshot,
    /// Circuit breaker snapshot.
    pub breaker: BreakerSnapshot,
}

/// Full orchestrator status for health endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    /// Per-provider metrics and breaker state, keyed by provider name.
    pub providers: BTreeMap<String, ProviderStatus>,
    /// Entries currently held by the response cache.
    pub cache_entries: usize,
    /// Lifetime cache hits.
    pub cache_hits: u64,
    /// Lifetime cache misses (expired entries count as misses).
    pub cache_misses: u64,
    /// Callers currently rejected by the rate limiter.
    pub rate_limited_callers: Vec<String>,
}

impl StatusReport {
    /// Fraction of cache lookups served from the cache; 0.0 with no lookups.
    #[must_use]
    pub fn cache_hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            return 0.0;
        }
        self.cache_hits as f64 / total as f64
    }
}
