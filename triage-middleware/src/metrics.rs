//! Rolling per-provider request metrics.

use std::collections::HashMap;
use std::sync::Mutex;

use triage_types::ProviderMetricsSnapshot;

/// Per-provider counters feeding provider selection and status reporting.
///
/// Exactly one `record` call per completed attempt; short-circuited attempts
/// (validation, rate limiting, open circuits, cache hits) never reach here.
/// The mean latency is maintained incrementally so no history is stored.
#[derive(Default)]
pub struct MetricsCollector {
    inner: Mutex<HashMap<&'static str, ProviderMetricsSnapshot>>,
}

impl MetricsCollector {
    /// Create an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one completed attempt.
    ///
    /// # Panics
    /// Panics if the internal mutex is poisoned.
    pub fn record(&self, provider: &'static str, success: bool, latency_ms: u64) {
        let mut inner = self.inner.lock().expect("mutex poisoned");
        let m = inner.entry(provider).or_default();
        m.total_requests += 1;
        if !success {
            m.total_errors += 1;
        }
        m.total_response_time_ms = m.total_response_time_ms.saturating_add(latency_ms);
        m.avg_response_time_ms +=
            (latency_ms as f64 - m.avg_response_time_ms) / m.total_requests as f64;
    }

    /// Counters for one provider; untouched providers report zeros.
    ///
    /// # Panics
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn snapshot(&self, provider: &str) -> ProviderMetricsSnapshot {
        let inner = self.inner.lock().expect("mutex poisoned");
        inner.get(provider).cloned().unwrap_or_default()
    }

    /// Counters for every provider that has completed at least one attempt.
    ///
    /// # Panics
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn snapshot_all(&self) -> HashMap<&'static str, ProviderMetricsSnapshot> {
        let inner = self.inner.lock().expect("mutex poisoned");
        inner.clone()
    }
}
