//! Metrics-driven primary provider selection.

use triage_middleware::MetricsCollector;

/// Pick the primary provider from rolling metrics.
///
/// Two-stage policy: a provider whose success rate leads by more than
/// `margin` wins outright; within the margin, the lower average latency
/// wins. Ties keep the earlier candidate, so the configured default (first
/// in `candidates`) prevails on a cold start where every provider reports a
/// perfect rate and zero latency. Breaker state is deliberately not
/// consulted: an open provider is still selectable and short-circuits
/// downstream into the fallback path.
pub(crate) fn select_primary(
    candidates: &[&'static str],
    metrics: &MetricsCollector,
    margin: f64,
) -> &'static str {
    debug_assert!(!candidates.is_empty(), "builder guarantees an adapter");
    let mut best = candidates[0];
    let mut best_m = metrics.snapshot(best);

    for &cand in &candidates[1..] {
        let m = metrics.snapshot(cand);
        if m.success_rate() > best_m.success_rate() + margin {
            best = cand;
            best_m = m;
        } else if best_m.success_rate() > m.success_rate() + margin {
            // correctness dominates: the incumbent keeps its lead
        } else if m.avg_response_time_ms < best_m.avg_response_time_ms {
            best = cand;
            best_m = m;
        }
    }
    best
}
