use std::time::Duration;

use triage::TriageError;

use crate::helpers::{self};
use crate::helpers::mock_adapter::slow;

#[tokio::test(start_paused = true)]
async fn deadline_expiry_surfaces_cancelled() {
    let adapter = slow("openai", 200);
    let t = helpers::orchestrator(vec![adapter.clone()]).build().unwrap();

    let err = t
        .execute(helpers::request("p").deadline(Duration::from_millis(50)))
        .await
        .unwrap_err();
    match err {
        TriageError::Cancelled { elapsed_ms } => assert!(elapsed_ms >= 50),
        other => panic!("unexpected: {other:?}"),
    }
    assert_eq!(adapter.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn cancelled_calls_count_against_the_provider() {
    let adapter = slow("openai", 200);
    let t = helpers::orchestrator(vec![adapter]).build().unwrap();

    let _ = t
        .execute(helpers::request("p").deadline(Duration::from_millis(50)))
        .await
        .unwrap_err();

    // A hung provider is evidence of ill health: the failure is recorded.
    let report = t.status().await;
    let m = &report.providers["openai"].metrics;
    assert_eq!((m.total_requests, m.total_errors), (1, 1));
    assert_eq!(report.providers["openai"].breaker.consecutive_failures, 1);
}

#[tokio::test(start_paused = true)]
async fn cancelled_calls_never_populate_the_cache() {
    let adapter = slow("openai", 200);
    let t = helpers::orchestrator(vec![adapter.clone()]).build().unwrap();

    let _ = t
        .execute(helpers::request("p").deadline(Duration::from_millis(50)))
        .await
        .unwrap_err();
    assert_eq!(t.status().await.cache_entries, 0);

    // Without the deadline the same request completes and is cached.
    let outcome = t.execute(helpers::request("p")).await.unwrap();
    assert!(!outcome.from_cache);
    assert_eq!(t.status().await.cache_entries, 1);
}

#[tokio::test(start_paused = true)]
async fn generous_deadline_does_not_interfere() {
    let adapter = slow("openai", 200);
    let t = helpers::orchestrator(vec![adapter]).build().unwrap();

    let outcome = t
        .execute(helpers::request("p").deadline(Duration::from_secs(10)))
        .await
        .unwrap();
    assert!(outcome.latency_ms >= 200);
}
