use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use triage::{BreakerConfig, BreakerStatus, GenerateResponse, TriageError};

use crate::helpers::{self};
use crate::helpers::mock_adapter::{ScriptedAdapter, failing};

fn tight_breaker() -> BreakerConfig {
    BreakerConfig {
        threshold: 1,
        open_timeout: Duration::from_millis(1_000),
    }
}

/// Adapter that fails its first call and succeeds afterwards.
fn recovering(name: &'static str) -> Arc<ScriptedAdapter> {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut scripted = ScriptedAdapter::new(name);
    scripted.generate_fn = Some(Arc::new(move |req| {
        if calls.fetch_add(1, Ordering::SeqCst) == 0 {
            Err(TriageError::provider(name, "first call fails"))
        } else {
            Ok(GenerateResponse {
                text: "recovered note".to_string(),
                model: req.config.model.clone(),
                prompt_tokens: None,
                completion_tokens: None,
            })
        }
    }));
    Arc::new(scripted)
}

#[tokio::test(start_paused = true)]
async fn cooldown_admits_exactly_one_trial_that_closes_on_success() {
    let t = helpers::orchestrator(vec![recovering("openai")])
        .breaker(tight_breaker())
        .build()
        .unwrap();

    // Trip the circuit, then confirm it rejects while hot.
    let _ = t.execute(helpers::request("p1")).await.unwrap_err();
    assert!(matches!(
        t.execute(helpers::request("p2")).await.unwrap_err(),
        TriageError::ServiceUnavailable { .. }
    ));

    // After the cooldown, the next request is the half-open trial; it
    // succeeds and the circuit closes with a clean streak.
    tokio::time::advance(Duration::from_millis(1_000)).await;
    let outcome = t.execute(helpers::request("p3")).await.unwrap();
    assert!(!outcome.from_cache);

    let snap = &t.status().await.providers["openai"].breaker;
    assert_eq!(snap.status, BreakerStatus::Closed);
    assert_eq!(snap.consecutive_failures, 0);
}

#[tokio::test(start_paused = true)]
async fn failed_trial_reopens_the_circuit() {
    let adapter = failing("openai", "still down");
    let t = helpers::orchestrator(vec![adapter.clone()])
        .breaker(tight_breaker())
        .build()
        .unwrap();

    let _ = t.execute(helpers::request("p1")).await.unwrap_err();
    tokio::time::advance(Duration::from_millis(1_000)).await;

    // The trial reaches the adapter and fails.
    let err = t.execute(helpers::request("p2")).await.unwrap_err();
    assert!(matches!(err, TriageError::Provider { .. }));
    assert_eq!(adapter.calls(), 2);

    // Re-opened: rejected without another adapter call until the next
    // cooldown elapses.
    let err = t.execute(helpers::request("p3")).await.unwrap_err();
    assert!(matches!(err, TriageError::ServiceUnavailable { .. }));
    assert_eq!(adapter.calls(), 2);

    tokio::time::advance(Duration::from_millis(1_000)).await;
    let _ = t.execute(helpers::request("p4")).await.unwrap_err();
    assert_eq!(adapter.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn reset_breakers_reopens_traffic_immediately() {
    let adapter = failing("openai", "down");
    let t = helpers::orchestrator(vec![adapter.clone()])
        .breaker(tight_breaker())
        .build()
        .unwrap();

    let _ = t.execute(helpers::request("p1")).await.unwrap_err();
    assert!(matches!(
        t.execute(helpers::request("p2")).await.unwrap_err(),
        TriageError::ServiceUnavailable { .. }
    ));

    t.reset_breakers();
    let _ = t.execute(helpers::request("p3")).await.unwrap_err();
    assert_eq!(adapter.calls(), 2);
}
