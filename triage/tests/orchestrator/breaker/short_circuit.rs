use std::time::Duration;

use triage::{BreakerConfig, BreakerStatus, ProviderKey, TriageError};

use crate::helpers::{self};
use crate::helpers::mock_adapter::{failing, succeeding};

#[tokio::test(start_paused = true)]
async fn open_circuit_stops_invoking_the_adapter() {
    let adapter = failing("openai", "down");
    let t = helpers::orchestrator(vec![adapter.clone()])
        .breaker(BreakerConfig {
            threshold: 2,
            open_timeout: Duration::from_secs(60),
        })
        .build()
        .unwrap();

    // Two completed failures trip the circuit.
    let _ = t.execute(helpers::request("p1")).await.unwrap_err();
    let _ = t.execute(helpers::request("p2")).await.unwrap_err();
    assert_eq!(adapter.calls(), 2);
    assert_eq!(
        t.status().await.providers["openai"].breaker.status,
        BreakerStatus::Open
    );

    // The next call is rejected without contacting the provider at all.
    let err = t.execute(helpers::request("p3")).await.unwrap_err();
    assert!(matches!(err, TriageError::ServiceUnavailable { .. }));
    assert_eq!(adapter.calls(), 2);

    // Short-circuited attempts are not recorded as completed attempts.
    let report = t.status().await;
    assert_eq!(report.providers["openai"].metrics.total_requests, 2);
}

#[tokio::test(start_paused = true)]
async fn open_primary_routes_straight_to_fallback() {
    let primary = failing("openai", "down");
    let backup = succeeding("anthropic", "note from backup");

    let t = helpers::orchestrator(vec![primary.clone(), backup.clone()])
        .default_provider(ProviderKey::new("openai"))
        .fallback_provider(ProviderKey::new("anthropic"))
        .breaker(BreakerConfig {
            threshold: 1,
            open_timeout: Duration::from_secs(60),
        })
        .build()
        .unwrap();

    // Trip the primary's circuit.
    let first = t
        .execute(helpers::request("p1").prefer(ProviderKey::new("openai")))
        .await
        .unwrap();
    assert!(first.used_fallback);
    assert_eq!(primary.calls(), 1);

    // Now the primary is open: the fallback serves without the primary
    // adapter being touched, and the outcome is still a success.
    let second = t
        .execute(helpers::request("p2").prefer(ProviderKey::new("openai")))
        .await
        .unwrap();
    assert!(second.used_fallback);
    assert_eq!(second.provider.as_deref(), Some("anthropic"));
    assert_eq!(primary.calls(), 1);
    assert_eq!(backup.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn both_circuits_open_aggregates_both_rejections() {
    let t = helpers::orchestrator(vec![
        failing("openai", "down"),
        failing("anthropic", "down"),
    ])
    .default_provider(ProviderKey::new("openai"))
    .fallback_provider(ProviderKey::new("anthropic"))
    .breaker(BreakerConfig {
        threshold: 1,
        open_timeout: Duration::from_secs(60),
    })
    .build()
    .unwrap();

    let primary = ProviderKey::new("openai");
    // Trip both circuits in one round.
    let _ = t.execute(helpers::request("p1").prefer(primary)).await.unwrap_err();

    let err = t.execute(helpers::request("p2").prefer(primary)).await.unwrap_err();
    let TriageError::AllProvidersFailed(inner) = err else {
        panic!("expected aggregate");
    };
    assert_eq!(inner.len(), 2);
    assert!(inner
        .iter()
        .all(|e| matches!(e, TriageError::ServiceUnavailable { .. })));
}
