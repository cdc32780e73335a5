use triage::ProviderKey;

use crate::helpers::{self};
use crate::helpers::mock_adapter::{failing, succeeding};

#[tokio::test]
async fn failing_primary_falls_back_to_the_configured_provider() {
    let primary = failing("openai", "upstream 500");
    let backup = succeeding("anthropic", "note from backup");

    let t = helpers::orchestrator(vec![primary.clone(), backup.clone()])
        .default_provider(ProviderKey::new("openai"))
        .fallback_provider(ProviderKey::new("anthropic"))
        .build()
        .unwrap();

    let outcome = t.execute(helpers::request("p")).await.unwrap();
    assert!(outcome.used_fallback);
    assert_eq!(outcome.provider.as_deref(), Some("anthropic"));
    assert_eq!(outcome.text, "note from backup");
    assert_eq!(primary.calls(), 1);
    assert_eq!(backup.calls(), 1);
}

#[tokio::test]
async fn fallback_outcome_updates_both_providers_metrics() {
    let primary = failing("openai", "upstream 500");
    let backup = succeeding("anthropic", "note");

    let t = helpers::orchestrator(vec![primary, backup])
        .default_provider(ProviderKey::new("openai"))
        .fallback_provider(ProviderKey::new("anthropic"))
        .build()
        .unwrap();

    let _ = t.execute(helpers::request("p")).await.unwrap();

    let report = t.status().await;
    let openai = &report.providers["openai"].metrics;
    let anthropic = &report.providers["anthropic"].metrics;
    assert_eq!((openai.total_requests, openai.total_errors), (1, 1));
    assert_eq!((anthropic.total_requests, anthropic.total_errors), (1, 0));
}

#[tokio::test]
async fn successful_primary_never_contacts_the_fallback() {
    let primary = succeeding("openai", "note");
    let backup = succeeding("anthropic", "unused");

    let t = helpers::orchestrator(vec![primary.clone(), backup.clone()])
        .default_provider(ProviderKey::new("openai"))
        .fallback_provider(ProviderKey::new("anthropic"))
        .build()
        .unwrap();

    let outcome = t.execute(helpers::request("p")).await.unwrap();
    assert!(!outcome.used_fallback);
    assert_eq!(backup.calls(), 0);
}

#[tokio::test]
async fn fallback_success_is_cached_for_later_hits() {
    let primary = failing("openai", "down");
    let backup = succeeding("anthropic", "note");

    let t = helpers::orchestrator(vec![primary.clone(), backup.clone()])
        .default_provider(ProviderKey::new("openai"))
        .fallback_provider(ProviderKey::new("anthropic"))
        .build()
        .unwrap();

    let _ = t.execute(helpers::request("p")).await.unwrap();
    let hit = t.execute(helpers::request("p")).await.unwrap();

    assert!(hit.from_cache);
    // Neither provider is contacted again.
    assert_eq!(primary.calls(), 1);
    assert_eq!(backup.calls(), 1);
}
