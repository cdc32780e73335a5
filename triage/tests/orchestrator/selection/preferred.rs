use triage::ProviderKey;

use crate::helpers::{self};
use crate::helpers::mock_adapter::{failing, succeeding};

#[tokio::test]
async fn preferred_provider_overrides_selection() {
    let a = succeeding("openai", "note a");
    let b = succeeding("anthropic", "note b");

    let t = helpers::orchestrator(vec![a.clone(), b.clone()])
        .default_provider(ProviderKey::new("openai"))
        .build()
        .unwrap();

    let outcome = t
        .execute(helpers::request("p").prefer(ProviderKey::new("anthropic")))
        .await
        .unwrap();
    assert_eq!(outcome.provider.as_deref(), Some("anthropic"));
    assert_eq!(a.calls(), 0);
}

#[tokio::test]
async fn preferred_provider_keeps_the_fallback_chain() {
    let preferred = failing("openai", "down");
    let backup = succeeding("anthropic", "note");

    let t = helpers::orchestrator(vec![preferred, backup])
        .fallback_provider(ProviderKey::new("anthropic"))
        .build()
        .unwrap();

    let outcome = t
        .execute(helpers::request("p").prefer(ProviderKey::new("openai")))
        .await
        .unwrap();
    assert!(outcome.used_fallback);
    assert_eq!(outcome.provider.as_deref(), Some("anthropic"));
}

#[tokio::test]
async fn preferring_the_fallback_does_not_attempt_it_twice() {
    let backup = failing("anthropic", "down");
    let other = succeeding("openai", "note");

    let t = helpers::orchestrator(vec![other, backup.clone()])
        .fallback_provider(ProviderKey::new("anthropic"))
        .build()
        .unwrap();

    // The preferred primary is also the configured fallback; its failure is
    // surfaced directly rather than retried against itself.
    let err = t
        .execute(helpers::request("p").prefer(ProviderKey::new("anthropic")))
        .await
        .unwrap_err();
    assert!(matches!(err, triage::TriageError::Provider { .. }));
    assert_eq!(backup.calls(), 1);
}
