use crate::helpers::{self};
use crate::helpers::mock_adapter::succeeding;

#[tokio::test]
async fn identical_requests_invoke_the_adapter_at_most_once() {
    let adapter = succeeding("openai", "stable note");
    let t = helpers::orchestrator(vec![adapter.clone()]).build().unwrap();

    let first = t.execute(helpers::request("same prompt")).await.unwrap();
    let second = t.execute(helpers::request("same prompt")).await.unwrap();

    assert!(!first.from_cache);
    assert!(second.from_cache);
    assert_eq!(second.text, first.text);
    assert_eq!(adapter.calls(), 1);
}

#[tokio::test]
async fn cache_hit_reports_no_provider() {
    let t = helpers::orchestrator(vec![succeeding("openai", "note")])
        .build()
        .unwrap();
    let first = t.execute(helpers::request("p")).await.unwrap();
    assert_eq!(first.provider.as_deref(), Some("openai"));

    let hit = t.execute(helpers::request("p")).await.unwrap();
    assert!(hit.from_cache);
    assert!(hit.provider.is_none());
    assert!(!hit.used_fallback);
}

#[tokio::test]
async fn cache_hits_do_not_touch_metrics_or_breaker() {
    let adapter = succeeding("openai", "note");
    let t = helpers::orchestrator(vec![adapter]).build().unwrap();

    let _ = t.execute(helpers::request("p")).await.unwrap();
    let _ = t.execute(helpers::request("p")).await.unwrap();
    let _ = t.execute(helpers::request("p")).await.unwrap();

    let report = t.status().await;
    // Only the populating call was a completed provider attempt.
    assert_eq!(report.providers["openai"].metrics.total_requests, 1);
    assert_eq!(report.providers["openai"].breaker.consecutive_failures, 0);
}

#[tokio::test]
async fn auxiliary_data_discriminates_cache_entries() {
    let adapter = succeeding("openai", "note");
    let t = helpers::orchestrator(vec![adapter.clone()]).build().unwrap();

    let _ = t
        .execute(helpers::request("p").aux("patient", "a-123"))
        .await
        .unwrap();
    let miss = t
        .execute(helpers::request("p").aux("patient", "b-456"))
        .await
        .unwrap();

    assert!(!miss.from_cache);
    assert_eq!(adapter.calls(), 2);
}

#[tokio::test]
async fn whitespace_variants_share_one_entry() {
    let adapter = succeeding("openai", "note");
    let t = helpers::orchestrator(vec![adapter.clone()]).build().unwrap();

    let _ = t.execute(helpers::request("draft  the\nnote")).await.unwrap();
    let hit = t.execute(helpers::request(" draft the note ")).await.unwrap();

    assert!(hit.from_cache);
    assert_eq!(adapter.calls(), 1);
}
