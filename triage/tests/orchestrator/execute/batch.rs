use std::time::Duration;

use triage::{GenerationRequest, RateLimitConfig, TaskType, TriageError};

use crate::helpers::{self};
use crate::helpers::mock_adapter::succeeding;

#[tokio::test]
async fn batch_preserves_submission_order() {
    let t = helpers::orchestrator(vec![succeeding("openai", "note")])
        .build()
        .unwrap();

    let reqs = vec![
        helpers::request("p1"),
        helpers::request("p2"),
        helpers::request("p3"),
    ];
    let results = t.execute_many(reqs).await;
    assert_eq!(results.len(), 3);
    assert!(results.iter().all(Result::is_ok));
}

#[tokio::test]
async fn one_rejection_does_not_fail_the_batch() {
    let t = helpers::orchestrator(vec![succeeding("openai", "note")])
        .rate_limit(RateLimitConfig {
            limit: 2,
            window: Duration::from_secs(3_600),
        })
        .build()
        .unwrap();

    let reqs = vec![
        helpers::request("p1"),
        GenerationRequest::new(TaskType::SoapNote, "", helpers::NURSE),
        helpers::request("p2"),
    ];
    let results = t.execute_many(reqs).await;

    assert!(results[0].is_ok());
    assert!(matches!(
        results[1].as_ref().unwrap_err(),
        TriageError::Validation(_)
    ));
    assert!(results[2].is_ok());
}
