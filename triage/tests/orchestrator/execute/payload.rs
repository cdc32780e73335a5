use triage::GenerationPayload;

use crate::helpers::{self};
use crate::helpers::mock_adapter::succeeding;

#[tokio::test]
async fn json_object_responses_surface_as_structured() {
    let adapter = succeeding(
        "openai",
        r#"{"subjective": "pain 3/10", "plan": "continue analgesia"}"#,
    );
    let t = helpers::orchestrator(vec![adapter]).build().unwrap();

    let outcome = t.execute(helpers::request("p")).await.unwrap();
    match &outcome.payload {
        GenerationPayload::Structured { fields } => {
            assert_eq!(fields["subjective"], "pain 3/10");
        }
        GenerationPayload::Unstructured { .. } => panic!("expected structured"),
    }
}

#[tokio::test]
async fn prose_responses_degrade_to_unstructured_with_raw_text() {
    let adapter = succeeding("openai", "Patient resting comfortably, vitals stable.");
    let t = helpers::orchestrator(vec![adapter]).build().unwrap();

    let outcome = t.execute(helpers::request("p")).await.unwrap();
    match &outcome.payload {
        GenerationPayload::Unstructured { text } => {
            assert_eq!(text, "Patient resting comfortably, vitals stable.");
        }
        GenerationPayload::Structured { .. } => panic!("expected unstructured"),
    }
}

#[tokio::test]
async fn confidence_stays_in_unit_interval_and_rewards_substance() {
    let terse = succeeding("openai", "ok");
    let t = helpers::orchestrator(vec![terse]).build().unwrap();
    let low = t.execute(helpers::request("p1")).await.unwrap();

    let substantial = succeeding(
        "anthropic",
        "Assessment: the patient is afebrile with stable vitals, pain controlled on the \
         current medication plan. Continue scheduled monitoring and reassess fall risk at \
         shift change; no new interventions indicated at this time.",
    );
    let t2 = helpers::orchestrator(vec![substantial]).build().unwrap();
    let high = t2.execute(helpers::request("p2")).await.unwrap();

    assert!((0.0..=1.0).contains(&low.confidence));
    assert!((0.0..=1.0).contains(&high.confidence));
    assert!(high.confidence > low.confidence);
}

#[tokio::test]
async fn cached_responses_score_identically() {
    let adapter = succeeding("openai", "Patient assessment recorded.");
    let t = helpers::orchestrator(vec![adapter]).build().unwrap();

    let first = t.execute(helpers::request("p")).await.unwrap();
    let hit = t.execute(helpers::request("p")).await.unwrap();
    assert!(hit.from_cache);
    assert!((hit.confidence - first.confidence).abs() < f64::EPSILON);
    assert_eq!(hit.payload, first.payload);
}
