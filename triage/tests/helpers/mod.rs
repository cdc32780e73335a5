#![allow(dead_code)]


use std::sync::Arc;
use std::time::Duration;

use triage::{
    BreakerConfig, CacheConfig, GenerationRequest, ProviderAdapter, RateLimitConfig, TaskType,
    Triage,
};

pub const NURSE: &str = "nurse-17";

/// Orchestrator with relaxed protection limits so individual tests only
/// exercise the component they tighten.
pub fn orchestrator(adapters: Vec<Arc<dyn ProviderAdapter>>) -> triage::TriageBuilder {
    let mut b = Triage::builder()
        .rate_limit(RateLimitConfig {
            limit: 1_000,
            window: Duration::from_secs(3_600),
        })
        .breaker(BreakerConfig {
            threshold: 100,
            open_timeout: Duration::from_secs(3_600),
        })
        .response_cache(CacheConfig {
            ttl: Duration::from_secs(3_600),
            max_entries: 100,
        })
        .provider_timeout(Duration::from_secs(5));
    for a in adapters {
        b = b.with_adapter(a);
    }
    b
}

pub fn request(prompt: &str) -> GenerationRequest {
    GenerationRequest::new(TaskType::SoapNote, prompt, NURSE)
}
