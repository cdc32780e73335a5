#![doc = include_str!("../README.md")]
//! triage-middleware
//!
//! Re-exports for the orchestrator's protection components.

mod breaker;
mod cache;
mod metrics;
mod rate_limit;

pub use crate::breaker::CircuitBreaker;
pub use crate::cache::{CacheKey, ResponseCache};
pub use crate::metrics::MetricsCollector;
pub use crate::rate_limit::RateLimiter;
