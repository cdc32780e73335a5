//! Configuration types shared across the orchestrator and its components.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::TriageError;

/// Configuration for the per-caller request budget over a fixed window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum number of requests a caller may make within a single window.
    pub limit: u64,
    /// Duration of the accounting window.
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            limit: 60,
            window: Duration::from_secs(60),
        }
    }
}

/// Configuration for the per-provider circuit breaker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakerConfig {
    /// Consecutive failures before the circuit opens.
    pub threshold: u32,
    /// Time the circuit stays open before admitting a trial request.
    pub open_timeout: Duration,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            threshold: 5,
            open_timeout: Duration::from_secs(30),
        }
    }
}

/// Configuration for the response cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Entry lifetime; an entry at exactly this age is already expired.
    pub ttl: Duration,
    /// Maximum number of entries held before the oldest is evicted.
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_entries: 1000,
        }
    }
}

/// Tuning knobs for metrics-driven provider selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Success-rate lead one provider must have over another before the
    /// rate alone decides; within the margin, average latency breaks the tie.
    pub success_rate_margin: f64,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            success_rate_margin: 0.10,
        }
    }
}

/// Tuning knobs for the response confidence heuristic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfidenceConfig {
    /// Score every successful response starts from.
    pub base: f64,
    /// Bonus when the response reaches `long_threshold` characters.
    pub long_bonus: f64,
    /// Character count that earns `long_bonus`.
    pub long_threshold: usize,
    /// Bonus when the response reaches `short_threshold` characters.
    pub short_bonus: f64,
    /// Character count that earns `short_bonus`.
    pub short_threshold: usize,
    /// Bonus when the response mentions at least one clinical keyword.
    pub keyword_bonus: f64,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            base: 0.5,
            long_bonus: 0.2,
            long_threshold: 200,
            short_bonus: 0.1,
            short_threshold: 50,
            keyword_bonus: 0.2,
        }
    }
}

/// Global configuration for the `Triage` orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageConfig {
    /// Per-caller request budget.
    pub rate_limit: RateLimitConfig,
    /// Per-provider circuit breaker tuning.
    pub breaker: BreakerConfig,
    /// Response cache tuning.
    pub cache: CacheConfig,
    /// Provider selection tuning.
    pub selector: SelectorConfig,
    /// Confidence heuristic tuning.
    pub confidence: ConfidenceConfig,
    /// Provider attempted first when the caller states no preference.
    ///
    /// `None` falls back to registration order.
    pub default_provider: Option<String>,
    /// The single provider attempted after the primary fails or is open.
    pub fallback_provider: Option<String>,
    /// Timeout applied to each individual provider call.
    pub provider_timeout: Duration,
    /// Upper bound on accepted prompt length, in bytes.
    pub max_prompt_len: usize,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            rate_limit: RateLimitConfig::default(),
            breaker: BreakerConfig::default(),
            cache: CacheConfig::default(),
            selector: SelectorConfig::default(),
            confidence: ConfidenceConfig::default(),
            default_provider: None,
            fallback_provider: None,
            provider_timeout: Duration::from_secs(30),
            max_prompt_len: 32 * 1024,
        }
    }
}

/// Environment variable consulted for [`RateLimitConfig::limit`].
pub const ENV_RATE_LIMIT_MAX: &str = "RATE_LIMIT_MAX";
/// Environment variable consulted for [`RateLimitConfig::window`].
pub const ENV_RATE_LIMIT_WINDOW_MS: &str = "RATE_LIMIT_WINDOW_MS";
/// Environment variable consulted for [`BreakerConfig::threshold`].
pub const ENV_CIRCUIT_BREAKER_THRESHOLD: &str = "CIRCUIT_BREAKER_THRESHOLD";
/// Environment variable consulted for [`BreakerConfig::open_timeout`].
pub const ENV_CIRCUIT_BREAKER_TIMEOUT_MS: &str = "CIRCUIT_BREAKER_TIMEOUT_MS";
/// Environment variable consulted for [`CacheConfig::ttl`].
pub const ENV_CACHE_TTL_MS: &str = "CACHE_TTL_MS";
/// Environment variable consulted for [`CacheConfig::max_entries`].
pub const ENV_CACHE_MAX_SIZE: &str = "CACHE_MAX_SIZE";
/// Environment variable consulted for [`TriageConfig::default_provider`].
pub const ENV_DEFAULT_PROVIDER: &str = "DEFAULT_PROVIDER";
/// Environment variable consulted for [`TriageConfig::fallback_provider`].
pub const ENV_FALLBACK_PROVIDER: &str = "FALLBACK_PROVIDER";

impl TriageConfig {
    /// Build a configuration from process environment variables.
    ///
    /// Unset variables keep their defaults; set-but-unparsable values are
    /// rejected rather than silently ignored.
    ///
    /// # Errors
    /// Returns `Validation` when a recognized variable holds a value that
    /// does not parse.
    pub fn from_env() -> Result<Self, TriageError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    ///
    /// This is the testable core of [`from_env`](Self::from_env); the lookup
    /// is consulted once per recognized option.
    ///
    /// # Errors
    /// Returns `Validation` when a recognized key holds a value that does
    /// not parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, TriageError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(v) = lookup(ENV_RATE_LIMIT_MAX) {
            cfg.rate_limit.limit = parse_u64(ENV_RATE_LIMIT_MAX, &v)?;
        }
        if let Some(v) = lookup(ENV_RATE_LIMIT_WINDOW_MS) {
            cfg.rate_limit.window = Duration::from_millis(parse_u64(ENV_RATE_LIMIT_WINDOW_MS, &v)?);
        }
        if let Some(v) = lookup(ENV_CIRCUIT_BREAKER_THRESHOLD) {
            let raw = parse_u64(ENV_CIRCUIT_BREAKER_THRESHOLD, &v)?;
            cfg.breaker.threshold = u32::try_from(raw).map_err(|_| {
                TriageError::validation(format!(
                    "{ENV_CIRCUIT_BREAKER_THRESHOLD}: value {raw} out of range"
                ))
            })?;
        }
        if let Some(v) = lookup(ENV_CIRCUIT_BREAKER_TIMEOUT_MS) {
            cfg.breaker.open_timeout =
                Duration::from_millis(parse_u64(ENV_CIRCUIT_BREAKER_TIMEOUT_MS, &v)?);
        }
        if let Some(v) = lookup(ENV_CACHE_TTL_MS) {
            cfg.cache.ttl = Duration::from_millis(parse_u64(ENV_CACHE_TTL_MS, &v)?);
        }
        if let Some(v) = lookup(ENV_CACHE_MAX_SIZE) {
            let raw = parse_u64(ENV_CACHE_MAX_SIZE, &v)?;
            cfg.cache.max_entries = usize::try_from(raw).map_err(|_| {
                TriageError::validation(format!("{ENV_CACHE_MAX_SIZE}: value {raw} out of range"))
            })?;
        }
        if let Some(v) = lookup(ENV_DEFAULT_PROVIDER) {
            let v = v.trim();
            if !v.is_empty() {
                cfg.default_provider = Some(v.to_string());
            }
        }
        if let Some(v) = lookup(ENV_FALLBACK_PROVIDER) {
            let v = v.trim();
            if !v.is_empty() {
                cfg.fallback_provider = Some(v.to_string());
            }
        }

        Ok(cfg)
    }
}

fn parse_u64(key: &str, raw: &str) -> Result<u64, TriageError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| TriageError::validation(format!("{key}: expected an integer, got {raw:?}")))
}
