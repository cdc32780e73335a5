use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use triage_core::ProviderAdapter;
use triage_middleware::{CircuitBreaker, MetricsCollector, RateLimiter, ResponseCache};
use triage_types::{
    BreakerConfig, CacheConfig, ProviderKey, ProviderStatus, RateLimitConfig, StatusReport,
    TaskConfig, TaskType, TriageConfig, TriageError,
};

/// Orchestrator that executes generation requests across registered
/// providers with shared protection state.
pub struct Triage {
    pub(crate) adapters: Vec<Arc<dyn ProviderAdapter>>,
    pub(crate) cfg: TriageConfig,
    pub(crate) task_configs: HashMap<TaskType, TaskConfig>,
    pub(crate) default_provider: Option<&'static str>,
    pub(crate) fallback_provider: Option<&'static str>,
    pub(crate) limiter: RateLimiter,
    pub(crate) breaker: CircuitBreaker,
    pub(crate) cache: ResponseCache,
    pub(crate) metrics: MetricsCollector,
}

impl std::fmt::Debug for Triage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Triage")
            .field("adapters", &self.adapters.len())
            .field("default_provider", &self.default_provider)
            .field("fallback_provider", &self.fallback_provider)
            .finish_non_exhaustive()
    }
}

/// Builder for constructing a `Triage` orchestrator with custom configuration.
pub struct TriageBuilder {
    adapters: Vec<Arc<dyn ProviderAdapter>>,
    cfg: TriageConfig,
    task_configs: HashMap<TaskType, TaskConfig>,
}

impl Default for TriageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TriageBuilder {
    /// Create a new builder with sensible defaults.
    ///
    /// Behavior and trade-offs:
    /// - Starts with no adapters; you must register at least one via
    ///   [`with_adapter`](Self::with_adapter).
    /// - Every task type starts with its conservative default
    ///   [`TaskConfig`]; override per task with
    ///   [`task_config`](Self::task_config).
    /// - Defaults are conservative: 60 requests/caller/minute, breaker
    ///   threshold 5 with a 30s cooldown, 5-minute cache TTL, 30s provider
    ///   timeout.
    #[must_use]
    pub fn new() -> Self {
        let task_configs = TaskType::ALL
            .into_iter()
            .map(|t| (t, TaskConfig::default_for(t)))
            .collect();
        Self {
            adapters: vec![],
            cfg: TriageConfig::default(),
            task_configs,
        }
    }

    /// Register a provider adapter.
    ///
    /// Behavior and trade-offs:
    /// - Registration order is the selection tie-break order when no default
    ///   provider is configured.
    /// - Duplicate adapter names are rejected at [`build`](Self::build) time;
    ///   metrics and breaker state are keyed by name and must be unambiguous.
    #[must_use]
    pub fn with_adapter(mut self, adapter: Arc<dyn ProviderAdapter>) -> Self {
        self.adapters.push(adapter);
        self
    }

    /// Replace the whole configuration, e.g. one loaded from the
    /// environment via [`TriageConfig::from_env`].
    #[must_use]
    pub fn config(mut self, cfg: TriageConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Set the provider tried first when callers state no preference.
    ///
    /// The key must name a registered adapter; this is checked at build time.
    #[must_use]
    pub fn default_provider(mut self, key: ProviderKey) -> Self {
        self.cfg.default_provider = Some(key.as_str().to_string());
        self
    }

    /// Set the single provider attempted after the primary fails.
    ///
    /// The key must name a registered adapter; this is checked at build time.
    #[must_use]
    pub fn fallback_provider(mut self, key: ProviderKey) -> Self {
        self.cfg.fallback_provider = Some(key.as_str().to_string());
        self
    }

    /// Set the per-caller request budget.
    #[must_use]
    pub fn rate_limit(mut self, cfg: RateLimitConfig) -> Self {
        self.cfg.rate_limit = cfg;
        self
    }

    /// Set the per-provider circuit breaker tuning.
    #[must_use]
    pub fn breaker(mut self, cfg: BreakerConfig) -> Self {
        self.cfg.breaker = cfg;
        self
    }

    /// Set the response cache tuning.
    #[must_use]
    pub fn response_cache(mut self, cfg: CacheConfig) -> Self {
        self.cfg.cache = cfg;
        self
    }

    /// Set the per-provider request timeout.
    ///
    /// Behavior and trade-offs:
    /// - Bounds each adapter call; a caller-supplied deadline can only
    ///   shorten the wait, never extend it.
    #[must_use]
    pub const fn provider_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.provider_timeout = timeout;
        self
    }

    /// Override the generation parameters for one task type.
    ///
    /// The configuration is validated at build time, not per call.
    #[must_use]
    pub fn task_config(mut self, task: TaskType, cfg: TaskConfig) -> Self {
        self.task_configs.insert(task, cfg);
        self
    }

    /// Build the `Triage` orchestrator.
    ///
    /// # Errors
    /// Returns `Validation` if no adapters are registered, adapter names
    /// collide, the default/fallback provider names are unknown, or a task
    /// configuration is structurally invalid.
    pub fn build(self) -> Result<Triage, TriageError> {
        if self.adapters.is_empty() {
            return Err(TriageError::validation(
                "no adapters registered; add at least one via with_adapter(...)",
            ));
        }

        let mut seen: HashSet<&'static str> = HashSet::new();
        for a in &self.adapters {
            if !seen.insert(a.name()) {
                return Err(TriageError::validation(format!(
                    "duplicate adapter name: {}",
                    a.name()
                )));
            }
        }

        let resolve = |label: &str, name: &Option<String>| -> Result<Option<&'static str>, TriageError> {
            match name {
                None => Ok(None),
                Some(n) => self
                    .adapters
                    .iter()
                    .find(|a| a.name() == n.as_str())
                    .map(|a| Some(a.name()))
                    .ok_or_else(|| {
                        TriageError::validation(format!("{label} names unknown adapter: {n}"))
                    }),
            }
        };
        let default_provider = resolve("default_provider", &self.cfg.default_provider)?;
        let fallback_provider = resolve("fallback_provider", &self.cfg.fallback_provider)?;

        for (task, cfg) in &self.task_configs {
            cfg.validate().map_err(|e| {
                TriageError::validation(format!("task config for {task}: {e}"))
            })?;
        }

        let limiter = RateLimiter::new(self.cfg.rate_limit.clone());
        let breaker = CircuitBreaker::new(self.cfg.breaker.clone());
        let cache = ResponseCache::new(&self.cfg.cache);

        Ok(Triage {
            adapters: self.adapters,
            task_configs: self.task_configs,
            default_provider,
            fallback_provider,
            limiter,
            breaker,
            cache,
            metrics: MetricsCollector::new(),
            cfg: self.cfg,
        })
    }
}

/// Keep provider-scoped errors intact and wrap anything else with the
/// provider's name so aggregated failures identify their source.
pub(crate) fn tag_err(provider: &str, e: TriageError) -> TriageError {
    match e {
        e @ (TriageError::Provider { .. }
        | TriageError::ProviderTimeout { .. }
        | TriageError::ServiceUnavailable { .. }
        | TriageError::Cancelled { .. }
        | TriageError::AllProvidersFailed(_)) => e,
        other => TriageError::provider(provider, other.to_string()),
    }
}

impl Triage {
    /// Start building a new `Triage` instance.
    ///
    /// Typical usage chains adapter registration and preferences, e.g.:
    ///
    /// ```rust,ignore
    /// let orchestrator = triage::Triage::builder()
    ///     .with_adapter(openai.clone())
    ///     .with_adapter(anthropic.clone())
    ///     .default_provider(ProviderKey::new("openai"))
    ///     .fallback_provider(ProviderKey::new("anthropic"))
    ///     .build()?;
    /// ```
    #[must_use]
    pub fn builder() -> TriageBuilder {
        TriageBuilder::new()
    }

    /// Wrap a provider future with a timeout and standardized timeout error
    /// mapping.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "triage::core::provider_call_with_timeout",
            skip(fut),
            fields(
                provider = provider,
                timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            ),
        )
    )]
    pub(crate) async fn provider_call_with_timeout<T, Fut>(
        provider: &'static str,
        timeout: Duration,
        fut: Fut,
    ) -> Result<T, TriageError>
    where
        Fut: core::future::Future<Output = Result<T, TriageError>>,
    {
        (tokio::time::timeout(timeout, fut).await)
            .unwrap_or_else(|_| Err(TriageError::provider_timeout(provider)))
    }

    /// Candidate providers in priority order: the configured default first,
    /// then registration order.
    pub(crate) fn ordered_candidates(&self) -> Vec<&'static str> {
        let mut out: Vec<&'static str> = Vec::with_capacity(self.adapters.len());
        if let Some(d) = self.default_provider {
            out.push(d);
        }
        for a in &self.adapters {
            if !out.contains(&a.name()) {
                out.push(a.name());
            }
        }
        out
    }

    pub(crate) fn adapter_by_name(&self, name: &str) -> Option<&Arc<dyn ProviderAdapter>> {
        self.adapters.iter().find(|a| a.name() == name)
    }

    /// Health snapshot: per-provider metrics and breaker state, cache
    /// occupancy, and currently rate-limited callers.
    pub async fn status(&self) -> StatusReport {
        let mut providers = std::collections::BTreeMap::new();
        for a in &self.adapters {
            let name = a.name();
            providers.insert(
                name.to_string(),
                ProviderStatus {
                    metrics: self.metrics.snapshot(name),
                    breaker: self.breaker.snapshot(name),
                },
            );
        }
        let (cache_hits, cache_misses) = self.cache.hit_miss_counts();
        StatusReport {
            providers,
            cache_entries: self.cache.len().await,
            cache_hits,
            cache_misses,
            rate_limited_callers: self.limiter.limited_callers(),
        }
    }

    /// Administrative: close every circuit and clear failure streaks.
    pub fn reset_breakers(&self) {
        self.breaker.reset_all();
    }

    /// Administrative: drop every cached response.
    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }
}
