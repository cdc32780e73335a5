//! The orchestrated request pipeline.

use std::collections::BTreeMap;
use std::time::Duration;

use tokio::time::Instant;
use uuid::Uuid;

use triage_core::{GenerateRequest, GenerateResponse};
use triage_middleware::CacheKey;
use triage_types::{GenerationPayload, ProviderKey, TaskConfig, TaskType, TriageError};

use crate::Triage;
use crate::core::tag_err;

/// One logical generation request as submitted by a domain service.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// The documentation task to generate.
    pub task: TaskType,
    /// Prompt text assembled by the caller.
    pub prompt: String,
    /// Auxiliary parameters that discriminate otherwise-identical prompts
    /// (patient context ids, form revisions); part of the cache identity.
    pub aux: BTreeMap<String, String>,
    /// Identity the rate limiter charges for this request.
    pub caller_id: String,
    /// Skip metrics-driven selection and start with this provider.
    pub preferred_provider: Option<ProviderKey>,
    /// Overall deadline for this request; bounds each provider call and is
    /// reported as `Cancelled` when it fires.
    pub deadline: Option<Duration>,
}

impl GenerationRequest {
    /// Create a request with no auxiliary data, preference, or deadline.
    pub fn new(task: TaskType, prompt: impl Into<String>, caller_id: impl Into<String>) -> Self {
        Self {
            task,
            prompt: prompt.into(),
            aux: BTreeMap::new(),
            caller_id: caller_id.into(),
            preferred_provider: None,
            deadline: None,
        }
    }

    /// Attach one auxiliary key/value pair.
    #[must_use]
    pub fn aux(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.aux.insert(key.into(), value.into());
        self
    }

    /// Route to a specific provider instead of the metrics-driven choice.
    #[must_use]
    pub const fn prefer(mut self, provider: ProviderKey) -> Self {
        self.preferred_provider = Some(provider);
        self
    }

    /// Bound the whole request by a deadline.
    #[must_use]
    pub const fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// The structured result of one orchestrated request.
///
/// Ephemeral: produced per call for the caller and for log payloads, never
/// persisted by the orchestrator itself.
#[derive(Debug, Clone)]
pub struct RequestOutcome {
    /// Unique id for correlating logs and downstream events.
    pub request_id: Uuid,
    /// Task the request was for.
    pub task: TaskType,
    /// Caller the rate limiter charged.
    pub caller_id: String,
    /// Provider that served the request; `None` on a cache hit.
    pub provider: Option<String>,
    /// True when the fallback provider produced the response.
    pub used_fallback: bool,
    /// True when the response came from the cache.
    pub from_cache: bool,
    /// Heuristic quality estimate in `[0, 1]`; not a statistical guarantee.
    pub confidence: f64,
    /// Wall-clock latency of the whole orchestrated request.
    pub latency_ms: u64,
    /// Raw response text.
    pub text: String,
    /// Shape-detected view of the response.
    pub payload: GenerationPayload,
}

fn elapsed_ms(since: Instant) -> u64 {
    since.elapsed().as_millis().try_into().unwrap_or(u64::MAX)
}

impl Triage {
    /// Execute one generation request end to end.
    ///
    /// Pipeline order is fixed: validation, rate limiting, cache lookup,
    /// provider selection, breaker-gated primary attempt, breaker-gated
    /// fallback attempt, cache store. Validation and rate-limit rejections
    /// happen before any provider-facing state is touched; a cache hit skips
    /// breaker and metrics but the rate limit has already been charged.
    ///
    /// # Errors
    /// - `Validation` for malformed input, with no side effects.
    /// - `RateLimitExceeded` when the caller's window is exhausted.
    /// - The single attempt's error when no fallback was attempted, or
    ///   `AllProvidersFailed` carrying both errors when primary and fallback
    ///   both failed. This layer never retries beyond the one fallback.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "triage::execute",
            skip(self, req),
            fields(task = %req.task, caller = %req.caller_id),
        )
    )]
    pub async fn execute(&self, req: GenerationRequest) -> Result<RequestOutcome, TriageError> {
        let started = Instant::now();

        self.validate(&req)?;
        self.limiter.check(&req.caller_id)?;

        let cache_key = CacheKey::compute(req.task, &req.prompt, &req.aux);
        if let Some(text) = self.cache.get(&cache_key).await {
            let confidence = crate::confidence::score(&self.cfg.confidence, &text);
            let payload = GenerationPayload::from_provider_text(&text);
            return Ok(RequestOutcome {
                request_id: Uuid::new_v4(),
                task: req.task,
                caller_id: req.caller_id,
                provider: None,
                used_fallback: false,
                from_cache: true,
                confidence,
                latency_ms: elapsed_ms(started),
                text,
                payload,
            });
        }

        let primary: &'static str = match req.preferred_provider {
            Some(key) => key.as_str(),
            None => crate::selector::select_primary(
                &self.ordered_candidates(),
                &self.metrics,
                self.cfg.selector.success_rate_margin,
            ),
        };

        let mut errors: Vec<TriageError> = Vec::new();

        match self.attempt(primary, &req, started).await {
            Ok(resp) => {
                return Ok(self
                    .success(req, cache_key, resp, primary, false, started)
                    .await);
            }
            Err(e) => errors.push(e),
        }

        if let Some(fb) = self.fallback_provider.filter(|f| *f != primary) {
            match self.attempt(fb, &req, started).await {
                Ok(resp) => {
                    return Ok(self.success(req, cache_key, resp, fb, true, started).await);
                }
                Err(e) => errors.push(e),
            }
        }

        if errors.len() == 1 {
            Err(errors.remove(0))
        } else {
            Err(TriageError::AllProvidersFailed(errors))
        }
    }

    /// Execute a batch of requests concurrently.
    ///
    /// Behavior and trade-offs:
    /// - Each request runs the full pipeline independently; one caller's
    ///   rate-limit rejection does not fail the batch.
    /// - Results are returned in submission order so callers can correlate
    ///   partial successes without extra bookkeeping.
    pub async fn execute_many(
        &self,
        reqs: Vec<GenerationRequest>,
    ) -> Vec<Result<RequestOutcome, TriageError>> {
        futures::future::join_all(reqs.into_iter().map(|r| self.execute(r))).await
    }

    fn validate(&self, req: &GenerationRequest) -> Result<(), TriageError> {
        if req.prompt.trim().is_empty() {
            return Err(TriageError::validation("prompt must not be empty"));
        }
        if req.prompt.len() > self.cfg.max_prompt_len {
            return Err(TriageError::validation(format!(
                "prompt length {} exceeds limit {}",
                req.prompt.len(),
                self.cfg.max_prompt_len
            )));
        }
        if req.caller_id.trim().is_empty() {
            return Err(TriageError::validation("caller id must not be empty"));
        }
        if req.caller_id.len() > 128 {
            return Err(TriageError::validation("caller id exceeds 128 bytes"));
        }
        if req.caller_id.chars().any(char::is_control) {
            return Err(TriageError::validation(
                "caller id must not contain control characters",
            ));
        }
        if let Some(key) = req.preferred_provider
            && self.adapter_by_name(key.as_str()).is_none()
        {
            return Err(TriageError::validation(format!(
                "preferred provider not registered: {key}"
            )));
        }
        Ok(())
    }

    /// One breaker-gated, timeout-bounded call to a provider.
    ///
    /// Completed attempts always update metrics and the breaker, including
    /// timeouts and deadline cancellations; a breaker-open rejection updates
    /// neither.
    async fn attempt(
        &self,
        provider: &'static str,
        req: &GenerationRequest,
        started: Instant,
    ) -> Result<GenerateResponse, TriageError> {
        self.breaker.check(provider)?;

        let adapter = self
            .adapter_by_name(provider)
            .ok_or_else(|| TriageError::validation(format!("unknown provider: {provider}")))?;

        let config = self
            .task_configs
            .get(&req.task)
            .cloned()
            .unwrap_or_else(|| TaskConfig::default_for(req.task));
        let gen_req = GenerateRequest {
            task: req.task,
            prompt: req.prompt.clone(),
            config,
        };

        // The caller's deadline can only shorten the per-provider bound.
        let (bound, deadline_bound) = match req.deadline {
            Some(d) => {
                let remaining = d.saturating_sub(started.elapsed());
                if remaining < self.cfg.provider_timeout {
                    (remaining, true)
                } else {
                    (self.cfg.provider_timeout, false)
                }
            }
            None => (self.cfg.provider_timeout, false),
        };

        let attempt_started = Instant::now();
        let result =
            Self::provider_call_with_timeout(provider, bound, adapter.generate(&gen_req)).await;
        let latency_ms = elapsed_ms(attempt_started);

        let result = match result {
            Err(TriageError::ProviderTimeout { .. }) if deadline_bound => {
                Err(TriageError::Cancelled {
                    elapsed_ms: elapsed_ms(started),
                })
            }
            other => other,
        };

        match result {
            Ok(resp) => {
                self.metrics.record(provider, true, latency_ms);
                self.breaker.record_success(provider);
                Ok(resp)
            }
            Err(e) => {
                self.metrics.record(provider, false, latency_ms);
                self.breaker.record_failure(provider);
                Err(tag_err(provider, e))
            }
        }
    }

    async fn success(
        &self,
        req: GenerationRequest,
        cache_key: CacheKey,
        resp: GenerateResponse,
        provider: &'static str,
        used_fallback: bool,
        started: Instant,
    ) -> RequestOutcome {
        self.cache.put(cache_key, resp.text.clone()).await;
        let confidence = crate::confidence::score(&self.cfg.confidence, &resp.text);
        let payload = GenerationPayload::from_provider_text(&resp.text);
        RequestOutcome {
            request_id: Uuid::new_v4(),
            task: req.task,
            caller_id: req.caller_id,
            provider: Some(provider.to_string()),
            used_fallback,
            from_cache: false,
            confidence,
            latency_ms: elapsed_ms(started),
            text: resp.text,
            payload,
        }
    }
}
