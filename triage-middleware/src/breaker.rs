//! Per-provider circuit breakers.

use std::collections::HashMap;
use std::sync::Mutex;

use tokio::time::Instant;
use triage_types::{BreakerConfig, BreakerSnapshot, BreakerStatus, TriageError};

/// The per-provider state machine, with the open timestamp carried inside
/// the state so an open circuit always knows when it tripped.
enum State {
    Closed { failures: u32 },
    Open { since: Instant, failures: u32 },
    HalfOpen { failures: u32 },
}

/// Registry of circuit breakers, one per provider.
///
/// All transitions happen inside the registry lock, which is what makes the
/// half-open trial singular: the caller whose `check` performs the
/// Open→HalfOpen transition is the trial, and every other caller sees
/// `HalfOpen` and is rejected until the trial reports back.
pub struct CircuitBreaker {
    cfg: BreakerConfig,
    states: Mutex<HashMap<&'static str, State>>,
}

impl CircuitBreaker {
    /// Create a registry with the given thresholds.
    #[must_use]
    pub fn new(cfg: BreakerConfig) -> Self {
        Self {
            cfg,
            states: Mutex::new(HashMap::new()),
        }
    }

    /// Gate one request to `provider`.
    ///
    /// A closed circuit admits the request. An open circuit rejects it until
    /// `open_timeout` has elapsed since the last failure, at which point the
    /// first caller through becomes the half-open trial; everyone else keeps
    /// being rejected until that trial completes.
    ///
    /// # Errors
    /// Returns `ServiceUnavailable` with the remaining cooldown when the
    /// circuit is open or a trial is already in flight.
    ///
    /// # Panics
    /// Panics if the internal mutex is poisoned.
    pub fn check(&self, provider: &'static str) -> Result<(), TriageError> {
        let mut states = self.states.lock().expect("mutex poisoned");
        let state = states.entry(provider).or_insert(State::Closed { failures: 0 });

        match *state {
            State::Closed { .. } => Ok(()),
            State::Open { since, failures } => {
                let elapsed = Instant::now().duration_since(since);
                if elapsed >= self.cfg.open_timeout {
                    *state = State::HalfOpen { failures };
                    #[cfg(feature = "tracing")]
                    tracing::info!(provider, "circuit half-open: admitting trial request");
                    Ok(())
                } else {
                    let retry_in_ms = self
                        .cfg
                        .open_timeout
                        .saturating_sub(elapsed)
                        .as_millis()
                        .try_into()
                        .unwrap_or(u64::MAX);
                    Err(TriageError::service_unavailable(provider, retry_in_ms))
                }
            }
            // Trial already in flight; its outcome decides the next state.
            State::HalfOpen { .. } => Err(TriageError::service_unavailable(provider, 0)),
        }
    }

    /// Record a completed successful call: the circuit closes and the
    /// failure streak resets.
    ///
    /// # Panics
    /// Panics if the internal mutex is poisoned.
    pub fn record_success(&self, provider: &'static str) {
        let mut states = self.states.lock().expect("mutex poisoned");
        states.insert(provider, State::Closed { failures: 0 });
    }

    /// Record a completed failed call.
    ///
    /// Reaching the threshold while closed trips the circuit; a failed
    /// half-open trial re-opens it with a refreshed timestamp.
    ///
    /// # Panics
    /// Panics if the internal mutex is poisoned.
    pub fn record_failure(&self, provider: &'static str) {
        let mut states = self.states.lock().expect("mutex poisoned");
        let state = states.entry(provider).or_insert(State::Closed { failures: 0 });

        *state = match *state {
            State::Closed { failures } => {
                let failures = failures.saturating_add(1);
                if failures >= self.cfg.threshold {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(provider, failures, "circuit opened");
                    State::Open {
                        since: Instant::now(),
                        failures,
                    }
                } else {
                    State::Closed { failures }
                }
            }
            State::HalfOpen { failures } | State::Open { failures, .. } => {
                #[cfg(feature = "tracing")]
                tracing::warn!(provider, "circuit re-opened");
                State::Open {
                    since: Instant::now(),
                    failures: failures.saturating_add(1),
                }
            }
        };
    }

    /// Point-in-time view of one provider's circuit.
    ///
    /// Providers with no recorded traffic report closed with no failures.
    ///
    /// # Panics
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn snapshot(&self, provider: &str) -> BreakerSnapshot {
        let states = self.states.lock().expect("mutex poisoned");
        states.get(provider).map_or(
            BreakerSnapshot {
                status: BreakerStatus::Closed,
                consecutive_failures: 0,
                last_failure_age_ms: None,
            },
            Self::snapshot_state,
        )
    }

    /// Reset every circuit to closed with a clean failure streak.
    ///
    /// # Panics
    /// Panics if the internal mutex is poisoned.
    pub fn reset_all(&self) {
        let mut states = self.states.lock().expect("mutex poisoned");
        states.clear();
    }

    fn snapshot_state(state: &State) -> BreakerSnapshot {
        match *state {
            State::Closed { failures } => BreakerSnapshot {
                status: BreakerStatus::Closed,
                consecutive_failures: failures,
                last_failure_age_ms: None,
            },
            State::Open { since, failures } => BreakerSnapshot {
                status: BreakerStatus::Open,
                consecutive_failures: failures,
                last_failure_age_ms: Some(
                    Instant::now()
                        .duration_since(since)
                        .as_millis()
                        .try_into()
                        .unwrap_or(u64::MAX),
                ),
            },
            State::HalfOpen { failures } => BreakerSnapshot {
                status: BreakerStatus::HalfOpen,
                consecutive_failures: failures,
                last_failure_age_ms: None,
            },
        }
    }
}
