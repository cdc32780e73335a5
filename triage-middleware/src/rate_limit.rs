//! Per-caller request budgets over a fixed accounting window.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;
use triage_types::{RateLimitConfig, TriageError};

/// Per-caller fixed-window request counter.
///
/// Windows are created lazily on a caller's first request and re-aligned to
/// regular boundaries when they expire, so admission cadence stays stable
/// even across idle gaps. The check-and-increment is a single critical
/// section: two concurrent requests for the same caller can never both
/// observe a free slot and both be admitted past the limit.
pub struct RateLimiter {
    cfg: RateLimitConfig,
    windows: Mutex<HashMap<String, CallerWindow>>,
}

struct CallerWindow {
    window_start: Instant,
    count: u64,
}

impl RateLimiter {
    /// Create a limiter for the given budget.
    #[must_use]
    pub fn new(cfg: RateLimitConfig) -> Self {
        // Avoid zero-length windows; the boundary arithmetic divides by it.
        let window = cfg.window.max(Duration::from_millis(1));
        Self {
            cfg: RateLimitConfig {
                limit: cfg.limit,
                window,
            },
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Admit or reject one request from `caller_id`, charging the window on
    /// admission.
    ///
    /// # Errors
    /// Returns `RateLimitExceeded` carrying the time until the current
    /// window ends when the caller's budget is exhausted.
    ///
    /// # Panics
    /// Panics if the internal mutex is poisoned.
    pub fn check(&self, caller_id: &str) -> Result<(), TriageError> {
        let mut windows = self.windows.lock().expect("mutex poisoned");
        let now = Instant::now();

        let w = windows
            .entry(caller_id.to_string())
            .or_insert(CallerWindow {
                window_start: now,
                count: 0,
            });

        // Reset window if elapsed
        let elapsed = now.duration_since(w.window_start);
        if elapsed >= self.cfg.window {
            w.count = 0;
            // Align window_start to the beginning of the current window by
            // calculating how many complete windows have passed and advancing
            // by that amount, so boundaries stay regular across idle gaps.
            let windows_passed = elapsed.as_nanos() / self.cfg.window.as_nanos();
            let boundary_offset = Duration::from_nanos(
                (windows_passed * self.cfg.window.as_nanos())
                    .try_into()
                    .unwrap_or(u64::MAX),
            );
            w.window_start += boundary_offset;
        }

        if w.count < self.cfg.limit {
            w.count += 1;
            return Ok(());
        }

        let elapsed = now.duration_since(w.window_start);
        let retry_after_ms = self
            .cfg
            .window
            .saturating_sub(elapsed)
            .as_millis()
            .try_into()
            .unwrap_or(u64::MAX);
        Err(TriageError::RateLimitExceeded {
            limit: self.cfg.limit,
            window_ms: self.cfg.window.as_millis().try_into().unwrap_or(u64::MAX),
            retry_after_ms,
        })
    }

    /// Callers whose current window is exhausted right now.
    ///
    /// Expired windows are not counted; they will reset on the caller's next
    /// request.
    ///
    /// # Panics
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn limited_callers(&self) -> Vec<String> {
        let windows = self.windows.lock().expect("mutex poisoned");
        let now = Instant::now();
        let mut out: Vec<String> = windows
            .iter()
            .filter(|(_, w)| {
                now.duration_since(w.window_start) < self.cfg.window && w.count >= self.cfg.limit
            })
            .map(|(caller, _)| caller.clone())
            .collect();
        out.sort_unstable();
        out
    }
}
