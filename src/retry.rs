//! Resilient call wrapper
//!
//! Runs a single remote operation with bounded retries, a pre-call quota
//! guard, and post-success pacing for mutating calls. The orchestrator never
//! sees individual attempts, only the terminal outcome.

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::backoff::{Backoff, Sleeper, TokioSleeper, WaitSignal};
use crate::config::CallsConfig;
use crate::host::{HostError, QuotaProbe};
use crate::notice::Notice;

/// Terminal failure of a wrapped call
#[derive(Debug, Error)]
pub enum CallError {
    /// All attempts were spent on transient errors
    #[error("gave up after {attempts} attempts: {source}")]
    Exhausted { attempts: u32, source: HostError },

    /// A non-retryable error was surfaced immediately
    #[error("{0}")]
    Fatal(HostError),
}

/// Retries one remote operation a bounded number of times
///
/// Quota state is fetched fresh before every attempt; a shrinking quota
/// (below the low-water mark) forces a wait until the published reset time
/// regardless of whether the call mutates anything.
pub struct CallRunner {
    max_tries: u32,
    mutation_pause: Duration,
    low_water_mark: u64,
    unpaced: bool,
    backoff: Backoff,
    notifier: Arc<dyn Notice>,
}

impl CallRunner {
    pub fn new(calls: &CallsConfig, unpaced: bool, notifier: Arc<dyn Notice>) -> Self {
        Self::with_sleeper(calls, unpaced, notifier, Arc::new(TokioSleeper))
    }

    /// Construct with an injected sleeper (tests wait on a fake clock)
    pub fn with_sleeper(
        calls: &CallsConfig,
        unpaced: bool,
        notifier: Arc<dyn Notice>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            max_tries: calls.max_tries.max(1),
            mutation_pause: Duration::from_secs(calls.mutation_pause_secs),
            low_water_mark: calls.low_water_mark,
            unpaced,
            backoff: Backoff::new(sleeper, notifier.clone()),
            notifier,
        }
    }

    /// Run `op` to a terminal outcome
    ///
    /// `op` is executed at most `max_tries` times. `mutating` requests a
    /// short post-success pause so a burst of writes does not trip the rate
    /// limit, skipped when the runner is unpaced.
    pub async fn execute<T, F, Fut>(
        &self,
        probe: &dyn QuotaProbe,
        mutating: bool,
        op: F,
    ) -> Result<T, CallError>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T, HostError>>,
    {
        let mut last_transient: Option<HostError> = None;

        for attempt in 0..self.max_tries {
            if attempt > 0 {
                self.notifier
                    .notice(&format!("Retrying {} of {}", attempt + 1, self.max_tries));
            }

            self.guard_quota(probe).await;

            match op().await {
                Ok(value) => {
                    if mutating && !self.unpaced {
                        self.backoff
                            .wait_for(
                                &WaitSignal::Pause(self.mutation_pause),
                                "a slight pause after a mutating call",
                            )
                            .await;
                    }
                    return Ok(value);
                }
                Err(err) if err.is_transient() => {
                    debug!("attempt {} failed: {err}", attempt + 1);
                    self.back_off(&err, attempt).await;
                    last_transient = Some(err);
                }
                Err(err) => return Err(CallError::Fatal(err)),
            }
        }

        // Exhausted retries escalate rather than get swallowed.
        let source = last_transient
            .unwrap_or_else(|| HostError::Transient("no attempt recorded".into()));
        Err(CallError::Exhausted {
            attempts: self.max_tries,
            source,
        })
    }

    /// Pre-call quota check against a fresh snapshot
    ///
    /// Honors an explicit retry-after first, then waits for the reset when
    /// remaining quota is below the low-water mark. A failing probe is
    /// advisory only: the attempt proceeds unguarded.
    async fn guard_quota(&self, probe: &dyn QuotaProbe) {
        let snapshot = match probe.current_limit().await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                self.notifier
                    .warning(&format!("could not check rate limit: {err}"));
                return;
            }
        };

        if let Some(secs) = snapshot.retry_after_secs.filter(|&s| s > 0) {
            self.backoff
                .wait_for(&WaitSignal::RetryAfter(secs), "rate limit retry-after")
                .await;
        } else if snapshot.remaining < self.low_water_mark {
            self.backoff
                .wait_for(
                    &WaitSignal::UntilReset(snapshot.reset_at),
                    "rate limit quota nearly spent; waiting until reset",
                )
                .await;
        }
    }

    /// Wait between attempts, preferring hints carried by the error
    async fn back_off(&self, err: &HostError, attempt: u32) {
        let (signal, reason) = match err {
            HostError::RateLimited {
                retry_after: Some(secs),
                ..
            } => (WaitSignal::RetryAfter(*secs), "rate limit exceeded; retry after"),
            HostError::RateLimited {
                reset_at: Some(reset),
                ..
            } => (
                WaitSignal::UntilReset(*reset),
                "rate limit exceeded; waiting until reset",
            ),
            _ => (WaitSignal::Attempt(attempt), "remote error, backing off"),
        };
        self.backoff.wait_for(&signal, reason).await;
    }
}
