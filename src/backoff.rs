//! Backoff scheduling for remote calls
//!
//! Computes and performs wait durations between attempts. Explicit signals
//! from the service (Retry-After, quota reset time) take priority; without
//! one the scheduler falls back to exponential backoff by attempt index.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::notice::Notice;

/// Exponent offset for attempt-indexed backoff: attempt 0 waits 2^4 = 16 s
const ATTEMPT_BACKOFF_BASE_EXP: u32 = 4;

/// What to wait on before the next attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitSignal {
    /// Explicit Retry-After duration, in seconds
    RetryAfter(u64),
    /// Wait until the quota reset timestamp
    UntilReset(DateTime<Utc>),
    /// No explicit signal: exponential backoff by attempt index
    Attempt(u32),
    /// Fixed pause (post-success pacing)
    Pause(Duration),
}

/// Deterministic delay for a signal, evaluated at `now`
///
/// Never returns a negative duration; a reset time already in the past
/// yields zero.
pub fn delay_for(signal: &WaitSignal, now: DateTime<Utc>) -> Duration {
    match signal {
        WaitSignal::RetryAfter(secs) => Duration::from_secs(*secs),
        WaitSignal::UntilReset(reset_at) => {
            let remaining = reset_at.signed_duration_since(now).num_seconds();
            Duration::from_secs(remaining.max(0) as u64)
        }
        WaitSignal::Attempt(i) => {
            Duration::from_secs(2u64.pow(i.saturating_add(ATTEMPT_BACKOFF_BASE_EXP)))
        }
        WaitSignal::Pause(d) => *d,
    }
}

/// Performs the actual sleep, injectable so tests don't wait
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real wall-clock sleeper
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Scheduler that computes a delay, announces it, and performs the wait
pub struct Backoff {
    sleeper: Arc<dyn Sleeper>,
    notifier: Arc<dyn Notice>,
}

impl Backoff {
    pub fn new(sleeper: Arc<dyn Sleeper>, notifier: Arc<dyn Notice>) -> Self {
        Self { sleeper, notifier }
    }

    /// Wait out `signal`, returning the elapsed delay
    ///
    /// Waiting zero is a no-op: nothing is announced and the sleeper is not
    /// invoked.
    pub async fn wait_for(&self, signal: &WaitSignal, reason: &str) -> Duration {
        let delay = delay_for(signal, Utc::now());
        if delay.is_zero() {
            return delay;
        }
        debug!("waiting {}s: {reason}", delay.as_secs());
        self.notifier
            .notice(&format!("{reason}; waiting {}s", delay.as_secs()));
        self.sleeper.sleep(delay).await;
        delay
    }
}
