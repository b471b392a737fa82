//! Bounded retries and randomized pauses.
//!
//! Both page sources retry the same way: an explicit loop that makes at most
//! `max_retries + 1` attempts and sleeps a jittered backoff between them.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tracing::warn;

use crate::error::Result;
use crate::options::DelayRange;

/// How often, and how patiently, an operation is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Pause between attempts.
    pub backoff: DelayRange,
    /// Extra random milliseconds added to each pause.
    pub jitter_ms: u64,
}

impl RetryPolicy {
    #[must_use]
    pub const fn new(max_retries: u32, backoff: DelayRange, jitter_ms: u64) -> Self {
        Self {
            max_retries,
            backoff,
            jitter_ms,
        }
    }

    /// Total attempts this policy allows.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

/// Sample a duration from `range` plus up to `jitter_ms` extra.
#[must_use]
pub fn jittered(range: DelayRange, jitter_ms: u64) -> Duration {
    let mut rng = rand::thread_rng();
    let base = if range.max_ms > range.min_ms {
        rng.gen_range(range.min_ms..=range.max_ms)
    } else {
        range.min_ms
    };
    let jitter = if jitter_ms > 0 { rng.gen_range(0..=jitter_ms) } else { 0 };
    Duration::from_millis(base.saturating_add(jitter))
}

/// Sleep for a jittered duration. Zero ranges return immediately.
pub async fn pause(range: DelayRange, jitter_ms: u64) {
    let delay = jittered(range, jitter_ms);
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

/// Run `operation` until it succeeds or the policy is exhausted.
///
/// `operation` receives the zero-based attempt number. The error of the last
/// attempt is returned when every attempt fails.
pub async fn retry<T, F, Fut>(policy: &RetryPolicy, label: &str, url: &str, mut operation: F) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < policy.max_retries => {
                warn!(
                    source = label,
                    url = %url,
                    attempt = attempt + 1,
                    max_attempts = policy.max_attempts(),
                    error = %err,
                    "attempt failed, retrying"
                );
                pause(policy.backoff, policy.jitter_ms).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
