//! Shared retry/backoff primitive.
//!
//! Both retry loops in the fetch layer run through [`RetryPolicy::run`]:
//! the strategy sweep (randomized inter-attempt delay) and the per-source
//! sweep retry (linear backoff). The delay shape is the only difference
//! between them.

use std::future::Future;
use std::time::Duration;

/// How long to wait before attempt `n + 1` after attempt `n` failed.
#[derive(Debug, Clone, Copy)]
pub enum BackoffShape {
    /// Fixed unit scaled by the failed attempt index: `unit`, `2×unit`, …
    Linear { unit: Duration },

    /// Uniformly random delay in `[min, max]`, independent of the
    /// attempt index. Avoids a fixed timing fingerprint.
    Jittered { min: Duration, max: Duration },
}

impl BackoffShape {
    /// Delay after `failed_attempts` attempts have failed (1-based).
    pub fn delay_after(&self, failed_attempts: u32) -> Duration {
        match *self {
            Self::Linear { unit } => unit * failed_attempts,
            Self::Jittered { min, max } => {
                if max <= min {
                    return min;
                }
                let span = (max - min).as_millis() as u64;
                min + Duration::from_millis(rand::random_range(0..=span))
            }
        }
    }
}

/// Bounded retry loop: at most `max_attempts` calls, waiting per the
/// backoff shape between attempts (never before the first).
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub shape: BackoffShape,
}

impl RetryPolicy {
    /// Run `op` until it succeeds or attempts are exhausted.
    ///
    /// `op` receives the 1-based attempt number (the sweep uses it to
    /// select a strategy). The error of the final attempt is returned.
    pub async fn run<T, E, F, Fut>(&self, mut op: F) -> Result<T, E>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let attempts = self.max_attempts.max(1);

        for attempt in 1..attempts {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(_) => {
                    let delay = self.shape.delay_after(attempt);
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        op(attempts).await
    }
}
