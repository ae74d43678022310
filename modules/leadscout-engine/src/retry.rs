use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

/// Source of backoff delays. Production uses [`TokioDelay`]; tests inject a
/// recording implementation so backoff is observable without wall-clock waits.
#[async_trait]
pub trait DelaySource: Send + Sync {
    async fn sleep(&self, delay: Duration);
}

pub struct TokioDelay;

#[async_trait]
impl DelaySource for TokioDelay {
    async fn sleep(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

/// Retry with exponential backoff: attempt `n` waits
/// `base_delay * multiplier^n` before the next try.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            multiplier: 2,
        }
    }
}

impl RetryPolicy {
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * self.multiplier.pow(attempt)
    }

    /// Run `op` until it succeeds or attempts are exhausted. Sleeps between
    /// failed attempts through `delay`, never after the final one; the last
    /// error propagates unchanged.
    pub async fn run<T, E, F, Fut>(&self, delay: &dyn DelaySource, mut op: F) -> Result<T, E>
    where
        E: std::fmt::Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let attempts = self.max_attempts.max(1);
        let mut last_err = None;

        for attempt in 0..attempts {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    let backoff = self.delay_for(attempt);
                    warn!(
                        attempt = attempt + 1,
                        max_attempts = attempts,
                        delay_ms = backoff.as_millis() as u64,
                        error = %e,
                        "Attempt failed, retrying after backoff"
                    );
                    last_err = Some(e);
                    if attempt + 1 < attempts {
                        delay.sleep(backoff).await;
                    }
                }
            }
        }

        Err(last_err.expect("retry loop runs at least once"))
    }
}
