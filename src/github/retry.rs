// Retry policy with exponential backoff.
// Drives a fallible async operation through attempt, wait, and give-up steps.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{DocsError, Result};

/// Default number of attempts per request.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default delay before the first retry; doubles on each subsequent one.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// What to do after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryStep {
    /// Sleep for the given delay, then attempt again.
    Wait(Duration),
    /// Attempts are exhausted.
    Fail,
}

/// Bounded retry with exponential backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    pub const fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Delay after the given failed attempt (1-based): base, 2·base, 4·base, ...
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor)
    }

    /// Next step after `attempt` (1-based) has failed.
    pub fn after_failure(&self, attempt: u32) -> RetryStep {
        if attempt >= self.max_attempts {
            RetryStep::Fail
        } else {
            RetryStep::Wait(self.delay_for(attempt))
        }
    }

    /// Run `f` until it succeeds or the attempts are used up.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut f: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;

        loop {
            attempt += 1;

            let err = match f().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(operation, attempt, "request succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(err) => err,
            };

            match self.after_failure(attempt) {
                RetryStep::Wait(delay) => {
                    warn!(
                        operation,
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %err,
                        retry_in_ms = delay.as_millis() as u64,
                        "request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                RetryStep::Fail => {
                    warn!(operation, attempt, error = %err, "request failed, giving up");
                    return Err(DocsError::RetryExhausted {
                        operation: operation.to_string(),
                        attempts: attempt,
                        source: Box::new(err),
                    });
                }
            }
        }
    }
}
