use std::{future::Future, time::Duration};

use rand::Rng;
use tracing::warn;

use crate::error::SwipeError;

/// Backoff for idempotent store steps. Only [`SwipeError::StoreUnavailable`] is retried.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            attempts: 3,
            base_delay: Duration::from_millis(25),
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        RetryPolicy {
            attempts: 1,
            base_delay: Duration::ZERO,
        }
    }

    fn delay(&self, attempt: u32) -> Duration {
        let exp = self.base_delay.saturating_mul(1 << attempt.min(6));
        let jitter_ms = exp.as_millis() as u64 / 2;
        let jitter = if jitter_ms == 0 {
            0
        } else {
            rand::rng().random_range(0..=jitter_ms)
        };
        exp + Duration::from_millis(jitter)
    }

    pub async fn run<T, F, Fut>(&self, what: &str, mut op: F) -> Result<T, SwipeError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, SwipeError>>,
    {
        let attempts = self.attempts.max(1);
        let mut attempt = 0;
        loop {
            match op().await {
                Err(err) if err.is_transient() && attempt + 1 < attempts => {
                    let delay = self.delay(attempt);
                    warn!(what, attempt, ?delay, error = %err, "retrying store operation");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}
