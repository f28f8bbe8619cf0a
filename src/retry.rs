//! Bounded retry with jittered backoff for network calls

use crate::error::{JobHunterError, Result};
use log::{debug, warn};
use rand::Rng;
use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub min_delay: Duration,
    pub max_delay: Duration,
    /// Upper bound for a single attempt
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            min_delay: Duration::from_millis(1500),
            max_delay: Duration::from_millis(3500),
            timeout: Duration::from_secs(15),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, min_delay: Duration, max_delay: Duration, timeout: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            min_delay: min_delay.min(max_delay),
            max_delay,
            timeout,
        }
    }

    /// Policy without pauses between attempts
    pub fn immediate(max_attempts: u32, timeout: Duration) -> Self {
        Self::new(max_attempts, Duration::ZERO, Duration::ZERO, timeout)
    }

    /// Run `operation` until it succeeds or attempts run out, returning the last error
    pub async fn execute<T, F, Fut>(&self, label: &str, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut last_error = None;

        for attempt in 1..=self.max_attempts {
            let outcome = match tokio::time::timeout(self.timeout, operation()).await {
                Ok(result) => result,
                Err(_) => Err(JobHunterError::Timeout(self.timeout)),
            };

            match outcome {
                Ok(value) => return Ok(value),
                Err(e) => {
                    warn!("{} failed (attempt {}/{}): {}", label, attempt, self.max_attempts, e);
                    last_error = Some(e);
                }
            }

            if attempt < self.max_attempts {
                let delay = self.jittered_delay();
                debug!("Retrying {} in {:?}", label, delay);
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            JobHunterError::Network(format!("{}: no attempts were made", label))
        }))
    }

    /// Like `execute`, but exhaustion yields `None` ("no result")
    pub async fn attempt<T, F, Fut>(&self, label: &str, operation: F) -> Option<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        match self.execute(label, operation).await {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Giving up on {} after {} attempts: {}", label, self.max_attempts, e);
                None
            }
        }
    }

    /// Uniformly random pause within the configured range
    pub fn jittered_delay(&self) -> Duration {
        random_delay(self.min_delay, self.max_delay)
    }
}

/// Uniform delay in `[min, max]`
pub fn random_delay(min: Duration, max: Duration) -> Duration {
    let min_ms = min.as_millis() as u64;
    let max_ms = max.as_millis() as u64;
    if max_ms <= min_ms {
        return min;
    }
    Duration::from_millis(rand::thread_rng().gen_range(min_ms..=max_ms))
}
