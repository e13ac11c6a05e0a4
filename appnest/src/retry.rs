//! Retry utilities with configurable backoff and jitter.
//!
//! The pipeline ships with retries disabled (`max_attempts = 1`): a failed
//! outbound call surfaces to the caller immediately, matching the
//! no-retry contract of the webhook and agent calls. Operators opt in to
//! retries explicitly through [`RetryConfig`].

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

/// Backoff strategy for retry delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BackoffStrategy {
    /// delay = base * 2^attempt
    #[default]
    Exponential,
    /// delay = base * (attempt + 1)
    Linear,
    /// delay = base (constant)
    Constant,
}

/// Jitter strategy to prevent thundering herd.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JitterStrategy {
    /// No jitter
    None,
    /// Random from 0 to delay
    #[default]
    Full,
    /// Half fixed, half random
    Equal,
}

/// Configuration for retry behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum attempts (including the initial one).
    pub max_attempts: usize,
    /// Base delay between retries in milliseconds.
    pub base_delay_ms: u64,
    /// Maximum delay cap in milliseconds.
    pub max_delay_ms: u64,
    /// Backoff strategy.
    pub backoff_strategy: BackoffStrategy,
    /// Jitter strategy.
    pub jitter_strategy: JitterStrategy,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            base_delay_ms: 1000,
            max_delay_ms: 30000,
            backoff_strategy: BackoffStrategy::Exponential,
            jitter_strategy: JitterStrategy::Full,
        }
    }
}

impl RetryConfig {
    /// Creates a config with retries disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum attempts.
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Sets the base delay.
    #[must_use]
    pub fn with_base_delay_ms(mut self, delay: u64) -> Self {
        self.base_delay_ms = delay;
        self
    }

    /// Sets the maximum delay.
    #[must_use]
    pub fn with_max_delay_ms(mut self, delay: u64) -> Self {
        self.max_delay_ms = delay;
        self
    }

    /// Sets the backoff strategy.
    #[must_use]
    pub fn with_backoff(mut self, strategy: BackoffStrategy) -> Self {
        self.backoff_strategy = strategy;
        self
    }

    /// Sets the jitter strategy.
    #[must_use]
    pub fn with_jitter(mut self, strategy: JitterStrategy) -> Self {
        self.jitter_strategy = strategy;
        self
    }

    /// Computes the delay before the given retry attempt (1-indexed).
    #[must_use]
    pub fn compute_delay(&self, attempt: usize) -> Duration {
        let exponent = u32::try_from(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
        let raw = match self.backoff_strategy {
            BackoffStrategy::Exponential => self
                .base_delay_ms
                .saturating_mul(2u64.saturating_pow(exponent)),
            BackoffStrategy::Linear => self.base_delay_ms.saturating_mul(attempt as u64),
            BackoffStrategy::Constant => self.base_delay_ms,
        };
        let capped = raw.min(self.max_delay_ms);

        let jittered = match self.jitter_strategy {
            JitterStrategy::None => capped,
            JitterStrategy::Full => rand::thread_rng().gen_range(0..=capped),
            JitterStrategy::Equal => capped / 2 + rand::thread_rng().gen_range(0..=capped / 2),
        };

        Duration::from_millis(jittered)
    }
}

/// Runs an async operation under the given retry policy.
///
/// With the default config this is a plain passthrough: the operation runs
/// once and its result is returned as-is.
pub async fn run_with_retry<T, E, F, Fut>(config: &RetryConfig, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 0usize;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                attempt += 1;
                if attempt >= config.max_attempts {
                    return Err(err);
                }
                let delay = config.compute_delay(attempt);
                tracing::warn!(
                    error = %err,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "retrying after failure"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_default_is_single_attempt() {
        assert_eq!(RetryConfig::default().max_attempts, 1);
    }

    #[test]
    fn test_max_attempts_floor_is_one() {
        assert_eq!(RetryConfig::new().with_max_attempts(0).max_attempts, 1);
    }

    #[test]
    fn test_exponential_delay_without_jitter() {
        let config = RetryConfig::new()
            .with_base_delay_ms(100)
            .with_jitter(JitterStrategy::None);

        assert_eq!(config.compute_delay(1), Duration::from_millis(100));
        assert_eq!(config.compute_delay(2), Duration::from_millis(200));
        assert_eq!(config.compute_delay(3), Duration::from_millis(400));
    }

    #[test]
    fn test_delay_is_capped() {
        let config = RetryConfig::new()
            .with_base_delay_ms(1000)
            .with_max_delay_ms(1500)
            .with_jitter(JitterStrategy::None);

        assert_eq!(config.compute_delay(10), Duration::from_millis(1500));
    }

    #[test]
    fn test_full_jitter_stays_within_bound() {
        let config = RetryConfig::new().with_base_delay_ms(100);
        for attempt in 1..5 {
            assert!(config.compute_delay(attempt) <= Duration::from_millis(30000));
        }
    }

    #[tokio::test]
    async fn test_no_retry_by_default() {
        let calls = AtomicUsize::new(0);
        let result: Result<(), String> = run_with_retry(&RetryConfig::default(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err("boom".to_string()) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let config = RetryConfig::new()
            .with_max_attempts(3)
            .with_base_delay_ms(1)
            .with_jitter(JitterStrategy::None);

        let calls = AtomicUsize::new(0);
        let result: Result<usize, String> = run_with_retry(&config, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err("transient".to_string())
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
