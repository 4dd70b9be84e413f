//! Retry policy applied by the [`Pipeline`](super::Pipeline).

use std::time::Duration;

use reqwest::StatusCode;

/// Statuses that indicate a transient condition on the service side.
const RETRIABLE_STATUSES: [StatusCode; 6] = [
    StatusCode::REQUEST_TIMEOUT,
    StatusCode::TOO_MANY_REQUESTS,
    StatusCode::INTERNAL_SERVER_ERROR,
    StatusCode::BAD_GATEWAY,
    StatusCode::SERVICE_UNAVAILABLE,
    StatusCode::GATEWAY_TIMEOUT,
];

/// Returns `true` if a response with `status` may be retried.
pub fn is_retriable_status(status: StatusCode) -> bool {
    RETRIABLE_STATUSES.contains(&status)
}

/// Controls how often and how patiently a pipeline retries.
///
/// ## Examples
///
/// ```rust
/// use std::time::Duration;
/// use switchboard::RetryOptions;
///
/// let retry = RetryOptions::default().max_retries(5).retry_delay(Duration::from_millis(100));
/// assert_eq!(retry.delay_for(1), Duration::from_millis(100));
/// assert_eq!(retry.delay_for(3), Duration::from_millis(400));
///
/// assert_eq!(RetryOptions::disabled().max_attempts(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryOptions {
    max_retries: u32,
    retry_delay: Duration,
    max_retry_delay: Duration,
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: Duration::from_millis(800),
            max_retry_delay: Duration::from_secs(60),
        }
    }
}

impl RetryOptions {
    /// A policy that sends each request exactly once.
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the delay before the first retry; later retries double it.
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn max_retry_delay(mut self, delay: Duration) -> Self {
        self.max_retry_delay = delay;
        self
    }

    /// Total number of times a request may be sent.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay before retry number `retry` (1-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.retry_delay
            .checked_mul(factor)
            .unwrap_or(self.max_retry_delay)
            .min(self.max_retry_delay)
    }
}
