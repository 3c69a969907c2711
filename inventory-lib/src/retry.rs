//! How often a failed request is sent again.
//!
//! The same policy covers API calls and table page fetches. A table only
//! sees the final attempt: its status ends up in
//! [`FetchStatus`](crate::table::FetchStatus), never an intermediate one.

use std::time::Duration;

/// Retry policy shared by [`InventoryClient`](crate::InventoryClient) and
/// [`HttpPageFetcher`](crate::table::HttpPageFetcher).
///
/// A page request that keeps answering 503 is sent `1 + max_retries` times
/// before the table reports `HttpError(503)`.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use inventory_lib::retry::RetryConfig;
///
/// // Keep an interactive table snappy
/// let table = RetryConfig::default()
///     .max_retries(2)
///     .initial_delay(Duration::from_millis(200))
///     .max_delay(Duration::from_secs(2));
///
/// // Batch jobs can wait out a throttled backend
/// let batch = RetryConfig::default().max_retries(8);
///
/// # let _ = (table, batch, RetryConfig::no_retry());
/// ```
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Extra attempts after the first one.
    pub max_retries: u32,
    /// Wait before the first retry. Doubles on each further retry.
    pub initial_delay: Duration,
    /// Upper bound of the doubled wait. A `Retry-After` header overrides it.
    pub max_delay: Duration,
    /// Resend on 429 Too Many Requests.
    pub retry_on_429: bool,
    /// Resend on 500..=599.
    pub retry_on_5xx: bool,
    /// Resend when no response arrived at all (connect error, reset, timeout).
    pub retry_on_network: bool,
}

impl Default for RetryConfig {
    /// Three retries starting at one second, capped at 30 seconds.
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            retry_on_429: true,
            retry_on_5xx: true,
            retry_on_network: true,
        }
    }
}

impl RetryConfig {
    /// Every request is sent exactly once. Used by tests and by callers
    /// that want the first error status as is.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            retry_on_429: false,
            retry_on_5xx: false,
            retry_on_network: false,
            ..Default::default()
        }
    }

    pub fn max_retries(mut self, n: u32) -> Self {
        self.max_retries = n;
        self
    }

    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn retry_on_429(mut self, enabled: bool) -> Self {
        self.retry_on_429 = enabled;
        self
    }

    pub fn retry_on_5xx(mut self, enabled: bool) -> Self {
        self.retry_on_5xx = enabled;
        self
    }

    pub fn retry_on_network(mut self, enabled: bool) -> Self {
        self.retry_on_network = enabled;
        self
    }

    /// Returns `true` if a response with this status should be retried
    /// after `attempts` retries have already been spent.
    pub(crate) fn should_retry_status(&self, status: u16, attempts: u32) -> bool {
        if attempts >= self.max_retries {
            return false;
        }
        match status {
            429 => self.retry_on_429,
            500..=599 => self.retry_on_5xx,
            _ => false,
        }
    }

    /// Returns the delay to wait before the next attempt, doubling `delay`
    /// up to `max_delay`.
    pub(crate) fn next_delay(&self, delay: Duration) -> Duration {
        (delay * 2).min(self.max_delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_retries_three_times() {
        let config = RetryConfig::default();
        assert!(config.should_retry_status(503, 0));
        assert!(config.should_retry_status(503, 2));
        assert!(!config.should_retry_status(503, 3));
    }

    #[test]
    fn test_client_errors_are_not_retried() {
        let config = RetryConfig::default();
        assert!(!config.should_retry_status(404, 0));
        assert!(!config.should_retry_status(400, 0));
    }

    #[test]
    fn test_no_retry() {
        let config = RetryConfig::no_retry();
        assert!(!config.should_retry_status(429, 0));
        assert!(!config.should_retry_status(500, 0));
    }

    #[test]
    fn test_throttling_can_be_left_to_the_caller() {
        let config = RetryConfig::default().retry_on_429(false);
        assert!(!config.should_retry_status(429, 0));
        assert!(config.should_retry_status(502, 0));
    }

    #[test]
    fn test_backoff_is_capped() {
        let config = RetryConfig::default().max_delay(Duration::from_secs(3));
        assert_eq!(config.next_delay(Duration::from_secs(1)), Duration::from_secs(2));
        assert_eq!(config.next_delay(Duration::from_secs(2)), Duration::from_secs(3));
    }
}
