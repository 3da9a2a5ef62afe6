//! Rate Limiting Infrastructure
//!
//! Common rate limiting abstractions. Limits are fixed-window counters
//! keyed on a hashed client identity per scope; the storage backend
//! provides the atomic check-and-increment.

use std::time::Duration;

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests allowed in the window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window: Duration::from_secs(60),
        }
    }
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }

    /// Login endpoint default: 5 attempts per 15 minutes
    pub fn login() -> Self {
        Self::new(5, 15 * 60)
    }

    /// Public form default: 3 submissions per hour
    pub fn form() -> Self {
        Self::new(3, 3600)
    }

    pub fn window_ms(&self) -> i64 {
        self.window.as_millis() as i64
    }

    /// Start of the fixed window containing `now_ms`
    pub fn window_start(&self, now_ms: i64) -> i64 {
        (now_ms / self.window_ms()) * self.window_ms()
    }
}

/// Rate limit check result
#[derive(Debug, Clone)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub remaining: u32,
    pub reset_at_ms: i64,
}

impl RateLimitResult {
    /// Seconds until the window resets, rounded up, at least 1
    pub fn retry_after_secs(&self, now_ms: i64) -> u64 {
        let remaining_ms = (self.reset_at_ms - now_ms).max(0) as u64;
        remaining_ms.div_ceil(1000).max(1)
    }
}

/// Trait for rate limit storage backends
#[trait_variant::make(RateLimitStore: Send)]
pub trait LocalRateLimitStore {
    /// Atomically record a request for `(scope, key)` and report whether
    /// it falls within the configured budget for the current window.
    async fn check_and_increment(
        &self,
        scope: &str,
        key: &[u8],
        config: &RateLimitConfig,
    ) -> Result<RateLimitResult, Box<dyn std::error::Error + Send + Sync>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_start_is_aligned() {
        let config = RateLimitConfig::new(5, 60);
        assert_eq!(config.window_start(0), 0);
        assert_eq!(config.window_start(59_999), 0);
        assert_eq!(config.window_start(60_000), 60_000);
        assert_eq!(config.window_start(90_500), 60_000);
    }

    #[test]
    fn test_defaults() {
        let login = RateLimitConfig::login();
        assert_eq!(login.max_requests, 5);
        assert_eq!(login.window, Duration::from_secs(900));

        let form = RateLimitConfig::form();
        assert_eq!(form.max_requests, 3);
        assert_eq!(form.window, Duration::from_secs(3600));
    }

    #[test]
    fn test_retry_after_rounds_up() {
        let result = RateLimitResult {
            allowed: false,
            remaining: 0,
            reset_at_ms: 10_500,
        };
        assert_eq!(result.retry_after_secs(10_000), 1);
        assert_eq!(result.retry_after_secs(9_000), 2);
        // Window already reset: still hint at least one second
        assert_eq!(result.retry_after_secs(11_000), 1);
    }
}
