// src/services/rate_limit.rs
// DOCUMENTATION: Per-client throttling of login attempts

use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;

use crate::errors::CampingError;

/// Keyed by client IP
pub struct LoginRateLimiter {
    limiter: DefaultKeyedRateLimiter<String>,
}

impl LoginRateLimiter {
    pub fn per_minute(attempts: u32) -> Self {
        let attempts = NonZeroU32::new(attempts).unwrap_or(NonZeroU32::MIN);
        Self {
            limiter: RateLimiter::keyed(Quota::per_minute(attempts)),
        }
    }

    /// Consume one attempt for `client`
    pub fn check(&self, client: &str) -> Result<(), CampingError> {
        self.limiter.check_key(&client.to_string()).map_err(|_| {
            log::warn!("Login rate limit exceeded for {}", client);
            CampingError::RateLimitExceeded
        })
    }

    /// Forget clients whose quota has fully replenished
    pub fn cleanup(&self) {
        self.limiter.retain_recent();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_limits_per_client() {
        let limiter = LoginRateLimiter::per_minute(2);

        assert!(limiter.check("10.0.0.1").is_ok());
        assert!(limiter.check("10.0.0.1").is_ok());
        assert!(matches!(
            limiter.check("10.0.0.1"),
            Err(CampingError::RateLimitExceeded)
        ));

        // Other clients are unaffected
        assert!(limiter.check("10.0.0.2").is_ok());
    }

    #[test]
    fn test_zero_quota_falls_back_to_one() {
        let limiter = LoginRateLimiter::per_minute(0);
        assert_ok!(limiter.check("a"));
        assert_err!(limiter.check("a"));
    }
}
