//! Rate limiting service for controlling request frequency.

use crate::config::RateLimitConfig;
use crate::error::ApiError;
use crate::utils::extract_client_ip;
use actix_web::HttpRequest;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};
use tracing::warn;

/// Simple in-memory rate limiter
///
/// Counts requests per client key in fixed windows of `period_seconds`.
/// Clones share the same counters.
#[derive(Clone)]
pub struct SimpleRateLimiter {
    config: RateLimitConfig,
    storage: Arc<Mutex<HashMap<String, (usize, Instant)>>>,
}

impl SimpleRateLimiter {
    /// Create a new rate limiter with the given configuration
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            storage: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Check if the given key (typically IP address) is within rate limits
    ///
    /// Returns `true` if the request should be allowed, `false` if rate limited.
    pub fn check_rate_limit(&self, key: &str) -> bool {
        let mut storage = self.storage.lock().unwrap_or_else(|p| p.into_inner());
        let now = Instant::now();
        let period = Duration::from_secs(self.config.period_seconds);

        storage.retain(|_, (_, window_start)| now.duration_since(*window_start) < period);

        match storage.get_mut(key) {
            Some((count, _)) if *count >= self.config.requests_per_period => false,
            Some((count, _)) => {
                *count += 1;
                true
            }
            None => {
                storage.insert(key.to_string(), (1, now));
                true
            }
        }
    }
}

/// Reject the request with 429 when its client is over budget.
pub fn enforce_rate_limit(req: &HttpRequest, limiter: &SimpleRateLimiter) -> Result<(), ApiError> {
    let ip = extract_client_ip(req);

    if !limiter.check_rate_limit(&ip) {
        warn!(client_ip = %ip, path = %req.path(), "Rate limit exceeded");
        return Err(ApiError::RateLimited);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn limiter(requests_per_period: usize) -> SimpleRateLimiter {
        SimpleRateLimiter::new(RateLimitConfig {
            requests_per_period,
            period_seconds: 60,
        })
    }

    #[test]
    fn test_budget_is_per_key() {
        let limiter = limiter(2);
        assert!(limiter.check_rate_limit("10.0.0.1"));
        assert!(limiter.check_rate_limit("10.0.0.1"));
        assert!(!limiter.check_rate_limit("10.0.0.1"));
        assert!(limiter.check_rate_limit("10.0.0.2"));
    }

    #[test]
    fn test_clones_share_counters() {
        let limiter = limiter(1);
        let worker_copy = limiter.clone();
        assert!(limiter.check_rate_limit("10.0.0.1"));
        assert!(!worker_copy.check_rate_limit("10.0.0.1"));
    }

    #[test]
    fn test_enforce_uses_forwarded_ip() {
        let limiter = limiter(1);
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", "203.0.113.7, 10.0.0.1"))
            .to_http_request();

        assert!(enforce_rate_limit(&req, &limiter).is_ok());
        let limited = enforce_rate_limit(&req, &limiter);
        assert_eq!(limited, Err(ApiError::RateLimited));
    }
}
