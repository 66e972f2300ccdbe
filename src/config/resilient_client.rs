//! Configuration for the provider HTTP client
//!
//! Provides environment-based configuration for the resilient HTTP client
//! with sensible defaults for production use.

use crate::services::resilient_client::{CircuitBreakerConfig, ResilientClientConfig};
use std::env;

impl ResilientClientConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let request_timeout_seconds = env::var("PROVIDER_CLIENT_REQUEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|&secs: &u64| secs > 0)
            .unwrap_or(defaults.request_timeout_seconds);

        let connect_timeout_seconds = env::var("PROVIDER_CLIENT_CONNECT_TIMEOUT")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|&secs: &u64| secs > 0)
            .unwrap_or(defaults.connect_timeout_seconds);

        let enable_detailed_logging = env::var("PROVIDER_CLIENT_DETAILED_LOGGING")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.enable_detailed_logging);

        Self {
            request_timeout_seconds,
            connect_timeout_seconds,
            circuit_breaker: CircuitBreakerConfig::from_env(),
            enable_detailed_logging,
        }
    }
}

impl CircuitBreakerConfig {
    /// Load circuit breaker configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let failure_threshold = env::var("PROVIDER_CLIENT_CB_FAILURE_THRESHOLD")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.failure_threshold);

        let success_threshold = env::var("PROVIDER_CLIENT_CB_SUCCESS_THRESHOLD")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.success_threshold);

        let timeout_seconds = env::var("PROVIDER_CLIENT_CB_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.timeout_seconds);

        Self {
            failure_threshold,
            success_threshold,
            timeout_seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ENV_MUTEX;

    const VARS: [&str; 6] = [
        "PROVIDER_CLIENT_REQUEST_TIMEOUT",
        "PROVIDER_CLIENT_CONNECT_TIMEOUT",
        "PROVIDER_CLIENT_DETAILED_LOGGING",
        "PROVIDER_CLIENT_CB_FAILURE_THRESHOLD",
        "PROVIDER_CLIENT_CB_SUCCESS_THRESHOLD",
        "PROVIDER_CLIENT_CB_TIMEOUT_SECONDS",
    ];

    fn clear() {
        for var in VARS {
            unsafe { env::remove_var(var) };
        }
    }

    #[test]
    fn test_provider_client_config_defaults() {
        let _lock = ENV_MUTEX.lock().unwrap_or_else(|p| p.into_inner());
        clear();

        let config = ResilientClientConfig::from_env();
        assert_eq!(config.request_timeout_seconds, 5);
        assert_eq!(config.connect_timeout_seconds, 3);
        assert!(config.enable_detailed_logging);
        assert_eq!(config.circuit_breaker.failure_threshold, 5);
        assert_eq!(config.circuit_breaker.success_threshold, 3);
        assert_eq!(config.circuit_breaker.timeout_seconds, 60);
    }

    #[test]
    fn test_provider_client_config_from_env() {
        let _lock = ENV_MUTEX.lock().unwrap_or_else(|p| p.into_inner());
        unsafe {
            env::set_var("PROVIDER_CLIENT_REQUEST_TIMEOUT", "10");
            env::set_var("PROVIDER_CLIENT_CONNECT_TIMEOUT", "2");
            env::set_var("PROVIDER_CLIENT_DETAILED_LOGGING", "false");
            env::set_var("PROVIDER_CLIENT_CB_FAILURE_THRESHOLD", "8");
        }

        let config = ResilientClientConfig::from_env();
        assert_eq!(config.request_timeout_seconds, 10);
        assert_eq!(config.connect_timeout_seconds, 2);
        assert!(!config.enable_detailed_logging);
        assert_eq!(config.circuit_breaker.failure_threshold, 8);

        clear();
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let _lock = ENV_MUTEX.lock().unwrap_or_else(|p| p.into_inner());
        unsafe { env::set_var("PROVIDER_CLIENT_REQUEST_TIMEOUT", "0") };

        let config = ResilientClientConfig::from_env();
        assert_eq!(config.request_timeout_seconds, 5);

        clear();
    }
}
