//! Weather provider and cache policy configuration.

use std::{env, time::Duration};

/// Default Open-Meteo endpoint; no API key required
pub const DEFAULT_PROVIDER_BASE_URL: &str = "https://api.open-meteo.com/v1";

/// Configuration for the weather subsystem
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    pub provider_base_url: String,
    /// How long a cached current-weather row is served without a live fetch.
    /// Zero means every request fetches live.
    pub cache_ttl_seconds: u64,
    /// JSON file with attractions and seasonal patterns loaded at startup
    pub seed_file: Option<String>,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            provider_base_url: DEFAULT_PROVIDER_BASE_URL.to_string(),
            cache_ttl_seconds: 600,
            seed_file: None,
        }
    }
}

impl WeatherConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let provider_base_url = env::var("WEATHER_PROVIDER_BASE_URL")
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| DEFAULT_PROVIDER_BASE_URL.to_string());

        let cache_ttl_seconds = env::var("WEATHER_CACHE_TTL_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(600);

        let seed_file = env::var("TOURISM_SEED_FILE")
            .ok()
            .filter(|v| !v.trim().is_empty());

        Self {
            provider_base_url,
            cache_ttl_seconds,
            seed_file,
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }
}
