//! Startup wiring of the shared application components.
//!
//! Everything the handlers share is built exactly once here and handed to
//! every worker's `App`, so rate-limit counters, caches and metrics are
//! process-wide rather than per worker.

use actix_web::web;
use std::sync::Arc;
use tracing::info;

use crate::config::{
    MetricsConfig, RateLimitConfig, SecurityHeadersConfig, WeatherConfig,
};
use crate::services::{
    AppMetrics, Catalog, CatalogError, InMemoryWeatherCache, LocationResolver,
    OpenMeteoProvider, ProviderError, SimpleRateLimiter, WeatherQueryService,
    resilient_client::ResilientClientConfig,
};

/// Failures that prevent the service from starting
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Failed to load tourism catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Failed to register metrics: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("Failed to create weather provider: {0}")]
    Provider(#[from] ProviderError),
}

/// Components shared by every worker
#[derive(Clone)]
pub struct AppState {
    pub weather: web::Data<WeatherQueryService>,
    pub metrics: web::Data<AppMetrics>,
    pub metrics_config: web::Data<MetricsConfig>,
    pub limiter: web::Data<SimpleRateLimiter>,
    pub security: SecurityHeadersConfig,
}

impl AppState {
    /// Wrap an already built query service with default operational settings.
    pub fn new(weather: WeatherQueryService, metrics: AppMetrics) -> Self {
        Self {
            weather: web::Data::new(weather),
            metrics: web::Data::new(metrics),
            metrics_config: web::Data::new(MetricsConfig::default()),
            limiter: web::Data::new(SimpleRateLimiter::new(RateLimitConfig::default())),
            security: SecurityHeadersConfig::default(),
        }
    }

    pub fn with_rate_limit(mut self, config: RateLimitConfig) -> Self {
        self.limiter = web::Data::new(SimpleRateLimiter::new(config));
        self
    }

    pub fn with_metrics_config(mut self, config: MetricsConfig) -> Self {
        self.metrics_config = web::Data::new(config);
        self
    }

    pub fn with_security_headers(mut self, config: SecurityHeadersConfig) -> Self {
        self.security = config;
        self
    }

    /// Build the production wiring from environment variables.
    pub fn from_env() -> Result<Self, StartupError> {
        let weather_config = WeatherConfig::from_env();

        let catalog = match &weather_config.seed_file {
            Some(path) => Catalog::from_seed_file(path)?,
            None => {
                info!("TOURISM_SEED_FILE not set, starting with an empty catalog");
                Catalog::new()
            }
        };

        let metrics = AppMetrics::new()?;
        let provider = OpenMeteoProvider::new(
            &weather_config,
            ResilientClientConfig::from_env(),
            Some(metrics.provider_client_metrics()?),
        )?;

        info!(
            provider = %weather_config.provider_base_url,
            cache_ttl_seconds = weather_config.cache_ttl_seconds,
            "Weather query service configured"
        );

        let service = WeatherQueryService::new(
            LocationResolver::new(catalog.attractions.clone()),
            Arc::new(provider),
            Arc::new(InMemoryWeatherCache::new()),
            catalog.patterns.clone(),
        )
        .with_cache_ttl(weather_config.cache_ttl())
        .with_metrics(metrics.clone());

        Ok(Self::new(service, metrics)
            .with_rate_limit(RateLimitConfig::from_env())
            .with_metrics_config(MetricsConfig::from_env())
            .with_security_headers(SecurityHeadersConfig::from_env()))
    }
}
