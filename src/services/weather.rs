//! Weather query service behind the `/api/v1/weather` routes.
//!
//! Every operation resolves its location before touching the provider, so
//! validation and lookup failures never cause an outbound call.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::models::{
    CurrentWeatherResponse, ForecastResponse, SeasonalWeatherPattern, WeatherCacheRecord,
    WeatherSource,
};
use crate::services::cache_store::WeatherCacheStore;
use crate::services::catalog::SeasonalPatternStore;
use crate::services::location::{LocationResolver, non_blank};
use crate::services::metrics::{AppMetrics, CacheLookup};
use crate::services::provider::WeatherProvider;

pub const DEFAULT_FORECAST_DAYS: u8 = 7;
pub const MAX_FORECAST_DAYS: u8 = 16;

/// Orchestrates location resolution, the provider and the stores
pub struct WeatherQueryService {
    resolver: LocationResolver,
    provider: Arc<dyn WeatherProvider>,
    cache: Arc<dyn WeatherCacheStore>,
    patterns: Arc<dyn SeasonalPatternStore>,
    cache_ttl: Duration,
    metrics: Option<AppMetrics>,
}

impl WeatherQueryService {
    /// Create a service with caching disabled for reads.
    ///
    /// See [`with_cache_ttl`](Self::with_cache_ttl).
    pub fn new(
        resolver: LocationResolver,
        provider: Arc<dyn WeatherProvider>,
        cache: Arc<dyn WeatherCacheStore>,
        patterns: Arc<dyn SeasonalPatternStore>,
    ) -> Self {
        Self {
            resolver,
            provider,
            cache,
            patterns,
            cache_ttl: Duration::ZERO,
            metrics: None,
        }
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_metrics(mut self, metrics: AppMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Current conditions for a location, served from the cache while fresh.
    pub async fn current_weather(
        &self,
        raw_lat: Option<&str>,
        raw_lon: Option<&str>,
        attraction: Option<&str>,
    ) -> Result<CurrentWeatherResponse, ApiError> {
        let location = self.resolver.resolve(raw_lat, raw_lon, attraction)?;
        let key = location.canonical();

        if !self.cache_ttl.is_zero() {
            match self.cache.get(&key) {
                Some(record) if record.is_fresh(Utc::now(), self.cache_ttl) => {
                    debug!(location = %key, id = record.id, "Serving current weather from cache");
                    self.record_lookup(CacheLookup::Hit);
                    return Ok(CurrentWeatherResponse::from_record(&record, WeatherSource::Cache));
                }
                Some(_) => self.record_lookup(CacheLookup::Stale),
                None => self.record_lookup(CacheLookup::Miss),
            }
        }

        let snapshot = self.provider.fetch_current(&location).await.map_err(|e| {
            warn!(location = %key, error = %e, "Current weather fetch failed");
            ApiError::from(e)
        })?;

        let record = self.cache.put(key, snapshot, Utc::now());
        info!(location = %key, id = record.id, "Cached live current weather");

        Ok(CurrentWeatherResponse::from_record(&record, WeatherSource::Live))
    }

    /// Daily forecast for a location. Forecasts are never cached.
    pub async fn forecast(
        &self,
        raw_lat: Option<&str>,
        raw_lon: Option<&str>,
        attraction: Option<&str>,
        raw_days: Option<&str>,
    ) -> Result<ForecastResponse, ApiError> {
        let location = self.resolver.resolve(raw_lat, raw_lon, attraction)?;
        let days = parse_forecast_days(raw_days)?;

        debug!(location = %location.canonical(), days, "Fetching forecast");
        self.provider
            .fetch_forecast(&location, days)
            .await
            .map_err(|e| {
                warn!(location = %location.canonical(), days, error = %e, "Forecast fetch failed");
                ApiError::from(e)
            })
    }

    /// Seasonal patterns of an attraction, newest first, optionally narrowed to one month.
    pub fn seasonal_patterns(
        &self,
        attraction: Option<&str>,
        raw_month: Option<&str>,
    ) -> Result<Vec<SeasonalWeatherPattern>, ApiError> {
        let slug = non_blank(attraction)
            .ok_or_else(|| ApiError::validation("Attraction slug required"))?;
        let attraction = self.resolver.resolve_attraction(slug)?;
        let month = parse_month(raw_month)?;

        let patterns = self.patterns.list_by_attraction(&attraction.slug);
        Ok(match month {
            Some(month) => patterns
                .into_iter()
                .filter(|p| p.covers_month(month))
                .collect(),
            None => patterns,
        })
    }

    /// Every cached current-weather row, oldest id first.
    pub fn cached_weather(&self) -> Vec<WeatherCacheRecord> {
        self.cache.list()
    }

    pub fn cached_weather_by_id(&self, id: u64) -> Result<WeatherCacheRecord, ApiError> {
        self.cache
            .get_by_id(id)
            .ok_or_else(|| ApiError::not_found("Not found"))
    }

    fn record_lookup(&self, outcome: CacheLookup) {
        if let Some(metrics) = &self.metrics {
            metrics.record_cache_lookup(outcome);
        }
    }
}

/// Parse the `days` parameter; absent means a week.
pub fn parse_forecast_days(raw: Option<&str>) -> Result<u8, ApiError> {
    let Some(raw) = non_blank(raw) else {
        return Ok(DEFAULT_FORECAST_DAYS);
    };

    match raw.parse::<u8>() {
        Ok(days) if (1..=MAX_FORECAST_DAYS).contains(&days) => Ok(days),
        _ => Err(ApiError::validation(format!(
            "days must be an integer between 1 and {MAX_FORECAST_DAYS}, got '{raw}'"
        ))),
    }
}

fn parse_month(raw: Option<&str>) -> Result<Option<u8>, ApiError> {
    let Some(raw) = non_blank(raw) else {
        return Ok(None);
    };

    match raw.parse::<u8>() {
        Ok(month) if (1..=12).contains(&month) => Ok(Some(month)),
        _ => Err(ApiError::validation(format!(
            "month must be an integer between 1 and 12, got '{raw}'"
        ))),
    }
}
