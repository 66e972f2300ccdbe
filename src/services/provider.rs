//! Weather provider client for current conditions and daily forecasts.
//!
//! The live implementation talks to Open-Meteo. Its column-oriented payload is
//! renamed into our own field names; the current reading is additionally
//! validated so that a garbled response never reaches the cache.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::config::WeatherConfig;
use crate::models::{ForecastResponse, Location, SnapshotError, WeatherSnapshot};
use crate::services::resilient_client::{
    ResilientClient, ResilientClientConfig, ResilientClientError, ResilientClientMetrics,
};

const CURRENT_FIELDS: &str = "temperature_2m,apparent_temperature,precipitation,rain,\
weather_code,cloud_cover,wind_speed_10m,relative_humidity_2m";

const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min,\
apparent_temperature_max,apparent_temperature_min,precipitation_sum,rain_sum,\
precipitation_probability_max,wind_speed_10m_max";

/// Failures talking to the weather provider
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Weather provider request failed: {}", .0.user_message())]
    Transport(#[from] ResilientClientError),

    #[error("Weather provider returned status {0}")]
    Status(u16),

    #[error("Weather provider returned malformed data: {0}")]
    Malformed(String),

    #[error("Weather provider is misconfigured: {0}")]
    Configuration(String),
}

impl From<SnapshotError> for ProviderError {
    fn from(err: SnapshotError) -> Self {
        ProviderError::Malformed(err.to_string())
    }
}

/// Source of live weather data
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn fetch_current(&self, location: &Location) -> Result<WeatherSnapshot, ProviderError>;

    async fn fetch_forecast(
        &self,
        location: &Location,
        days: u8,
    ) -> Result<ForecastResponse, ProviderError>;
}

/// Open-Meteo forecast API client
pub struct OpenMeteoProvider {
    client: ResilientClient,
    base_url: String,
}

impl OpenMeteoProvider {
    pub fn new(
        config: &WeatherConfig,
        client_config: ResilientClientConfig,
        metrics: Option<ResilientClientMetrics>,
    ) -> Result<Self, ProviderError> {
        let client = ResilientClient::new(client_config, metrics).map_err(|e| {
            ProviderError::Configuration(format!("failed to create HTTP client: {e}"))
        })?;

        Ok(Self {
            client,
            base_url: config.provider_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn current_url(&self, location: &Location) -> Result<Url, ProviderError> {
        self.forecast_endpoint(&[
            ("latitude", location.latitude.to_string()),
            ("longitude", location.longitude.to_string()),
            ("current", CURRENT_FIELDS.to_string()),
            ("timezone", "auto".to_string()),
        ])
    }

    fn daily_url(&self, location: &Location, days: u8) -> Result<Url, ProviderError> {
        self.forecast_endpoint(&[
            ("latitude", location.latitude.to_string()),
            ("longitude", location.longitude.to_string()),
            ("daily", DAILY_FIELDS.to_string()),
            ("forecast_days", days.to_string()),
            ("timezone", "auto".to_string()),
        ])
    }

    fn forecast_endpoint(&self, params: &[(&str, String)]) -> Result<Url, ProviderError> {
        Url::parse_with_params(&format!("{}/forecast", self.base_url), params)
            .map_err(|e| ProviderError::Configuration(format!("invalid provider URL: {e}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ProviderError> {
        debug!(url = %url, "Calling weather provider");

        let response = self.client.get(url.as_str()).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn fetch_current(&self, location: &Location) -> Result<WeatherSnapshot, ProviderError> {
        let url = self.current_url(location)?;
        let payload: openmeteo::CurrentResponse = self.get_json(url).await?;
        openmeteo::normalize_current(payload)
    }

    async fn fetch_forecast(
        &self,
        location: &Location,
        days: u8,
    ) -> Result<ForecastResponse, ProviderError> {
        let url = self.daily_url(location, days)?;
        let payload: openmeteo::DailyResponse = self.get_json(url).await?;
        openmeteo::normalize_daily(payload, days)
    }
}

/// Open-Meteo payloads and their mapping onto our models
mod openmeteo {
    use serde::Deserialize;

    use super::ProviderError;
    use crate::models::{DailyForecast, ForecastResponse, WeatherSnapshot};

    #[derive(Debug, Deserialize)]
    pub struct CurrentResponse {
        pub current: Option<Current>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Current {
        #[serde(rename = "temperature_2m")]
        pub temperature: f64,
        pub apparent_temperature: f64,
        pub precipitation: f64,
        pub rain: f64,
        pub weather_code: u16,
        pub cloud_cover: u8,
        #[serde(rename = "wind_speed_10m")]
        pub wind_speed: f64,
        #[serde(rename = "relative_humidity_2m")]
        pub humidity: u8,
    }

    #[derive(Debug, Deserialize)]
    pub struct DailyResponse {
        pub latitude: f64,
        pub longitude: f64,
        #[serde(default)]
        pub timezone: String,
        pub daily: Option<Daily>,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    pub struct Daily {
        pub time: Vec<String>,
        pub weather_code: Vec<Option<u16>>,
        #[serde(rename = "temperature_2m_max")]
        pub temperature_max: Vec<Option<f64>>,
        #[serde(rename = "temperature_2m_min")]
        pub temperature_min: Vec<Option<f64>>,
        pub apparent_temperature_max: Vec<Option<f64>>,
        pub apparent_temperature_min: Vec<Option<f64>>,
        pub precipitation_sum: Vec<Option<f64>>,
        pub rain_sum: Vec<Option<f64>>,
        pub precipitation_probability_max: Vec<Option<f64>>,
        #[serde(rename = "wind_speed_10m_max")]
        pub wind_speed_max: Vec<Option<f64>>,
    }

    pub fn normalize_current(payload: CurrentResponse) -> Result<WeatherSnapshot, ProviderError> {
        let current = payload
            .current
            .ok_or_else(|| ProviderError::Malformed("missing 'current' section".to_string()))?;

        let snapshot = WeatherSnapshot {
            temperature: current.temperature,
            apparent_temperature: current.apparent_temperature,
            precipitation: current.precipitation,
            rain: current.rain,
            weather_code: current.weather_code,
            cloud_cover: current.cloud_cover,
            wind_speed: current.wind_speed,
            humidity: current.humidity,
        };
        Ok(snapshot.validate()?)
    }

    pub fn normalize_daily(
        payload: DailyResponse,
        days: u8,
    ) -> Result<ForecastResponse, ProviderError> {
        let daily = payload
            .daily
            .ok_or_else(|| ProviderError::Malformed("missing 'daily' section".to_string()))?;

        Ok(ForecastResponse {
            latitude: payload.latitude,
            longitude: payload.longitude,
            timezone: payload.timezone,
            days,
            daily: DailyForecast {
                time: daily.time,
                weather_code: daily.weather_code,
                temperature_max: daily.temperature_max,
                temperature_min: daily.temperature_min,
                apparent_temperature_max: daily.apparent_temperature_max,
                apparent_temperature_min: daily.apparent_temperature_min,
                precipitation_sum: daily.precipitation_sum,
                rain_sum: daily.rain_sum,
                precipitation_probability_max: daily.precipitation_probability_max,
                wind_speed_max: daily.wind_speed_max,
            },
        })
    }
}
