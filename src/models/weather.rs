//! Weather snapshots, cached rows, forecasts and seasonal patterns.

use chrono::{DateTime, Utc};
use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::CanonicalLocation;

/// A single normalized current-weather reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct WeatherSnapshot {
    /// Air temperature in °C
    pub temperature: f64,
    /// Feels-like temperature in °C
    pub apparent_temperature: f64,
    /// Total precipitation in mm
    pub precipitation: f64,
    /// Rain in mm
    pub rain: f64,
    /// WMO weather interpretation code
    pub weather_code: u16,
    /// Cloud cover in percent
    pub cloud_cover: u8,
    /// Wind speed in km/h
    pub wind_speed: f64,
    /// Relative humidity in percent
    pub humidity: u8,
}

/// Reasons a snapshot is rejected during normalization
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SnapshotError {
    #[error("field '{0}' is not a finite number")]
    NotFinite(&'static str),

    #[error("field '{field}' must be a percentage, got {value}")]
    NotAPercentage { field: &'static str, value: u8 },
}

impl WeatherSnapshot {
    /// Check that every field holds a plausible value.
    pub fn validate(self) -> Result<Self, SnapshotError> {
        let numeric = [
            ("temperature", self.temperature),
            ("apparent_temperature", self.apparent_temperature),
            ("precipitation", self.precipitation),
            ("rain", self.rain),
            ("wind_speed", self.wind_speed),
        ];
        for (field, value) in numeric {
            if !value.is_finite() {
                return Err(SnapshotError::NotFinite(field));
            }
        }
        for (field, value) in [("cloud_cover", self.cloud_cover), ("humidity", self.humidity)] {
            if value > 100 {
                return Err(SnapshotError::NotAPercentage { field, value });
            }
        }
        Ok(self)
    }
}

/// One cached row per canonical location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct WeatherCacheRecord {
    pub id: u64,
    pub latitude: f64,
    pub longitude: f64,
    pub temperature: f64,
    pub apparent_temperature: f64,
    pub precipitation: f64,
    pub rain: f64,
    pub weather_code: u16,
    pub cloud_cover: u8,
    pub wind_speed: f64,
    pub humidity: u8,
    pub fetched_at: DateTime<Utc>,
}

impl WeatherCacheRecord {
    pub fn new(
        id: u64,
        location: CanonicalLocation,
        snapshot: WeatherSnapshot,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            latitude: location.latitude(),
            longitude: location.longitude(),
            temperature: snapshot.temperature,
            apparent_temperature: snapshot.apparent_temperature,
            precipitation: snapshot.precipitation,
            rain: snapshot.rain,
            weather_code: snapshot.weather_code,
            cloud_cover: snapshot.cloud_cover,
            wind_speed: snapshot.wind_speed,
            humidity: snapshot.humidity,
            fetched_at,
        }
    }

    /// Whether the row is younger than `ttl` at `now`.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        match chrono::Duration::from_std(ttl) {
            Ok(ttl) => now.signed_duration_since(self.fetched_at) < ttl,
            // A TTL too large for chrono never expires
            Err(_) => true,
        }
    }
}

/// Where a current-weather answer came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Apiv2Schema)]
#[serde(rename_all = "lowercase")]
pub enum WeatherSource {
    Live,
    Cache,
}

/// Response model for the current-weather endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct CurrentWeatherResponse {
    pub latitude: f64,
    pub longitude: f64,
    pub temperature: f64,
    pub apparent_temperature: f64,
    pub precipitation: f64,
    pub rain: f64,
    pub weather_code: u16,
    pub cloud_cover: u8,
    pub wind_speed: f64,
    pub humidity: u8,
    pub fetched_at: DateTime<Utc>,
    pub source: WeatherSource,
}

impl CurrentWeatherResponse {
    pub fn from_record(record: &WeatherCacheRecord, source: WeatherSource) -> Self {
        Self {
            latitude: record.latitude,
            longitude: record.longitude,
            temperature: record.temperature,
            apparent_temperature: record.apparent_temperature,
            precipitation: record.precipitation,
            rain: record.rain,
            weather_code: record.weather_code,
            cloud_cover: record.cloud_cover,
            wind_speed: record.wind_speed,
            humidity: record.humidity,
            fetched_at: record.fetched_at,
            source,
        }
    }
}

/// Day-indexed forecast series. Entry `i` of every vector belongs to `time[i]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct DailyForecast {
    pub time: Vec<String>,
    pub weather_code: Vec<Option<u16>>,
    pub temperature_max: Vec<Option<f64>>,
    pub temperature_min: Vec<Option<f64>>,
    pub apparent_temperature_max: Vec<Option<f64>>,
    pub apparent_temperature_min: Vec<Option<f64>>,
    pub precipitation_sum: Vec<Option<f64>>,
    pub rain_sum: Vec<Option<f64>>,
    pub precipitation_probability_max: Vec<Option<f64>>,
    pub wind_speed_max: Vec<Option<f64>>,
}

/// Response model for the forecast endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct ForecastResponse {
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
    pub days: u8,
    pub daily: DailyForecast,
}

/// Historical weather characterization of one season at one attraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct SeasonalWeatherPattern {
    pub id: u64,
    /// Slug of the owning attraction
    pub attraction: String,
    pub season_type: String,
    pub start_month: u8,
    pub end_month: u8,
    pub avg_temperature: f64,
    pub avg_rainfall: f64,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl SeasonalWeatherPattern {
    /// Whether `month` (1-12) falls inside this season.
    ///
    /// A start month after the end month wraps over the new year, e.g. Nov-Feb.
    pub fn covers_month(&self, month: u8) -> bool {
        if self.start_month <= self.end_month {
            (self.start_month..=self.end_month).contains(&month)
        } else {
            month >= self.start_month || month <= self.end_month
        }
    }
}

/// Administrative input for a seasonal pattern; the store assigns id and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSeasonalPattern {
    pub attraction: String,
    pub season_type: String,
    pub start_month: u8,
    pub end_month: u8,
    pub avg_temperature: f64,
    pub avg_rainfall: f64,
    #[serde(default)]
    pub description: String,
}

impl NewSeasonalPattern {
    pub fn validate(&self) -> Result<(), String> {
        for (field, month) in [("start_month", self.start_month), ("end_month", self.end_month)] {
            if !(1..=12).contains(&month) {
                return Err(format!("{field} must be between 1 and 12, got {month}"));
            }
        }
        if self.season_type.trim().is_empty() {
            return Err("season_type must not be empty".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Location;

    fn snapshot() -> WeatherSnapshot {
        WeatherSnapshot {
            temperature: 20.5,
            apparent_temperature: 19.0,
            precipitation: 0.0,
            rain: 0.0,
            weather_code: 0,
            cloud_cover: 10,
            wind_speed: 5.0,
            humidity: 60,
        }
    }

    fn pattern(start_month: u8, end_month: u8) -> SeasonalWeatherPattern {
        SeasonalWeatherPattern {
            id: 1,
            attraction: "kilimanjaro".to_string(),
            season_type: "dry".to_string(),
            start_month,
            end_month,
            avg_temperature: 18.0,
            avg_rainfall: 5.0,
            description: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_snapshot_validation() {
        assert!(snapshot().validate().is_ok());

        let mut bad = snapshot();
        bad.temperature = f64::NAN;
        assert_eq!(bad.validate(), Err(SnapshotError::NotFinite("temperature")));

        let mut bad = snapshot();
        bad.humidity = 140;
        assert!(matches!(
            bad.validate(),
            Err(SnapshotError::NotAPercentage { field: "humidity", value: 140 })
        ));
    }

    #[test]
    fn test_record_keeps_snapshot_and_canonical_coordinates() {
        let key = Location::new(-3.067_41, 37.355_58).canonical();
        let record = WeatherCacheRecord::new(7, key, snapshot(), Utc::now());
        assert_eq!(record.id, 7);
        assert_eq!(record.latitude, -3.0674);
        assert_eq!(record.longitude, 37.3556);
        assert_eq!(record.temperature, snapshot().temperature);
        assert_eq!(record.humidity, snapshot().humidity);
        assert_eq!(record.weather_code, snapshot().weather_code);
    }

    #[test]
    fn test_record_freshness() {
        let now = Utc::now();
        let record = WeatherCacheRecord::new(
            1,
            Location::new(0.0, 0.0).canonical(),
            snapshot(),
            now - chrono::Duration::seconds(120),
        );
        assert!(record.is_fresh(now, Duration::from_secs(600)));
        assert!(!record.is_fresh(now, Duration::from_secs(60)));
        assert!(!record.is_fresh(now, Duration::ZERO));
    }

    #[test]
    fn test_season_within_a_year() {
        let dry = pattern(6, 10);
        assert!(dry.covers_month(6));
        assert!(dry.covers_month(10));
        assert!(!dry.covers_month(11));
        assert!(!dry.covers_month(5));
    }

    #[test]
    fn test_season_wrapping_over_new_year() {
        let short_rains = pattern(11, 2);
        assert!(short_rains.covers_month(11));
        assert!(short_rains.covers_month(1));
        assert!(short_rains.covers_month(2));
        assert!(!short_rains.covers_month(3));
        assert!(!short_rains.covers_month(10));
    }

    #[test]
    fn test_new_pattern_validation() {
        let mut input = NewSeasonalPattern {
            attraction: "kilimanjaro".to_string(),
            season_type: "dry".to_string(),
            start_month: 6,
            end_month: 10,
            avg_temperature: 18.0,
            avg_rainfall: 5.0,
            description: "Dry and cool.".to_string(),
        };
        assert!(input.validate().is_ok());

        input.end_month = 13;
        assert!(input.validate().unwrap_err().contains("end_month"));
    }
}
