//! API request and response models for standard endpoints.

use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

/// Response model for the health check endpoint
#[derive(Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct HealthResponse {
    pub status: String,
}

/// Response model for the version information endpoint
#[derive(Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct VersionResponse {
    pub version: String,
    pub commit: String,
    pub build_time: String,
}

/// JSON body returned with every 4xx/5xx produced by the weather routes
#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Query parameters shared by the current-weather endpoint.
///
/// Coordinates are kept as raw strings so that malformed values produce
/// a descriptive validation message instead of an extractor rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Apiv2Schema)]
pub struct WeatherQuery {
    /// Latitude of the location
    pub lat: Option<String>,
    /// Longitude of the location
    pub lon: Option<String>,
    /// Attraction slug to resolve coordinates automatically
    pub attraction: Option<String>,
}

/// Query parameters for the forecast endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize, Apiv2Schema)]
pub struct ForecastQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub attraction: Option<String>,
    /// Number of forecast days (1-16, default: 7)
    pub days: Option<String>,
}

/// Query parameters for the seasonal patterns endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize, Apiv2Schema)]
pub struct SeasonalQuery {
    pub attraction: Option<String>,
    /// Only return seasons covering this calendar month (1-12)
    pub month: Option<String>,
}
