//! Weather endpoint handlers.

use crate::{
    error::ApiError,
    models::{
        CurrentWeatherResponse, ForecastQuery, ForecastResponse, SeasonalQuery,
        SeasonalWeatherPattern, WeatherCacheRecord, WeatherQuery,
    },
    services::{
        rate_limit::{SimpleRateLimiter, enforce_rate_limit},
        weather::WeatherQueryService,
    },
};
use actix_web::{Error, HttpRequest, Result, web};
use paperclip::actix::api_v2_operation;

/// Shared guard of every weather route: budget check, then the service.
fn weather_service(req: &HttpRequest) -> Result<&web::Data<WeatherQueryService>, ApiError> {
    if let Some(limiter) = req.app_data::<web::Data<SimpleRateLimiter>>() {
        enforce_rate_limit(req, limiter)?;
    }

    req.app_data::<web::Data<WeatherQueryService>>()
        .ok_or_else(|| ApiError::Internal("Weather service is not configured".to_string()))
}

/// List cached current-weather rows
#[api_v2_operation(
    summary = "Cached Weather Listing",
    description = "Returns every cached current-weather row, ordered by id.",
    tags("Weather")
)]
pub async fn list_cached_weather(
    req: HttpRequest,
) -> Result<web::Json<Vec<WeatherCacheRecord>>, Error> {
    let service = weather_service(&req)?;
    Ok(web::Json(service.cached_weather()))
}

/// Fetch one cached row by id
///
/// The row is returned as stored, however old it is.
#[api_v2_operation(
    summary = "Cached Weather Detail",
    description = "Returns a single cached current-weather row by its numeric id.",
    tags("Weather")
)]
pub async fn get_cached_weather(req: HttpRequest) -> Result<web::Json<WeatherCacheRecord>, Error> {
    let service = weather_service(&req)?;

    let id = req
        .match_info()
        .get("id")
        .and_then(|raw| raw.parse::<u64>().ok())
        .ok_or_else(|| ApiError::not_found("Not found"))?;

    Ok(web::Json(service.cached_weather_by_id(id)?))
}

/// Current weather for coordinates or an attraction
#[api_v2_operation(
    summary = "Current Weather",
    description = "Returns current conditions for ?lat=&lon= or ?attraction=<slug>. The attraction takes precedence over coordinates. Fresh cached rows are served without calling the provider; `source` tells which path answered.",
    tags("Weather")
)]
pub async fn current_weather(
    req: HttpRequest,
    query: web::Query<WeatherQuery>,
) -> Result<web::Json<CurrentWeatherResponse>, Error> {
    let service = weather_service(&req)?;

    let response = service
        .current_weather(
            query.lat.as_deref(),
            query.lon.as_deref(),
            query.attraction.as_deref(),
        )
        .await?;

    Ok(web::Json(response))
}

/// Daily forecast for coordinates or an attraction
#[api_v2_operation(
    summary = "Weather Forecast",
    description = "Returns a day-indexed forecast for ?lat=&lon= or ?attraction=<slug>. `days` defaults to 7 and must be between 1 and 16.",
    tags("Weather")
)]
pub async fn weather_forecast(
    req: HttpRequest,
    query: web::Query<ForecastQuery>,
) -> Result<web::Json<ForecastResponse>, Error> {
    let service = weather_service(&req)?;

    let response = service
        .forecast(
            query.lat.as_deref(),
            query.lon.as_deref(),
            query.attraction.as_deref(),
            query.days.as_deref(),
        )
        .await?;

    Ok(web::Json(response))
}

/// Seasonal patterns of an attraction
#[api_v2_operation(
    summary = "Seasonal Weather Patterns",
    description = "Returns the seasonal weather patterns of ?attraction=<slug>, newest first. An optional ?month=1..12 keeps only seasons covering that month.",
    tags("Weather")
)]
pub async fn seasonal_weather(
    req: HttpRequest,
    query: web::Query<SeasonalQuery>,
) -> Result<web::Json<Vec<SeasonalWeatherPattern>>, Error> {
    let service = weather_service(&req)?;

    let patterns =
        service.seasonal_patterns(query.attraction.as_deref(), query.month.as_deref())?;

    Ok(web::Json(patterns))
}
