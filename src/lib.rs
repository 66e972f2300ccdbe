//! Tourism Weather API - weather data for tourism destinations
//!
//! An Actix Web service documented with Paperclip that serves:
//! - current conditions for coordinates or an attraction, through a TTL cache
//! - daily forecasts from the Open-Meteo provider
//! - seasonal weather patterns recorded per attraction
//! - health, version and Prometheus metrics endpoints
//!
//! ## Architecture
//!
//! The codebase is organized into focused modules:
//! - `models/` - Data structures and request/response models
//! - `handlers/` - HTTP request handlers and the app factory
//! - `middleware/` - Request id, metrics and security headers
//! - `services/` - Location resolution, provider client, stores, query service
//! - `utils/` - Request inspection helpers
//! - `config/` - Configuration structures and environment loading
//! - `state` - Startup wiring of the shared components
//! - `telemetry` - Logging setup
//!
//! ## Quick Start
//!
//! ```no_run
//! use actix_web::HttpServer;
//! use tourism_weather_api::{AppState, create_base_app};
//!
//! #[actix_web::main]
//! async fn main() -> std::io::Result<()> {
//!     let state = AppState::from_env().map_err(std::io::Error::other)?;
//!     HttpServer::new(move || create_base_app(&state))
//!         .bind("127.0.0.1:8080")?
//!         .run()
//!         .await
//! }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
pub mod telemetry;
pub mod utils;

pub use config::{
    MetricsConfig, RateLimitConfig, SecurityHeadersConfig, ServerConfig, WeatherConfig,
};
pub use error::ApiError;
pub use handlers::{create_base_app, create_openapi_spec};
pub use middleware::{MetricsMiddleware, RequestIdMiddleware, SecurityHeaders};
pub use models::{
    AttractionLocation, CurrentWeatherResponse, DailyForecast, ErrorResponse, ForecastResponse,
    HealthResponse, Location, NewSeasonalPattern, SeasonalWeatherPattern, VersionResponse,
    WeatherCacheRecord, WeatherSnapshot, WeatherSource,
};
pub use services::{
    AppMetrics, Catalog, InMemoryWeatherCache, LocationResolver, OpenMeteoProvider,
    ProviderError, SimpleRateLimiter, WeatherCacheStore, WeatherProvider, WeatherQueryService,
    resilient_client::{ResilientClient, ResilientClientConfig, ResilientClientError},
};
pub use state::{AppState, StartupError};
pub use telemetry::{TelemetryConfig, init_tracing};
