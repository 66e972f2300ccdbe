//! Shared fixtures for the integration suites.
#![allow(dead_code)]

use actix_web::{App, HttpResponse, HttpServer, web};
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tourism_weather_api::{
    AppMetrics, AppState, AttractionLocation, Catalog, DailyForecast, ForecastResponse,
    InMemoryWeatherCache, Location, LocationResolver, NewSeasonalPattern, ProviderError,
    WeatherProvider, WeatherQueryService, WeatherSnapshot,
};

/// In-process provider that records every call it receives
#[derive(Default)]
pub struct FakeProvider {
    failing: AtomicBool,
    pub current_calls: Mutex<Vec<Location>>,
    pub forecast_calls: Mutex<Vec<(Location, u8)>>,
}

impl FakeProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn current_call_count(&self) -> usize {
        self.current_calls.lock().unwrap().len()
    }

    pub fn forecast_call_count(&self) -> usize {
        self.forecast_calls.lock().unwrap().len()
    }
}

pub fn sample_snapshot() -> WeatherSnapshot {
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

#[async_trait]
impl WeatherProvider for FakeProvider {
    async fn fetch_current(&self, location: &Location) -> Result<WeatherSnapshot, ProviderError> {
        self.current_calls.lock().unwrap().push(*location);
        if self.failing.load(Ordering::SeqCst) {
            return Err(ProviderError::Status(500));
        }
        Ok(sample_snapshot())
    }

    async fn fetch_forecast(
        &self,
        location: &Location,
        days: u8,
    ) -> Result<ForecastResponse, ProviderError> {
        self.forecast_calls.lock().unwrap().push((*location, days));
        if self.failing.load(Ordering::SeqCst) {
            return Err(ProviderError::Status(500));
        }
        Ok(ForecastResponse {
            latitude: location.latitude,
            longitude: location.longitude,
            timezone: "Africa/Dar_es_Salaam".to_string(),
            days,
            daily: DailyForecast {
                time: (1..=days).map(|d| format!("2026-10-{d:02}")).collect(),
                temperature_max: vec![Some(24.0); days as usize],
                ..DailyForecast::default()
            },
        })
    }
}

pub fn kilimanjaro() -> AttractionLocation {
    AttractionLocation {
        slug: "kilimanjaro".to_string(),
        name: "Mount Kilimanjaro".to_string(),
        latitude: -3.0674,
        longitude: 37.3556,
    }
}

pub fn dry_season() -> NewSeasonalPattern {
    NewSeasonalPattern {
        attraction: "kilimanjaro".to_string(),
        season_type: "dry".to_string(),
        start_month: 6,
        end_month: 10,
        avg_temperature: 18.0,
        avg_rainfall: 5.0,
        description: "Cool, clear climbing season.".to_string(),
    }
}

/// Catalog with Kilimanjaro and its dry season
pub fn seeded_catalog() -> Catalog {
    let catalog = Catalog::new();
    catalog.attractions.insert(kilimanjaro());
    catalog.add_pattern(dry_season()).unwrap();
    catalog
}

/// Application state around `provider` with the given cache TTL
pub fn test_state(provider: Arc<FakeProvider>, catalog: &Catalog, cache_ttl: Duration) -> AppState {
    let metrics = AppMetrics::new().unwrap();
    let service = WeatherQueryService::new(
        LocationResolver::new(catalog.attractions.clone()),
        provider,
        Arc::new(InMemoryWeatherCache::new()),
        catalog.patterns.clone(),
    )
    .with_cache_ttl(cache_ttl)
    .with_metrics(metrics.clone());

    AppState::new(service, metrics)
}

pub const CURRENT_PAYLOAD: &str = r#"{
    "latitude": -3.0625, "longitude": 37.375, "timezone": "Africa/Dar_es_Salaam",
    "current": {
        "time": "2026-10-19T12:00", "interval": 900,
        "temperature_2m": 21.3, "apparent_temperature": 20.1, "precipitation": 0.2,
        "rain": 0.2, "weather_code": 61, "cloud_cover": 75,
        "wind_speed_10m": 11.2, "relative_humidity_2m": 68
    }
}"#;

pub const DAILY_PAYLOAD: &str = r#"{
    "latitude": -3.0625, "longitude": 37.375, "timezone": "Africa/Dar_es_Salaam",
    "daily": {
        "time": ["2026-10-19", "2026-10-20", "2026-10-21"],
        "weather_code": [3, 61, 80],
        "temperature_2m_max": [24.1, 22.8, 23.0],
        "temperature_2m_min": [12.0, 11.5, 12.2],
        "apparent_temperature_max": [23.0, 21.9, 22.1],
        "apparent_temperature_min": [10.8, 10.1, 11.0],
        "precipitation_sum": [0.0, 4.2, 7.9],
        "rain_sum": [0.0, 4.2, 7.9],
        "precipitation_probability_max": [10, 60, 85],
        "wind_speed_10m_max": [14.0, 18.5, 12.3]
    }
}"#;

/// Local HTTP server standing in for the weather provider.
///
/// `GET /v1/forecast` answers with the daily or current payload depending on
/// the query; `/fail` returns 500, `/garbage` invalid JSON and `/slow`
/// answers after two seconds. Returns the base URL.
pub fn spawn_stub_provider() -> String {
    let server = HttpServer::new(|| {
        App::new()
            .route(
                "/v1/forecast",
                web::get().to(|req: actix_web::HttpRequest| async move {
                    let body = if req.query_string().contains("daily=") {
                        DAILY_PAYLOAD
                    } else {
                        CURRENT_PAYLOAD
                    };
                    HttpResponse::Ok()
                        .content_type("application/json")
                        .body(body)
                }),
            )
            .route(
                "/fail/forecast",
                web::get().to(|| async { HttpResponse::InternalServerError().finish() }),
            )
            .route(
                "/garbage/forecast",
                web::get().to(|| async {
                    HttpResponse::Ok()
                        .content_type("application/json")
                        .body("{not json")
                }),
            )
            .route(
                "/slow/forecast",
                web::get().to(|| async {
                    actix_web::rt::time::sleep(Duration::from_secs(2)).await;
                    HttpResponse::Ok().body(CURRENT_PAYLOAD)
                }),
            )
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();

    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    format!("http://{addr}")
}
