//! OpenAPI specification generation and app factory.

use crate::{
    handlers::{
        current_weather, get_cached_weather, get_metrics, health, list_cached_weather,
        seasonal_weather, version, weather_forecast,
    },
    middleware::{MetricsMiddleware, RequestIdMiddleware, SecurityHeaders},
    state::AppState,
};
use actix_web::App;
use paperclip::actix::{OpenApiExt, web};
use paperclip::v2::models::{DefaultApiRaw, Info};

/// Creates the shared OpenAPI specification for the API
pub fn create_openapi_spec() -> DefaultApiRaw {
    DefaultApiRaw {
        info: Info {
            title: "Tourism Weather API".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            description: Some(
                "Weather data for tourism destinations.\n\n\
                ## Locations\n\
                Weather routes accept either `lat` and `lon` as decimal degrees or an \
                `attraction` slug. When both are given the attraction wins.\n\
                \n\
                ## Current weather cache\n\
                Current conditions are cached per location rounded to 4 decimal places. \
                A row younger than `WEATHER_CACHE_TTL_SECONDS` is served without calling \
                the provider; the response field `source` is `live` or `cache`.\n\
                \n\
                ## Errors\n\
                Failures return `{\"error\": \"<message>\"}` with status 400 (bad input), \
                404 (unknown attraction or cached row), 429 (rate limited) or 503 \
                (weather provider unavailable)."
                    .into(),
            ),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Creates the application with all routes and middleware
///
/// `state` is cloned into the app; every clone shares the same service,
/// metrics and rate limiter. The returned app does not borrow `state`, so
/// `HttpServer::new(move || create_base_app(&state))` works per worker.
pub fn create_base_app(
    state: &AppState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    App::new()
        .wrap(SecurityHeaders::new(state.security.clone()))
        .wrap(RequestIdMiddleware)
        .wrap(MetricsMiddleware)
        .wrap_api_with_spec(create_openapi_spec())
        .app_data(state.weather.clone())
        .app_data(state.limiter.clone())
        .app_data(state.metrics.clone())
        .app_data(state.metrics_config.clone())
        .service(web::resource("/api/health").route(web::get().to(health)))
        .service(web::resource("/api/version").route(web::get().to(version)))
        .service(web::resource("/api/metrics").route(web::get().to(get_metrics)))
        .service(web::resource("/api/v1/weather/").route(web::get().to(list_cached_weather)))
        // Literal segments must be registered ahead of the `{id}` pattern
        .service(web::resource("/api/v1/weather/current/").route(web::get().to(current_weather)))
        .service(web::resource("/api/v1/weather/forecast/").route(web::get().to(weather_forecast)))
        .service(web::resource("/api/v1/weather/seasonal/").route(web::get().to(seasonal_weather)))
        .service(web::resource("/api/v1/weather/{id}/").route(web::get().to(get_cached_weather)))
        .with_json_spec_at("/api/spec/v2")
        .build()
}
