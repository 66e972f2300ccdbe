use actix_web::HttpServer;
use tourism_weather_api::{AppState, ServerConfig, TelemetryConfig, create_base_app, init_tracing};
use tracing::{error, info};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = init_tracing(&TelemetryConfig::from_env()) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let server_config = ServerConfig::from_env();
    let state = AppState::from_env().map_err(|e| {
        error!(error = %e, "Startup failed");
        std::io::Error::other(e)
    })?;

    info!(bind_address = %server_config.bind_address, "Starting tourism weather API");

    HttpServer::new(move || create_base_app(&state))
        .bind(&server_config.bind_address)?
        .run()
        .await
}
