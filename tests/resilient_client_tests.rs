//! Integration tests for the resilient HTTP client against a local stub server.
//!
//! Covers timeouts, circuit breaking and metrics. The client never retries,
//! so every failure is visible after exactly one request.

mod common;

use prometheus::Registry;
use tourism_weather_api::services::resilient_client::{
    CircuitBreakerConfig, CircuitBreakerState, ResilientClient, ResilientClientConfig,
    ResilientClientError, ResilientClientMetrics,
};

fn config(failure_threshold: usize, request_timeout_seconds: u64) -> ResilientClientConfig {
    ResilientClientConfig {
        request_timeout_seconds,
        connect_timeout_seconds: 1,
        circuit_breaker: CircuitBreakerConfig {
            failure_threshold,
            success_threshold: 1,
            timeout_seconds: 60,
        },
        enable_detailed_logging: false,
    }
}

#[actix_web::test]
async fn test_successful_request_is_recorded() {
    let base = common::spawn_stub_provider();
    let registry = Registry::new();
    let metrics = ResilientClientMetrics::new(&registry).expect("Failed to create metrics");
    let client = ResilientClient::new(config(3, 5), Some(metrics.clone())).unwrap();

    let response = client.get(&format!("{base}/v1/forecast?current=x")).await.unwrap();
    assert!(response.status().is_success());

    assert_eq!(
        metrics
            .requests_total
            .with_label_values(&["127.0.0.1", "success"])
            .get(),
        1.0
    );
    let state = client.circuit_state("127.0.0.1");
    assert_eq!(state, Some(CircuitBreakerState::Closed));
}

#[actix_web::test]
async fn test_server_errors_open_the_circuit() {
    let base = common::spawn_stub_provider();
    let client = ResilientClient::new(config(2, 5), None).unwrap();
    let url = format!("{base}/fail/forecast");

    // 5xx responses are handed back to the caller but count against the host
    for _ in 0..2 {
        let response = client.get(&url).await.unwrap();
        assert_eq!(response.status().as_u16(), 500);
    }
    let state = client.circuit_state("127.0.0.1");
    assert_eq!(state, Some(CircuitBreakerState::Open));

    // Healthy paths on the same host are rejected too while open
    let result = client.get(&format!("{base}/v1/forecast")).await;
    assert!(matches!(result, Err(ResilientClientError::CircuitBreakerOpen)));
}

#[actix_web::test]
async fn test_slow_response_times_out() {
    let base = common::spawn_stub_provider();
    let client = ResilientClient::new(config(5, 1), None).unwrap();

    let result = client.get(&format!("{base}/slow/forecast")).await;
    assert!(matches!(result, Err(ResilientClientError::Timeout)), "{result:?}");
}

#[actix_web::test]
async fn test_unreachable_host_is_network_error() {
    let client = ResilientClient::new(config(5, 2), None).unwrap();

    // Port 9 (discard) is closed on test hosts; connection is refused
    let result = client.get("http://127.0.0.1:9/v1/forecast").await;
    assert!(result.is_err());
    assert!(!matches!(result, Err(ResilientClientError::CircuitBreakerOpen)));
}

#[actix_web::test]
async fn test_invalid_url_is_rejected() {
    let client = ResilientClient::new(ResilientClientConfig::default(), None).unwrap();

    let result = client.get("not-a-valid-url").await;
    assert!(result.is_err(), "Invalid URL should result in error");
}

#[test]
fn test_configuration_defaults() {
    let config = ResilientClientConfig::default();

    assert_eq!(config.request_timeout_seconds, 5);
    assert_eq!(config.connect_timeout_seconds, 3);
    assert_eq!(config.circuit_breaker.failure_threshold, 5);
    assert_eq!(config.circuit_breaker.success_threshold, 3);
    assert_eq!(config.circuit_breaker.timeout_seconds, 60);
}
