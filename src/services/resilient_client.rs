//! Outbound HTTP client with timeouts and per-destination circuit breakers.
//!
//! Calls are made exactly once: failures are classified and handed back to
//! the caller, which decides how to surface them. Repeated failures against
//! one host open a circuit so that an unhealthy provider is not hammered
//! by every incoming request.

use prometheus::{CounterVec, GaugeVec, HistogramOpts, HistogramVec, Opts, Registry};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Configuration for the resilient HTTP client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResilientClientConfig {
    /// Upper bound for a whole request, response body included (in seconds)
    pub request_timeout_seconds: u64,

    /// Connection timeout (in seconds)
    pub connect_timeout_seconds: u64,

    /// Circuit breaker configuration
    pub circuit_breaker: CircuitBreakerConfig,

    /// Log every request outcome at info/warn
    pub enable_detailed_logging: bool,
}

/// Simple circuit breaker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures that open the circuit
    pub failure_threshold: usize,

    /// Half-open successes needed to close it again
    pub success_threshold: usize,

    /// Seconds an open circuit waits before letting a probe through
    pub timeout_seconds: u64,
}

impl Default for ResilientClientConfig {
    fn default() -> Self {
        Self {
            request_timeout_seconds: 5,
            connect_timeout_seconds: 3,
            circuit_breaker: CircuitBreakerConfig::default(),
            enable_detailed_logging: true,
        }
    }
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            success_threshold: 3,
            timeout_seconds: 60,
        }
    }
}

/// Circuit breaker state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CircuitBreakerState {
    Closed,
    Open,
    HalfOpen,
}

impl CircuitBreakerState {
    fn gauge_value(self) -> f64 {
        match self {
            CircuitBreakerState::Closed => 0.0,
            CircuitBreakerState::Open => 1.0,
            CircuitBreakerState::HalfOpen => 2.0,
        }
    }
}

/// Consecutive-failure circuit breaker
#[derive(Debug)]
pub struct SimpleCircuitBreaker {
    state: CircuitBreakerState,
    failure_count: usize,
    success_count: usize,
    config: CircuitBreakerConfig,
    opened_at: Option<Instant>,
    probe_started_at: Option<Instant>,
}

impl SimpleCircuitBreaker {
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            state: CircuitBreakerState::Closed,
            failure_count: 0,
            success_count: 0,
            config,
            opened_at: None,
            probe_started_at: None,
        }
    }

    /// Whether a call may proceed.
    ///
    /// An open circuit turns half-open once its timeout elapsed. Half-open
    /// admits one probe at a time; a probe that never settled is abandoned
    /// after the same timeout.
    pub fn call_allowed(&mut self) -> bool {
        let timeout = Duration::from_secs(self.config.timeout_seconds);
        match self.state {
            CircuitBreakerState::Closed => true,
            CircuitBreakerState::HalfOpen => {
                let probe_free = self
                    .probe_started_at
                    .is_none_or(|started| started.elapsed() >= timeout);
                if probe_free {
                    self.probe_started_at = Some(Instant::now());
                }
                probe_free
            }
            CircuitBreakerState::Open => {
                let cooled_down = self
                    .opened_at
                    .is_some_and(|opened| opened.elapsed() >= timeout);
                if cooled_down {
                    self.state = CircuitBreakerState::HalfOpen;
                    self.success_count = 0;
                    self.probe_started_at = Some(Instant::now());
                }
                cooled_down
            }
        }
    }

    pub fn on_success(&mut self) {
        self.failure_count = 0;
        self.probe_started_at = None;

        if self.state == CircuitBreakerState::HalfOpen {
            self.success_count += 1;
            if self.success_count >= self.config.success_threshold {
                self.state = CircuitBreakerState::Closed;
                self.opened_at = None;
            }
        }
    }

    pub fn on_failure(&mut self) {
        self.failure_count += 1;
        self.probe_started_at = None;

        // A failed probe reopens immediately
        if self.state == CircuitBreakerState::HalfOpen
            || self.failure_count >= self.config.failure_threshold
        {
            self.state = CircuitBreakerState::Open;
            self.opened_at = Some(Instant::now());
            self.success_count = 0;
        }
    }

    pub fn state(&self) -> CircuitBreakerState {
        self.state
    }
}

/// Prometheus metrics for outbound provider calls
#[derive(Clone)]
pub struct ResilientClientMetrics {
    /// Requests by destination and outcome
    pub requests_total: CounterVec,

    /// Request duration by destination
    pub request_duration_seconds: HistogramVec,

    /// Circuit breaker state by destination (0=closed, 1=open, 2=half-open)
    pub circuit_breaker_state: GaugeVec,
}

impl ResilientClientMetrics {
    /// Create the metrics and register them with `registry`
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let requests_total = CounterVec::new(
            Opts::new(
                "provider_http_requests_total",
                "Total outbound provider requests by destination and outcome",
            ),
            &["destination", "outcome"],
        )?;

        let request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "provider_http_request_duration_seconds",
                "Duration of outbound provider requests",
            )
            .buckets(vec![0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
            &["destination"],
        )?;

        let circuit_breaker_state = GaugeVec::new(
            Opts::new(
                "provider_http_circuit_breaker_state",
                "Circuit breaker state (0=closed, 1=open, 2=half-open)",
            ),
            &["destination"],
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(request_duration_seconds.clone()))?;
        registry.register(Box::new(circuit_breaker_state.clone()))?;

        Ok(Self {
            requests_total,
            request_duration_seconds,
            circuit_breaker_state,
        })
    }
}

/// HTTP client shared by all requests of one provider
pub struct ResilientClient {
    client: Client,
    config: ResilientClientConfig,
    metrics: Option<ResilientClientMetrics>,
    circuit_breakers: Mutex<HashMap<String, SimpleCircuitBreaker>>,
}

impl ResilientClient {
    pub fn new(
        config: ResilientClientConfig,
        metrics: Option<ResilientClientMetrics>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            config,
            metrics,
            circuit_breakers: Mutex::new(HashMap::new()),
        })
    }

    /// Issue a single GET request.
    ///
    /// Any status code is returned as `Ok`; interpreting it is up to the caller.
    /// Server errors (5xx) still count as failures for the circuit breaker.
    pub async fn get(&self, url: &str) -> Result<reqwest::Response, ResilientClientError> {
        let destination = extract_destination(url);

        if !self.admit(&destination) {
            warn!(
                destination = %destination,
                "Circuit breaker is open, rejecting request"
            );
            self.record_outcome(&destination, "circuit_open", None);
            return Err(ResilientClientError::CircuitBreakerOpen);
        }

        let timeout = Duration::from_secs(self.config.request_timeout_seconds);
        let start = Instant::now();
        let send = self.client.get(url).send();
        let result = tokio::time::timeout(timeout, send).await;
        let elapsed = start.elapsed();

        match result {
            Ok(Ok(response)) => {
                let status = response.status();
                if self.config.enable_detailed_logging {
                    info!(
                        destination = %destination,
                        status = status.as_u16(),
                        duration_ms = elapsed.as_millis(),
                        "Provider request completed"
                    );
                }
                if status.is_server_error() {
                    self.settle(&destination, false);
                    self.record_outcome(&destination, "server_error", Some(elapsed));
                } else {
                    self.settle(&destination, true);
                    self.record_outcome(&destination, "success", Some(elapsed));
                }
                Ok(response)
            }
            Ok(Err(e)) => {
                if self.config.enable_detailed_logging {
                    warn!(
                        destination = %destination,
                        error = %e,
                        duration_ms = elapsed.as_millis(),
                        "Provider request failed with network error"
                    );
                }
                self.settle(&destination, false);
                let outcome = if e.is_timeout() { "timeout" } else { "network_error" };
                self.record_outcome(&destination, outcome, Some(elapsed));
                if e.is_timeout() {
                    Err(ResilientClientError::Timeout)
                } else {
                    Err(ResilientClientError::NetworkError(e))
                }
            }
            Err(_) => {
                if self.config.enable_detailed_logging {
                    warn!(
                        destination = %destination,
                        timeout_seconds = timeout.as_secs(),
                        "Provider request timed out"
                    );
                }
                self.settle(&destination, false);
                self.record_outcome(&destination, "timeout", Some(elapsed));
                Err(ResilientClientError::Timeout)
            }
        }
    }

    /// Current breaker state for a host, `None` if it was never contacted
    pub fn circuit_state(&self, destination: &str) -> Option<CircuitBreakerState> {
        let breakers = self
            .circuit_breakers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        breakers.get(destination).map(SimpleCircuitBreaker::state)
    }

    fn admit(&self, destination: &str) -> bool {
        let mut breakers = self
            .circuit_breakers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let breaker = breakers
            .entry(destination.to_string())
            .or_insert_with(|| SimpleCircuitBreaker::new(self.config.circuit_breaker.clone()));
        let allowed = breaker.call_allowed();
        self.record_circuit_state(destination, breaker.state());
        allowed
    }

    fn settle(&self, destination: &str, success: bool) {
        let mut breakers = self
            .circuit_breakers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(breaker) = breakers.get_mut(destination) {
            if success {
                breaker.on_success();
            } else {
                breaker.on_failure();
            }
            self.record_circuit_state(destination, breaker.state());
        }
    }

    fn record_outcome(&self, destination: &str, outcome: &str, duration: Option<Duration>) {
        if let Some(metrics) = &self.metrics {
            metrics
                .requests_total
                .with_label_values(&[destination, outcome])
                .inc();
            if let Some(duration) = duration {
                metrics
                    .request_duration_seconds
                    .with_label_values(&[destination])
                    .observe(duration.as_secs_f64());
            }
        }
    }

    fn record_circuit_state(&self, destination: &str, state: CircuitBreakerState) {
        if let Some(metrics) = &self.metrics {
            metrics
                .circuit_breaker_state
                .with_label_values(&[destination])
                .set(state.gauge_value());
        }
    }
}

/// Host part of a URL, used to group metrics and circuit breakers
fn extract_destination(url: &str) -> String {
    url::Url::parse(url)
        .map(|u| u.host_str().unwrap_or("unknown").to_string())
        .unwrap_or_else(|_| "invalid_url".to_string())
}

/// Errors that can occur with the resilient client
#[derive(Debug, thiserror::Error)]
pub enum ResilientClientError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Request timed out")]
    Timeout,

    #[error("Circuit breaker is open")]
    CircuitBreakerOpen,
}

impl ResilientClientError {
    /// A user-facing explanation, free of internal details
    pub fn user_message(&self) -> String {
        match self {
            ResilientClientError::NetworkError(_) => {
                "service temporarily unavailable due to network issues".to_string()
            }
            ResilientClientError::Timeout => {
                "service temporarily unavailable due to timeout".to_string()
            }
            ResilientClientError::CircuitBreakerOpen => {
                "service temporarily unavailable, please try again later".to_string()
            }
        }
    }
}
