//! Metrics collection and Prometheus integration service.

use prometheus::{
    CounterVec, Gauge, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::time::{Duration, Instant};

use crate::services::resilient_client::ResilientClientMetrics;

/// Outcome of a current-weather cache read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheLookup {
    Hit,
    Miss,
    Stale,
}

impl CacheLookup {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheLookup::Hit => "hit",
            CacheLookup::Miss => "miss",
            CacheLookup::Stale => "stale",
        }
    }
}

/// Build metadata baked in by the build script, if it ran with git available
pub fn build_info() -> (&'static str, &'static str, &'static str) {
    (
        env!("CARGO_PKG_VERSION"),
        option_env!("VERGEN_GIT_SHA").unwrap_or("unknown"),
        option_env!("VERGEN_BUILD_TIMESTAMP").unwrap_or("unknown"),
    )
}

/// Application metrics collector for Prometheus integration
#[derive(Clone)]
pub struct AppMetrics {
    pub registry: Registry,
    pub http_requests_total: CounterVec,
    pub http_request_duration_seconds: HistogramVec,
    pub app_uptime_seconds: Gauge,
    pub app_info: CounterVec,
    pub weather_cache_lookups_total: IntCounterVec,
    pub start_time: Instant,
}

impl AppMetrics {
    /// Create a new metrics collector with default Prometheus metrics
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total = CounterVec::new(
            Opts::new("http_requests_total", "Total number of HTTP requests"),
            &["method", "status", "route"],
        )?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request duration in seconds",
            )
            .buckets(vec![
                0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ]),
            &["method", "route"],
        )?;

        let app_uptime_seconds = Gauge::new("app_uptime_seconds", "Application uptime in seconds")?;

        let app_info = CounterVec::new(
            Opts::new("app_info", "Application information"),
            &["version", "commit", "build_time"],
        )?;

        let weather_cache_lookups_total = IntCounterVec::new(
            Opts::new(
                "weather_cache_lookups_total",
                "Current-weather cache reads by outcome",
            ),
            &["outcome"],
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(app_uptime_seconds.clone()))?;
        registry.register(Box::new(app_info.clone()))?;
        registry.register(Box::new(weather_cache_lookups_total.clone()))?;

        let (version, commit, build_time) = build_info();
        app_info
            .with_label_values(&[version, commit, build_time])
            .inc();

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            app_uptime_seconds,
            app_info,
            weather_cache_lookups_total,
            start_time: Instant::now(),
        })
    }

    /// Provider client metrics registered into this collector's registry
    pub fn provider_client_metrics(&self) -> Result<ResilientClientMetrics, prometheus::Error> {
        ResilientClientMetrics::new(&self.registry)
    }

    /// Record an HTTP request with method, route, status, and duration
    pub fn record_request(&self, method: &str, route: &str, status: u16, duration: Duration) {
        if route == "/api/metrics" {
            // Scrapes would otherwise dominate the counters
            return;
        }

        self.http_requests_total
            .with_label_values(&[method, &status.to_string(), route])
            .inc();

        self.http_request_duration_seconds
            .with_label_values(&[method, route])
            .observe(duration.as_secs_f64());
    }

    pub fn record_cache_lookup(&self, outcome: CacheLookup) {
        self.weather_cache_lookups_total
            .with_label_values(&[outcome.as_str()])
            .inc();
    }

    /// Update the application uptime gauge
    pub fn update_uptime(&self) {
        let uptime = self.start_time.elapsed().as_secs_f64();
        self.app_uptime_seconds.set(uptime);
    }

    /// Render metrics in Prometheus text format
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder.encode_to_string(&metric_families)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_lookups_are_rendered() {
        let metrics = AppMetrics::new().unwrap();
        metrics.record_cache_lookup(CacheLookup::Hit);
        metrics.record_cache_lookup(CacheLookup::Hit);
        metrics.record_cache_lookup(CacheLookup::Stale);

        let text = metrics.render().unwrap();
        assert!(text.contains(r#"weather_cache_lookups_total{outcome="hit"} 2"#));
        assert!(text.contains(r#"weather_cache_lookups_total{outcome="stale"} 1"#));
    }

    #[test]
    fn test_metrics_endpoint_is_not_recorded() {
        let metrics = AppMetrics::new().unwrap();
        metrics.record_request("GET", "/api/metrics", 200, Duration::from_millis(3));
        metrics.record_request("GET", "/api/health", 200, Duration::from_millis(3));

        let text = metrics.render().unwrap();
        assert!(!text.contains(r#"route="/api/metrics""#));
        assert!(text.contains(r#"route="/api/health""#));
    }

    #[test]
    fn test_provider_metrics_share_registry() {
        let metrics = AppMetrics::new().unwrap();
        let client_metrics = metrics.provider_client_metrics().unwrap();
        client_metrics
            .requests_total
            .with_label_values(&["api.open-meteo.com", "success"])
            .inc();

        assert!(metrics.render().unwrap().contains("provider_http_requests_total"));
    }
}
