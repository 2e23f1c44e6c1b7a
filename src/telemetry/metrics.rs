//! Prometheus metrics for the serving API
//!
//! - `api_requests_total` (counter) - requests by endpoint, method, status
//! - `api_request_latency_seconds` (histogram) - latency by endpoint, method
//! - `api_predictions_total` (counter) - prediction outcomes
//! - `api_model_loaded` (gauge) - 1 when the artifact loaded, 0 otherwise
//!
//! The middleware records one count and one latency observation per request,
//! after the handler completes, so metrics account for every request exactly
//! once regardless of outcome.

use prometheus::{CounterVec, Gauge, HistogramVec, Opts, Registry};
use std::sync::Arc;

use super::Result;

/// Prediction outcome label values for `api_predictions_total`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionOutcome {
    Success,
    ValidationError,
    ModelUnavailable,
    InternalError,
}

impl PredictionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            PredictionOutcome::Success => "success",
            PredictionOutcome::ValidationError => "validation_error",
            PredictionOutcome::ModelUnavailable => "model_unavailable",
            PredictionOutcome::InternalError => "internal_error",
        }
    }
}

/// API metrics handles
pub struct ApiMetrics {
    /// Total requests (by endpoint, method, status)
    requests_total: CounterVec,

    /// Request latency in seconds (by endpoint, method)
    request_latency_seconds: HistogramVec,

    /// Prediction outcomes (by outcome)
    predictions_total: CounterVec,

    /// Whether the model artifact is loaded
    model_loaded: Gauge,
}

impl ApiMetrics {
    /// Create the metric handles and register them with the provided registry
    pub fn new(registry: Arc<Registry>) -> Result<Self> {
        let requests_total = CounterVec::new(
            Opts::new("api_requests_total", "Total number of API requests"),
            &["endpoint", "method", "status"],
        )?;

        let request_latency_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "api_request_latency_seconds",
                "API request latency in seconds by endpoint",
            )
            .buckets(vec![
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0,
            ]),
            &["endpoint", "method"],
        )?;

        let predictions_total = CounterVec::new(
            Opts::new("api_predictions_total", "Prediction requests by outcome"),
            &["outcome"],
        )?;

        let model_loaded = Gauge::new(
            "api_model_loaded",
            "1 when the model artifact loaded successfully, 0 otherwise",
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(request_latency_seconds.clone()))?;
        registry.register(Box::new(predictions_total.clone()))?;
        registry.register(Box::new(model_loaded.clone()))?;

        Ok(Self {
            requests_total,
            request_latency_seconds,
            predictions_total,
            model_loaded,
        })
    }

    /// Record a completed request
    pub fn record_request(&self, endpoint: &str, method: &str, status: u16) {
        self.requests_total
            .with_label_values(&[endpoint, method, &status.to_string()])
            .inc();
    }

    /// Observe request latency
    pub fn observe_latency(&self, endpoint: &str, method: &str, duration_secs: f64) {
        self.request_latency_seconds
            .with_label_values(&[endpoint, method])
            .observe(duration_secs);
    }

    /// Record a prediction outcome
    pub fn record_prediction(&self, outcome: PredictionOutcome) {
        self.predictions_total
            .with_label_values(&[outcome.as_str()])
            .inc();
    }

    /// Set the model-loaded gauge from the startup load state
    pub fn set_model_loaded(&self, loaded: bool) {
        self.model_loaded.set(if loaded { 1.0 } else { 0.0 });
    }
}

/// Registry wrapper owning the Prometheus registry and API metrics
pub struct ApiMetricsRegistry {
    registry: Arc<Registry>,
    api: ApiMetrics,
}

impl ApiMetricsRegistry {
    /// Create a new metrics registry
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());
        let api = ApiMetrics::new(Arc::clone(&registry))?;
        Ok(Self { registry, api })
    }

    /// Get the underlying Prometheus registry
    pub fn registry(&self) -> Arc<Registry> {
        Arc::clone(&self.registry)
    }

    /// Get the API metrics handles
    pub fn api(&self) -> &ApiMetrics {
        &self.api
    }

    /// Gather all metrics in Prometheus format
    pub fn gather(&self) -> Vec<prometheus::proto::MetricFamily> {
        self.registry.gather()
    }

    /// Encode metrics as text for scraping
    pub fn encode_text(&self) -> Result<String> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
