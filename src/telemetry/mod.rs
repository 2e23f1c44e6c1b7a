//! Telemetry for the serving API
//!
//! Prometheus metrics collection and text exposition. Logging is handled by
//! `tracing` directly; this module owns the metric registry.

pub mod metrics;

pub use metrics::{ApiMetrics, ApiMetricsRegistry};

use thiserror::Error;

/// Telemetry errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Metrics error: {0}")]
    MetricsError(#[from] prometheus::Error),

    #[error("Metrics encoding produced invalid UTF-8: {0}")]
    EncodingError(#[from] std::string::FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, TelemetryError>;
