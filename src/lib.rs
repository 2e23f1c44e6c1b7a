//! Model serving API
//!
//! An HTTP service exposing a trained classification model: it accepts a
//! fixed-length numeric feature vector, returns the predicted class (and
//! class probabilities when the model supports them), and reports health and
//! usage metrics. The model is loaded once at startup from a serialized
//! artifact produced by an offline training job; a failed load leaves the
//! service running in a degraded state that still answers `/health`.
//!
//! ## Architecture
//!
//! 1. **Artifact** (`artifact/`): loads the serialized bundle and holds the
//!    process-wide load state. The predictor is an opaque capability behind
//!    the [`artifact::Predictor`] trait; probability support is a tag
//!    resolved at load time.
//!
//! 2. **Validation** (`validation`): enforces the feature-vector contract,
//!    accumulating every violation for itemized 400 responses.
//!
//! 3. **Inference** (`inference`): invokes the predictor and assembles the
//!    response shape.
//!
//! 4. **Handler** (`handler/`): axum routes, error-to-HTTP mapping, and the
//!    observability middleware (correlation ids, metrics, structured logs).
//!
//! 5. **Telemetry** (`telemetry/`): Prometheus metrics and text exposition.
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/` | Service information |
//! | GET | `/health` | 200 when the model loaded, 500 otherwise |
//! | POST | `/predict` | Classification from `{"features": [...]}` |
//! | GET | `/metrics` | Prometheus exposition |
//!
//! Every response carries an `X-Request-Id` header; an inbound value is
//! adopted as the correlation id, otherwise a fresh UUID is generated.

pub mod artifact;
pub mod config;
pub mod error;
pub mod handler;
pub mod inference;
pub mod telemetry;
pub mod validation;

pub use artifact::{Artifact, LoadState, Metadata, Predictor, PredictorSpec};
pub use config::ServeConfig;
pub use error::{FieldError, ServingError};
pub use handler::{create_router, AppState};
pub use telemetry::ApiMetricsRegistry;
