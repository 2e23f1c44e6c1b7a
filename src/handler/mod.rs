//! HTTP handler infrastructure for the serving API
//!
//! Organized into:
//! - `routes`: route definitions, endpoint handlers, and error-to-HTTP mapping
//! - `middleware`: correlation ids, request timing, metrics, and logging
//!
//! All endpoints return machine-readable JSON; failures never surface as bare
//! stack traces.

pub mod middleware;
pub mod routes;

pub use middleware::{observability_middleware, RequestContext, REQUEST_ID_HEADER};
pub use routes::{create_router, ApiError, AppState};

use serde::Serialize;

/// GET `/` informational response
#[derive(Debug, Clone, Serialize)]
pub struct ServiceInfo {
    pub status: String,
    pub message: String,
    pub model_path: String,
    pub meta: serde_json::Value,
    /// Present as `null` when the artifact loaded cleanly
    pub load_error: Option<String>,
}

/// GET `/health` response
///
/// `error` is always serialized, `null` when healthy, so callers can key on
/// it without probing for field presence.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub n_features: usize,
    pub meta: serde_json::Value,
    pub error: Option<String>,
}
