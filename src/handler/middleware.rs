//! Observability middleware
//!
//! Wraps every request: adopts or generates a correlation id, times the
//! request, records the per-request counter and latency observation, attaches
//! `X-Request-Id` to the response, and emits start/completion log lines.
//!
//! The correlation id and start instant live in a [`RequestContext`] placed
//! in request extensions, so handlers receive them by explicit extraction
//! rather than ambient thread-local state. The post-phase runs after
//! `next.run` on every exit path; since all handler failures are converted
//! to responses, each request is accounted for exactly once.

use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use uuid::Uuid;

use super::routes::AppState;

/// Header carrying the correlation id in both directions
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Per-request ephemeral context, created at entry and discarded at exit
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Correlation id: adopted from the inbound header or freshly generated
    pub request_id: String,
    /// Instant the middleware first saw the request
    pub started_at: Instant,
}

impl RequestContext {
    fn from_request(request: &Request) -> Self {
        let request_id = request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        Self {
            request_id,
            started_at: Instant::now(),
        }
    }
}

/// Normalized endpoint label, keeping metric cardinality bounded
fn endpoint_label(path: &str) -> &'static str {
    match path {
        "/" => "root",
        "/health" => "health",
        "/predict" => "predict",
        "/metrics" => "metrics",
        _ => "unknown",
    }
}

/// Request observability middleware
pub async fn observability_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let endpoint = endpoint_label(request.uri().path());
    let context = RequestContext::from_request(&request);
    let request_id = context.request_id.clone();

    tracing::info!(
        request_id = %request_id,
        method = %method,
        endpoint = %endpoint,
        "Request started"
    );

    request.extensions_mut().insert(context.clone());
    let mut response = next.run(request).await;

    // Post-phase: metrics, correlation header, completion log.
    let duration = context.started_at.elapsed();
    let status = response.status();
    state
        .metrics
        .api()
        .record_request(endpoint, method.as_str(), status.as_u16());
    state
        .metrics
        .api()
        .observe_latency(endpoint, method.as_str(), duration.as_secs_f64());

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    tracing::info!(
        request_id = %request_id,
        method = %method,
        endpoint = %endpoint,
        status = %status.as_u16(),
        duration_ms = %duration.as_millis(),
        "Request completed"
    );

    response
}
