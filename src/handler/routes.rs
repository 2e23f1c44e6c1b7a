//! Route definitions for the serving API
//!
//! - GET  `/` - service information
//! - GET  `/health` - load-state derived health signal
//! - POST `/predict` - classification from a feature vector
//! - GET  `/metrics` - Prometheus text exposition
//!
//! `/predict` short-circuits on a failed load state before any validation
//! runs; validation failures come back as 400 with every violation itemized;
//! unexpected predictor failures are logged in full but surfaced with a
//! generic message.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::artifact::LoadState;
use crate::error::FieldError;
use crate::inference::{infer, PredictResponse};
use crate::telemetry::metrics::PredictionOutcome;
use crate::telemetry::ApiMetricsRegistry;
use crate::validation::validate_features;

use super::middleware::observability_middleware;
use super::{HealthResponse, RequestContext, ServiceInfo};

/// Prometheus text exposition content type
const METRICS_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Shared state for all routes.
///
/// The load state is resolved once at startup and shared read-only; no
/// mutation path exists after construction, so handlers share it without
/// locking.
#[derive(Clone)]
pub struct AppState {
    pub load_state: Arc<LoadState>,
    pub metrics: Arc<ApiMetricsRegistry>,
    pub model_path: String,
}

impl AppState {
    pub fn new(
        load_state: Arc<LoadState>,
        metrics: Arc<ApiMetricsRegistry>,
        model_path: impl Into<String>,
    ) -> Self {
        metrics.api().set_model_loaded(load_state.is_loaded());
        Self {
            load_state,
            metrics,
            model_path: model_path.into(),
        }
    }
}

/// API error types mapped to HTTP outcomes
#[derive(Debug)]
pub enum ApiError {
    /// Payload violated the feature-vector contract (HTTP 400)
    Validation(Vec<FieldError>),
    /// Prediction attempted while no model is loaded (HTTP 500)
    ModelUnavailable(String),
    /// Unexpected internal failure; detail stays in the logs (HTTP 500)
    Internal,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::ModelUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            ApiError::Validation(details) => serde_json::json!({
                "status": "error",
                "message": "Invalid prediction payload",
                "details": details,
            }),
            ApiError::ModelUnavailable(reason) => serde_json::json!({
                "status": "error",
                "message": "Model not loaded",
                "error": reason,
            }),
            ApiError::Internal => serde_json::json!({
                "status": "error",
                "message": "Prediction failed",
            }),
        };
        (status, Json(body)).into_response()
    }
}

/// Create the router with all routes and the observability middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(service_info))
        .route("/health", get(health_check))
        .route("/predict", post(predict))
        .route("/metrics", get(metrics_exposition))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            observability_middleware,
        ))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// GET `/` - service information
pub async fn service_info(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        status: "success".to_string(),
        message: "Classifier serving API".to_string(),
        model_path: state.model_path.clone(),
        meta: state.load_state.meta_value(),
        load_error: state.load_state.load_error().map(str::to_string),
    })
}

/// GET `/health` - health derived from the startup load state
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let healthy = state.load_state.is_loaded();
    let response = HealthResponse {
        status: if healthy { "ok" } else { "error" }.to_string(),
        model_loaded: healthy,
        n_features: state.load_state.n_features(),
        meta: state.load_state.meta_value(),
        error: state.load_state.load_error().map(str::to_string),
    };
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(response))
}

/// POST `/predict` - run inference on a validated feature vector
pub async fn predict(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    body: Bytes,
) -> Result<Json<PredictResponse>, ApiError> {
    let metrics = state.metrics.api();

    // Load-state gate comes before any payload handling.
    let artifact = match state.load_state.as_ref() {
        LoadState::Loaded(artifact) => artifact,
        LoadState::Failed { reason } => {
            metrics.record_prediction(PredictionOutcome::ModelUnavailable);
            return Err(ApiError::ModelUnavailable(reason.clone()));
        }
    };

    let raw: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(request_id = %context.request_id, error = %err, "Malformed request body");
            metrics.record_prediction(PredictionOutcome::ValidationError);
            return Err(ApiError::Validation(vec![FieldError::new(
                "",
                "INVALID_JSON",
                format!("Request body is not valid JSON: {}", err),
            )]));
        }
    };

    let request = match validate_features(&raw, artifact.meta.n_features) {
        Ok(request) => request,
        Err(details) => {
            tracing::warn!(
                request_id = %context.request_id,
                violations = details.len(),
                "Invalid prediction payload"
            );
            metrics.record_prediction(PredictionOutcome::ValidationError);
            return Err(ApiError::Validation(details));
        }
    };

    match infer(artifact, &request, &context.request_id) {
        Ok(response) => {
            tracing::info!(
                request_id = %context.request_id,
                prediction_index = response.prediction_index,
                "Prediction ok"
            );
            metrics.record_prediction(PredictionOutcome::Success);
            Ok(Json(response))
        }
        Err(err) => {
            tracing::error!(request_id = %context.request_id, error = %err, "Inference failed");
            metrics.record_prediction(PredictionOutcome::InternalError);
            Err(ApiError::Internal)
        }
    }
}

/// GET `/metrics` - Prometheus text exposition
pub async fn metrics_exposition(State(state): State<AppState>) -> Result<Response, ApiError> {
    let text = state.metrics.encode_text().map_err(|err| {
        tracing::error!(error = %err, "Metrics encoding failed");
        ApiError::Internal
    })?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, METRICS_CONTENT_TYPE)],
        text,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_status_codes() {
        assert_eq!(
            ApiError::Validation(vec![]).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::ModelUnavailable("gone".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(ApiError::Internal.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_app_state_sets_loaded_gauge() {
        let metrics = Arc::new(ApiMetricsRegistry::new().unwrap());
        let load_state = Arc::new(LoadState::Failed {
            reason: "missing artifact".to_string(),
        });
        let _state = AppState::new(load_state, Arc::clone(&metrics), "model/artifact.json");
        let text = metrics.encode_text().unwrap();
        assert!(text.contains("api_model_loaded 0"));
    }
}
