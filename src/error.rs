//! Error types for the model serving API
//!
//! Provides the failure taxonomy for artifact loading, request validation,
//! and inference, plus the itemized field-level error record surfaced in
//! 400 responses.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for serving operations
#[derive(Error, Debug)]
pub enum ServingError {
    /// Artifact could not be read or deserialized at startup
    #[error("Artifact load failed: {0}")]
    ArtifactLoad(String),

    /// Prediction requested while no model is loaded
    #[error("Model not loaded: {0}")]
    ModelUnavailable(String),

    /// Request payload violated the feature-vector contract
    #[error("Invalid prediction payload ({} violation(s))", .0.len())]
    Validation(Vec<FieldError>),

    /// Unexpected predictor failure during inference
    #[error("Inference failed: {0}")]
    Inference(String),
}

impl ServingError {
    /// Create an artifact load error
    pub fn artifact_load(msg: impl Into<String>) -> Self {
        ServingError::ArtifactLoad(msg.into())
    }

    /// Create an inference error
    pub fn inference(msg: impl Into<String>) -> Self {
        ServingError::Inference(msg.into())
    }

    /// Check if this is a user-facing error (vs internal)
    pub fn is_user_error(&self) -> bool {
        matches!(self, ServingError::Validation(_))
    }
}

impl From<std::io::Error> for ServingError {
    fn from(err: std::io::Error) -> Self {
        ServingError::ArtifactLoad(err.to_string())
    }
}

impl From<serde_json::Error> for ServingError {
    fn from(err: serde_json::Error) -> Self {
        ServingError::ArtifactLoad(format!("JSON error: {}", err))
    }
}

/// Individual validation violation, itemized in 400 response bodies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    /// Path to the offending field, e.g. `features[3]`
    pub path: String,
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Expected value or type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    /// Actual value or type found
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
}

impl FieldError {
    pub fn new(path: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            code: code.into(),
            message: message.into(),
            expected: None,
            actual: None,
        }
    }

    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    pub fn with_actual(mut self, actual: impl Into<String>) -> Self {
        self.actual = Some(actual.into());
        self
    }
}

/// Result type alias for serving operations
pub type Result<T> = std::result::Result<T, ServingError>;
