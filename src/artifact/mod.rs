//! Model artifact loading and process-wide load state
//!
//! The artifact is a JSON bundle produced by the offline training job:
//!
//! ```json
//! {
//!   "model": { "kind": "linear", "coefficients": [...], "intercepts": [...] },
//!   "meta": {
//!     "n_features": 30,
//!     "class_names": ["malignant", "benign"],
//!     "test_accuracy": 0.9649,
//!     "dataset": "breast_cancer_wisconsin"
//!   }
//! }
//! ```
//!
//! Loading happens exactly once at startup. Failure never escapes this module
//! as an error: it is recorded as [`LoadState::Failed`] and the process keeps
//! serving `/health` and informational endpoints in a degraded state.

pub mod predictor;

pub use predictor::{Predictor, PredictorSpec};

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Expected feature count when the artifact carries no usable metadata
pub const DEFAULT_N_FEATURES: usize = 30;

/// Read-only metadata attached to the trained model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Number of features the model expects
    #[serde(default = "default_n_features")]
    pub n_features: usize,
    /// Human-readable class names, ordered by class index
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_names: Option<Vec<String>>,
    /// Held-out accuracy recorded by the training job
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_accuracy: Option<f64>,
    /// Name of the training dataset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset: Option<String>,
}

fn default_n_features() -> usize {
    DEFAULT_N_FEATURES
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            n_features: DEFAULT_N_FEATURES,
            class_names: None,
            test_accuracy: None,
            dataset: None,
        }
    }
}

impl Metadata {
    /// Parse metadata from the raw `meta` value in the bundle.
    ///
    /// Absent or malformed metadata degrades to defaults rather than failing
    /// the load; the model itself may still be perfectly usable.
    fn from_value(value: serde_json::Value) -> Self {
        if value.is_null() {
            return Self::default();
        }
        match serde_json::from_value(value) {
            Ok(meta) => meta,
            Err(err) => {
                tracing::warn!(error = %err, "Malformed artifact metadata, using defaults");
                Self::default()
            }
        }
    }
}

/// Immutable bundle of predictor and metadata, owned for the process lifetime
pub struct Artifact {
    pub predictor: Box<dyn Predictor>,
    pub meta: Metadata,
}

/// On-disk bundle layout
#[derive(Deserialize)]
struct ArtifactBundle {
    model: PredictorSpec,
    #[serde(default)]
    meta: serde_json::Value,
}

/// Startup-derived load state gating all inference traffic.
///
/// Set exactly once; health and predict availability are pure functions of
/// this value.
pub enum LoadState {
    Loaded(Artifact),
    Failed { reason: String },
}

impl LoadState {
    /// Load the artifact bundle from a filesystem path.
    ///
    /// Never propagates failure: missing file, corrupt JSON, or a missing
    /// `model` key all become `Failed { reason }`.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(artifact) => {
                tracing::info!(
                    path = %path.display(),
                    n_features = artifact.meta.n_features,
                    classes = artifact.predictor.class_count(),
                    "Model artifact loaded"
                );
                LoadState::Loaded(artifact)
            }
            Err(err) => {
                let reason = err.to_string();
                tracing::error!(path = %path.display(), error = %reason, "Model artifact load failed");
                LoadState::Failed { reason }
            }
        }
    }

    fn try_load(path: &Path) -> Result<Artifact> {
        let raw = fs::read_to_string(path)?;
        let bundle: ArtifactBundle = serde_json::from_str(&raw)?;
        let predictor = bundle.model.build()?;
        let meta = Metadata::from_value(bundle.meta);
        Ok(Artifact { predictor, meta })
    }

    /// Whether a usable model is held
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadState::Loaded(_))
    }

    /// The loaded artifact, if any
    pub fn artifact(&self) -> Option<&Artifact> {
        match self {
            LoadState::Loaded(artifact) => Some(artifact),
            LoadState::Failed { .. } => None,
        }
    }

    /// The recorded load failure reason, if any
    pub fn load_error(&self) -> Option<&str> {
        match self {
            LoadState::Loaded(_) => None,
            LoadState::Failed { reason } => Some(reason),
        }
    }

    /// Expected feature count, falling back to the default when unloaded
    pub fn n_features(&self) -> usize {
        match self {
            LoadState::Loaded(artifact) => artifact.meta.n_features,
            LoadState::Failed { .. } => DEFAULT_N_FEATURES,
        }
    }

    /// Metadata as a JSON value for health/info responses (`{}` when unloaded)
    pub fn meta_value(&self) -> serde_json::Value {
        match self {
            LoadState::Loaded(artifact) => {
                serde_json::to_value(&artifact.meta).unwrap_or_else(|_| serde_json::json!({}))
            }
            LoadState::Failed { .. } => serde_json::json!({}),
        }
    }
}
