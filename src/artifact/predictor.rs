//! Predictor trait and the concrete predictors the artifact format supports
//!
//! The artifact stores the model as a tagged spec (`kind` discriminator).
//! Whether a predictor can produce class probabilities is a capability
//! resolved once at load time via [`Predictor::supports_proba`], never by
//! runtime type inspection.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ServingError};

/// Opaque classification capability consumed by the inference invoker.
///
/// `predict` is mandatory; `predict_proba` returns `None` for predictors
/// that do not expose probability output.
pub trait Predictor: Send + Sync {
    /// Predict the class index for a single feature vector
    fn predict(&self, features: &[f64]) -> Result<usize>;

    /// Per-class probabilities in the predictor's own class order,
    /// or `None` when the capability is not supported
    fn predict_proba(&self, features: &[f64]) -> Option<Vec<f64>>;

    /// Whether this predictor exposes probability output
    fn supports_proba(&self) -> bool;

    /// Number of classes this predictor discriminates between
    fn class_count(&self) -> usize;
}

impl std::fmt::Debug for dyn Predictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Predictor")
            .field("class_count", &self.class_count())
            .field("supports_proba", &self.supports_proba())
            .finish()
    }
}

/// Serialized model specification stored in the artifact bundle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PredictorSpec {
    /// Linear scoring model: one coefficient row and intercept per class,
    /// probabilities via softmax over the class scores
    Linear {
        coefficients: Vec<Vec<f64>>,
        intercepts: Vec<f64>,
    },
    /// Nearest-centroid classifier: one centroid per class, no probabilities
    NearestCentroid { centroids: Vec<Vec<f64>> },
}

impl PredictorSpec {
    /// Instantiate the predictor described by this spec.
    ///
    /// Structural inconsistencies (empty class list, ragged rows) are
    /// rejected here so a `Loaded` state always holds a usable predictor.
    pub fn build(self) -> Result<Box<dyn Predictor>> {
        match self {
            PredictorSpec::Linear {
                coefficients,
                intercepts,
            } => {
                if coefficients.is_empty() {
                    return Err(ServingError::artifact_load(
                        "linear model has no coefficient rows",
                    ));
                }
                if coefficients.len() != intercepts.len() {
                    return Err(ServingError::artifact_load(format!(
                        "linear model has {} coefficient rows but {} intercepts",
                        coefficients.len(),
                        intercepts.len()
                    )));
                }
                let width = coefficients[0].len();
                if coefficients.iter().any(|row| row.len() != width) {
                    return Err(ServingError::artifact_load(
                        "linear model coefficient rows have inconsistent lengths",
                    ));
                }
                Ok(Box::new(LinearPredictor {
                    coefficients,
                    intercepts,
                }))
            }
            PredictorSpec::NearestCentroid { centroids } => {
                if centroids.is_empty() {
                    return Err(ServingError::artifact_load(
                        "nearest-centroid model has no centroids",
                    ));
                }
                let width = centroids[0].len();
                if centroids.iter().any(|c| c.len() != width) {
                    return Err(ServingError::artifact_load(
                        "nearest-centroid model centroids have inconsistent lengths",
                    ));
                }
                Ok(Box::new(NearestCentroidPredictor { centroids }))
            }
        }
    }
}

/// Linear scoring classifier with softmax probabilities
pub struct LinearPredictor {
    coefficients: Vec<Vec<f64>>,
    intercepts: Vec<f64>,
}

impl LinearPredictor {
    fn scores(&self, features: &[f64]) -> Result<Vec<f64>> {
        let width = self.coefficients[0].len();
        if features.len() != width {
            return Err(ServingError::inference(format!(
                "feature vector has {} elements, model expects {}",
                features.len(),
                width
            )));
        }
        Ok(self
            .coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(row, b)| row.iter().zip(features).map(|(w, x)| w * x).sum::<f64>() + b)
            .collect())
    }
}

impl Predictor for LinearPredictor {
    fn predict(&self, features: &[f64]) -> Result<usize> {
        let scores = self.scores(features)?;
        Ok(argmax(&scores))
    }

    fn predict_proba(&self, features: &[f64]) -> Option<Vec<f64>> {
        let scores = self.scores(features).ok()?;
        Some(softmax(&scores))
    }

    fn supports_proba(&self) -> bool {
        true
    }

    fn class_count(&self) -> usize {
        self.coefficients.len()
    }
}

/// Nearest-centroid classifier; exercises the no-probability capability path
pub struct NearestCentroidPredictor {
    centroids: Vec<Vec<f64>>,
}

impl Predictor for NearestCentroidPredictor {
    fn predict(&self, features: &[f64]) -> Result<usize> {
        let width = self.centroids[0].len();
        if features.len() != width {
            return Err(ServingError::inference(format!(
                "feature vector has {} elements, model expects {}",
                features.len(),
                width
            )));
        }
        let distances: Vec<f64> = self
            .centroids
            .iter()
            .map(|c| {
                c.iter()
                    .zip(features)
                    .map(|(a, b)| (a - b) * (a - b))
                    .sum::<f64>()
            })
            .collect();
        // Closest centroid wins; argmax over negated distances keeps tie
        // breaking consistent with the linear path (lowest index).
        Ok(argmax(&distances.iter().map(|d| -d).collect::<Vec<_>>()))
    }

    fn predict_proba(&self, _features: &[f64]) -> Option<Vec<f64>> {
        None
    }

    fn supports_proba(&self) -> bool {
        false
    }

    fn class_count(&self) -> usize {
        self.centroids.len()
    }
}

fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}

fn softmax(scores: &[f64]) -> Vec<f64> {
    // Shift by the max score for numerical stability.
    let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.iter().map(|e| e / sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_two_class() -> Box<dyn Predictor> {
        PredictorSpec::Linear {
            coefficients: vec![vec![1.0, 0.0], vec![0.0, 1.0]],
            intercepts: vec![0.0, 0.0],
        }
        .build()
        .unwrap()
    }

    #[test]
    fn test_linear_predict_argmax() {
        let model = linear_two_class();
        assert_eq!(model.predict(&[2.0, 1.0]).unwrap(), 0);
        assert_eq!(model.predict(&[1.0, 2.0]).unwrap(), 1);
    }

    #[test]
    fn test_linear_proba_sums_to_one() {
        let model = linear_two_class();
        let proba = model.predict_proba(&[3.0, -1.0]).unwrap();
        assert_eq!(proba.len(), 2);
        let sum: f64 = proba.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
        assert!(proba[0] > proba[1]);
    }

    #[test]
    fn test_linear_capability_flag() {
        let model = linear_two_class();
        assert!(model.supports_proba());
        assert_eq!(model.class_count(), 2);
    }

    #[test]
    fn test_linear_dimension_mismatch() {
        let model = linear_two_class();
        let err = model.predict(&[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(err, ServingError::Inference(_)));
    }

    #[test]
    fn test_nearest_centroid_predict() {
        let model = PredictorSpec::NearestCentroid {
            centroids: vec![vec![0.0, 0.0], vec![10.0, 10.0]],
        }
        .build()
        .unwrap();
        assert_eq!(model.predict(&[1.0, 1.0]).unwrap(), 0);
        assert_eq!(model.predict(&[9.0, 9.0]).unwrap(), 1);
    }

    #[test]
    fn test_nearest_centroid_has_no_proba() {
        let model = PredictorSpec::NearestCentroid {
            centroids: vec![vec![0.0], vec![1.0]],
        }
        .build()
        .unwrap();
        assert!(!model.supports_proba());
        assert!(model.predict_proba(&[0.5]).is_none());
    }

    #[test]
    fn test_spec_rejects_empty_model() {
        let err = PredictorSpec::Linear {
            coefficients: vec![],
            intercepts: vec![],
        }
        .build()
        .unwrap_err();
        assert!(matches!(err, ServingError::ArtifactLoad(_)));
    }

    #[test]
    fn test_spec_rejects_ragged_rows() {
        let err = PredictorSpec::Linear {
            coefficients: vec![vec![1.0, 2.0], vec![1.0]],
            intercepts: vec![0.0, 0.0],
        }
        .build()
        .unwrap_err();
        assert!(matches!(err, ServingError::ArtifactLoad(_)));
    }

    #[test]
    fn test_spec_tagged_deserialization() {
        let spec: PredictorSpec = serde_json::from_value(serde_json::json!({
            "kind": "linear",
            "coefficients": [[0.5, -0.5]],
            "intercepts": [0.1]
        }))
        .unwrap();
        assert!(matches!(spec, PredictorSpec::Linear { .. }));
    }

    #[test]
    fn test_deterministic_predictions() {
        let model = linear_two_class();
        let features = [0.25, 0.75];
        let first = model.predict_proba(&features).unwrap();
        let second = model.predict_proba(&features).unwrap();
        assert_eq!(first, second);
    }
}
