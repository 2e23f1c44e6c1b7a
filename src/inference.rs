//! Inference invoker
//!
//! Wraps the opaque predictor and normalizes its output into the `/predict`
//! response shape: class index, optional probabilities (in the predictor's
//! own class order), and the human-readable class name when metadata
//! provides one. Callers must hold a `Loaded` artifact; the router checks
//! the load state before reaching this module.

use serde::Serialize;

use crate::artifact::Artifact;
use crate::error::Result;
use crate::validation::PredictRequest;

/// Successful prediction response body
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PredictResponse {
    pub status: String,
    pub prediction_index: usize,
    pub prediction: PredictionLabel,
    /// Serialized as `null` when the predictor has no probability output
    pub proba: Option<Vec<f64>>,
    pub request_id: String,
}

/// Class name when metadata provides one, raw index otherwise
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum PredictionLabel {
    Name(String),
    Index(usize),
}

/// Run the predictor on a validated feature vector and assemble the response.
pub fn infer(artifact: &Artifact, request: &PredictRequest, request_id: &str) -> Result<PredictResponse> {
    let prediction_index = artifact.predictor.predict(&request.features)?;

    let proba = if artifact.predictor.supports_proba() {
        artifact.predictor.predict_proba(&request.features)
    } else {
        None
    };

    // Absent class names fall back to the raw index, as does an index the
    // name table does not cover.
    let prediction = artifact
        .meta
        .class_names
        .as_ref()
        .and_then(|names| names.get(prediction_index))
        .map(|name| PredictionLabel::Name(name.clone()))
        .unwrap_or(PredictionLabel::Index(prediction_index));

    Ok(PredictResponse {
        status: "success".to_string(),
        prediction_index,
        prediction,
        proba,
        request_id: request_id.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::{Metadata, PredictorSpec};

    fn artifact(class_names: Option<Vec<String>>) -> Artifact {
        Artifact {
            predictor: PredictorSpec::Linear {
                coefficients: vec![vec![1.0, 0.0], vec![0.0, 1.0]],
                intercepts: vec![0.0, 0.0],
            }
            .build()
            .unwrap(),
            meta: Metadata {
                n_features: 2,
                class_names,
                ..Metadata::default()
            },
        }
    }

    fn request(features: Vec<f64>) -> PredictRequest {
        PredictRequest { features }
    }

    #[test]
    fn test_infer_with_class_names() {
        let artifact = artifact(Some(vec!["malignant".to_string(), "benign".to_string()]));
        let response = infer(&artifact, &request(vec![0.0, 5.0]), "req-1").unwrap();
        assert_eq!(response.status, "success");
        assert_eq!(response.prediction_index, 1);
        assert_eq!(response.prediction, PredictionLabel::Name("benign".to_string()));
        assert_eq!(response.request_id, "req-1");
    }

    #[test]
    fn test_infer_without_class_names_uses_index() {
        let artifact = artifact(None);
        let response = infer(&artifact, &request(vec![5.0, 0.0]), "req-2").unwrap();
        assert_eq!(response.prediction, PredictionLabel::Index(0));
    }

    #[test]
    fn test_infer_short_name_table_falls_back_to_index() {
        let artifact = artifact(Some(vec!["only-class-zero".to_string()]));
        let response = infer(&artifact, &request(vec![0.0, 5.0]), "req-3").unwrap();
        assert_eq!(response.prediction_index, 1);
        assert_eq!(response.prediction, PredictionLabel::Index(1));
    }

    #[test]
    fn test_proba_present_and_normalized() {
        let artifact = artifact(None);
        let response = infer(&artifact, &request(vec![1.0, 2.0]), "req-4").unwrap();
        let proba = response.proba.unwrap();
        assert!((proba.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_proba_null_without_capability() {
        let artifact = Artifact {
            predictor: PredictorSpec::NearestCentroid {
                centroids: vec![vec![0.0, 0.0], vec![1.0, 1.0]],
            }
            .build()
            .unwrap(),
            meta: Metadata::default(),
        };
        let response = infer(&artifact, &request(vec![0.1, 0.1]), "req-5").unwrap();
        assert!(response.proba.is_none());
        let json = serde_json::to_value(&response).unwrap();
        assert!(json["proba"].is_null());
    }

    #[test]
    fn test_label_serialization() {
        let name = serde_json::to_value(PredictionLabel::Name("benign".to_string())).unwrap();
        assert_eq!(name, serde_json::json!("benign"));
        let index = serde_json::to_value(PredictionLabel::Index(1)).unwrap();
        assert_eq!(index, serde_json::json!(1));
    }
}
