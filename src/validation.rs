//! Inbound feature-vector validation
//!
//! Enforces the `/predict` request contract before any inference runs:
//! the payload must be a JSON object with a `features` array of exactly the
//! expected length, every element convertible to a finite f64. Violations
//! are accumulated so the 400 response itemizes every problem, not just the
//! first. Unknown fields are ignored for forward compatibility.

use serde_json::Value;

use crate::error::FieldError;

/// Validated prediction input
#[derive(Debug, Clone, PartialEq)]
pub struct PredictRequest {
    pub features: Vec<f64>,
}

/// Validate a raw JSON payload against the feature-vector contract.
///
/// `expected` is the feature count from the loaded artifact's metadata.
pub fn validate_features(raw: &Value, expected: usize) -> Result<PredictRequest, Vec<FieldError>> {
    let mut errors = Vec::new();

    let Some(object) = raw.as_object() else {
        errors.push(
            FieldError::new("", "TYPE_MISMATCH", "Payload must be a JSON object")
                .with_expected("object")
                .with_actual(json_type_name(raw)),
        );
        return Err(errors);
    };

    let Some(features_value) = object.get("features") else {
        errors.push(
            FieldError::new(
                "features",
                "REQUIRED_FIELD_MISSING",
                "Required field 'features' is missing",
            )
            .with_expected("array"),
        );
        return Err(errors);
    };

    let Some(items) = features_value.as_array() else {
        errors.push(
            FieldError::new("features", "TYPE_MISMATCH", "Field 'features' must be an array")
                .with_expected("array")
                .with_actual(json_type_name(features_value)),
        );
        return Err(errors);
    };

    if items.len() != expected {
        errors.push(
            FieldError::new(
                "features",
                "LENGTH_MISMATCH",
                format!(
                    "Expected exactly {} features, got {}",
                    expected,
                    items.len()
                ),
            )
            .with_expected(expected.to_string())
            .with_actual(items.len().to_string()),
        );
    }

    let mut features = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match coerce_finite(item) {
            Some(value) => features.push(value),
            None => errors.push(
                FieldError::new(
                    format!("features[{}]", index),
                    "NOT_NUMERIC",
                    format!("Element at index {} is not a finite number", index),
                )
                .with_expected("finite float")
                .with_actual(json_type_name(item)),
            ),
        }
    }

    if errors.is_empty() {
        Ok(PredictRequest { features })
    } else {
        Err(errors)
    }
}

/// Convert a JSON value into a finite f64 where possible.
///
/// Numbers pass through at full double precision; numeric strings are
/// coerced (matching the lax coercion of the upstream contract); booleans
/// and everything else are rejected.
fn coerce_finite(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite())
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
