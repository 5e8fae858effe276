use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::ClientError;
use crate::task::Task;

/// JSON body for the numeric and text tasks.
#[derive(Debug, Clone, Serialize)]
pub struct PredictRequest {
    pub task_name: String,
    pub input_data: Value,
}

impl PredictRequest {
    pub fn numeric(matrix: Vec<Vec<f64>>) -> Self {
        Self {
            task_name: Task::Numeric.as_str().to_string(),
            input_data: json!(matrix),
        }
    }

    /// Text is passed through as a raw string, empty or not.
    pub fn text(text: &str) -> Self {
        Self {
            task_name: Task::Text.as_str().to_string(),
            input_data: Value::String(text.to_string()),
        }
    }
}

/// JSON body for the two-feature regression endpoint. Optional fields are
/// omitted from the serialized body; the server applies its own defaults.
#[derive(Debug, Clone, Serialize)]
pub struct RegressionRequest {
    pub feature1: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature2: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_threshold: Option<f64>,
}

/// Envelope every `/predict` and `/predict-image` response uses.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictResponse {
    pub prediction: Value,
}

/// Structured prediction inside the envelope for the handwritten-digit
/// task. `processed_image` is a base64-encoded PNG and may be absent.
#[derive(Debug, Clone, Deserialize)]
pub struct DigitPrediction {
    pub predicted_digit: i64,
    #[serde(default)]
    pub processed_image: Option<String>,
}

impl DigitPrediction {
    pub fn from_prediction(prediction: &Value) -> Result<Self, ClientError> {
        Ok(serde_json::from_value(prediction.clone())?)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegressionResponse {
    pub prediction: f64,
    pub confidence: f64,
    pub message: String,
}

/// FastAPI error body, parsed best-effort out of non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorDetail {
    pub detail: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HelloResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_request_shape() {
        let request = PredictRequest::numeric(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["task_name"], "numeric");
        assert_eq!(body["input_data"], json!([[1.0, 2.0], [3.0, 4.0]]));
    }

    #[test]
    fn test_text_request_shape() {
        let request = PredictRequest::text("こんにちは");
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["task_name"], "text");
        assert_eq!(body["input_data"], "こんにちは");
    }

    #[test]
    fn test_regression_request_omits_absent_fields() {
        let request = RegressionRequest {
            feature1: 1.5,
            feature2: None,
            confidence_threshold: None,
        };
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body, json!({ "feature1": 1.5 }));
    }

    #[test]
    fn test_regression_request_keeps_present_fields() {
        let request = RegressionRequest {
            feature1: 1.5,
            feature2: Some(-2.0),
            confidence_threshold: Some(0.9),
        };
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            json!({ "feature1": 1.5, "feature2": -2.0, "confidence_threshold": 0.9 })
        );
    }

    #[test]
    fn test_digit_prediction_with_image() {
        let prediction = json!({ "predicted_digit": 7, "processed_image": "aGVsbG8=" });
        let digit = DigitPrediction::from_prediction(&prediction).unwrap();
        assert_eq!(digit.predicted_digit, 7);
        assert_eq!(digit.processed_image.as_deref(), Some("aGVsbG8="));
    }

    #[test]
    fn test_digit_prediction_without_image() {
        let prediction = json!({ "predicted_digit": 3 });
        let digit = DigitPrediction::from_prediction(&prediction).unwrap();
        assert_eq!(digit.predicted_digit, 3);
        assert!(digit.processed_image.is_none());
    }

    #[test]
    fn test_digit_prediction_rejects_non_object() {
        assert!(DigitPrediction::from_prediction(&json!(["a", "b"])).is_err());
    }
}
