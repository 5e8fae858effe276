use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::GenericImageView;
use serde_json::Value;

use crate::error::ClientError;
use crate::types::{DigitPrediction, RegressionResponse};

/// Generic tasks show the JSON-serialized prediction as-is.
pub fn render_prediction(prediction: &Value) -> String {
    format!("推論結果: {}", prediction)
}

pub fn render_digit(digit: &DigitPrediction) -> String {
    format!("予測結果: {}", digit.predicted_digit)
}

/// Prediction to four decimals, confidence times 100 to two decimals, and
/// the server message as-is.
pub fn render_regression(response: &RegressionResponse) -> String {
    format!(
        "予測値: {:.4}\n信頼度: {:.2}%\n{}",
        response.prediction,
        response.confidence * 100.0,
        response.message
    )
}

/// Decodes the base64 PNG the handwritten-digit endpoint returns.
pub fn decode_processed_image(encoded: &str) -> Result<Vec<u8>, ClientError> {
    Ok(STANDARD.decode(encoded.trim())?)
}

/// Checks the bytes decode as an image, writes them out, and returns the
/// image dimensions.
pub fn save_processed_image(bytes: &[u8], path: &Path) -> Result<(u32, u32), ClientError> {
    let image = image::load_from_memory(bytes)?;
    std::fs::write(path, bytes).map_err(|source| ClientError::File {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(image.dimensions())
}
