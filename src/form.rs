use std::path::PathBuf;

use log::info;

use crate::client::PredictBackend;
use crate::error::ClientError;
use crate::render;
use crate::task::{parse_numeric_matrix, Task};
use crate::types::{DigitPrediction, PredictRequest, RegressionRequest};

/// Initial value of the numeric field.
pub const DEFAULT_NUMERIC_INPUT: &str = "1.0,2.0,3.0,4.0";

/// Transient state of one prediction form: the selected task, the per-task
/// input fields, and the output of the last submit. Nothing here survives
/// a submit; every submit clears the previous output first.
#[derive(Debug)]
pub struct PredictForm {
    pub task: Task,
    pub numeric_input: String,
    pub text_input: String,
    pub image_file: Option<PathBuf>,
    pub feature1: Option<f64>,
    pub feature2: Option<f64>,
    pub confidence_threshold: Option<f64>,

    /// True exactly while a request is in flight; submit refuses reentry.
    pub loading: bool,
    pub result: Option<String>,
    /// Decoded PNG bytes for the handwritten-digit task.
    pub processed_image: Option<Vec<u8>>,
    pub error: Option<String>,
}

impl PredictForm {
    pub fn new(task: Task) -> Self {
        Self {
            task,
            numeric_input: DEFAULT_NUMERIC_INPUT.to_string(),
            text_input: String::new(),
            image_file: None,
            feature1: None,
            feature2: None,
            confidence_threshold: None,
            loading: false,
            result: None,
            processed_image: None,
            error: None,
        }
    }

    /// Submits the form once. Any failure, local or remote, lands in
    /// `error` as a display string; `result` stays unset in that case.
    pub async fn submit(&mut self, backend: &dyn PredictBackend) -> Result<(), ClientError> {
        if self.loading {
            return Err(ClientError::Busy);
        }
        self.loading = true;
        self.result = None;
        self.processed_image = None;
        self.error = None;
        info!("submitting task {} ({})", self.task, self.task.label());

        let outcome = self.dispatch(backend).await;
        self.loading = false;

        if let Err(e) = outcome {
            self.error = Some(format!("エラー: {}", e));
        }
        Ok(())
    }

    async fn dispatch(&mut self, backend: &dyn PredictBackend) -> Result<(), ClientError> {
        match self.task {
            Task::Numeric => {
                // The only branch that touches the numeric field.
                let matrix = parse_numeric_matrix(&self.numeric_input)?;
                let response = backend.predict(&PredictRequest::numeric(matrix)).await?;
                self.result = Some(render::render_prediction(&response.prediction));
            }
            Task::Text => {
                let response = backend.predict(&PredictRequest::text(&self.text_input)).await?;
                self.result = Some(render::render_prediction(&response.prediction));
            }
            Task::Image => {
                let response = backend
                    .predict_image(self.task, self.image_file.as_deref())
                    .await?;
                self.result = Some(render::render_prediction(&response.prediction));
            }
            Task::HandwrittenDigit => {
                let response = backend
                    .predict_image(self.task, self.image_file.as_deref())
                    .await?;
                let digit = DigitPrediction::from_prediction(&response.prediction)?;
                if let Some(encoded) = &digit.processed_image {
                    self.processed_image = Some(render::decode_processed_image(encoded)?);
                }
                self.result = Some(render::render_digit(&digit));
            }
            Task::Regression => {
                let feature1 = self.feature1.ok_or_else(|| {
                    ClientError::InvalidInput("feature1 is required for regression".into())
                })?;
                let request = RegressionRequest {
                    feature1,
                    feature2: self.feature2,
                    confidence_threshold: self.confidence_threshold,
                };
                let response = backend.predict_regression(&request).await?;
                self.result = Some(render::render_regression(&response));
            }
        }
        Ok(())
    }
}
