use std::path::Path;

use async_trait::async_trait;
use log::debug;
use reqwest::multipart;

use crate::error::ClientError;
use crate::task::Task;
use crate::types::{
    ErrorDetail, HelloResponse, PredictRequest, PredictResponse, RegressionRequest,
    RegressionResponse,
};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Dispatch seam between the form and the HTTP client, so tests can script
/// responses without a running service.
#[async_trait]
pub trait PredictBackend: Send + Sync {
    async fn predict(&self, request: &PredictRequest) -> Result<PredictResponse, ClientError>;

    async fn predict_image(
        &self,
        task: Task,
        file: Option<&Path>,
    ) -> Result<PredictResponse, ClientError>;

    async fn predict_regression(
        &self,
        request: &RegressionRequest,
    ) -> Result<RegressionResponse, ClientError>;

    async fn hello(&self) -> Result<String, ClientError>;
}

/// HTTP client for the prediction service. Sends exactly one request per
/// call: no timeout, no retry, no cancellation of an in-flight request.
pub struct PredictClient {
    http: reqwest::Client,
    base_url: String,
}

impl PredictClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl PredictBackend for PredictClient {
    async fn predict(&self, request: &PredictRequest) -> Result<PredictResponse, ClientError> {
        let url = self.url("predict");
        debug!("POST {} task_name={}", url, request.task_name);

        // The body is parsed as JSON whatever the status; a non-JSON error
        // body therefore surfaces as a parse failure, not a status error.
        let response = self.http.post(&url).json(request).send().await?;
        Ok(response.json::<PredictResponse>().await?)
    }

    async fn predict_image(
        &self,
        task: Task,
        file: Option<&Path>,
    ) -> Result<PredictResponse, ClientError> {
        let url = self.url("predict-image");

        let mut form = multipart::Form::new().text("task_name", task.as_str());
        if let Some(path) = file {
            let bytes = tokio::fs::read(path)
                .await
                .map_err(|source| ClientError::File {
                    path: path.to_path_buf(),
                    source,
                })?;
            let file_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or("upload")
                .to_string();
            let part = multipart::Part::bytes(bytes)
                .file_name(file_name)
                .mime_str(mime_for(path))?;
            form = form.part("file", part);
        }
        // A submit without a selected file still goes out, with the `file`
        // part absent; the server decides what that means.

        debug!("POST {} task_name={} file={:?}", url, task, file);
        let response = self.http.post(&url).multipart(form).send().await?;
        Ok(response.json::<PredictResponse>().await?)
    }

    async fn predict_regression(
        &self,
        request: &RegressionRequest,
    ) -> Result<RegressionResponse, ClientError> {
        let url = self.url("predict/regression");
        debug!("POST {} feature1={}", url, request.feature1);

        let response = self.http.post(&url).json(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorDetail>(&body)
                .map(|e| e.detail)
                .unwrap_or(body);
            return Err(ClientError::Server {
                status: status.as_u16(),
                detail,
            });
        }
        Ok(response.json::<RegressionResponse>().await?)
    }

    async fn hello(&self) -> Result<String, ClientError> {
        let url = self.url("hello");
        debug!("GET {}", url);

        let response = self.http.get(&url).send().await?;
        Ok(response.json::<HelloResponse>().await?.message)
    }
}

/// Best-effort content type from the file extension.
fn mime_for(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = PredictClient::new("http://localhost:8000/");
        assert_eq!(client.url("predict"), "http://localhost:8000/predict");
        assert_eq!(
            client.url("predict/regression"),
            "http://localhost:8000/predict/regression"
        );
    }

    #[test]
    fn test_mime_for_known_extensions() {
        assert_eq!(mime_for(&PathBuf::from("digit.png")), "image/png");
        assert_eq!(mime_for(&PathBuf::from("photo.jpeg")), "image/jpeg");
        assert_eq!(mime_for(&PathBuf::from("photo.jpg")), "image/jpeg");
        assert_eq!(
            mime_for(&PathBuf::from("mystery.dat")),
            "application/octet-stream"
        );
        assert_eq!(mime_for(&PathBuf::from("noext")), "application/octet-stream");
    }
}
