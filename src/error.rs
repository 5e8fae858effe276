use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong between reading the form inputs and
/// handing a rendered result back.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("server returned {status}: {detail}")]
    Server { status: u16, detail: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("could not read {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("base64 decode failed: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("image decode failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("a request is already in flight")]
    Busy,
}
