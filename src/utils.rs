use std::env;

use crate::client::DEFAULT_BASE_URL;

/// Base URL of the prediction service, from PREDICT_API_URL.
pub fn get_env() -> String {
    let base_url = env::var("PREDICT_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
    base_url
        .parse::<reqwest::Url>()
        .expect("PREDICT_API_URL must be a valid URL");
    base_url
}
