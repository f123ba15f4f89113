use serde_json::Value;

use crate::config::normalize_base_url;
use crate::error::ProxyError;

/// Backend path for session initiation
pub const START_SESSION_PATH: &str = "/start-session";

/// Backend path for message exchange
pub const MESSAGE_PATH: &str = "/api/message";

/// HTTP client bound to the assistant backend.
///
/// No timeout and no retry: a call either completes, fails, or hangs.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
}

impl UpstreamClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: normalize_base_url(base_url),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// POST `payload` as JSON and hand back the raw response
    pub async fn post_json(&self, path: &str, payload: &Value) -> Result<reqwest::Response, ProxyError> {
        let url = self.endpoint(path);
        log::info!("POST {}", url);

        let response = self.http.post(&url).json(payload).send().await?;

        log::info!("{} <- {}", response.status(), url);
        Ok(response)
    }
}
