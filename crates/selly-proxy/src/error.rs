use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

/// Failures the proxy turns into controlled error responses
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The caller's body was not JSON
    #[error("invalid request body: {0}")]
    InvalidBody(serde_json::Error),

    /// The backend could not be reached or the exchange broke off
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    /// The backend answered with something we had to parse and couldn't
    #[error("invalid upstream response: {0}")]
    UpstreamBody(serde_json::Error),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ProxyError::Upstream(_) | ProxyError::UpstreamBody(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        log::error!("{} -> {}", self, status);

        let body = Json(serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
