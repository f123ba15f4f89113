use thiserror::Error;

/// Failures seen by the chat controller when talking to the proxy
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The backend no longer knows the session (HTTP 404)
    #[error("session not found: {detail}")]
    SessionNotFound { detail: String },

    /// Any other non-success HTTP status
    #[error("Erro HTTP {0}")]
    Status(u16),

    /// The request never completed
    #[error("request failed: {0}")]
    Transport(String),

    /// The response body was not the JSON we expected
    #[error("invalid response: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn is_session_not_found(&self) -> bool {
        matches!(self, ClientError::SessionNotFound { .. })
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}
