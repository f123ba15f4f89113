use async_trait::async_trait;
use serde_json::Value;

use selly_types::{AiResponse, MessageRequest, StartSessionRequest, SESSION_NOT_FOUND_DETAIL};

use crate::error::ClientError;

/// Transport the chat controller uses to reach the proxy.
///
/// Futures are not `Send` so the same trait works for browser fetch.
#[async_trait(?Send)]
pub trait ChatBackend {
    /// POST the start trigger and return the decoded greeting
    async fn start_session(&self, request: &StartSessionRequest) -> Result<AiResponse, ClientError>;

    /// POST one user message and return the decoded reply
    async fn send_message(&self, request: &MessageRequest) -> Result<AiResponse, ClientError>;
}

/// Decode a start-session response.
///
/// A response carrying a session identifier is accepted whatever its status.
/// A non-2xx response without one (the proxy's own `{error, status}` body
/// included) becomes [`ClientError::Status`].
pub fn decode_start(status: u16, body: &[u8]) -> Result<AiResponse, ClientError> {
    let parsed: Result<AiResponse, _> = serde_json::from_slice(body);
    let ok_status = (200..300).contains(&status);

    match parsed {
        Ok(response) if ok_status || response.session_id().is_some() => Ok(response),
        Ok(_) => Err(ClientError::Status(status)),
        Err(_) if !ok_status => Err(ClientError::Status(status)),
        Err(e) => Err(e.into()),
    }
}

/// Decode a message-exchange response, mapping 404 to
/// [`ClientError::SessionNotFound`] and other failures to [`ClientError::Status`].
pub fn decode_reply(status: u16, body: &[u8]) -> Result<AiResponse, ClientError> {
    if status == 404 {
        let payload: Value = serde_json::from_slice(body).unwrap_or(Value::Null);
        let detail = payload
            .get("detail")
            .and_then(Value::as_str)
            .filter(|d| !d.is_empty())
            .unwrap_or(SESSION_NOT_FOUND_DETAIL)
            .to_string();
        return Err(ClientError::SessionNotFound { detail });
    }

    if !(200..300).contains(&status) {
        return Err(ClientError::Status(status));
    }

    Ok(serde_json::from_slice(body)?)
}
