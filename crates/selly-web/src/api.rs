use async_trait::async_trait;
use gloo_net::http::Request;
use serde::Serialize;

use selly_chat::{decode_reply, decode_start, ChatBackend, ClientError};
use selly_types::{AiResponse, MessageRequest, StartSessionRequest};

const START_SESSION_URL: &str = "/api/start-session";
const MESSAGE_URL: &str = "/api/message";

/// Chat backend using `fetch` against the same-origin proxy routes
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpBackend;

#[async_trait(?Send)]
impl ChatBackend for HttpBackend {
    async fn start_session(&self, request: &StartSessionRequest) -> Result<AiResponse, ClientError> {
        let (status, body) = post_json(START_SESSION_URL, request).await?;
        decode_start(status, &body)
    }

    async fn send_message(&self, request: &MessageRequest) -> Result<AiResponse, ClientError> {
        let (status, body) = post_json(MESSAGE_URL, request).await?;
        decode_reply(status, &body)
    }
}

async fn post_json<T: Serialize>(url: &str, body: &T) -> Result<(u16, Vec<u8>), ClientError> {
    let response = Request::post(url)
        .json(body)
        .map_err(|e| ClientError::Transport(format!("Failed to serialize: {:?}", e)))?
        .send()
        .await
        .map_err(|e| ClientError::Transport(format!("Request failed: {:?}", e)))?;

    let status = response.status();
    log::debug!("POST {} -> {}", url, status);

    let bytes = response
        .binary()
        .await
        .map_err(|e| ClientError::Transport(format!("Failed to read response: {:?}", e)))?;

    Ok((status, bytes))
}
