use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::Value;
use std::sync::Arc;

use selly_types::SessionExpiredBody;

use crate::{
    error::ProxyError,
    logging::safe_truncate,
    upstream::{UpstreamClient, MESSAGE_PATH, START_SESSION_PATH},
};

const TEXT_PLAIN_UTF8: &str = "text/plain; charset=utf-8";
const APPLICATION_JSON: &str = "application/json";

/// Application state shared across routes
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<UpstreamClient>,
}

/// Create router with the proxy routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/start-session", post(start_session))
        .route("/api/message", post(message))
        .route("/health", get(health))
        .with_state(state)
}

/// GET /health - Liveness probe
async fn health() -> Json<Value> {
    Json(serde_json::json!({ "ok": true, "msg": "Selly-AI proxy running" }))
}

/// POST /api/start-session - Forward the start trigger.
///
/// Bodies are relayed as plain text whatever the backend declared.
async fn start_session(State(state): State<AppState>, body: Bytes) -> Result<Response, ProxyError> {
    let payload = parse_client_body(&body)?;
    let upstream = state.upstream.post_json(START_SESSION_PATH, &payload).await?;

    let status = mirror_status(upstream.status());
    if carries_body(status) {
        return Ok(stream_body(status, TEXT_PLAIN_UTF8, upstream));
    }

    let data = read_json(upstream).await?;
    Ok(Json(data).into_response())
}

/// POST /api/message - Forward one user message.
///
/// A backend 404 is rewritten into the stable `{error, detail}` shape; every
/// other body is relayed labeled as JSON.
async fn message(State(state): State<AppState>, body: Bytes) -> Result<Response, ProxyError> {
    let payload = parse_client_body(&body)?;
    let upstream = state.upstream.post_json(MESSAGE_PATH, &payload).await?;

    let status = mirror_status(upstream.status());
    if status == StatusCode::NOT_FOUND {
        let raw = upstream.bytes().await.unwrap_or_default();
        log::warn!(
            "Backend reported unknown session: {}",
            safe_truncate(&String::from_utf8_lossy(&raw), 200)
        );
        let data: Value =
            serde_json::from_slice(&raw).unwrap_or_else(|_| Value::Object(Default::default()));
        let expired = SessionExpiredBody::from_upstream(&data);
        return Ok((StatusCode::NOT_FOUND, Json(expired)).into_response());
    }

    if carries_body(status) {
        return Ok(stream_body(status, APPLICATION_JSON, upstream));
    }

    let data = read_json(upstream).await?;
    log::debug!("Message response: {}", safe_truncate(&data.to_string(), 500));
    Ok(Json(data).into_response())
}

fn parse_client_body(body: &Bytes) -> Result<Value, ProxyError> {
    serde_json::from_slice(body).map_err(ProxyError::InvalidBody)
}

fn mirror_status(status: reqwest::StatusCode) -> StatusCode {
    StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY)
}

/// Statuses that by definition have no response body
fn carries_body(status: StatusCode) -> bool {
    !(status.is_informational()
        || status == StatusCode::NO_CONTENT
        || status == StatusCode::RESET_CONTENT
        || status == StatusCode::NOT_MODIFIED)
}

fn stream_body(status: StatusCode, content_type: &'static str, upstream: reqwest::Response) -> Response {
    let body = Body::from_stream(upstream.bytes_stream());
    (status, [(header::CONTENT_TYPE, content_type)], body).into_response()
}

async fn read_json(upstream: reqwest::Response) -> Result<Value, ProxyError> {
    let raw = upstream.bytes().await?;
    serde_json::from_slice(&raw).map_err(ProxyError::UpstreamBody)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_carries_body() {
        assert!(carries_body(StatusCode::OK));
        assert!(carries_body(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(!carries_body(StatusCode::NO_CONTENT));
        assert!(!carries_body(StatusCode::NOT_MODIFIED));
    }

    #[test]
    fn test_parse_client_body_rejects_non_json() {
        let err = parse_client_body(&Bytes::from_static(b"message=hi")).unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
