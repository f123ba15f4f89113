#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::matchers::*;
use wiremock::{Mock, MockServer, ResponseTemplate};

use selly::ProxyConfig;

/// Mock assistant backend for exercising the proxy
pub struct BackendMockServer {
    server: MockServer,
}

impl BackendMockServer {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Proxy configuration pointing at this mock
    pub fn proxy_config(&self) -> ProxyConfig {
        ProxyConfig {
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            api_url: self.uri(),
            web_dir: None,
            permissive_cors: false,
        }
    }

    /// Mock a successful session start
    pub async fn mock_start_success(&self, session_id: &str, greeting: &str) {
        Mock::given(method("POST"))
            .and(path("/start-session"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({ "message": "iniciar" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "session_id": session_id,
                "messages": greeting
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock a successful reply for one message in one session
    pub async fn mock_message_reply(&self, session_id: &str, message: &str, reply: &str) {
        Mock::given(method("POST"))
            .and(path("/api/message"))
            .and(body_json(json!({ "session_id": session_id, "message": message })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "reply": reply,
                "actions": []
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock the backend's "unknown session" answer
    pub async fn mock_message_not_found(&self, body: Value) {
        Mock::given(method("POST"))
            .and(path("/api/message"))
            .respond_with(ResponseTemplate::new(404).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Mock an arbitrary raw response on the message endpoint
    pub async fn mock_message_raw(&self, status: u16, body: &str, content_type: &str) {
        Mock::given(method("POST"))
            .and(path("/api/message"))
            .respond_with(ResponseTemplate::new(status).set_body_raw(body.to_string(), content_type))
            .mount(&self.server)
            .await;
    }

    /// Mock an arbitrary raw response on the start endpoint
    pub async fn mock_start_raw(&self, status: u16, body: &str, content_type: &str) {
        Mock::given(method("POST"))
            .and(path("/start-session"))
            .respond_with(ResponseTemplate::new(status).set_body_raw(body.to_string(), content_type))
            .mount(&self.server)
            .await;
    }

    pub async fn received_bodies(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter_map(|req| serde_json::from_slice(&req.body).ok())
            .collect()
    }
}
