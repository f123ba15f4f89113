//! Wire types and fixed texts shared by the Selly-AI proxy and chat client.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ============================================================================
// Constants
// ============================================================================

/// Key under which the session identifier is kept in per-tab storage
pub const SESSION_STORAGE_KEY: &str = "sessionId";

/// Delay between a "session not found" reply and the local session reset
pub const EXPIRY_RESET_DELAY_MS: u32 = 2500;

/// Trigger text sent to the backend when a conversation starts
pub const START_TRIGGER: &str = "iniciar";

/// Client-facing error text for an expired or unknown session
pub const SESSION_EXPIRED_ERROR: &str = "Sessão expirada ou não encontrada.";

/// Fallback `detail` when the backend did not provide one
pub const SESSION_NOT_FOUND_DETAIL: &str = "Session not found";

pub const START_ERROR_TEXT: &str = "Erro ao iniciar sessão 😢";
pub const SEND_ERROR_TEXT: &str = "Erro ao enviar mensagem 😢";
pub const SEND_ERROR_ALERT: &str = "Erro ao enviar mensagem. Por favor, tente novamente.";
pub const EXPIRY_WARNING_TEXT: &str =
    "⚠️ Sua sessão expirou ou não foi encontrada. Redirecionando...";
pub const TYPING_TEXT: &str = "Digitando...";
pub const START_BUTTON_TEXT: &str = "Iniciar conversa com Selly";
pub const STARTING_BUTTON_TEXT: &str = "Iniciando...";
pub const SEND_BUTTON_TEXT: &str = "Enviar";
pub const SENDING_BUTTON_TEXT: &str = "Enviando...";

// ============================================================================
// Message Types
// ============================================================================

/// Who authored a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Ai,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Ai => "ai",
        }
    }

    /// Speaker label shown above each message
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::User => "Você",
            Role::Ai => "Selly-AI",
        }
    }
}

/// One entry of the conversation. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Self {
            role: Role::Ai,
            content: content.into(),
        }
    }
}

// ============================================================================
// Requests
// ============================================================================

/// Body posted to `/api/start-session`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartSessionRequest {
    pub message: String,
}

impl Default for StartSessionRequest {
    fn default() -> Self {
        Self {
            message: START_TRIGGER.to_string(),
        }
    }
}

/// Body posted to `/api/message`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRequest {
    pub session_id: String,
    pub message: String,
}

// ============================================================================
// Responses
// ============================================================================

/// Deserialize a free-text field leniently: null becomes `None`, and
/// non-string scalars keep their JSON text.
pub fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Ok(Some(other.to_string())),
    }
}

/// Assistant payload returned by both backend endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiResponse {
    #[serde(default, deserialize_with = "deserialize_text", skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text", skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text", skip_serializing_if = "Option::is_none")]
    pub messages: Option<String>,
}

impl AiResponse {
    /// The issued session identifier, if any. Empty strings don't count.
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref().filter(|id| !id.is_empty())
    }

    /// Assistant text: `reply` when non-empty, otherwise `messages`.
    pub fn text(&self) -> String {
        match self.reply.as_deref() {
            Some(reply) if !reply.is_empty() => reply.to_string(),
            _ => self.messages.clone().unwrap_or_default(),
        }
    }
}

/// Stable shape the proxy emits in place of an upstream 404 body.
/// Field order is part of the wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionExpiredBody {
    pub error: String,
    pub detail: Value,
}

impl SessionExpiredBody {
    /// Build from whatever the upstream sent; a missing or falsy `detail`
    /// falls back to [`SESSION_NOT_FOUND_DETAIL`].
    pub fn from_upstream(upstream: &Value) -> Self {
        let detail = upstream
            .get("detail")
            .filter(|d| is_truthy(d))
            .cloned()
            .unwrap_or_else(|| Value::String(SESSION_NOT_FOUND_DETAIL.to_string()));

        Self {
            error: SESSION_EXPIRED_ERROR.to_string(),
            detail,
        }
    }

    /// `detail` as display text
    pub fn detail_text(&self) -> String {
        match &self.detail {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// JavaScript truthiness of a JSON value, which is what the backend
/// contract was written against.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
