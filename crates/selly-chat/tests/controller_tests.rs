use std::cell::RefCell;
use std::collections::VecDeque;

use async_trait::async_trait;
use pretty_assertions::assert_eq;

use selly_chat::{
    AiResponse, ChatBackend, ChatController, ClientError, MemorySessionStore, Message,
    MessageRequest, SendOutcome, SessionState, SessionStore, StartOutcome, StartSessionRequest,
};
use selly_types::{SEND_ERROR_TEXT, START_ERROR_TEXT};

/// Backend that replays canned results and records what it was sent
#[derive(Default)]
struct ScriptedBackend {
    replies: RefCell<VecDeque<Result<AiResponse, ClientError>>>,
    sent: RefCell<Vec<MessageRequest>>,
    starts: RefCell<usize>,
}

impl ScriptedBackend {
    fn push(&self, result: Result<AiResponse, ClientError>) {
        self.replies.borrow_mut().push_back(result);
    }

    fn next(&self) -> Result<AiResponse, ClientError> {
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::Transport("script exhausted".into())))
    }
}

#[async_trait(?Send)]
impl ChatBackend for ScriptedBackend {
    async fn start_session(&self, request: &StartSessionRequest) -> Result<AiResponse, ClientError> {
        assert_eq!(request.message, "iniciar");
        *self.starts.borrow_mut() += 1;
        self.next()
    }

    async fn send_message(&self, request: &MessageRequest) -> Result<AiResponse, ClientError> {
        self.sent.borrow_mut().push(request.clone());
        self.next()
    }
}

fn ok(json: serde_json::Value) -> Result<AiResponse, ClientError> {
    Ok(serde_json::from_value(json).unwrap())
}

#[tokio::test]
async fn test_start_then_chat_scenario() {
    let backend = ScriptedBackend::default();
    backend.push(ok(serde_json::json!({ "session_id": "abc123", "reply": "Hello!" })));
    backend.push(ok(serde_json::json!({ "reply": "there" })));

    let mut chat = ChatController::restore(MemorySessionStore::new());

    let outcome = chat.start_session(&backend).await;
    assert_eq!(
        outcome,
        StartOutcome::Started {
            session_id: "abc123".into()
        }
    );
    assert_eq!(chat.messages(), &[Message::ai("Hello!")]);
    assert_eq!(chat.store().get().as_deref(), Some("abc123"));

    chat.set_input("hi");
    assert_eq!(chat.send_message(&backend).await, SendOutcome::Replied);
    assert_eq!(chat.messages(), &[Message::user("hi"), Message::ai("there")]);

    let sent = backend.sent.borrow();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].session_id, "abc123");
    assert_eq!(sent[0].message, "hi");
}

#[tokio::test]
async fn test_start_uses_messages_when_reply_missing() {
    let backend = ScriptedBackend::default();
    backend.push(ok(serde_json::json!({ "session_id": "s1", "messages": "Olá, sou a Selly!" })));

    let mut chat = ChatController::restore(MemorySessionStore::new());
    chat.start_session(&backend).await;

    assert_eq!(chat.messages(), &[Message::ai("Olá, sou a Selly!")]);
}

#[tokio::test]
async fn test_start_failure_leaves_no_session() {
    let backend = ScriptedBackend::default();
    backend.push(Err(ClientError::Decode("expected value".into())));

    let mut chat = ChatController::restore(MemorySessionStore::new());
    assert_eq!(chat.start_session(&backend).await, StartOutcome::Failed);

    assert_eq!(chat.state(), &SessionState::NoSession);
    assert_eq!(chat.messages(), &[Message::ai(START_ERROR_TEXT)]);
    assert!(!chat.is_loading());
}

#[tokio::test]
async fn test_conversation_only_grows_until_reset() {
    let backend = ScriptedBackend::default();
    backend.push(ok(serde_json::json!({ "session_id": "s1", "reply": "Oi" })));
    for i in 0..3 {
        backend.push(ok(serde_json::json!({ "reply": format!("resposta {}", i) })));
    }

    let mut chat = ChatController::restore(MemorySessionStore::new());
    chat.start_session(&backend).await;

    let mut last_len = chat.messages().len();
    for i in 0..3 {
        chat.set_input(format!("pergunta {}", i));
        chat.send_message(&backend).await;
        assert!(chat.messages().len() > last_len);
        last_len = chat.messages().len();
    }
    assert_eq!(last_len, 7);

    chat.end_session();
    assert_eq!(chat.messages().len(), 0);
}

#[tokio::test]
async fn test_not_found_resets_only_after_expiry() {
    let backend = ScriptedBackend::default();
    backend.push(Err(ClientError::SessionNotFound {
        detail: "expired".into(),
    }));

    let mut chat = ChatController::restore(MemorySessionStore::with_session("stale"));
    chat.set_input("ainda aí?");

    let SendOutcome::Expiring(ticket) = chat.send_message(&backend).await else {
        panic!("expected an expiry ticket");
    };

    // Before the delay elapses nothing has been reset
    assert_eq!(chat.messages().len(), 2);
    assert!(chat.has_session());

    assert!(chat.expire(ticket));
    assert_eq!(chat.state(), &SessionState::NoSession);
    assert!(chat.messages().is_empty());
    assert_eq!(chat.store().get(), None);

    // A second application is a no-op
    assert!(!chat.expire(ticket));
}

#[tokio::test]
async fn test_transport_failure_keeps_messages_and_drops_session() {
    let backend = ScriptedBackend::default();
    backend.push(Err(ClientError::Transport("connection refused".into())));

    let mut chat = ChatController::restore(MemorySessionStore::with_session("abc123"));
    chat.set_input("hi");

    let outcome = chat.send_message(&backend).await;
    assert!(matches!(outcome, SendOutcome::Failed { .. }));
    assert_eq!(
        chat.messages(),
        &[Message::user("hi"), Message::ai(SEND_ERROR_TEXT)]
    );
    assert!(!chat.has_session());
    assert!(!chat.is_loading());
}

#[tokio::test]
async fn test_failed_start_appends_to_leftover_conversation() {
    let backend = ScriptedBackend::default();
    backend.push(Err(ClientError::Transport("connection refused".into())));
    backend.push(Err(ClientError::Status(502)));
    backend.push(ok(serde_json::json!({ "session_id": "fresh", "reply": "Oi de novo" })));

    let mut chat = ChatController::restore(MemorySessionStore::with_session("abc123"));
    chat.set_input("hi");
    chat.send_message(&backend).await;

    // The failed send left its messages behind; a failed start adds to them
    assert_eq!(chat.start_session(&backend).await, StartOutcome::Failed);
    assert_eq!(
        chat.messages(),
        &[
            Message::user("hi"),
            Message::ai(SEND_ERROR_TEXT),
            Message::ai(START_ERROR_TEXT)
        ]
    );

    // A successful start replaces everything with the greeting
    chat.start_session(&backend).await;
    assert_eq!(chat.messages(), &[Message::ai("Oi de novo")]);
}

#[tokio::test]
async fn test_blank_send_never_reaches_backend() {
    let backend = ScriptedBackend::default();
    let mut chat = ChatController::restore(MemorySessionStore::with_session("abc123"));

    chat.set_input("  ");
    assert_eq!(chat.send_message(&backend).await, SendOutcome::Ignored);
    assert!(backend.sent.borrow().is_empty());
    assert_eq!(*backend.starts.borrow(), 0);
}
