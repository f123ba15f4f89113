//! Chat controller state machine.
//!
//! The controller owns the conversation, the loading overlay and the session
//! identifier. Network calls are split into a `begin_*` phase that mutates
//! local state and yields the request, and a `finish_*` phase that applies the
//! result. A UI can therefore release its borrow while the request is in
//! flight and still let other events (such as ending the session) run.

use selly_types::{
    AiResponse, Message, MessageRequest, StartSessionRequest, EXPIRY_WARNING_TEXT,
    SEND_BUTTON_TEXT, SEND_ERROR_ALERT, SEND_ERROR_TEXT, SENDING_BUTTON_TEXT, START_BUTTON_TEXT,
    START_ERROR_TEXT, STARTING_BUTTON_TEXT,
};

use crate::backend::ChatBackend;
use crate::error::ClientError;
use crate::store::SessionStore;

/// Handle for the deferred reset scheduled after a "session not found".
///
/// A ticket only applies while the session it was issued for is still the
/// current one; any start, end or failure in between invalidates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryTicket {
    epoch: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    NoSession,
    Active { session_id: String },
    /// The backend reported the session gone; a reset is pending
    Expiring {
        session_id: String,
        ticket: ExpiryTicket,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Starting,
    Sending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// A start request was already outstanding
    Ignored,
    Started { session_id: String },
    /// The backend answered without a session identifier
    NoSessionIssued,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Empty input or no session
    Ignored,
    Replied,
    /// Warning shown; call [`ChatController::expire`] with the ticket after
    /// [`selly_types::EXPIRY_RESET_DELAY_MS`]
    Expiring(ExpiryTicket),
    /// Error message appended and session dropped; show `alert` to the user
    Failed { alert: &'static str },
}

pub struct ChatController<S: SessionStore> {
    store: S,
    state: SessionState,
    messages: Vec<Message>,
    pending: Option<Pending>,
    input: String,
    epoch: u64,
}

impl<S: SessionStore> ChatController<S> {
    /// Mount the controller, adopting whatever identifier the store holds.
    /// The identifier is not re-validated against the backend.
    pub fn restore(store: S) -> Self {
        let state = match store.get() {
            Some(session_id) if !session_id.is_empty() => {
                log::info!("Restored session {}", session_id);
                SessionState::Active { session_id }
            }
            _ => SessionState::NoSession,
        };

        Self {
            store,
            state,
            messages: Vec::new(),
            pending: None,
            input: String::new(),
            epoch: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn session_id(&self) -> Option<&str> {
        match &self.state {
            SessionState::NoSession => None,
            SessionState::Active { session_id } | SessionState::Expiring { session_id, .. } => {
                Some(session_id.as_str())
            }
        }
    }

    pub fn has_session(&self) -> bool {
        self.session_id().is_some()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn start_button_label(&self) -> &'static str {
        if self.is_loading() {
            STARTING_BUTTON_TEXT
        } else {
            START_BUTTON_TEXT
        }
    }

    pub fn send_button_label(&self) -> &'static str {
        if self.is_loading() {
            SENDING_BUTTON_TEXT
        } else {
            SEND_BUTTON_TEXT
        }
    }

    // ------------------------------------------------------------------
    // Start
    // ------------------------------------------------------------------

    /// Enter the loading state and return the start payload, or `None` if a
    /// request is already outstanding.
    pub fn begin_start(&mut self) -> Option<StartSessionRequest> {
        if self.pending.is_some() {
            log::debug!("Start ignored, request already in flight");
            return None;
        }
        self.pending = Some(Pending::Starting);
        Some(StartSessionRequest::default())
    }

    pub fn finish_start(&mut self, result: Result<AiResponse, ClientError>) -> StartOutcome {
        self.pending = None;

        match result {
            Ok(response) => match response.session_id() {
                Some(session_id) => {
                    let session_id = session_id.to_string();
                    log::info!("Session started: {}", session_id);
                    self.store.set(&session_id);
                    self.set_state(SessionState::Active {
                        session_id: session_id.clone(),
                    });
                    self.messages = vec![Message::ai(response.text())];
                    StartOutcome::Started { session_id }
                }
                None => {
                    log::warn!("Start response carried no session_id");
                    StartOutcome::NoSessionIssued
                }
            },
            Err(err) => {
                log::error!("Failed to start session: {}", err);
                self.messages.push(Message::ai(START_ERROR_TEXT));
                StartOutcome::Failed
            }
        }
    }

    pub async fn start_session<B>(&mut self, backend: &B) -> StartOutcome
    where
        B: ChatBackend + ?Sized,
    {
        let Some(request) = self.begin_start() else {
            return StartOutcome::Ignored;
        };
        let result = backend.start_session(&request).await;
        self.finish_start(result)
    }

    // ------------------------------------------------------------------
    // End
    // ------------------------------------------------------------------

    /// Forget the session locally. The backend is not notified.
    pub fn end_session(&mut self) {
        log::info!("Ending session");
        self.store.clear();
        self.set_state(SessionState::NoSession);
        self.messages.clear();
    }

    // ------------------------------------------------------------------
    // Send
    // ------------------------------------------------------------------

    /// Echo the buffered input into the conversation, clear the buffer and
    /// return the request to send. Returns `None` for blank input or when
    /// no session is active.
    ///
    /// The loading flag is not consulted here; callers disable their send
    /// control while [`is_loading`](Self::is_loading) is true.
    pub fn begin_send(&mut self) -> Option<MessageRequest> {
        if self.input.trim().is_empty() {
            return None;
        }
        let session_id = self.session_id()?.to_string();

        let message = std::mem::take(&mut self.input);
        self.messages.push(Message::user(message.clone()));
        self.pending = Some(Pending::Sending);

        Some(MessageRequest {
            session_id,
            message,
        })
    }

    pub fn finish_send(&mut self, result: Result<AiResponse, ClientError>) -> SendOutcome {
        self.pending = None;

        match result {
            Ok(response) => {
                self.messages.push(Message::ai(response.text()));
                SendOutcome::Replied
            }
            Err(ClientError::SessionNotFound { detail }) => {
                log::warn!("Session not found ({}), resetting shortly", detail);
                self.messages.push(Message::ai(EXPIRY_WARNING_TEXT));

                let ticket = ExpiryTicket { epoch: self.epoch };
                if let SessionState::Active { session_id } = &self.state {
                    let session_id = session_id.clone();
                    self.state = SessionState::Expiring { session_id, ticket };
                }
                SendOutcome::Expiring(ticket)
            }
            Err(err) => {
                log::error!("Failed to send message: {}", err);
                self.messages.push(Message::ai(SEND_ERROR_TEXT));
                self.store.clear();
                self.set_state(SessionState::NoSession);
                SendOutcome::Failed {
                    alert: SEND_ERROR_ALERT,
                }
            }
        }
    }

    pub async fn send_message<B>(&mut self, backend: &B) -> SendOutcome
    where
        B: ChatBackend + ?Sized,
    {
        let Some(request) = self.begin_send() else {
            return SendOutcome::Ignored;
        };
        let result = backend.send_message(&request).await;
        self.finish_send(result)
    }

    /// Apply a deferred reset. Returns `false` when the ticket went stale
    /// because the session changed after it was issued.
    pub fn expire(&mut self, ticket: ExpiryTicket) -> bool {
        if ticket.epoch != self.epoch {
            log::debug!("Dropping stale expiry ticket");
            return false;
        }
        log::info!("Session expired, returning to start screen");
        self.store.clear();
        self.set_state(SessionState::NoSession);
        self.messages.clear();
        true
    }

    fn set_state(&mut self, state: SessionState) {
        self.epoch += 1;
        self.state = state;
    }
}
