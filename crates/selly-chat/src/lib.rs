//! Client-side conversation state for Selly-AI
//!
//! This crate holds the chat controller state machine, the session store
//! seam, and the backend trait the controller talks to. It has no browser or
//! runtime dependency so it can be driven from wasm or from native tests.

pub mod backend;
pub mod controller;
pub mod error;
pub mod store;

pub use backend::{decode_reply, decode_start, ChatBackend};
pub use controller::{ChatController, ExpiryTicket, SendOutcome, SessionState, StartOutcome};
pub use error::ClientError;
pub use store::{MemorySessionStore, SessionStore};

pub use selly_types::{AiResponse, Message, MessageRequest, Role, StartSessionRequest};
