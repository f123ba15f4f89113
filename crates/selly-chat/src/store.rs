/// Where the current session identifier survives page reloads.
///
/// The browser build backs this with `sessionStorage`; everything else uses
/// [`MemorySessionStore`].
pub trait SessionStore {
    fn get(&self) -> Option<String>;
    fn set(&mut self, session_id: &str);
    fn clear(&mut self);
}

/// In-memory store, scoped to the lifetime of the value
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    session_id: Option<String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session_id: impl Into<String>) -> Self {
        Self {
            session_id: Some(session_id.into()),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Option<String> {
        self.session_id.clone()
    }

    fn set(&mut self, session_id: &str) {
        self.session_id = Some(session_id.to_string());
    }

    fn clear(&mut self) {
        self.session_id = None;
    }
}
