use selly_chat::SessionStore;
use selly_types::SESSION_STORAGE_KEY;
use web_sys::Storage;

/// Session store backed by `window.sessionStorage`: survives reloads, not
/// tab closure. Storage failures are logged and otherwise ignored.
pub struct BrowserSessionStore {
    storage: Option<Storage>,
}

impl BrowserSessionStore {
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|w| w.session_storage().ok().flatten());
        if storage.is_none() {
            log::warn!("sessionStorage unavailable, session will not survive reloads");
        }
        Self { storage }
    }
}

impl Default for BrowserSessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for BrowserSessionStore {
    fn get(&self) -> Option<String> {
        self.storage
            .as_ref()?
            .get_item(SESSION_STORAGE_KEY)
            .ok()
            .flatten()
    }

    fn set(&mut self, session_id: &str) {
        if let Some(storage) = &self.storage {
            if let Err(e) = storage.set_item(SESSION_STORAGE_KEY, session_id) {
                log::warn!("Failed to persist session id: {:?}", e);
            }
        }
    }

    fn clear(&mut self) {
        if let Some(storage) = &self.storage {
            if let Err(e) = storage.remove_item(SESSION_STORAGE_KEY) {
                log::warn!("Failed to clear session id: {:?}", e);
            }
        }
    }
}
