//! Browser front end for the Selly-AI chat
//!
//! Binds the platform-neutral chat controller to the page: the session id
//! lives in `sessionStorage`, requests go to the same-origin proxy.

use wasm_bindgen::prelude::*;

mod api;
mod chat_ui;
mod dom;
mod expiry;
mod storage;

pub use api::HttpBackend;
pub use expiry::ExpiryTimer;
pub use storage::BrowserSessionStore;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());

    log::info!("Selly-AI WASM initialized");
}

/// Bind the chat page and render the restored session, if any
#[wasm_bindgen]
pub fn init_chat() -> Result<(), JsValue> {
    chat_ui::ChatApp::new()?.start()
}
