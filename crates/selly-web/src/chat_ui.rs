use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, HtmlButtonElement, HtmlElement, HtmlInputElement};

use selly_chat::{ChatBackend, ChatController, ExpiryTicket, SendOutcome, StartOutcome};
use selly_types::{Message, Role};

use crate::api::HttpBackend;
use crate::dom;
use crate::expiry::ExpiryTimer;
use crate::storage::BrowserSessionStore;

const START_BUTTON: &str = "startButton";
const END_BUTTON: &str = "endButton";
const SEND_BUTTON: &str = "sendButton";
const MESSAGE_INPUT: &str = "messageInput";
const WELCOME_PANEL: &str = "welcomePanel";
const CHAT_PANEL: &str = "chatPanel";
const MESSAGES_CONTAINER: &str = "messagesContainer";
const TYPING_INDICATOR: &str = "typingIndicator";

struct UiState {
    chat: ChatController<BrowserSessionStore>,
    expiry: ExpiryTimer,
}

/// Chat page bound to the DOM
#[derive(Clone)]
pub struct ChatApp {
    document: Document,
    backend: Rc<HttpBackend>,
    state: Rc<RefCell<UiState>>,
}

impl ChatApp {
    pub fn new() -> Result<Self, JsValue> {
        let document = dom::document()?;
        let chat = ChatController::restore(BrowserSessionStore::new());

        Ok(Self {
            document,
            backend: Rc::new(HttpBackend),
            state: Rc::new(RefCell::new(UiState {
                chat,
                expiry: ExpiryTimer::new(),
            })),
        })
    }

    pub fn start(&self) -> Result<(), JsValue> {
        self.setup_event_listeners()?;
        self.render()
    }

    fn setup_event_listeners(&self) -> Result<(), JsValue> {
        let app = self.clone();
        dom::on_click(&self.element(START_BUTTON)?, move || app.on_start())?;

        let app = self.clone();
        dom::on_click(&self.element(END_BUTTON)?, move || app.on_end())?;

        let app = self.clone();
        dom::on_click(&self.element(SEND_BUTTON)?, move || app.on_send())?;

        let app = self.clone();
        dom::on_enter(&self.element(MESSAGE_INPUT)?, move || app.on_send())
    }

    fn on_start(&self) {
        let Some(request) = self.state.borrow_mut().chat.begin_start() else {
            return;
        };
        self.render_or_log();

        let app = self.clone();
        spawn_local(async move {
            let result = app.backend.start_session(&request).await;
            {
                let mut state = app.state.borrow_mut();
                if let StartOutcome::Started { session_id } = state.chat.finish_start(result) {
                    log::debug!("Dropping pending expiry before {}", session_id);
                    state.expiry.cancel();
                }
            }
            app.render_or_log();
        });
    }

    fn on_end(&self) {
        {
            let mut state = self.state.borrow_mut();
            state.chat.end_session();
            state.expiry.cancel();
        }
        self.render_or_log();
    }

    fn on_send(&self) {
        let input = match dom::by_id::<HtmlInputElement>(&self.document, MESSAGE_INPUT) {
            Ok(input) => input,
            Err(e) => {
                log::error!("Message input missing: {:?}", e);
                return;
            }
        };

        let request = {
            let mut state = self.state.borrow_mut();
            state.chat.set_input(input.value());
            state.chat.begin_send()
        };
        let Some(request) = request else {
            return;
        };
        input.set_value(self.state.borrow().chat.input());
        self.render_or_log();

        let app = self.clone();
        spawn_local(async move {
            let result = app.backend.send_message(&request).await;
            let outcome = app.state.borrow_mut().chat.finish_send(result);
            app.render_or_log();

            match outcome {
                SendOutcome::Expiring(ticket) => app.schedule_expiry(ticket),
                SendOutcome::Failed { alert } => {
                    if let Ok(window) = dom::window() {
                        let _ = window.alert_with_message(alert);
                    }
                }
                SendOutcome::Replied | SendOutcome::Ignored => {}
            }
        });
    }

    fn schedule_expiry(&self, ticket: ExpiryTicket) {
        let app = self.clone();
        let armed = self.state.borrow_mut().expiry.arm(ticket, move |ticket| {
            let reset = app.state.borrow_mut().chat.expire(ticket);
            if reset {
                log::info!("Expired session reset");
                app.render_or_log();
            }
        });
        if !armed {
            log::debug!("Expiry reset already pending");
        }
    }

    fn render_or_log(&self) {
        if let Err(e) = self.render() {
            log::error!("Failed to render chat: {:?}", e);
        }
    }

    fn element(&self, id: &str) -> Result<Element, JsValue> {
        dom::by_id(&self.document, id)
    }

    fn render(&self) -> Result<(), JsValue> {
        let state = self.state.borrow();
        let chat = &state.chat;
        let has_session = chat.has_session();
        let loading = chat.is_loading();

        dom::set_visible(&dom::by_id::<HtmlElement>(&self.document, WELCOME_PANEL)?, !has_session);
        dom::set_visible(&dom::by_id::<HtmlElement>(&self.document, CHAT_PANEL)?, has_session);
        dom::set_visible(&dom::by_id::<HtmlElement>(&self.document, TYPING_INDICATOR)?, loading);

        let start_button = dom::by_id::<HtmlButtonElement>(&self.document, START_BUTTON)?;
        start_button.set_text_content(Some(chat.start_button_label()));
        start_button.set_disabled(loading);

        let send_button = dom::by_id::<HtmlButtonElement>(&self.document, SEND_BUTTON)?;
        send_button.set_text_content(Some(chat.send_button_label()));
        send_button.set_disabled(loading);

        let bubbles = chat
            .messages()
            .iter()
            .map(|message| self.render_message(message))
            .collect::<Result<Vec<_>, _>>()?;
        let container = self.element(MESSAGES_CONTAINER)?;
        dom::replace_children(&container, &bubbles)?;

        // The scrolling element wraps the list and the typing indicator
        if let Some(scroller) = container.parent_element() {
            if let Ok(scroller) = scroller.dyn_into::<HtmlElement>() {
                dom::scroll_to_bottom(&scroller);
            }
        }

        Ok(())
    }

    fn render_message(&self, message: &Message) -> Result<Element, JsValue> {
        let bubble = self.document.create_element("div")?;
        bubble.set_class_name(message_class(message.role));
        let role: Element = dom::text_element(
            &self.document,
            "span",
            "message-role",
            message.role.display_name(),
        )?;
        bubble.append_child(&role)?;
        let content: Element = dom::text_element(
            &self.document,
            "span",
            "message-content",
            &message.content,
        )?;
        bubble.append_child(&content)?;
        Ok(bubble)
    }
}

fn message_class(role: Role) -> &'static str {
    match role {
        Role::User => "message user",
        Role::Ai => "message ai",
    }
}
