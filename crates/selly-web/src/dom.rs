use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, KeyboardEvent, Window};

pub fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("No window object"))
}

pub fn document() -> Result<Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("No document object"))
}

/// Look up `id` and cast it to the expected element type
pub fn by_id<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Element not found: {}", id)))?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Element has unexpected type: {}", id)))
}

/// `<tag class="..">text</tag>`, text set as content and never parsed
pub fn text_element(
    document: &Document,
    tag: &str,
    class: &str,
    text: &str,
) -> Result<Element, JsValue> {
    let element = document.create_element(tag)?;
    element.set_class_name(class);
    element.set_text_content(Some(text));
    Ok(element)
}

pub fn on_click<F>(element: &Element, mut callback: F) -> Result<(), JsValue>
where
    F: FnMut() + 'static,
{
    let closure = Closure::wrap(Box::new(move |_: web_sys::Event| callback()) as Box<dyn FnMut(web_sys::Event)>);
    element.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget(); // listener lives as long as the page
    Ok(())
}

/// Run `callback` when Enter is pressed inside `element`
pub fn on_enter<F>(element: &Element, mut callback: F) -> Result<(), JsValue>
where
    F: FnMut() + 'static,
{
    let closure = Closure::wrap(Box::new(move |event: KeyboardEvent| {
        if event.key() == "Enter" {
            event.prevent_default();
            callback();
        }
    }) as Box<dyn FnMut(KeyboardEvent)>);
    element.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

pub fn set_visible(element: &HtmlElement, visible: bool) {
    let display = if visible { "" } else { "none" };
    if let Err(e) = element.style().set_property("display", display) {
        log::warn!("Failed to toggle {}: {:?}", element.id(), e);
    }
}

pub fn replace_children(parent: &Element, children: &[Element]) -> Result<(), JsValue> {
    parent.set_text_content(None);
    for child in children {
        parent.append_child(child)?;
    }
    Ok(())
}

pub fn scroll_to_bottom(element: &HtmlElement) {
    element.set_scroll_top(element.scroll_height());
}
