use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, ErrorEvent, HtmlElement, PromiseRejectionEvent};

use crate::config::Config;
use crate::dom;

pub const NOTIFICATION_CLASS: &str = "error-notification";
pub const SCRIPT_ERROR_MESSAGE: &str =
    "Some features may not work properly. Please refresh the page.";
pub const INIT_ERROR_MESSAGE: &str = "Failed to initialize some features. Please refresh the page.";

const NOTIFICATION_STYLE: &str = "position: fixed; top: 20px; right: 20px; background: #e74c3c; \
     color: white; padding: 1rem; border-radius: 8px; box-shadow: 0 4px 15px rgba(0, 0, 0, 0.2); \
     z-index: 10002; max-width: 300px; font-size: 0.9rem;";
const ROW_STYLE: &str = "display: flex; align-items: center; gap: 0.5rem;";
const CLOSE_STYLE: &str = "background: none; border: none; color: white; font-size: 1.2rem; \
     cursor: pointer; margin-left: auto;";

fn styled(document: &Document, tag: &str, style: &str) -> Result<HtmlElement, JsValue> {
    let el = document.create_element(tag)?.dyn_into::<HtmlElement>()?;
    el.style().set_css_text(style);
    Ok(el)
}

fn remove_existing(document: &Document) {
    for old in dom::query_all::<HtmlElement>(document, &format!(".{}", NOTIFICATION_CLASS)) {
        old.remove();
    }
}

pub fn show_error_notification(
    document: &Document,
    config: &Config,
    message: &str,
) -> Result<HtmlElement, JsValue> {
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("Missing body"))?;
    remove_existing(document);

    let notification = styled(document, "div", NOTIFICATION_STYLE)?;
    notification.set_class_name(NOTIFICATION_CLASS);
    notification.set_attribute("role", "alert")?;

    let row = styled(document, "div", ROW_STYLE)?;
    let icon = document.create_element("i")?;
    icon.set_class_name("fas fa-exclamation-triangle");
    let text = document.create_element("span")?;
    text.set_text_content(Some(message));
    let close = styled(document, "button", CLOSE_STYLE)?;
    close.set_text_content(Some("\u{00d7}"));
    close.set_attribute("aria-label", "Dismiss notification")?;

    row.append_child(&icon)?;
    row.append_child(&text)?;
    row.append_child(&close)?;
    notification.append_child(&row)?;

    let dismiss_target = notification.clone();
    dom::listen(&close, "click", move |_event| {
        dismiss_target.remove();
    })?;

    body.append_child(&notification)?;

    let expiring = notification.clone();
    dom::set_timeout_once(config.notification_ttl_ms, move || {
        if expiring.parent_element().is_some() {
            expiring.remove();
        }
    })?;

    Ok(notification)
}

pub fn install_error_handlers(document: &Document, config: &Config) -> Result<(), JsValue> {
    let window = dom::window();

    let document_err = document.clone();
    let config_err = config.clone();
    dom::listen(&window, "error", move |event| {
        let detail = event
            .dyn_ref::<ErrorEvent>()
            .map(|e| e.error())
            .unwrap_or(JsValue::UNDEFINED);
        web_sys::console::error_2(&JsValue::from_str("JavaScript error:"), &detail);

        if let Err(err) = show_error_notification(&document_err, &config_err, SCRIPT_ERROR_MESSAGE)
        {
            web_sys::console::error_1(&err);
        }
    })?;

    dom::listen(&window, "unhandledrejection", move |event| {
        let reason = event
            .dyn_ref::<PromiseRejectionEvent>()
            .map(|e| e.reason())
            .unwrap_or(JsValue::UNDEFINED);
        web_sys::console::error_2(&JsValue::from_str("Unhandled promise rejection:"), &reason);
        event.prevent_default();
    })
}
