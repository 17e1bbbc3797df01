use std::cell::Cell;
use std::rc::Rc;

use js_sys::{Function, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Document, Event, EventTarget, HtmlElement, NodeList, Window};

use crate::config::Config;

pub fn window() -> Window {
    web_sys::window().expect("missing window")
}

pub fn document() -> Result<Document, JsValue> {
    window()
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))
}

pub fn js_value_to_string(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

pub fn js_function(target: &JsValue, name: &str) -> Result<Function, String> {
    Reflect::get(target, &JsValue::from_str(name))
        .map_err(|err| js_value_to_string(&err))?
        .dyn_into::<Function>()
        .map_err(|_| format!("{} missing", name))
}

pub fn has_global(name: &str) -> bool {
    Reflect::has(&window(), &JsValue::from_str(name)).unwrap_or(false)
}

pub fn log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

pub fn debug(config: &Config, message: &str) {
    if config.debug {
        web_sys::console::log_1(&JsValue::from_str(&format!("[webgis] {}", message)));
    }
}

pub fn viewport_width() -> f64 {
    window()
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0)
}

pub fn viewport_height() -> f64 {
    window()
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0)
}

pub fn collect<T: JsCast>(list: NodeList) -> Vec<T> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<T>().ok())
        .collect()
}

pub fn query_all<T: JsCast>(document: &Document, selector: &str) -> Vec<T> {
    match document.query_selector_all(selector) {
        Ok(list) => collect(list),
        Err(_) => Vec::new(),
    }
}

pub fn query<T: JsCast>(document: &Document, selector: &str) -> Option<T> {
    document
        .query_selector(selector)
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<T>().ok())
}

pub fn header_height(document: &Document) -> f64 {
    query::<HtmlElement>(document, "header")
        .map(|header| header.offset_height() as f64)
        .unwrap_or(0.0)
}

pub fn listen<F>(target: &EventTarget, event: &str, handler: F) -> Result<(), JsValue>
where
    F: FnMut(Event) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

pub fn listen_passive<F>(target: &EventTarget, event: &str, handler: F) -> Result<(), JsValue>
where
    F: FnMut(Event) + 'static,
{
    let options = AddEventListenerOptions::new();
    options.set_passive(true);

    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback_and_add_event_listener_options(
        event,
        closure.as_ref().unchecked_ref(),
        &options,
    )?;
    closure.forget();
    Ok(())
}

pub fn set_timeout_once<F>(delay_ms: i32, callback: F) -> Result<i32, JsValue>
where
    F: FnOnce() + 'static,
{
    let callback = Closure::once_into_js(callback);
    window().set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.unchecked_ref(),
        delay_ms,
    )
}

/// Trailing-edge debounce over `setTimeout`: each `schedule` cancels the
/// pending call and restarts the delay.
pub struct Debouncer {
    delay_ms: i32,
    handle: Rc<Cell<Option<i32>>>,
    callback: Closure<dyn FnMut()>,
}

impl Debouncer {
    pub fn new<F>(delay_ms: i32, mut callback: F) -> Self
    where
        F: FnMut() + 'static,
    {
        let handle: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
        let handle_cb = Rc::clone(&handle);
        let callback = Closure::wrap(Box::new(move || {
            handle_cb.set(None);
            callback();
        }) as Box<dyn FnMut()>);

        Self {
            delay_ms,
            handle,
            callback,
        }
    }

    pub fn schedule(&self) -> Result<(), JsValue> {
        self.cancel();
        let id = window().set_timeout_with_callback_and_timeout_and_arguments_0(
            self.callback.as_ref().unchecked_ref(),
            self.delay_ms,
        )?;
        self.handle.set(Some(id));
        Ok(())
    }

    pub fn cancel(&self) {
        if let Some(id) = self.handle.take() {
            window().clear_timeout_with_handle(id);
        }
    }
}
