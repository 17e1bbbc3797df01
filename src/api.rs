use std::cell::Cell;
use std::rc::Rc;

use js_sys::{Function, Object, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::config::Config;
use crate::{dom, enhance, notify, scroll};

pub const GLOBAL_NAME: &str = "WebGISMobile";

fn page_config() -> Config {
    Config::from_location(&dom::window().location())
}

#[wasm_bindgen(js_name = smoothScrollToElement)]
pub fn smooth_scroll_to_element(selector: &str) -> Result<bool, JsValue> {
    let document = dom::document()?;
    Ok(scroll::scroll_to_anchor(&document, &page_config(), selector))
}

#[wasm_bindgen(js_name = updateActiveNavLink)]
pub fn update_active_nav_link(link: &Element) -> Result<(), JsValue> {
    let document = dom::document()?;
    scroll::set_active_link(&document, link);
    Ok(())
}

#[wasm_bindgen(js_name = showErrorNotification)]
pub fn show_error_notification(message: &str) -> Result<(), JsValue> {
    let document = dom::document()?;
    notify::show_error_notification(&document, &page_config(), message).map(|_| ())
}

#[wasm_bindgen(js_name = isInViewport)]
pub fn is_in_viewport(element: &Element) -> bool {
    enhance::is_in_viewport(element)
}

// Trailing edge: only the last call inside `wait` reaches `func`.
#[wasm_bindgen]
pub fn debounce(func: Function, wait: i32) -> Function {
    let pending: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
    let wrapper = Closure::wrap(Box::new(move |arg: JsValue| {
        if let Some(id) = pending.take() {
            dom::window().clear_timeout_with_handle(id);
        }
        let func = func.clone();
        let pending_cb = Rc::clone(&pending);
        let scheduled = dom::set_timeout_once(wait, move || {
            pending_cb.set(None);
            let _ = func.call1(&JsValue::NULL, &arg);
        });
        if let Ok(id) = scheduled {
            pending.set(Some(id));
        }
    }) as Box<dyn FnMut(JsValue)>);
    wrapper.into_js_value().unchecked_into()
}

// Leading edge: the first call runs, the rest are dropped until `limit` passes.
#[wasm_bindgen]
pub fn throttle(func: Function, limit: i32) -> Function {
    let blocked = Rc::new(Cell::new(false));
    let wrapper = Closure::wrap(Box::new(move |arg: JsValue| {
        if blocked.get() {
            return;
        }
        let _ = func.call1(&JsValue::NULL, &arg);
        blocked.set(true);
        let blocked_cb = Rc::clone(&blocked);
        if dom::set_timeout_once(limit, move || blocked_cb.set(false)).is_err() {
            blocked.set(false);
        }
    }) as Box<dyn FnMut(JsValue)>);
    wrapper.into_js_value().unchecked_into()
}

fn expose(api: &Object, name: &str, function: JsValue) -> Result<(), JsValue> {
    Reflect::set(api, &JsValue::from_str(name), &function)?;
    Ok(())
}

pub fn install_global_api() -> Result<Object, JsValue> {
    let api = Object::new();

    let scroll_to = Closure::wrap(Box::new(|selector: String| {
        smooth_scroll_to_element(&selector)
    }) as Box<dyn FnMut(String) -> Result<bool, JsValue>>);
    expose(&api, "smoothScrollToElement", scroll_to.into_js_value())?;

    let update_link = Closure::wrap(Box::new(|link: JsValue| {
        let link = link
            .dyn_into::<Element>()
            .map_err(|_| JsValue::from_str("updateActiveNavLink expects an element"))?;
        update_active_nav_link(&link)
    }) as Box<dyn FnMut(JsValue) -> Result<(), JsValue>>);
    expose(&api, "updateActiveNavLink", update_link.into_js_value())?;

    let notify = Closure::wrap(Box::new(|message: String| {
        show_error_notification(&message)
    }) as Box<dyn FnMut(String) -> Result<(), JsValue>>);
    expose(&api, "showErrorNotification", notify.into_js_value())?;

    let debounce_fn = Closure::wrap(Box::new(debounce) as Box<dyn FnMut(Function, i32) -> Function>);
    expose(&api, "debounce", debounce_fn.into_js_value())?;

    let throttle_fn = Closure::wrap(Box::new(throttle) as Box<dyn FnMut(Function, i32) -> Function>);
    expose(&api, "throttle", throttle_fn.into_js_value())?;

    let in_viewport = Closure::wrap(Box::new(|element: JsValue| {
        element
            .dyn_ref::<Element>()
            .map(enhance::is_in_viewport)
            .unwrap_or(false)
    }) as Box<dyn FnMut(JsValue) -> bool>);
    expose(&api, "isInViewport", in_viewport.into_js_value())?;

    Reflect::set(&dom::window(), &JsValue::from_str(GLOBAL_NAME), &api)?;
    Ok(api)
}
