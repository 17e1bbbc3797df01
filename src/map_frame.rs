use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement, HtmlIFrameElement};

use crate::config::Config;
use crate::dom;

pub const MESSAGE_TYPE: &str = "MOBILE_OPTIMIZATION";

const OVERLAY_STYLE: &str = "position: absolute; top: 0; left: 0; width: 100%; height: 100%; \
     background: rgba(255, 255, 255, 0.9); display: flex; align-items: center; \
     justify-content: center; z-index: 10;";

const OVERLAY_BODY: &str = r#"<div style="text-align: center; color: #003366;">
  <div class="loading-spinner" style="width: 40px; height: 40px; border: 4px solid rgba(0, 51, 102, 0.1); border-radius: 50%; border-top-color: #003366; animation: spin 1s ease-in-out infinite; margin: 0 auto 1rem;"></div>
  <p>Loading map...</p>
</div>"#;

const FAILURE_BODY: &str = r#"<p style="text-align: center; color: #666; padding: 2rem;"><i class="fas fa-exclamation-triangle"></i> Map failed to load</p>"#;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MobileContext {
    pub is_mobile: bool,
    pub screen_width: f64,
    pub screen_height: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MobileOptimizationMessage {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub data: MobileContext,
}

impl MobileOptimizationMessage {
    pub fn new(screen_width: f64, screen_height: f64) -> Self {
        Self {
            kind: MESSAGE_TYPE,
            data: MobileContext {
                is_mobile: true,
                screen_width,
                screen_height,
            },
        }
    }

    pub fn to_js(&self) -> Result<JsValue, JsValue> {
        self.serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(JsValue::from)
    }
}

pub fn create_loading_overlay(document: &Document) -> Result<HtmlElement, JsValue> {
    let overlay = document.create_element("div")?.dyn_into::<HtmlElement>()?;
    overlay.set_class_name("map-loading");
    overlay.style().set_css_text(OVERLAY_STYLE);
    overlay.set_inner_html(OVERLAY_BODY);
    Ok(overlay)
}

fn post_mobile_context(iframe: &HtmlIFrameElement) -> Result<(), JsValue> {
    let target = iframe
        .content_window()
        .ok_or_else(|| JsValue::from_str("iframe has no content window"))?;
    let message = MobileOptimizationMessage::new(dom::viewport_width(), dom::viewport_height());
    target.post_message(&message.to_js()?, "*")
}

// A src-less or still-navigating frame reports the initial about:blank
// document as complete, so that alone does not count as loaded.
pub fn frame_already_loaded(ready_state: Option<&str>, url: Option<&str>) -> bool {
    ready_state == Some("complete") && url.is_some_and(|url| !url.starts_with("about:blank"))
}

fn iframe_loaded(iframe: &HtmlIFrameElement) -> bool {
    // Cross-origin frames hide their document; those always get the overlay.
    let Some(content) = iframe.content_document() else {
        return false;
    };
    frame_already_loaded(Some(&content.ready_state()), content.url().ok().as_deref())
}

fn frame_ready(iframe: &HtmlIFrameElement, config: &Config) {
    dom::debug(config, "map iframe loaded");
    if !config.is_mobile_width(dom::viewport_width()) {
        return;
    }
    if let Err(err) = post_mobile_context(iframe) {
        dom::log(&format!(
            "Could not communicate with iframe for mobile optimization: {}",
            dom::js_value_to_string(&err)
        ));
    }
}

pub fn install_map_loader(document: &Document, config: &Config) -> Result<(), JsValue> {
    let Some(iframe) = dom::query::<HtmlIFrameElement>(document, ".map-container iframe") else {
        return Ok(());
    };
    let Some(container) = iframe.parent_element() else {
        return Ok(());
    };
    if iframe_loaded(&iframe) {
        frame_ready(&iframe, config);
        return Ok(());
    }

    let overlay = create_loading_overlay(document)?;
    container.append_child(&overlay)?;

    let overlay_load = overlay.clone();
    let iframe_load = iframe.clone();
    let config_load = config.clone();
    dom::listen(&iframe, "load", move |_event| {
        overlay_load.remove();
        frame_ready(&iframe_load, &config_load);
    })?;

    dom::listen(&iframe, "error", move |_event| {
        overlay.set_inner_html(FAILURE_BODY);
    })
}
