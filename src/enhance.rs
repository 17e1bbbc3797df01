use js_sys::{Array, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, HtmlElement, HtmlIFrameElement, HtmlImageElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, Node,
};

use crate::config::Config;
use crate::dom::{self, Debouncer};

pub const ICON_STYLESHEET: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.0.0/css/all.min.css";
pub const SMOOTH_SCROLL_POLYFILL: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/smoothscroll/1.4.10/SmoothScroll.min.js";

const SKIP_LINK_STYLE: &str = "position: absolute; top: -40px; left: 6px; background: #003366; \
     color: white; padding: 8px; text-decoration: none; border-radius: 4px; z-index: 10001; \
     transition: top 0.3s;";
const TOUCH_HINT_STYLE: &str = "position: absolute; bottom: 10px; left: 50%; \
     transform: translateX(-50%); background: rgba(0, 0, 0, 0.8); color: white; \
     padding: 0.5rem 1rem; border-radius: 20px; font-size: 0.8rem; z-index: 5; \
     pointer-events: none;";
const TOUCH_HINT_FADE_MS: i32 = 500;

// Images

pub fn needs_lazy_loading(existing: Option<&str>) -> bool {
    existing.is_none()
}

pub fn optimize_images(document: &Document) -> Result<usize, JsValue> {
    let mut added = 0;
    for img in dom::query_all::<HtmlImageElement>(document, "img") {
        if needs_lazy_loading(img.get_attribute("loading").as_deref()) {
            img.set_attribute("loading", "lazy")?;
            added += 1;
        }

        let broken = img.clone();
        dom::listen(&img, "error", move |_event| {
            let _ = broken.style().set_property("display", "none");
        })?;
    }
    Ok(added)
}

// Viewport height

pub fn viewport_unit(inner_height: f64) -> String {
    format!("{}px", inner_height * 0.01)
}

pub fn set_viewport_height(document: &Document) {
    let Some(root) = document
        .document_element()
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    else {
        return;
    };
    let _ = root
        .style()
        .set_property("--vh", &viewport_unit(dom::viewport_height()));
}

pub fn install_viewport_height_fix(document: &Document, config: &Config) -> Result<(), JsValue> {
    set_viewport_height(document);
    let window = dom::window();

    let document_resize = document.clone();
    let debouncer = Debouncer::new(config.resize_debounce_ms, move || {
        set_viewport_height(&document_resize);
    });
    dom::listen(&window, "resize", move |_event| {
        let _ = debouncer.schedule();
    })?;

    let document_orient = document.clone();
    let delay = config.orientation_delay_ms;
    dom::listen(&window, "orientationchange", move |_event| {
        let document = document_orient.clone();
        let _ = dom::set_timeout_once(delay, move || set_viewport_height(&document));
    })
}

// Mobile layout

pub fn needs_touch_target_padding(width: f64, height: f64, min: f64) -> bool {
    width < min || height < min
}

fn enlarge_touch_targets(document: &Document, config: &Config) -> usize {
    let mut enlarged = 0;
    for target in dom::query_all::<HtmlElement>(document, "a, button, .clickable") {
        let rect = target.get_bounding_client_rect();
        if !needs_touch_target_padding(rect.width(), rect.height(), config.touch_target_min) {
            continue;
        }
        let min = format!("{}px", config.touch_target_min);
        let style = target.style();
        let _ = style.set_property("min-height", &min);
        let _ = style.set_property("min-width", &min);
        let _ = style.set_property("display", "inline-flex");
        let _ = style.set_property("align-items", "center");
        let _ = style.set_property("justify-content", "center");
        enlarged += 1;
    }
    enlarged
}

fn show_map_touch_hint(document: &Document, config: &Config) -> Result<(), JsValue> {
    let Some(iframe) = dom::query::<HtmlIFrameElement>(document, ".map-container iframe") else {
        return Ok(());
    };
    let _ = iframe.style().set_property("pointer-events", "auto");

    let Some(container) = iframe
        .parent_element()
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    else {
        return Ok(());
    };

    let hint = document.create_element("div")?.dyn_into::<HtmlElement>()?;
    hint.style().set_css_text(TOUCH_HINT_STYLE);
    hint.set_text_content(Some("Use two fingers to move the map"));
    let _ = container.style().set_property("position", "relative");
    container.append_child(&hint)?;

    dom::set_timeout_once(config.touch_hint_ms, move || {
        let _ = hint.style().set_property("opacity", "0");
        let _ = hint.style().set_property("transition", "opacity 0.5s");
        let _ = dom::set_timeout_once(TOUCH_HINT_FADE_MS, move || hint.remove());
    })?;
    Ok(())
}

pub fn install_mobile_optimizations(document: &Document, config: &Config) -> Result<(), JsValue> {
    if !config.is_mobile_width(dom::viewport_width()) {
        return Ok(());
    }

    if let Some(body) = document.body() {
        body.class_list().add_1("mobile-device")?;
    }
    let enlarged = enlarge_touch_targets(document, config);
    dom::debug(config, &format!("enlarged {} touch targets", enlarged));

    show_map_touch_hint(document, config)
}

// Accessibility

pub fn heading_id(index: usize) -> String {
    format!("heading-{}", index + 1)
}

pub fn button_label(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn insert_skip_link(document: &Document) -> Result<(), JsValue> {
    let Some(body) = document.body() else {
        return Ok(());
    };

    let skip = document.create_element("a")?.dyn_into::<HtmlElement>()?;
    skip.set_attribute("href", "#main")?;
    skip.set_text_content(Some("Skip to main content"));
    skip.set_class_name("skip-link");
    skip.style().set_css_text(SKIP_LINK_STYLE);

    let on_focus = skip.clone();
    dom::listen(&skip, "focus", move |_event| {
        let _ = on_focus.style().set_property("top", "6px");
    })?;
    let on_blur = skip.clone();
    dom::listen(&skip, "blur", move |_event| {
        let _ = on_blur.style().set_property("top", "-40px");
    })?;

    let first = body.first_child();
    body.insert_before(&skip, first.as_ref())?;
    Ok(())
}

pub fn improve_accessibility(document: &Document) -> Result<(), JsValue> {
    insert_skip_link(document)?;

    if let Some(main) = dom::query::<Element>(document, "main") {
        if main.id().is_empty() {
            main.set_id("main");
        }
    }

    let headings = dom::query_all::<Element>(document, "h1, h2, h3, h4, h5, h6");
    for (index, heading) in headings.iter().enumerate() {
        if heading.id().is_empty() {
            heading.set_id(&heading_id(index));
        }
    }

    for button in dom::query_all::<Element>(document, "button:not([aria-label])") {
        let text = button.text_content().unwrap_or_default();
        if let Some(label) = button_label(&text) {
            button.set_attribute("aria-label", &label)?;
        }
    }

    Ok(())
}

// Page-level extras

pub fn install_section_reveal(document: &Document) -> Result<(), JsValue> {
    if !dom::has_global("IntersectionObserver") {
        return Ok(());
    }

    let on_entries = Closure::wrap(Box::new(
        move |entries: Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                if entry.is_intersecting() {
                    let target = entry.target();
                    let _ = target.class_list().add_1("section-visible");
                    observer.unobserve(&target);
                }
            }
        },
    ) as Box<dyn FnMut(Array, IntersectionObserver)>);

    let options = IntersectionObserverInit::new();
    options.set_root_margin("50px");
    let observer =
        IntersectionObserver::new_with_options(on_entries.as_ref().unchecked_ref(), &options)?;
    on_entries.forget();

    for section in dom::query_all::<Element>(document, ".section") {
        observer.observe(&section);
    }
    Ok(())
}

pub fn preload_resources(document: &Document) -> Result<(), JsValue> {
    let Some(head) = document.head() else {
        return Ok(());
    };
    let link = document.create_element("link")?;
    link.set_attribute("rel", "preload")?;
    link.set_attribute("as", "style")?;
    link.set_attribute("href", ICON_STYLESHEET)?;
    head.append_child(&link)?;
    Ok(())
}

fn supports_css(property: &str, value: &str) -> bool {
    let Ok(css) = Reflect::get(&dom::window(), &JsValue::from_str("CSS")) else {
        return false;
    };
    if css.is_undefined() || css.is_null() {
        return false;
    }
    let Ok(supports) = dom::js_function(&css, "supports") else {
        return false;
    };
    supports
        .call2(&css, &JsValue::from_str(property), &JsValue::from_str(value))
        .ok()
        .and_then(|v| v.as_bool())
        .unwrap_or(false)
}

pub fn is_modern_browser() -> bool {
    dom::has_global("IntersectionObserver")
        && dom::has_global("requestAnimationFrame")
        && supports_css("display", "grid")
}

pub fn apply_progressive_enhancement(document: &Document) -> Result<bool, JsValue> {
    let Some(root) = document.document_element() else {
        return Ok(false);
    };

    let modern = is_modern_browser();
    if modern {
        root.class_list().add_1("modern-browser")?;
        let sections = dom::query_all::<HtmlElement>(document, ".section");
        for (index, section) in sections.iter().enumerate() {
            let delay = format!("{}s", index as f64 * 0.1);
            let _ = section.style().set_property("animation-delay", &delay);
        }
    } else {
        root.class_list().add_1("legacy-browser")?;
        dom::log("Legacy browser detected, using fallback features");
    }
    Ok(modern)
}

pub fn load_smooth_scroll_polyfill(document: &Document) -> Result<(), JsValue> {
    let Some(root) = document
        .document_element()
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    else {
        return Ok(());
    };
    if Reflect::has(&root.style(), &JsValue::from_str("scrollBehavior")).unwrap_or(true) {
        return Ok(());
    }
    let Some(head) = document.head() else {
        return Ok(());
    };
    let script = document.create_element("script")?;
    script.set_attribute("src", SMOOTH_SCROLL_POLYFILL)?;
    let script_node: &Node = &script;
    head.append_child(script_node)?;
    Ok(())
}

pub fn is_in_viewport(element: &Element) -> bool {
    let rect = element.get_bounding_client_rect();
    rect.top() >= 0.0
        && rect.left() >= 0.0
        && rect.bottom() <= dom::viewport_height()
        && rect.right() <= dom::viewport_width()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lazy_loading_never_overrides_explicit_value() {
        assert!(needs_lazy_loading(None));
        assert!(!needs_lazy_loading(Some("eager")));
        assert!(!needs_lazy_loading(Some("lazy")));
        assert!(!needs_lazy_loading(Some("")));
    }

    #[test]
    fn viewport_unit_is_one_percent_in_px() {
        assert_eq!(viewport_unit(1000.0), "10px");
        assert_eq!(viewport_unit(0.0), "0px");
    }

    #[test]
    fn touch_target_padding_below_minimum_either_axis() {
        assert!(needs_touch_target_padding(30.0, 60.0, 44.0));
        assert!(needs_touch_target_padding(60.0, 20.0, 44.0));
        assert!(!needs_touch_target_padding(44.0, 44.0, 44.0));
    }

    #[test]
    fn heading_ids_are_one_based() {
        assert_eq!(heading_id(0), "heading-1");
        assert_eq!(heading_id(9), "heading-10");
    }

    #[test]
    fn button_label_trims_and_skips_blank() {
        assert_eq!(button_label("  Search \n"), Some("Search".to_string()));
        assert_eq!(button_label("   "), None);
        assert_eq!(button_label(""), None);
    }
}
