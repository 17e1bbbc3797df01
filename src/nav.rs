use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlButtonElement, HtmlElement, KeyboardEvent, Node};

use crate::config::Config;
use crate::dom;
use crate::scroll;

pub const MENU_ID: &str = "main-navigation";
const LABEL_CLOSED: &str = r#"<i class="fas fa-bars"></i> Menu"#;
const LABEL_OPEN: &str = r#"<i class="fas fa-times"></i> Close"#;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkStep {
    Next,
    Previous,
}

impl LinkStep {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowDown" => Some(Self::Next),
            "ArrowUp" => Some(Self::Previous),
            _ => None,
        }
    }
}

pub fn step_index(index: usize, len: usize, step: LinkStep) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let index = index % len;
    Some(match step {
        LinkStep::Next => (index + 1) % len,
        LinkStep::Previous => (index + len - 1) % len,
    })
}

/// The mobile menu. Open state lives in the DOM as the `active` class on
/// the list, so anything reading the markup agrees with this handle.
pub struct NavController {
    nav: Element,
    list: HtmlElement,
    toggle: HtmlButtonElement,
    links: Vec<HtmlElement>,
    focus_delay_ms: i32,
}

impl NavController {
    pub fn is_open(&self) -> bool {
        self.list.class_list().contains("active")
    }

    pub fn open(&self) {
        let _ = self.list.class_list().add_1("active");
        self.toggle.set_inner_html(LABEL_OPEN);
        let _ = self.toggle.set_attribute("aria-expanded", "true");

        if let Some(first) = self.links.first().cloned() {
            let _ = dom::set_timeout_once(self.focus_delay_ms, move || {
                let _ = first.focus();
            });
        }
    }

    pub fn close(&self) {
        let _ = self.list.class_list().remove_1("active");
        self.toggle.set_inner_html(LABEL_CLOSED);
        let _ = self.toggle.set_attribute("aria-expanded", "false");
    }

    pub fn toggle(&self) {
        if self.is_open() {
            self.close();
        } else {
            self.open();
        }
    }

    pub fn toggle_button(&self) -> &HtmlButtonElement {
        &self.toggle
    }

    pub fn list(&self) -> &HtmlElement {
        &self.list
    }

    pub fn links(&self) -> &[HtmlElement] {
        &self.links
    }

    fn contains(&self, node: &Node) -> bool {
        self.nav.contains(Some(node))
    }
}

fn create_toggle(document: &Document) -> Result<HtmlButtonElement, JsValue> {
    let toggle = document
        .create_element("button")?
        .dyn_into::<HtmlButtonElement>()?;
    toggle.set_class_name("nav-toggle");
    toggle.set_inner_html(LABEL_CLOSED);
    toggle.set_attribute("aria-label", "Toggle navigation menu")?;
    toggle.set_attribute("aria-expanded", "false")?;
    toggle.set_attribute("aria-controls", MENU_ID)?;
    Ok(toggle)
}

pub fn install_navigation(
    document: &Document,
    config: &Config,
) -> Result<Option<Rc<NavController>>, JsValue> {
    let Some(nav) = dom::query::<Element>(document, "nav") else {
        return Ok(None);
    };
    let Some(list) = nav
        .query_selector("ul")?
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    else {
        return Ok(None);
    };

    let toggle = create_toggle(document)?;
    let list_node: &Node = &list;
    nav.insert_before(&toggle, Some(list_node))?;
    list.set_id(MENU_ID);

    let links: Vec<HtmlElement> = dom::collect(list.query_selector_all("a")?);

    let controller = Rc::new(NavController {
        nav,
        list,
        toggle,
        links,
        focus_delay_ms: config.focus_delay_ms,
    });

    let ctrl = Rc::clone(&controller);
    dom::listen(controller.toggle_button(), "click", move |event| {
        event.stop_propagation();
        ctrl.toggle();
    })?;

    let ctrl = Rc::clone(&controller);
    dom::listen(document, "click", move |event| {
        let Some(target) = event.target().and_then(|t| t.dyn_into::<Node>().ok()) else {
            return;
        };
        if !ctrl.contains(&target) && ctrl.is_open() {
            ctrl.close();
        }
    })?;

    let ctrl = Rc::clone(&controller);
    dom::listen(document, "keydown", move |event| {
        let Some(key) = event.dyn_ref::<KeyboardEvent>().map(|e| e.key()) else {
            return;
        };
        if key == "Escape" && ctrl.is_open() {
            ctrl.close();
            let _ = ctrl.toggle_button().focus();
        }
    })?;

    install_link_handlers(document, config, &controller)?;

    dom::debug(
        config,
        &format!("navigation ready ({} links)", controller.links().len()),
    );
    Ok(Some(controller))
}

fn install_link_handlers(
    document: &Document,
    config: &Config,
    controller: &Rc<NavController>,
) -> Result<(), JsValue> {
    for (index, link) in controller.links().iter().enumerate() {
        let ctrl = Rc::clone(controller);
        let document_cb = document.clone();
        let config_cb = config.clone();
        let link_cb = link.clone();
        dom::listen(link, "click", move |event| {
            ctrl.close();

            let Some(href) = link_cb.get_attribute("href") else {
                return;
            };
            if href.starts_with('#') {
                event.prevent_default();
                scroll::scroll_to_anchor(&document_cb, &config_cb, &href);
                scroll::set_active_link(&document_cb, &link_cb);
            }
        })?;

        let ctrl = Rc::clone(controller);
        dom::listen(link, "keydown", move |event| {
            let Some(step) = event
                .dyn_ref::<KeyboardEvent>()
                .and_then(|e| LinkStep::from_key(&e.key()))
            else {
                return;
            };
            event.prevent_default();
            let links = ctrl.links();
            if let Some(next) = step_index(index, links.len(), step) {
                let _ = links[next].focus();
            }
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrow_keys_map_to_steps() {
        assert_eq!(LinkStep::from_key("ArrowDown"), Some(LinkStep::Next));
        assert_eq!(LinkStep::from_key("ArrowUp"), Some(LinkStep::Previous));
        assert_eq!(LinkStep::from_key("ArrowLeft"), None);
        assert_eq!(LinkStep::from_key("Enter"), None);
    }

    #[test]
    fn stepping_wraps_around() {
        assert_eq!(step_index(0, 4, LinkStep::Next), Some(1));
        assert_eq!(step_index(3, 4, LinkStep::Next), Some(0));
        assert_eq!(step_index(0, 4, LinkStep::Previous), Some(3));
        assert_eq!(step_index(2, 4, LinkStep::Previous), Some(1));
    }

    #[test]
    fn single_link_steps_to_itself() {
        assert_eq!(step_index(0, 1, LinkStep::Next), Some(0));
        assert_eq!(step_index(0, 1, LinkStep::Previous), Some(0));
    }

    #[test]
    fn no_links_no_step() {
        assert_eq!(step_index(0, 0, LinkStep::Next), None);
    }
}
