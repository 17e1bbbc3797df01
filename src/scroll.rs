use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, ScrollBehavior, ScrollToOptions};

use crate::config::Config;
use crate::dom::{self, Debouncer};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SectionBounds {
    pub top: f64,
    pub height: f64,
}

/// Index of the section containing `scroll_y`. Each section's window is
/// shifted up by the header height plus `lead_in`; the last match wins.
pub fn active_section(
    scroll_y: f64,
    header_height: f64,
    lead_in: f64,
    sections: &[SectionBounds],
) -> Option<usize> {
    sections
        .iter()
        .enumerate()
        .filter(|(_, bounds)| {
            let top = bounds.top - header_height - lead_in;
            scroll_y >= top && scroll_y < top + bounds.height
        })
        .map(|(index, _)| index)
        .last()
}

pub fn anchor_scroll_top(target_top: f64, header_height: f64, offset: f64) -> f64 {
    target_top - header_height - offset
}

fn section_bounds(section: &HtmlElement) -> SectionBounds {
    SectionBounds {
        top: section.offset_top() as f64,
        height: section.offset_height() as f64,
    }
}

pub fn update_active_link(
    document: &Document,
    config: &Config,
    sections: &[HtmlElement],
    links: &[Element],
) -> Option<String> {
    let scroll_y = dom::window().scroll_y().unwrap_or(0.0);
    let header = dom::header_height(document);
    let bounds: Vec<SectionBounds> = sections.iter().map(section_bounds).collect();

    let active_id = active_section(scroll_y, header, config.scroll_lead_in, &bounds)
        .map(|index| sections[index].id());
    let active_href = active_id.as_ref().map(|id| format!("#{}", id));

    for link in links {
        let _ = link.class_list().remove_1("active");
        if active_href.is_some() && link.get_attribute("href") == active_href {
            let _ = link.class_list().add_1("active");
        }
    }

    active_id
}

pub fn install_scroll_tracking(document: &Document, config: &Config) -> Result<(), JsValue> {
    let sections: Vec<HtmlElement> = dom::query_all(document, ".section[id]");
    let links: Vec<Element> = dom::query_all(document, "nav a[href^=\"#\"]");
    if sections.is_empty() || links.is_empty() {
        return Ok(());
    }

    let document_cb = document.clone();
    let config_cb = config.clone();
    let debouncer = Debouncer::new(config.scroll_debounce_ms, move || {
        let active = update_active_link(&document_cb, &config_cb, &sections, &links);
        dom::debug(&config_cb, &format!("active section: {:?}", active));
    });

    dom::listen_passive(&dom::window(), "scroll", move |_event| {
        let _ = debouncer.schedule();
    })
}

pub fn scroll_to_anchor(document: &Document, config: &Config, selector: &str) -> bool {
    let Some(target) = dom::query::<HtmlElement>(document, selector) else {
        return false;
    };

    let top = anchor_scroll_top(
        target.offset_top() as f64,
        dom::header_height(document),
        config.anchor_offset,
    );

    let options = ScrollToOptions::new();
    options.set_top(top);
    options.set_behavior(ScrollBehavior::Smooth);
    dom::window().scroll_to_with_scroll_to_options(&options);
    true
}

pub fn set_active_link(document: &Document, active: &Element) {
    for link in dom::query_all::<Element>(document, "nav a") {
        let _ = link.class_list().remove_1("active");
    }
    let _ = active.class_list().add_1("active");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sections() -> Vec<SectionBounds> {
        vec![
            SectionBounds { top: 200.0, height: 400.0 },
            SectionBounds { top: 600.0, height: 400.0 },
            SectionBounds { top: 1000.0, height: 600.0 },
        ]
    }

    #[test]
    fn picks_section_under_adjusted_offset() {
        let s = sections();
        // header 60 + lead-in 100: first section starts at 40.
        assert_eq!(active_section(0.0, 60.0, 100.0, &s), None);
        assert_eq!(active_section(40.0, 60.0, 100.0, &s), Some(0));
        assert_eq!(active_section(439.0, 60.0, 100.0, &s), Some(0));
        assert_eq!(active_section(440.0, 60.0, 100.0, &s), Some(1));
        assert_eq!(active_section(1439.0, 60.0, 100.0, &s), Some(2));
        assert_eq!(active_section(1440.0, 60.0, 100.0, &s), None);
    }

    #[test]
    fn overlapping_sections_resolve_to_the_last() {
        let s = vec![
            SectionBounds { top: 0.0, height: 1000.0 },
            SectionBounds { top: 300.0, height: 200.0 },
        ];
        assert_eq!(active_section(350.0, 0.0, 0.0, &s), Some(1));
        assert_eq!(active_section(600.0, 0.0, 0.0, &s), Some(0));
    }

    #[test]
    fn empty_section_list_has_no_active() {
        assert_eq!(active_section(100.0, 0.0, 100.0, &[]), None);
    }

    #[test]
    fn anchor_offset_clears_header() {
        assert_eq!(anchor_scroll_top(900.0, 80.0, 20.0), 800.0);
    }
}
