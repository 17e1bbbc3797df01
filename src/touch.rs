use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, TouchEvent};

use crate::config::Config;
use crate::dom;
use crate::nav::NavController;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwipeAction {
    Open,
    Close,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SwipeTracker {
    start_x: f64,
    start_y: f64,
    end_x: f64,
    end_y: f64,
}

impl SwipeTracker {
    pub fn begin(&mut self, x: f64, y: f64) {
        self.start_x = x;
        self.start_y = y;
    }

    pub fn finish(&mut self, x: f64, y: f64) -> (f64, f64) {
        self.end_x = x;
        self.end_y = y;
        (self.end_x - self.start_x, (self.end_y - self.start_y).abs())
    }
}

pub fn classify_swipe(
    dx: f64,
    dy: f64,
    menu_open: bool,
    viewport_width: f64,
    config: &Config,
) -> Option<SwipeAction> {
    if dy.abs() > config.max_swipe_vertical {
        return None;
    }

    if dx > config.min_swipe_distance && !menu_open && config.is_mobile_width(viewport_width) {
        Some(SwipeAction::Open)
    } else if dx < -config.min_swipe_distance && menu_open {
        Some(SwipeAction::Close)
    } else {
        None
    }
}

fn first_changed_touch(event: &web_sys::Event) -> Option<(f64, f64)> {
    let touch = event.dyn_ref::<TouchEvent>()?.changed_touches().item(0)?;
    Some((touch.client_x() as f64, touch.client_y() as f64))
}

pub fn install_touch_gestures(
    document: &Document,
    config: &Config,
    controller: Rc<NavController>,
) -> Result<(), JsValue> {
    let tracker = Rc::new(RefCell::new(SwipeTracker::default()));

    let tracker_start = Rc::clone(&tracker);
    dom::listen_passive(document, "touchstart", move |event| {
        if let Some((x, y)) = first_changed_touch(&event) {
            tracker_start.borrow_mut().begin(x, y);
        }
    })?;

    let config = config.clone();
    dom::listen_passive(document, "touchend", move |event| {
        let Some((x, y)) = first_changed_touch(&event) else {
            return;
        };
        let (dx, dy) = tracker.borrow_mut().finish(x, y);

        let action = classify_swipe(dx, dy, controller.is_open(), dom::viewport_width(), &config);
        if let Some(action) = action {
            dom::debug(&config, &format!("swipe {:?} (dx={}, dy={})", action, dx, dy));
            // Same path as a tap on the toggle.
            controller.toggle_button().click();
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phone() -> f64 {
        375.0
    }

    #[test]
    fn horizontal_swipe_toggles() {
        let config = Config::default();
        assert_eq!(
            classify_swipe(60.0, 10.0, false, phone(), &config),
            Some(SwipeAction::Open)
        );
        assert_eq!(
            classify_swipe(-60.0, 10.0, true, phone(), &config),
            Some(SwipeAction::Close)
        );
    }

    #[test]
    fn steep_swipe_is_ignored() {
        let config = Config::default();
        assert_eq!(classify_swipe(60.0, 150.0, false, phone(), &config), None);
        assert_eq!(classify_swipe(-60.0, 150.0, true, phone(), &config), None);
    }

    #[test]
    fn short_swipe_is_ignored() {
        let config = Config::default();
        assert_eq!(classify_swipe(50.0, 0.0, false, phone(), &config), None);
        assert_eq!(classify_swipe(-50.0, 0.0, true, phone(), &config), None);
    }

    #[test]
    fn open_requires_mobile_width_but_close_does_not() {
        let config = Config::default();
        assert_eq!(classify_swipe(80.0, 0.0, false, 1024.0, &config), None);
        assert_eq!(
            classify_swipe(80.0, 0.0, false, 768.0, &config),
            Some(SwipeAction::Open)
        );
        assert_eq!(
            classify_swipe(-80.0, 0.0, true, 1024.0, &config),
            Some(SwipeAction::Close)
        );
    }

    #[test]
    fn swipe_matching_current_state_does_nothing() {
        let config = Config::default();
        assert_eq!(classify_swipe(80.0, 0.0, true, phone(), &config), None);
        assert_eq!(classify_swipe(-80.0, 0.0, false, phone(), &config), None);
    }

    #[test]
    fn tracker_reports_signed_dx_and_absolute_dy() {
        let mut tracker = SwipeTracker::default();
        tracker.begin(100.0, 300.0);
        assert_eq!(tracker.finish(40.0, 290.0), (-60.0, 10.0));
        tracker.begin(10.0, 10.0);
        assert_eq!(tracker.finish(70.0, 20.0), (60.0, 10.0));
    }
}
