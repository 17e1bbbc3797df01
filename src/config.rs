use web_sys::Location;

pub const MOBILE_BREAKPOINT: f64 = 768.0;
pub const SCROLL_DEBOUNCE_MS: i32 = 50;
pub const SCROLL_LEAD_IN: f64 = 100.0;
pub const ANCHOR_OFFSET: f64 = 20.0;
pub const MIN_SWIPE_DISTANCE: f64 = 50.0;
pub const MAX_SWIPE_VERTICAL: f64 = 100.0;
pub const RESIZE_DEBOUNCE_MS: i32 = 250;
pub const ORIENTATION_DELAY_MS: i32 = 500;
pub const FOCUS_DELAY_MS: i32 = 100;
pub const NOTIFICATION_TTL_MS: i32 = 5000;
pub const TOUCH_TARGET_MIN: f64 = 44.0;
pub const TOUCH_HINT_MS: i32 = 3000;

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub mobile_breakpoint: f64,
    pub scroll_debounce_ms: i32,
    pub scroll_lead_in: f64,
    pub anchor_offset: f64,
    pub min_swipe_distance: f64,
    pub max_swipe_vertical: f64,
    pub resize_debounce_ms: i32,
    pub orientation_delay_ms: i32,
    pub focus_delay_ms: i32,
    pub notification_ttl_ms: i32,
    pub touch_target_min: f64,
    pub touch_hint_ms: i32,
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mobile_breakpoint: MOBILE_BREAKPOINT,
            scroll_debounce_ms: SCROLL_DEBOUNCE_MS,
            scroll_lead_in: SCROLL_LEAD_IN,
            anchor_offset: ANCHOR_OFFSET,
            min_swipe_distance: MIN_SWIPE_DISTANCE,
            max_swipe_vertical: MAX_SWIPE_VERTICAL,
            resize_debounce_ms: RESIZE_DEBOUNCE_MS,
            orientation_delay_ms: ORIENTATION_DELAY_MS,
            focus_delay_ms: FOCUS_DELAY_MS,
            notification_ttl_ms: NOTIFICATION_TTL_MS,
            touch_target_min: TOUCH_TARGET_MIN,
            touch_hint_ms: TOUCH_HINT_MS,
            debug: false,
        }
    }
}

impl Config {
    pub fn from_location(location: &Location) -> Self {
        let search = location.search().unwrap_or_default();
        Self::from_query(&search)
    }

    pub fn from_query(search: &str) -> Self {
        let mut config = Self::default();
        config.debug = query_flag(search, "debug");
        config
    }

    pub fn is_mobile_width(&self, width: f64) -> bool {
        width <= self.mobile_breakpoint
    }
}

fn query_flag(search: &str, name: &str) -> bool {
    search
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .any(|(key, value)| key == name && value == "1")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_page_constants() {
        let config = Config::default();
        assert_eq!(config.mobile_breakpoint, 768.0);
        assert_eq!(config.scroll_debounce_ms, 50);
        assert_eq!(config.notification_ttl_ms, 5000);
        assert!(!config.debug);
    }

    #[test]
    fn debug_flag_is_read_from_query() {
        assert!(Config::from_query("?debug=1").debug);
        assert!(Config::from_query("?x=2&debug=1").debug);
        assert!(!Config::from_query("?debug=0").debug);
        assert!(!Config::from_query("?nodebug=1").debug);
        assert!(!Config::from_query("").debug);
    }

    #[test]
    fn breakpoint_is_inclusive() {
        let config = Config::default();
        assert!(config.is_mobile_width(768.0));
        assert!(config.is_mobile_width(320.0));
        assert!(!config.is_mobile_width(769.0));
    }
}
