pub mod api;
pub mod config;
pub mod dom;
pub mod enhance;
pub mod map_frame;
pub mod nav;
pub mod notify;
pub mod scroll;
pub mod touch;

use wasm_bindgen::prelude::*;
use web_sys::Document;

pub use config::Config;
pub use nav::NavController;

fn report(step: &str, result: Result<(), JsValue>) -> bool {
    match result {
        Ok(()) => true,
        Err(err) => {
            let message = format!("{} failed: {}", step, dom::js_value_to_string(&err));
            web_sys::console::error_1(&JsValue::from_str(&message));
            false
        }
    }
}

pub fn enhance_page(document: &Document, config: &Config) -> bool {
    let mut ok = true;

    let navigation = match nav::install_navigation(document, config) {
        Ok(controller) => controller,
        Err(err) => {
            ok &= report("navigation", Err(err));
            None
        }
    };
    ok &= report("map iframe", map_frame::install_map_loader(document, config));
    ok &= report("scroll tracking", scroll::install_scroll_tracking(document, config));

    ok &= report("images", enhance::optimize_images(document).map(|_| ()));
    ok &= report("section reveal", enhance::install_section_reveal(document));
    ok &= report("preload", enhance::preload_resources(document));
    ok &= report(
        "viewport height",
        enhance::install_viewport_height_fix(document, config),
    );

    if let Some(controller) = navigation {
        ok &= report(
            "touch gestures",
            touch::install_touch_gestures(document, config, controller),
        );
    }
    ok &= report(
        "mobile layout",
        enhance::install_mobile_optimizations(document, config),
    );
    ok &= report("accessibility", enhance::improve_accessibility(document));

    ok &= report("error handlers", notify::install_error_handlers(document, config));
    ok &= report(
        "progressive enhancement",
        enhance::apply_progressive_enhancement(document).map(|_| ()),
    );
    ok &= report(
        "smooth scroll polyfill",
        enhance::load_smooth_scroll_polyfill(document),
    );

    ok
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    if let Err(err) = start_impl() {
        web_sys::console::error_1(&err);
    }
}

fn start_impl() -> Result<(), JsValue> {
    let document = dom::document()?;
    let config = Config::from_location(&dom::window().location());

    let mut ok = enhance_page(&document, &config);
    ok &= report("global api", api::install_global_api().map(|_| ()));

    if ok {
        dom::log("WebGIS mobile optimizations initialized successfully");
    } else {
        notify::show_error_notification(&document, &config, notify::INIT_ERROR_MESSAGE)?;
    }

    Ok(())
}
