use js_sys::Promise;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use web_sys::{Document, ErrorEvent, HtmlElement};
use webgis_mobile::{Config, notify};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    web_sys::window()
        .expect("no window")
        .document()
        .expect("no document")
}

fn visible_notifications(document: &Document) -> u32 {
    document
        .query_selector_all(".error-notification")
        .expect("query notifications")
        .length()
}

async fn sleep(ms: i32) {
    let promise = Promise::new(&mut |resolve, _reject| {
        web_sys::window()
            .expect("no window")
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
            .expect("set timeout");
    });
    JsFuture::from(promise).await.expect("sleep");
}

#[wasm_bindgen_test]
async fn global_error_shows_one_notification_for_five_seconds() {
    let document = document();
    notify::install_error_handlers(&document, &Config::default()).expect("install handlers");

    let window = web_sys::window().expect("no window");
    let event = ErrorEvent::new("error").expect("error event");
    window.dispatch_event(&event).expect("dispatch");

    assert_eq!(visible_notifications(&document), 1);
    let text = document
        .query_selector(".error-notification span")
        .expect("query")
        .expect("message span")
        .text_content()
        .unwrap_or_default();
    assert_eq!(text, notify::SCRIPT_ERROR_MESSAGE);

    sleep(4500).await;
    assert_eq!(visible_notifications(&document), 1);

    sleep(700).await;
    assert_eq!(visible_notifications(&document), 0);
}

#[wasm_bindgen_test]
fn close_button_dismisses_notification() {
    let document = document();

    let notification = notify::show_error_notification(&document, &Config::default(), "Oops")
        .expect("show notification");
    assert_eq!(visible_notifications(&document), 1);

    let close = notification
        .query_selector("button")
        .expect("query")
        .expect("close button")
        .dyn_into::<HtmlElement>()
        .expect("html button");
    close.click();

    assert_eq!(visible_notifications(&document), 0);
}

#[wasm_bindgen_test]
fn newer_notification_replaces_older() {
    let document = document();
    let config = Config::default();

    notify::show_error_notification(&document, &config, "first").expect("first");
    notify::show_error_notification(&document, &config, "second").expect("second");

    assert_eq!(visible_notifications(&document), 1);
    let text = document
        .query_selector(".error-notification span")
        .expect("query")
        .expect("message span")
        .text_content();
    assert_eq!(text.as_deref(), Some("second"));
}

#[wasm_bindgen_test]
fn message_is_rendered_as_text() {
    let document = document();

    notify::show_error_notification(&document, &Config::default(), "<b>bold</b>")
        .expect("show notification");

    assert!(document
        .query_selector(".error-notification b")
        .expect("query")
        .is_none());
}
