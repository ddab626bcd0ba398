//! WASM API test
//!
//! Drives `TabstopsContainer` through a JS host object the way a page would.
//! Runs in a browser via wasm-bindgen-test.

#![cfg(target_arch = "wasm32")]

use js_sys::{Function, Object, Reflect, JSON};
use tabstops::api::JsLayoutHost;
use tabstops::TabstopsContainer;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

/// Every marker sits 8px in; boxes are as wide as their text or min-width
fn host() -> JsLayoutHost {
    let host = Object::new();
    let method = |name: &str, args: &str, body: &str| {
        Reflect::set(&host, &JsValue::from_str(name), &Function::new_with_args(args, body)).unwrap();
    };
    method("containerLeft", "tree", "return 0;");
    method("containerWidth", "tree", "return 300;");
    method("contentHeight", "tree", "return 20;");
    method("marginBottom", "tree", "return 0;");
    method("parentWidth", "tree", "return 300;");
    method("fontSize", "tree", "return 16;");
    method("offsetLeft", "tree, path", "return 8;");
    method(
        "renderedWidth",
        "tree, path",
        "const node = path.reduce((n, i) => n.children[i], tree);
         const text = (node.children || []).map(c => c.text || '').join('');
         return Math.max((node.style && node.style.minWidth) || 0, text.length * 8);",
    );
    method("textDecoration", "tree, path", "return null;");
    method("computedCustomProperty", "tree, name", "return undefined;");
    method("measureLength", "tree, expr", "return expr === '1in' ? 96 : undefined;");
    host.unchecked_into()
}

fn json(text: &str) -> JsValue {
    JSON::parse(text).unwrap()
}

fn paragraph() -> TabstopsContainer {
    TabstopsContainer::new(json(
        r#"{"type":"element","tag":"p","children":[{"type":"text","text":"a\tb"}]}"#,
    ))
    .unwrap()
}

#[wasm_bindgen_test]
fn test_container_requires_element_root() {
    assert!(TabstopsContainer::new(json(r#"{"type":"text","text":"a"}"#)).is_err());
}

#[wasm_bindgen_test]
fn test_refresh_fills_and_destroy_restores() {
    let container = paragraph();
    let list = container.refresh(&host(), json(r#"{"tabstops":"100px"}"#)).unwrap();
    assert!(list.is_object());

    let text = container.text_content().unwrap();
    assert_eq!(text, format!("a{}b", "\u{a0}".repeat(11)));

    container.destroy().unwrap();
    assert_eq!(container.text_content().unwrap(), "a\tb");
}

#[wasm_bindgen_test]
fn test_option_round_trip() {
    let container = paragraph();
    container.refresh(&host(), JsValue::UNDEFINED).unwrap();

    container
        .option(JsValue::from_str("leaderMode"), JsValue::from_str("border"))
        .unwrap();
    let mode = container.option(JsValue::from_str("leaderMode"), JsValue::UNDEFINED).unwrap();
    assert_eq!(mode.as_string(), Some("border".to_string()));

    assert!(container.option(JsValue::from_str("bogus"), JsValue::UNDEFINED).is_err());
}

#[wasm_bindgen_test]
fn test_option_null_is_a_write() {
    let container = paragraph();
    container.refresh(&host(), json(r#"{"tabstops":"100px"}"#)).unwrap();

    let written = container.option(JsValue::from_str("tabstops"), JsValue::NULL).unwrap();
    assert!(written.is_null());
    let read = container.option(JsValue::from_str("tabstops"), JsValue::UNDEFINED).unwrap();
    assert!(read.is_null());
}

#[wasm_bindgen_test]
fn test_host_measures_non_pixel_lengths() {
    let container = paragraph();
    container.refresh(&host(), json(r#"{"tabstops":"1in right"}"#)).unwrap();
    assert!(container.refresh(&host(), json(r#"{"tabstops":"2in"}"#)).is_err());
}

#[wasm_bindgen_test]
fn test_resize_before_refresh_is_ignored() {
    let container = paragraph();
    assert!(container.notify_resize(&host()).unwrap().is_undefined());
}
