//! Browser-side checks for values crossing the JS boundary.
//! Run with `wasm-pack test --headless --chrome`.
#![cfg(target_arch = "wasm32")]

use tab_group_history::chrome::{from_js, to_json};
use tab_group_history::event::{GroupColor, GroupId, GroupSnapshot, TabChanges, TabSnapshot};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn js_object(json: &str) -> JsValue {
    js_sys::JSON::parse(json).unwrap()
}

#[wasm_bindgen_test]
fn test_undefined_storage_reads_as_null() {
    assert_eq!(to_json(JsValue::UNDEFINED).unwrap(), serde_json::Value::Null);
}

#[wasm_bindgen_test]
fn test_decode_chrome_tab() {
    let tab: TabSnapshot = from_js(js_object(
        r#"{"id": 12, "url": "https://docs.rs", "title": "Docs.rs", "groupId": -1,
            "pinned": false, "index": 3, "windowId": 1}"#,
    ))
    .unwrap();

    assert_eq!(tab.id, 12);
    assert_eq!(tab.group_id, GroupId::NONE);
}

#[wasm_bindgen_test]
fn test_decode_chrome_group() {
    let group: GroupSnapshot = from_js(js_object(
        r#"{"id": 4, "title": "", "color": "cyan", "collapsed": false, "windowId": 1}"#,
    ))
    .unwrap();

    assert_eq!(group.color, GroupColor::Cyan);
    assert_eq!(group.display_title(), "Group 4");
}

#[wasm_bindgen_test]
fn test_decode_change_info() {
    let changes: TabChanges = from_js(js_object(r#"{"favIconUrl": "https://docs.rs/favicon.ico"}"#)).unwrap();
    assert!(!changes.is_recordable());
}

#[wasm_bindgen_test]
fn test_missing_tab_is_decode_error() {
    assert!(from_js::<TabSnapshot>(JsValue::NULL).is_err());
}

#[wasm_bindgen_test]
fn test_change_info_keeps_other_keys() {
    let changes: TabChanges =
        from_js(js_object(r#"{"title": "x", "mutedInfo": {"muted": true}, "discarded": false}"#))
            .unwrap();
    assert!(changes.is_recordable());
    assert_eq!(changes.other["mutedInfo"]["muted"], true);
    assert_eq!(changes.other["discarded"], false);
}
