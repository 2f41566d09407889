//! WASM build test
//!
//! Checks that the JS-facing API can be constructed and driven in a browser.
#![cfg(target_arch = "wasm32")]

use overlay_highlighter::api::{combine_rects, Highlighter};
use overlay_highlighter::dom::ContentNode;
use overlay_highlighter::geometry::Rect;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn sample_content() -> JsValue {
    let content = ContentNode::element(
        "p",
        vec![ContentNode::text("This is some sample text for anchoring")],
    );
    serde_wasm_bindgen::to_value(&content).unwrap()
}

#[wasm_bindgen_test]
fn test_highlighter_creation() {
    let highlighter = Highlighter::new(JsValue::UNDEFINED);
    assert!(highlighter.is_ok());
}

#[wasm_bindgen_test]
fn test_highlight_from_offsets() {
    let highlighter = Highlighter::new(JsValue::UNDEFINED).unwrap();
    highlighter.set_content(sample_content()).unwrap();
    assert_eq!(highlighter.text_content(), "This is some sample text for anchoring");

    let id = highlighter
        .create_highlight_from_offsets(0, 12, JsValue::NULL, None)
        .unwrap();
    assert_eq!(highlighter.highlight_count(), 1);
    assert_eq!(highlighter.pointer_move(10.0, 8.0), Some(id));

    highlighter.remove_highlight(id);
    assert_eq!(highlighter.highlight_count(), 0);
}

#[wasm_bindgen_test]
fn test_invalid_offsets_are_rejected() {
    let highlighter = Highlighter::new(JsValue::UNDEFINED).unwrap();
    highlighter.set_content(sample_content()).unwrap();
    assert!(highlighter
        .create_highlight_from_offsets(5, 5, JsValue::NULL, None)
        .is_err());
}

#[wasm_bindgen_test]
fn test_combine_rects_export() {
    let rects = vec![
        Rect::new(0.0, 0.0, 50.0, 50.0),
        Rect::new(50.0, 0.0, 50.0, 50.0),
    ];
    let merged = combine_rects(serde_wasm_bindgen::to_value(&rects).unwrap()).unwrap();
    let merged: Vec<Rect> = serde_wasm_bindgen::from_value(merged).unwrap();
    assert_eq!(merged, vec![Rect::new(0.0, 0.0, 100.0, 50.0)]);
}
