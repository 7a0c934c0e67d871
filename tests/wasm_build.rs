//! WASM build test
//!
//! Exercises the exported API through JS values in a browser.

#![cfg(target_arch = "wasm32")]

use humdrum_wasm::api::*;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const SCORE: &str = "**kern\t**kern\n*^\t*\n4c\t4e\t2g\n4d\t4f\t.\n*v\t*v\t*\n*-\t*-\n";

#[wasm_bindgen_test]
fn test_load_document() {
    let result = load_humdrum(SCORE, JsValue::UNDEFINED);
    assert!(result.is_ok());

    let summary: LoadSummary = serde_wasm_bindgen::from_value(result.unwrap()).unwrap();
    assert!(summary.valid);
    assert_eq!(summary.max_track, 2);
    assert_eq!(summary.strand_count, 3);
}

#[wasm_bindgen_test]
fn test_token_query() {
    load_humdrum(SCORE, JsValue::UNDEFINED).unwrap();
    assert!(get_token(2, 1).is_ok());
    assert!(get_token(40, 0).is_err());
}

#[wasm_bindgen_test]
fn test_info_and_export() {
    load_humdrum(SCORE, JsValue::UNDEFINED).unwrap();
    let info = get_info("track").unwrap();
    assert_eq!(info.lines().nth(2), Some("1.1\t1.2\t2"));
    assert!(get_info("bogus").is_err());

    let csv = export_csv(",").unwrap();
    assert!(csv.starts_with("**kern,**kern\n"));
    assert!(export_summary_json().unwrap().contains("\"maxTrack\": 2"));
}

#[wasm_bindgen_test]
fn test_line_texts() {
    load_humdrum(SCORE, JsValue::UNDEFINED).unwrap();
    let lines = get_line_texts().unwrap();
    assert_eq!(lines.length(), 6);
    assert_eq!(lines.get(1).as_string(), Some("*^\t*".to_string()));
}
