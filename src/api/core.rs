//! WASM API for loading and querying a document
//!
//! The most recently loaded file is kept in WASM memory; queries read from it.

use wasm_bindgen::prelude::*;
use std::sync::Mutex;
use lazy_static::lazy_static;

use crate::api::helpers::{api_error, deserialize_or_default, serialize};
use crate::api::types::{InfoKind, LoadSummary};
use crate::models::{ParseOptions, TokenId};
use crate::renderers::{self, LineSummary, TokenSummary};
use crate::structure::HumdrumFile;
use crate::{wasm_info, wasm_warn};

// WASM-owned document storage (canonical source of truth)
lazy_static! {
    static ref DOCUMENT: Mutex<Option<HumdrumFile>> = Mutex::new(None);
}

// ============================================================================
// Document access (pure Rust, no JsValue)
// ============================================================================

/// Parse `text` and store it as the current document.
pub fn load_document(text: &str, options: ParseOptions) -> Result<LoadSummary, String> {
    let file = HumdrumFile::parse_with(text, options);
    let summary = LoadSummary::from(&file);
    log::info!(
        "loaded document: {} lines, {} tracks, valid={}",
        summary.line_count,
        summary.max_track,
        summary.valid
    );
    let mut slot = DOCUMENT.lock().map_err(|e| format!("Document lock poisoned: {}", e))?;
    *slot = Some(file);
    Ok(summary)
}

/// Run `f` against the current document.
pub fn with_document<T>(f: impl FnOnce(&HumdrumFile) -> Result<T, String>) -> Result<T, String> {
    let slot = DOCUMENT.lock().map_err(|e| format!("Document lock poisoned: {}", e))?;
    match slot.as_ref() {
        Some(file) => f(file),
        None => Err("No document loaded".to_string()),
    }
}

fn token_summary(file: &HumdrumFile, line: usize, field: usize) -> Result<TokenSummary, String> {
    file.token_at(line, field)
        .map(TokenSummary::from)
        .ok_or_else(|| format!("No token at line {}, field {}", line, field))
}

fn line_timing(file: &HumdrumFile, line: usize) -> Result<LineSummary, String> {
    file.line(line)
        .map(LineSummary::timing)
        .ok_or_else(|| format!("No line {}", line))
}

fn render_info(file: &HumdrumFile, kind: InfoKind) -> String {
    match kind {
        InfoKind::Spine => renderers::spine_info(file),
        InfoKind::Track => renderers::track_info(file),
        InfoKind::DataType => renderers::data_type_info(file),
        InfoKind::Duration => renderers::duration_info(file),
    }
}

// ============================================================================
// Exported functions
// ============================================================================

/// Parse a document and keep it for later queries
///
/// # Parameters
/// - `text`: tab-separated (or CSV, per options) document text
/// - `options_js`: optional `ParseOptions` object
///
/// # Returns
/// A `LoadSummary`; analysis errors are reported in it, not thrown
#[wasm_bindgen(js_name = loadHumdrum)]
pub fn load_humdrum(text: &str, options_js: JsValue) -> Result<JsValue, JsValue> {
    let options: ParseOptions = deserialize_or_default(options_js, "Invalid parse options")?;
    let summary = load_document(text, options).map_err(api_error)?;
    if summary.valid {
        wasm_info!("loadHumdrum: {} lines, {} tracks", summary.line_count, summary.max_track);
    } else {
        wasm_warn!("loadHumdrum: {}", summary.error);
    }
    serialize(&summary, "Serialization error")
}

/// Text of every line, in order
#[wasm_bindgen(js_name = getLineTexts)]
pub fn get_line_texts() -> Result<js_sys::Array, JsValue> {
    let texts: Vec<String> = with_document(|file| {
        Ok(file.lines().iter().map(|line| line.text().to_string()).collect())
    })
    .map_err(api_error)?;
    Ok(texts.iter().map(|text| JsValue::from_str(text)).collect())
}

#[wasm_bindgen(js_name = getToken)]
pub fn get_token(line: usize, field: usize) -> Result<JsValue, JsValue> {
    let token = with_document(|file| token_summary(file, line, field)).map_err(api_error)?;
    serialize(&token, "Serialization error")
}

#[wasm_bindgen(js_name = getTrackStarts)]
pub fn get_track_starts() -> Result<JsValue, JsValue> {
    let starts: Vec<TokenId> = with_document(|file| Ok(file.spine_start_list())).map_err(api_error)?;
    serialize(&starts, "Serialization error")
}

#[wasm_bindgen(js_name = getStrands)]
pub fn get_strands() -> Result<JsValue, JsValue> {
    let strands = with_document(|file| Ok(file.strands().to_vec())).map_err(api_error)?;
    serialize(&strands, "Serialization error")
}

#[wasm_bindgen(js_name = getLineTiming)]
pub fn get_line_timing(line: usize) -> Result<JsValue, JsValue> {
    let timing = with_document(|file| line_timing(file, line)).map_err(api_error)?;
    serialize(&timing, "Serialization error")
}

/// Render a diagnostic table: `spine`, `track`, `dataType` or `duration`
#[wasm_bindgen(js_name = getInfo)]
pub fn get_info(kind: &str) -> Result<String, JsValue> {
    let kind = InfoKind::parse(kind).ok_or_else(|| api_error(format!("Unknown info kind: {}", kind)))?;
    with_document(|file| Ok(render_info(file, kind))).map_err(api_error)
}

#[wasm_bindgen(js_name = exportCsv)]
pub fn export_csv(separator: &str) -> Result<String, JsValue> {
    with_document(|file| Ok(renderers::to_csv(file, separator))).map_err(api_error)
}

#[wasm_bindgen(js_name = exportSummaryJson)]
pub fn export_summary_json() -> Result<String, JsValue> {
    with_document(|file| renderers::to_summary_json(file).map_err(|e| e.to_string()))
        .map_err(api_error)
}
