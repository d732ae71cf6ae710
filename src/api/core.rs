//! WASM API for score transposition
//!
//! The loaded document lives in WASM memory; JavaScript loads it once, runs
//! transpositions against it and reads it back.

use std::sync::{Mutex, MutexGuard};

use lazy_static::lazy_static;
use wasm_bindgen::prelude::*;

use super::helpers::{deserialize, parse_settings, serialize, to_json, transpose_error};
use super::workspace::{EditorAction, Workspace};
use crate::models::document::Document;
use crate::transposition::{
    InstrumentRange, Interval, PartDefaults, TransposeDirection, TransposeSettings,
};
use crate::{wasm_error, wasm_info, wasm_log, wasm_warn};

// WASM-owned document storage (canonical source of truth)
lazy_static! {
    static ref WORKSPACE: Mutex<Workspace> = Mutex::new(Workspace::default());
}

fn workspace() -> Result<MutexGuard<'static, Workspace>, JsValue> {
    WORKSPACE.lock().map_err(|_| {
        wasm_error!("Workspace lock poisoned");
        JsValue::from_str("Workspace lock poisoned")
    })
}

/// Parse optional settings JSON passed alongside an operation
fn call_settings(settings_json: Option<String>) -> Result<Option<TransposeSettings>, JsValue> {
    let settings = parse_settings(settings_json).map_err(transpose_error)?;
    if let Some(settings) = &settings {
        wasm_log!("  settings: {:?}", settings);
    }
    Ok(settings)
}

/// Load a document from JavaScript into WASM's internal storage
#[wasm_bindgen(js_name = loadDocument)]
pub fn load_document(document_js: JsValue) -> Result<(), JsValue> {
    wasm_info!("loadDocument called");

    let doc: Document = deserialize(document_js, "Document deserialization error")?;
    workspace()?.load(doc);

    wasm_info!("loadDocument completed successfully");
    Ok(())
}

/// Load a document given as a JSON string
#[wasm_bindgen(js_name = loadDocumentJson)]
pub fn load_document_json(json: &str) -> Result<(), JsValue> {
    wasm_info!("loadDocumentJson called ({} bytes)", json.len());
    workspace()?.load_json(json).map_err(transpose_error)
}

/// Get current document snapshot from WASM's internal storage
#[wasm_bindgen(js_name = getDocument)]
pub fn get_document() -> Result<JsValue, JsValue> {
    let guard = workspace()?;
    match guard.document() {
        Some(doc) => serialize(doc, "Document serialization error"),
        None => {
            wasm_warn!("No document loaded");
            Err(JsValue::from_str("No document loaded"))
        }
    }
}

/// Get current document as a JSON string
#[wasm_bindgen(js_name = getDocumentJson)]
pub fn get_document_json() -> Result<String, JsValue> {
    workspace()?.document_json().map_err(transpose_error)
}

/// Replace the session settings
#[wasm_bindgen(js_name = setTransposeSettings)]
pub fn set_transpose_settings(settings_json: &str) -> Result<(), JsValue> {
    let settings = parse_settings(Some(settings_json.to_string())).map_err(transpose_error)?;
    let mut guard = workspace()?;
    if let Some(settings) = settings {
        wasm_log!("  settings: {:?}", settings);
        guard.set_settings(settings);
    }
    Ok(())
}

/// Transpose the whole document to a new key
///
/// # Parameters
/// - `new_fifths`: target key, -7 (7 flats) to 7 (7 sharps)
/// - `direction`: optional "none", "up", "down" or "closest"
/// - `settings_json`: optional settings used for this call only; the session
///   keeps its own (see `setTransposeSettings`)
///
/// # Returns
/// JSON `{"fifths":n,"interval":{...},"history":h}`
#[wasm_bindgen(js_name = transposeToKey)]
pub fn transpose_to_key(
    new_fifths: i32,
    direction: Option<String>,
    settings_json: Option<String>,
) -> Result<String, JsValue> {
    wasm_info!("transposeToKey called: new_fifths={}, direction={:?}", new_fifths, direction);

    let direction = match direction {
        Some(name) => Some(
            serde_json::from_value::<TransposeDirection>(serde_json::Value::String(name.clone()))
                .map_err(|_| JsValue::from_str(&format!("Unknown direction '{}'", name)))?,
        ),
        None => None,
    };

    let settings = call_settings(settings_json)?;
    let mut guard = workspace()?;
    let result = guard
        .apply_with_settings(
            EditorAction::TransposeToKey {
                new_fifths,
                direction,
            },
            settings,
        )
        .map_err(transpose_error)?;
    to_json(&result, "ActionResult serialization error")
}

/// Transpose one staff by an interval
#[wasm_bindgen(js_name = transposeInterval)]
pub fn transpose_interval(
    diatonic: i32,
    chromatic: i32,
    staff_n: u32,
    settings_json: Option<String>,
) -> Result<String, JsValue> {
    wasm_info!(
        "transposeInterval called: ({}, {}) on staff {}",
        diatonic,
        chromatic,
        staff_n
    );

    let settings = call_settings(settings_json)?;
    let mut guard = workspace()?;
    let result = guard
        .apply_with_settings(
            EditorAction::TransposeInterval {
                diatonic,
                chromatic,
                staff_n,
            },
            settings,
        )
        .map_err(transpose_error)?;
    to_json(&result, "ActionResult serialization error")
}

/// Semitones to add to `interval` so that a staff fits an instrument range
///
/// # Parameters
/// - `range_js`: `{"comfortable":{"low":l,"high":h},"professional":{...}}`
///   in absolute pitch (C4 = 48)
#[wasm_bindgen(js_name = getPartTransposition)]
pub fn get_part_transposition(
    diatonic: i32,
    chromatic: i32,
    staff_n: u32,
    range_js: JsValue,
    multi_staff: bool,
) -> Result<i32, JsValue> {
    let range: InstrumentRange = deserialize(range_js, "InstrumentRange deserialization error")?;
    let guard = workspace()?;
    let doc = guard.document().ok_or_else(|| JsValue::from_str("No document loaded"))?;
    guard
        .session()
        .part_transposition(doc, Interval::new(diatonic, chromatic), staff_n, &range, multi_staff)
        .map_err(transpose_error)
}

/// Change the instrument of the given staves
#[wasm_bindgen(js_name = changePart)]
pub fn change_part(staff_ns: Vec<u32>, defaults_js: JsValue) -> Result<String, JsValue> {
    wasm_info!("changePart called: staves {:?}", staff_ns);

    let defaults: PartDefaults = deserialize(defaults_js, "PartDefaults deserialization error")?;
    let result = workspace()?
        .apply(EditorAction::ChangePart { staff_ns, defaults })
        .map_err(transpose_error)?;
    to_json(&result, "ActionResult serialization error")
}

/// Concert key of the loaded document as `{"fifths": n}`
#[wasm_bindgen(js_name = getKeySignature)]
pub fn get_key_signature() -> Result<String, JsValue> {
    let info = workspace()?.key_signature().map_err(transpose_error)?;
    to_json(&info, "Key signature serialization error")
}

/// Written key signature of every staff definition, in document order, as
/// MEI tokens ("2s", "3f", "mixed"); `null` for a staff without a key
#[wasm_bindgen(js_name = getStaffKeySignatures)]
pub fn get_staff_key_signatures() -> Result<js_sys::Array, JsValue> {
    let guard = workspace()?;
    let doc = guard.document().ok_or_else(|| JsValue::from_str("No document loaded"))?;

    let result = js_sys::Array::new();
    for def in &doc.score_def.staff_defs {
        match def.key_sig {
            Some(key) => result.push(&JsValue::from_str(&key.to_string())),
            None => result.push(&JsValue::NULL),
        };
    }
    Ok(result)
}

/// Run an editor action given as JSON, e.g.
/// `{"action":"transposeToKey","param":{"newFifths":2}}`
#[wasm_bindgen(js_name = editAction)]
pub fn edit_action(action_json: &str) -> Result<String, JsValue> {
    wasm_info!("editAction called: {}", action_json);

    let result = workspace()?.apply_json(action_json).map_err(transpose_error)?;
    to_json(&result, "ActionResult serialization error")
}
