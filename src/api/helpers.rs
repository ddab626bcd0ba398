//! Shared helpers for the WASM API
//!
//! Console logging macros and the conversions between JavaScript values,
//! JSON values and crate errors used by every exported method.

use crate::error::TabstopsError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ============================================================================
// Console Logging Functions
// ============================================================================

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn info(s: &str);

    #[wasm_bindgen(js_namespace = console)]
    fn error(s: &str);
}

// ============================================================================
// Logging Macros
// ============================================================================

/// Log an info message with [tabstops] prefix
#[macro_export]
macro_rules! wasm_info {
    ($($arg:tt)*) => {
        $crate::api::helpers::log_info(&format!($($arg)*))
    };
}

/// Log an error message with [tabstops] ❌ prefix
#[macro_export]
macro_rules! wasm_error {
    ($($arg:tt)*) => {
        $crate::api::helpers::log_error(&format!($($arg)*))
    };
}

pub fn log_info(msg: &str) {
    info(&format!("[tabstops] {}", msg));
}

pub fn log_error(msg: &str) {
    error(&format!("[tabstops] ❌ {}", msg));
}

// ============================================================================
// Serialization/Deserialization Helpers
// ============================================================================

/// Deserialize a value from JavaScript with automatic error handling
pub fn deserialize<T: DeserializeOwned>(value: JsValue, error_context: &str) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| {
        let msg = format!("{}: {}", error_context, e);
        log_error(&msg);
        JsValue::from_str(&msg)
    })
}

/// Serialize a value to JavaScript with automatic error handling
///
/// Maps become plain objects so results read naturally on the JS side.
pub fn serialize<T: Serialize>(value: &T, error_context: &str) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| {
            let msg = format!("{}: {}", error_context, e);
            log_error(&msg);
            JsValue::from_str(&msg)
        })
}

/// Optional JSON argument; `undefined` and `null` are absent
pub fn optional_json(value: JsValue, error_context: &str) -> Result<Option<serde_json::Value>, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(None);
    }
    deserialize(value, error_context).map(Some)
}

/// JSON argument where only `undefined` is absent; `null` is kept
pub fn defined_json(value: JsValue, error_context: &str) -> Result<Option<serde_json::Value>, JsValue> {
    if value.is_undefined() {
        return Ok(None);
    }
    if value.is_null() {
        return Ok(Some(serde_json::Value::Null));
    }
    deserialize(value, error_context).map(Some)
}

// ============================================================================
// Result Conversion Helpers
// ============================================================================

/// Convert a crate error to a JsValue, logging it first
pub fn to_js_error(context: &str, err: TabstopsError) -> JsValue {
    let msg = format!("{}: {}", context, err);
    log_error(&msg);
    JsValue::from_str(&msg)
}
