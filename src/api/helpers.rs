//! Shared helpers for the WASM API
//!
//! Serialization across the JS boundary and conversion of crate errors
//! into `JsValue`s.

use crate::error::HighlightError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Deserialize a value from JavaScript, logging failures
pub fn deserialize<T: DeserializeOwned>(value: JsValue, error_context: &str) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| {
        let msg = format!("{}: {}", error_context, e);
        log::error!("{}", msg);
        JsValue::from_str(&msg)
    })
}

/// Deserialize an optional argument; `undefined` and `null` give the default
pub fn deserialize_or_default<T: DeserializeOwned + Default>(
    value: JsValue,
    error_context: &str,
) -> Result<T, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    deserialize(value, error_context)
}

/// Serialize a value for JavaScript, logging failures
///
/// Maps serialize as plain objects so JSON data reaches JS unchanged.
pub fn serialize<T: Serialize>(value: &T, error_context: &str) -> Result<JsValue, JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::new().serialize_maps_as_objects(true);
    value.serialize(&serializer).map_err(|e| {
        let msg = format!("{}: {}", error_context, e);
        log::error!("{}", msg);
        JsValue::from_str(&msg)
    })
}

pub fn to_js_error(error: HighlightError) -> JsValue {
    let msg = error.to_string();
    log::warn!("{}", msg);
    JsValue::from_str(&msg)
}

/// Validate a flat text range against the indexed text length
pub fn validate_text_range(start: usize, end: usize, len: usize) -> Result<(), String> {
    if start >= end {
        return Err(format!("Invalid text range: start {} >= end {}", start, end));
    }
    if end > len {
        return Err(format!("Text range end {} out of bounds (length {})", end, len));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_text_range() {
        assert!(validate_text_range(0, 4, 10).is_ok());
        assert!(validate_text_range(4, 4, 10).is_err());
        assert!(validate_text_range(2, 11, 10).is_err());
    }
}
