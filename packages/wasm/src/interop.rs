//! JSON bridging between `JsValue` and `serde_json::Value`

use inkframe_editor::EngineError;
use serde_json::Value;
use wasm_bindgen::{JsCast, JsValue};

/// Structured-clone data to JSON. Anything JSON cannot represent becomes `Null`.
pub fn value_from_js(data: &JsValue) -> Value {
    js_sys::JSON::stringify(data)
        .ok()
        .and_then(|text| JsValue::from(text).as_string())
        .and_then(|text| serde_json::from_str(&text).ok())
        .unwrap_or(Value::Null)
}

pub fn value_to_js(value: &Value) -> Result<JsValue, JsValue> {
    let text = serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))?;
    js_sys::JSON::parse(&text)
}

pub fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    let value = serde_json::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))?;
    value_to_js(&value)
}

/// Human-readable text of a thrown JS value
pub fn describe_js_error(err: &JsValue) -> String {
    if let Some(error) = err.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    err.as_string().unwrap_or_else(|| format!("{:?}", err))
}

/// Wrap a thrown JS value from an engine call
pub fn engine_error(operation: &str, err: JsValue) -> EngineError {
    EngineError::new(format!("{} failed", operation)).with_details(describe_js_error(&err))
}
