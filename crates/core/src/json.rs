//! Canonical JSON encoding for [`Value`].
//!
//! Envelopes travel as JSON, but JSON has no representation for a few
//! values the record model carries:
//!
//! | Type | JSON Representation |
//! |------|---------------------|
//! | Bytes | `{"$bytes": "<base64>"}` |
//! | NaN | `{"$f64": "NaN"}` |
//! | +Infinity | `{"$f64": "+Inf"}` |
//! | -Infinity | `{"$f64": "-Inf"}` |
//! | -0.0 | `{"$f64": "-0.0"}` |
//! | Object with one `$`-prefixed key | `{"$object": {...}}` |
//!
//! The last row escapes caller objects that would otherwise read back as a
//! marker, so any content survives the trip unchanged. Everything else maps onto the obvious JSON type, so an exported envelope
//! remains readable by tools that know nothing about this crate.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::value::{Content, Value};

/// Marker key for base64-encoded bytes
pub const BYTES_KEY: &str = "$bytes";

/// Marker key for floats JSON numbers cannot express
pub const FLOAT_KEY: &str = "$f64";

/// Marker key wrapping an object that would otherwise look like a marker
pub const OBJECT_KEY: &str = "$object";

/// Convert a Value to a JSON value with special encoding.
pub fn value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Int(i) => JsonValue::Number((*i).into()),
        Value::Float(f) => float_to_json(*f),
        Value::String(s) => JsonValue::String(s.clone()),
        Value::Bytes(b) => serde_json::json!({ BYTES_KEY: BASE64.encode(b) }),
        Value::Array(arr) => JsonValue::Array(arr.iter().map(value_to_json).collect()),
        Value::Object(map) => {
            let obj: serde_json::Map<String, JsonValue> = map
                .iter()
                .map(|(k, v)| (k.clone(), value_to_json(v)))
                .collect();
            if needs_escape(map) {
                let mut wrapper = serde_json::Map::new();
                wrapper.insert(OBJECT_KEY.to_string(), JsonValue::Object(obj));
                JsonValue::Object(wrapper)
            } else {
                JsonValue::Object(obj)
            }
        }
    }
}

fn needs_escape(map: &HashMap<String, Value>) -> bool {
    map.len() == 1 && map.keys().all(|k| k.starts_with('$'))
}

/// Convert a JSON value to a Value, recognizing special encodings.
pub fn json_to_value(json: &JsonValue) -> Result<Value> {
    match json {
        JsonValue::Null => Ok(Value::Null),
        JsonValue::Bool(b) => Ok(Value::Bool(*b)),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Int(i))
            } else if let Some(f) = n.as_f64() {
                Ok(Value::Float(f))
            } else {
                Err(Error::Serialization(format!("invalid number: {}", n)))
            }
        }
        JsonValue::String(s) => Ok(Value::String(s.clone())),
        JsonValue::Array(arr) => Ok(Value::Array(
            arr.iter().map(json_to_value).collect::<Result<_>>()?,
        )),
        JsonValue::Object(obj) => {
            if obj.len() == 1 {
                if let Some(JsonValue::String(encoded)) = obj.get(BYTES_KEY) {
                    let decoded = BASE64
                        .decode(encoded)
                        .map_err(|e| Error::Serialization(format!("invalid base64: {}", e)))?;
                    return Ok(Value::Bytes(decoded));
                }
                if let Some(JsonValue::String(s)) = obj.get(FLOAT_KEY) {
                    return special_float_from_str(s).map(Value::Float);
                }
                if let Some(JsonValue::Object(inner)) = obj.get(OBJECT_KEY) {
                    return plain_object(inner);
                }
            }
            plain_object(obj)
        }
    }
}

fn plain_object(obj: &serde_json::Map<String, JsonValue>) -> Result<Value> {
    let map = obj
        .iter()
        .map(|(k, v)| json_to_value(v).map(|val| (k.clone(), val)))
        .collect::<Result<HashMap<_, _>>>()?;
    Ok(Value::Object(map))
}

/// Encode a whole content mapping as a JSON object.
pub fn content_to_json(content: &Content) -> serde_json::Map<String, JsonValue> {
    content
        .iter()
        .map(|(k, v)| (k.clone(), value_to_json(v)))
        .collect()
}

/// Decode a JSON object into a content mapping.
pub fn json_to_content(map: &serde_json::Map<String, JsonValue>) -> Result<Content> {
    map.iter()
        .map(|(k, v)| json_to_value(v).map(|val| (k.clone(), val)))
        .collect()
}

fn float_to_json(f: f64) -> JsonValue {
    if f.is_nan() {
        serde_json::json!({ FLOAT_KEY: "NaN" })
    } else if f.is_infinite() {
        if f.is_sign_positive() {
            serde_json::json!({ FLOAT_KEY: "+Inf" })
        } else {
            serde_json::json!({ FLOAT_KEY: "-Inf" })
        }
    } else if f == 0.0 && f.is_sign_negative() {
        serde_json::json!({ FLOAT_KEY: "-0.0" })
    } else {
        serde_json::Number::from_f64(f)
            .map(JsonValue::Number)
            .unwrap_or_else(|| serde_json::json!({ FLOAT_KEY: f.to_string() }))
    }
}

fn special_float_from_str(s: &str) -> Result<f64> {
    match s {
        "NaN" => Ok(f64::NAN),
        "+Inf" => Ok(f64::INFINITY),
        "-Inf" => Ok(f64::NEG_INFINITY),
        "-0.0" => Ok(-0.0_f64),
        other => other
            .parse::<f64>()
            .map_err(|e| Error::Serialization(format!("invalid float '{}': {}", other, e))),
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value_to_json(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let json = JsonValue::deserialize(deserializer)?;
        json_to_value(&json).map_err(de::Error::custom)
    }
}
