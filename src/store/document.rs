//! Document field access
//!
//! Documents are JSON objects identified by a unique string `_id`. Field
//! names may be dotted paths into nested objects (`profile.city`).

use serde_json::Value;

/// Unique identifier field present on every stored document
pub const ID_FIELD: &str = "_id";

/// Look up a possibly dotted field path
pub fn field_value<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    if let Some(direct) = document.get(path) {
        return Some(direct);
    }
    if !path.contains('.') {
        return None;
    }

    let mut current = document;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// The document's identifier, if it is a string
pub fn document_id(document: &Value) -> Option<&str> {
    document.get(ID_FIELD).and_then(Value::as_str)
}
