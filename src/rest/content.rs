//! Cleanup of Flickr's JSON responses.

use serde_json::{Map, Value};

/// Flattens Flickr's `_content` wrappers, recursively.
///
/// An object whose only key is `_content` is replaced by that value; in any
/// other object `_content` is renamed `text`.
pub fn clean_content(value: Value) -> Value {
    match value {
        Value::Object(mut map) => {
            if map.len() == 1 && map.contains_key("_content") {
                return map
                    .remove("_content")
                    .map(clean_content)
                    .unwrap_or(Value::Null);
            }
            let cleaned: Map<String, Value> = map
                .into_iter()
                .map(|(k, v)| {
                    let k = if k == "_content" { "text".to_string() } else { k };
                    (k, clean_content(v))
                })
                .collect();
            Value::Object(cleaned)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(clean_content).collect()),
        other => other,
    }
}
