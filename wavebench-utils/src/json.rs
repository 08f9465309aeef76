use serde::{Deserialize, Serialize};
use serde_json::{to_string, to_value, Map, Value};

/// Serializes to compact JSON with object keys sorted recursively. Cached
/// records and stats files are written through this, so byte-equal files
/// imply equal payloads.
pub fn jsonify<T>(obj: &T) -> String
where
    T: Serialize,
{
    to_string(&sort_keys(
        &to_value(obj).expect("to_value failed on serializable object"),
    ))
    .expect("to_string failed on serializable object")
}

pub fn dejsonify<'a, T>(json_str: &'a str) -> serde_json::Result<T>
where
    T: Deserialize<'a>,
{
    serde_json::from_str::<T>(json_str)
}

fn sort_keys(json_value: &Value) -> Value {
    match json_value {
        Value::Object(obj) => {
            let mut keys: Vec<&String> = obj.keys().collect();
            keys.sort();
            let mut sorted_map = Map::new();
            for key in keys {
                if let Some(value) = obj.get(key) {
                    sorted_map.insert(key.clone(), sort_keys(value));
                }
            }
            Value::Object(sorted_map)
        }
        Value::Array(values) => Value::Array(values.iter().map(sort_keys).collect()),
        _ => json_value.clone(),
    }
}
