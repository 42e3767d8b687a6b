//! Role and flag columns are stored as integer 0/1, but the frontend submits
//! whatever its form state holds: booleans, numbers, strings or nothing.
//! Coercion follows browser truthiness.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Whether `value` is truthy by JavaScript rules.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Serde adapter: any JSON value (or an absent field, with `#[serde(default)]`)
/// becomes exactly `0` or `1`.
pub fn deserialize<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map_or(0, |v| i32::from(is_truthy(v))))
}
