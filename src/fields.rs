//! Defensive access to tweet record fields.
//!
//! Tweet records come straight from the export JSON and any field may be
//! missing, `null`, or of an unexpected shape. Every lookup here returns a
//! default instead of failing.

use serde_json::Value;

/// Placeholder rendered for absent values.
pub const ABSENT: &str = "None";

/// Resolve a dotted path (`entities.user_mentions`) against a record.
///
/// Returns `None` as soon as a level is not an object or the key is absent.
#[must_use]
pub fn get<'a>(record: &'a Value, dotted_path: &str) -> Option<&'a Value> {
    dotted_path
        .split('.')
        .try_fold(record, |current, key| current.as_object()?.get(key))
}

/// Lookup with an explicit default.
#[must_use]
pub fn get_or<'a>(record: &'a Value, dotted_path: &str, default: &'a Value) -> &'a Value {
    get(record, dotted_path).unwrap_or(default)
}

/// String field, or `None` when absent or not a string.
#[must_use]
pub fn get_str<'a>(record: &'a Value, dotted_path: &str) -> Option<&'a str> {
    get(record, dotted_path).and_then(Value::as_str)
}

/// Non-empty string field. Empty strings count as absent.
#[must_use]
pub fn get_nonempty_str<'a>(record: &'a Value, dotted_path: &str) -> Option<&'a str> {
    get_str(record, dotted_path).filter(|s| !s.is_empty())
}

/// Boolean field with a default.
#[must_use]
pub fn get_bool(record: &Value, dotted_path: &str, default: bool) -> bool {
    get(record, dotted_path)
        .and_then(Value::as_bool)
        .unwrap_or(default)
}

/// Array field, empty when absent or not an array.
#[must_use]
pub fn get_array<'a>(record: &'a Value, dotted_path: &str) -> &'a [Value] {
    get(record, dotted_path)
        .and_then(Value::as_array)
        .map_or(&[], Vec::as_slice)
}

/// Render a scalar field as text.
///
/// Exports encode counts either as JSON numbers or as numeric strings; both
/// are rendered verbatim. Absent, `null` and non-scalar values render as
/// [`ABSENT`].
#[must_use]
pub fn scalar_text(record: &Value, dotted_path: &str) -> String {
    match get(record, dotted_path) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => ABSENT.to_string(),
    }
}

/// Identifier-like field: a non-empty string, or a number rendered
/// verbatim. Anything else counts as absent.
#[must_use]
pub fn get_nonempty_scalar(record: &Value, dotted_path: &str) -> Option<String> {
    match get(record, dotted_path)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// The record identifier: `id`, falling back to `id_str`.
#[must_use]
pub fn tweet_id(record: &Value) -> Option<String> {
    ["id", "id_str"]
        .iter()
        .find_map(|key| get_nonempty_scalar(record, key))
}
