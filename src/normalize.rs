//! Response-shape normalization for upstream list endpoints.
//!
//! The upstream API returns lists in three shapes: a plain array, a wrapper object
//! whose named field holds the array, or a map keyed by identifier. `normalize`
//! coerces all of them into one ordered record sequence and is total: a missing,
//! null or malformed payload yields an empty sequence, never an error. Anything
//! outside the three known shapes is an explicit, logged `Unrecognized` case.

use serde_json::{Map, Value};

/// One normalized row: a stable identifier plus the record's fields.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Record {
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn str_field(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(|v| v.as_str())
    }

    /// Numeric field read used by view aggregates; absent or non-numeric is zero.
    pub fn i64_field(&self, field: &str) -> i64 {
        self.get(field).and_then(|v| v.as_i64()).unwrap_or(0)
    }

    pub fn bool_field(&self, field: &str) -> bool {
        self.get(field).and_then(|v| v.as_bool()).unwrap_or(false)
    }
}

/// The recognized upstream response shapes, in match priority order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape<'a> {
    /// Direct array of records.
    List(&'a [Value]),
    /// Wrapper object: the named candidate field holds the array.
    Wrapped(&'a str, &'a [Value]),
    /// Object map from identifier keys to record values. Iteration order follows
    /// `serde_json::Map` and must only be relied on for display.
    Keyed(&'a Map<String, Value>),
    /// Null payload.
    Empty,
    /// Scalar or otherwise malformed payload; logged and treated as empty.
    Unrecognized,
}

/// Classify a raw payload against the caller's wrapper-key candidates, tried in
/// caller order. A candidate whose value is not an array is skipped, so a wrapper
/// key holding a scalar falls through to the keyed-map case.
pub fn classify<'a>(raw: &'a Value, wrapper_keys: &[&str]) -> Shape<'a> {
    match raw {
        Value::Array(items) => Shape::List(items),
        Value::Object(map) => {
            for cand in wrapper_keys {
                if let Some((key, Value::Array(items))) = map.get_key_value(*cand) {
                    return Shape::Wrapped(key.as_str(), items);
                }
            }
            Shape::Keyed(map)
        }
        Value::Null => Shape::Empty,
        _ => Shape::Unrecognized,
    }
}

/// Coerce `raw` into an ordered record sequence with default identifier handling
/// (the record's own `id`, then the keyed-map key, then a positional `row-{index}`).
pub fn normalize(raw: &Value, wrapper_keys: &[&str]) -> Vec<Record> {
    normalize_with_ids(raw, wrapper_keys, None, "row")
}

/// Like [`normalize`], with a per-call-site identifier policy: the record's own
/// `id` wins, then the designated `id_field` (e.g. `user_id`), then the keyed-map
/// key, then `{prefix}-{index}`. Positional identifiers are unique within one call
/// only and unstable across re-fetches; never use them as cache or matching keys.
pub fn normalize_with_ids(
    raw: &Value,
    wrapper_keys: &[&str],
    id_field: Option<&str>,
    id_prefix: &str,
) -> Vec<Record> {
    match classify(raw, wrapper_keys) {
        Shape::List(items) | Shape::Wrapped(_, items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| to_record(v, None, i, id_field, id_prefix))
            .collect(),
        Shape::Keyed(map) => map
            .iter()
            .enumerate()
            .map(|(i, (k, v))| to_record(v, Some(k), i, id_field, id_prefix))
            .collect(),
        Shape::Empty => Vec::new(),
        Shape::Unrecognized => {
            tracing::warn!(kind = value_kind(raw), "unrecognized upstream response shape");
            Vec::new()
        }
    }
}

fn to_record(value: &Value, map_key: Option<&str>, index: usize, id_field: Option<&str>, prefix: &str) -> Record {
    let fields = match value {
        Value::Object(m) => m.clone(),
        other => {
            // Non-object rows keep their value under a single field so the record
            // count still matches the payload.
            let mut m = Map::new();
            m.insert("value".to_string(), other.clone());
            m
        }
    };
    let id = fields
        .get("id")
        .and_then(id_string)
        .or_else(|| id_field.and_then(|f| fields.get(f)).and_then(id_string))
        .or_else(|| map_key.map(str::to_string))
        .unwrap_or_else(|| format!("{}-{}", prefix, index));
    Record { id, fields }
}

fn id_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn value_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
