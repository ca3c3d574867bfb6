//! Conversion between native nested data and the registry [`Value`] tree.
//!
//! The native side is `serde_json::Value`, the dynamic tree most of the
//! ecosystem already speaks; anything `Serialize` reaches it through
//! `serde_json::to_value`. Arrays bind to [`Value::Sequence`], objects to
//! [`Value::Mapping`], numbers keep their integer/float distinction.
//!
//! Collections keyed by a mix of integer indices and names go through
//! [`bind_keyed`], which only produces a sequence when the keys are exactly
//! `0, 1, …, n-1` in that order.

use crate::value::{Mapping, Value};
use serde_json::{Map, Number};
use std::fmt;

/// Convert a native value into the registry tree.
pub fn bind(native: &serde_json::Value) -> Value {
    match native {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => bind_number(n),
        serde_json::Value::String(s) => Value::String(s.clone()),
        serde_json::Value::Array(items) => Value::Sequence(items.iter().map(bind).collect()),
        serde_json::Value::Object(map) => Value::Mapping(
            map.iter()
                .map(|(key, value)| (key.clone(), bind(value)))
                .collect(),
        ),
    }
}

/// Integers that fit in `i64` stay integers; everything else (floats, and
/// `u64` values above `i64::MAX`) becomes a float.
fn bind_number(n: &Number) -> Value {
    match n.as_i64() {
        Some(i) => Value::Integer(i),
        None => n.as_f64().map_or(Value::Null, Value::Float),
    }
}

/// Bind `native` into `target` entry by entry.
///
/// Each top-level entry of the source replaces the entry of the same key in
/// `target` (no recursive merging); keys the source does not mention are left
/// alone. Arrays contribute their elements under the keys `"0"`, `"1"`, …;
/// a lone scalar lands under `"0"`; `null` contributes nothing.
pub fn bind_into(target: &mut Mapping, native: &serde_json::Value) {
    match native {
        serde_json::Value::Null => {}
        serde_json::Value::Object(map) => {
            for (key, value) in map {
                target.insert(key.clone(), bind(value));
            }
        }
        serde_json::Value::Array(items) => {
            for (index, value) in items.iter().enumerate() {
                target.insert(index.to_string(), bind(value));
            }
        }
        scalar => {
            target.insert("0", bind(scalar));
        }
    }
}

/// Key of a native keyed collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Index(usize),
    Name(String),
}

impl From<usize> for Key {
    fn from(i: usize) -> Self {
        Key::Index(i)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Name(s.to_owned())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Name(s)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(i) => write!(f, "{i}"),
            Key::Name(name) => f.write_str(name),
        }
    }
}

/// True iff the keys are exactly `Index(0), Index(1), …` with no gaps, in
/// order. `Name("0")` is a name, not an index.
pub fn is_index_sequence<'a>(keys: impl IntoIterator<Item = &'a Key>) -> bool {
    keys.into_iter()
        .enumerate()
        .all(|(position, key)| *key == Key::Index(position))
}

/// Bind a keyed collection: a sequence when the keys are a pure `0..n-1`
/// index run, otherwise a mapping keyed by the keys' text.
pub fn bind_keyed<K, V, I>(entries: I) -> Value
where
    K: Into<Key>,
    V: Into<Value>,
    I: IntoIterator<Item = (K, V)>,
{
    let entries: Vec<(Key, Value)> = entries
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect();
    if is_index_sequence(entries.iter().map(|(k, _)| k)) {
        Value::Sequence(entries.into_iter().map(|(_, v)| v).collect())
    } else {
        Value::Mapping(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }
}

/// Convert a registry value back into a native value.
pub fn project(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Integer(i) => serde_json::Value::Number(Number::from(*i)),
        Value::Float(f) => Number::from_f64(*f).map_or(serde_json::Value::Null, serde_json::Value::Number),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Sequence(items) => serde_json::Value::Array(items.iter().map(project).collect()),
        Value::Mapping(map) => serde_json::Value::Object(project_mapping(map)),
    }
}

/// [`project`] for a mapping, keeping insertion order.
pub fn project_mapping(map: &Mapping) -> Map<String, serde_json::Value> {
    map.iter()
        .map(|(key, value)| (key.to_owned(), project(value)))
        .collect()
}
