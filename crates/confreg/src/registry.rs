//! The [`Registry`] container: a root mapping plus path access, loading,
//! rendering and merging.

use crate::binder;
use crate::error::{RegistryError, Result};
use crate::format::{Format, Options};
use crate::merge;
use crate::path::{self, DEFAULT_SEPARATOR};
use crate::value::{Iter, Mapping, Value};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

/// A tree of named values addressed by separator-delimited paths.
///
/// The root is always a mapping. Cloning a registry copies the whole tree;
/// two registries never share nodes.
///
/// ```
/// use confreg::Registry;
///
/// let mut registry = Registry::new();
/// registry.set("database.host", "localhost");
/// registry.set("database.port", 5432);
///
/// assert!(registry.exists("database.host"));
/// assert_eq!(registry.get("database.port").and_then(|v| v.as_i64()), Some(5432));
/// assert_eq!(
///     registry.to_string(),
///     r#"{"database":{"host":"localhost","port":5432}}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Registry {
    data: Mapping,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from native data (see [`Registry::load_array`]).
    pub fn from_native(native: &serde_json::Value) -> Self {
        let mut registry = Self::new();
        registry.load_array(native);
        registry
    }

    /// Build a registry from any serializable value (see [`Registry::load_object`]).
    pub fn from_object<T: Serialize + ?Sized>(object: &T) -> Result<Self> {
        let mut registry = Self::new();
        registry.load_object(object)?;
        Ok(registry)
    }

    /// Parse `text` in a named format.
    pub fn from_text(text: &str, format: Format, options: &Options) -> Result<Self> {
        let mut registry = Self::new();
        registry.load_string(text, format, options)?;
        Ok(registry)
    }

    /// The root mapping, read-only.
    pub fn as_mapping(&self) -> &Mapping {
        &self.data
    }

    pub fn into_mapping(self) -> Mapping {
        self.data
    }

    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Top-level entries in insertion order.
    pub fn iter(&self) -> Iter<'_> {
        self.data.iter()
    }

    // ------------------------------------------------------------------------
    // Path access
    // ------------------------------------------------------------------------

    /// Value at `path`, or `None` when any segment is missing.
    pub fn get(&self, path: &str) -> Option<&Value> {
        self.get_with_separator(path, DEFAULT_SEPARATOR)
    }

    pub fn get_with_separator(&self, path: &str, separator: &str) -> Option<&Value> {
        path::get(&self.data, path, separator)
    }

    /// Value at `path`, or `default` when it is missing.
    pub fn get_or(&self, path: &str, default: impl Into<Value>) -> Value {
        self.get_or_with_separator(path, default, DEFAULT_SEPARATOR)
    }

    pub fn get_or_with_separator(
        &self,
        path: &str,
        default: impl Into<Value>,
        separator: &str,
    ) -> Value {
        self.get_with_separator(path, separator)
            .cloned()
            .unwrap_or_else(|| default.into())
    }

    /// True if `path` holds an entry, even a `Null` one.
    pub fn exists(&self, path: &str) -> bool {
        self.exists_with_separator(path, DEFAULT_SEPARATOR)
    }

    pub fn exists_with_separator(&self, path: &str, separator: &str) -> bool {
        path::exists(&self.data, path, separator)
    }

    /// Store `value` at `path` and return it.
    ///
    /// Missing intermediate nodes are created as mappings. An intermediate
    /// node that is *not* a mapping is silently replaced by an empty one,
    /// losing its old value.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> &Value {
        self.set_with_separator(path, value, DEFAULT_SEPARATOR)
    }

    pub fn set_with_separator(
        &mut self,
        path: &str,
        value: impl Into<Value>,
        separator: &str,
    ) -> &Value {
        path::set(&mut self.data, path, value.into(), separator)
    }

    /// Get-or-initialize: store `default` only when `path` is absent, then
    /// return whatever `path` holds.
    pub fn def(&mut self, path: &str, default: impl Into<Value>) -> &Value {
        self.def_with_separator(path, default, DEFAULT_SEPARATOR)
    }

    pub fn def_with_separator(
        &mut self,
        path: &str,
        default: impl Into<Value>,
        separator: &str,
    ) -> &Value {
        path::def(&mut self.data, path, default.into(), separator)
    }

    /// Push `value` onto the sequence at `path`, creating the sequence (and
    /// replacing any non-sequence value) when needed.
    pub fn append(&mut self, path: &str, value: impl Into<Value>) -> &Value {
        self.append_with_separator(path, value, DEFAULT_SEPARATOR)
    }

    pub fn append_with_separator(
        &mut self,
        path: &str,
        value: impl Into<Value>,
        separator: &str,
    ) -> &Value {
        path::append(&mut self.data, path, value.into(), separator)
    }

    /// Remove and return the node at `path`.
    pub fn remove(&mut self, path: &str) -> Option<Value> {
        self.remove_with_separator(path, DEFAULT_SEPARATOR)
    }

    pub fn remove_with_separator(&mut self, path: &str, separator: &str) -> Option<Value> {
        path::remove(&mut self.data, path, separator)
    }

    /// A new, independent registry rooted at the mapping under `path`.
    pub fn extract(&self, path: &str) -> Option<Registry> {
        let map = self.get(path)?.as_mapping()?;
        Some(Registry { data: map.clone() })
    }

    /// Every leaf keyed by its full path.
    pub fn flatten(&self, separator: &str) -> Mapping {
        path::flatten(&self.data, separator)
    }

    // ------------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------------

    /// Bind native data into the root. Each top-level entry replaces the
    /// entry of the same key; other keys are kept.
    pub fn load_array(&mut self, native: &serde_json::Value) -> &mut Self {
        binder::bind_into(&mut self.data, native);
        self
    }

    /// Bind any serializable value into the root, like [`Registry::load_array`].
    pub fn load_object<T: Serialize + ?Sized>(&mut self, object: &T) -> Result<&mut Self> {
        let native = serde_json::to_value(object)?;
        Ok(self.load_array(&native))
    }

    /// Parse `text` and shallow-merge it into the root: loaded keys are added
    /// or overwritten, keys the text does not mention are kept.
    ///
    /// On a parse error the registry is left untouched.
    pub fn load_string(&mut self, text: &str, format: Format, options: &Options) -> Result<&mut Self> {
        let parsed = format.parse(text, options)?;
        debug!(
            format = %format,
            bytes = text.len(),
            keys = parsed.len(),
            process_sections = options.process_sections,
            "loaded registry text"
        );
        merge::merge(&mut self.data, &parsed, false);
        Ok(self)
    }

    /// Read a file and hand its contents to [`Registry::load_string`].
    ///
    /// Without an explicit format the extension decides: `.json` is JSON,
    /// everything else INI.
    pub fn load_file(
        &mut self,
        file: impl AsRef<Path>,
        format: Option<Format>,
        options: &Options,
    ) -> Result<&mut Self> {
        let file = file.as_ref();
        let format = format.unwrap_or_else(|| Format::from_path(file));
        debug!(path = %file.display(), format = %format, "loading registry file");
        let text = std::fs::read_to_string(file).map_err(|source| RegistryError::Io {
            path: file.to_path_buf(),
            source,
        })?;
        self.load_string(&text, format, options)
    }

    // ------------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------------

    /// The tree as native data (mappings become JSON objects).
    pub fn to_native(&self) -> serde_json::Value {
        serde_json::Value::Object(binder::project_mapping(&self.data))
    }

    /// The tree deserialized into any matching type.
    pub fn to_object<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.to_native())?)
    }

    /// Render the tree in `format`.
    pub fn to_string_as(&self, format: Format, options: &Options) -> Result<String> {
        format.render(&self.data, options)
    }

    // ------------------------------------------------------------------------
    // Merging
    // ------------------------------------------------------------------------

    /// Layer `source` over this registry. See [`crate::merge`] for the rules.
    pub fn merge(&mut self, source: &Registry, recursive: bool) -> &mut Self {
        debug!(keys = source.len(), recursive, "merging registry");
        merge::merge(&mut self.data, &source.data, recursive);
        self
    }

    /// Layer an arbitrary value over this registry. Anything other than a
    /// mapping is rejected and leaves the registry untouched.
    pub fn merge_value(&mut self, source: &Value, recursive: bool) -> Result<&mut Self> {
        let Value::Mapping(map) = source else {
            warn!(found = source.kind(), "rejected merge of non-mapping value");
            return Err(RegistryError::MergeSource {
                found: source.kind(),
            });
        };
        debug!(keys = map.len(), recursive, "merging value");
        merge::merge(&mut self.data, map, recursive);
        Ok(self)
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = (&'a str, &'a Value);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl From<Mapping> for Registry {
    fn from(data: Mapping) -> Self {
        Registry { data }
    }
}

impl From<serde_json::Value> for Registry {
    fn from(native: serde_json::Value) -> Self {
        Registry::from_native(&native)
    }
}

/// Bare text with no named format: sniffed, JSON when it starts with `{`
/// or `[`, INI otherwise.
impl FromStr for Registry {
    type Err = RegistryError;

    fn from_str(text: &str) -> Result<Self> {
        Registry::from_text(text, Format::sniff(text), &Options::default())
    }
}

/// Compact JSON, identical to `to_string_as(Format::Json, ..)`.
impl fmt::Display for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = self
            .to_string_as(Format::Json, &Options::default())
            .map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_returns_new_value() {
        let mut registry = Registry::new();
        registry.set("foo", "testsetvalue1");
        assert_eq!(registry.set("foo", "testsetvalue2"), "testsetvalue2");
    }

    #[test]
    fn get_or_falls_back() {
        let registry = Registry::new();
        assert_eq!(registry.get_or("xxx.yyy", 5), Value::Integer(5));
        assert_eq!(registry.get("xxx.yyy"), None);
    }

    #[test]
    fn get_or_with_separator_uses_custom_separator() {
        let mut registry = Registry::new();
        registry.set_with_separator("a/b.c", "v", "/");
        assert_eq!(registry.get_or_with_separator("a/b.c", "d", "/"), Value::from("v"));
        assert_eq!(registry.get_or_with_separator("a/missing", "d", "/"), Value::from("d"));
        assert_eq!(registry.get_or("a.b.c", 0), Value::Integer(0));
    }

    #[test]
    fn extract_is_independent() {
        let mut registry = Registry::new();
        registry.set("db.host", "a");
        let mut db = registry.extract("db").unwrap();
        db.set("host", "b");
        assert_eq!(registry.get("db.host"), Some(&Value::from("a")));
        assert_eq!(db.get("host"), Some(&Value::from("b")));
        assert!(registry.extract("db.host").is_none());
        assert!(registry.extract("missing").is_none());
    }

    #[test]
    fn merge_value_rejects_scalar_without_mutation() {
        let mut registry = Registry::from_native(&json!({"a": 1}));
        let before = registry.clone();
        let err = registry.merge_value(&Value::from("nope"), false).unwrap_err();
        assert!(matches!(err, RegistryError::MergeSource { found: "string" }));
        assert_eq!(registry, before);
    }

    #[test]
    fn failed_load_leaves_registry_untouched() {
        let mut registry = Registry::from_native(&json!({"keep": true}));
        let before = registry.clone();
        assert!(registry
            .load_string("{\"broken\": ", Format::Json, &Options::default())
            .is_err());
        assert_eq!(registry, before);
    }

    #[test]
    fn iteration_is_top_level_in_order() {
        let registry = Registry::from_native(&json!({"b": 1, "a": {"x": 2}}));
        let keys: Vec<&str> = registry.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["b", "a"]);
        assert_eq!(registry.len(), 2);
        assert_eq!((&registry).into_iter().count(), 2);
    }
}
