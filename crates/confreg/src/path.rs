//! Path resolution over a [`Mapping`] tree.
//!
//! A path is a separator-delimited list of keys, e.g. `"deep.level.foo"`.
//! Segments are never escaped, so a key that itself contains the separator
//! cannot be addressed through a path (use a different separator instead).
//!
//! Reads never create nodes. Writes create a mapping at every missing
//! intermediate segment, and *replace* any non-mapping value they meet on the
//! way. That replacement is silent and loses the old value:
//!
//! ```
//! use confreg::{path, Mapping, Value};
//!
//! let mut root = Mapping::new();
//! path::set(&mut root, "a", Value::from("scalar"), ".");
//! path::set(&mut root, "a.b", Value::from(1), ".");
//! assert_eq!(path::get(&root, "a.b", "."), Some(&Value::Integer(1)));
//! ```

use crate::value::{Mapping, Value};

/// Separator used when the caller does not name one.
pub const DEFAULT_SEPARATOR: &str = ".";

/// Split a path into its parent segments and final key.
///
/// An empty separator addresses the whole path as a single top-level key.
fn split_path<'a>(path: &'a str, separator: &str) -> (Vec<&'a str>, &'a str) {
    if separator.is_empty() {
        return (Vec::new(), path);
    }
    match path.rsplit_once(separator) {
        Some((head, last)) => (head.split(separator).collect(), last),
        None => (Vec::new(), path),
    }
}

/// Walk to the mapping that owns the final segment, creating (or clobbering)
/// intermediate nodes as needed.
fn parent_mut<'a>(root: &'a mut Mapping, parents: &[&str]) -> &'a mut Mapping {
    let mut node = root;
    for seg in parents {
        node = node.slot(seg).force_mapping();
    }
    node
}

/// Look up `path`. Returns `None` if any segment is missing or an
/// intermediate segment is not a mapping.
pub fn get<'a>(root: &'a Mapping, path: &str, separator: &str) -> Option<&'a Value> {
    let (parents, last) = split_path(path, separator);
    let mut node = root;
    for seg in parents {
        node = node.get(seg)?.as_mapping()?;
    }
    node.get(last)
}

/// True if `path` resolves to a present entry. A stored `Null` counts as
/// present.
pub fn exists(root: &Mapping, path: &str, separator: &str) -> bool {
    get(root, path, separator).is_some()
}

/// Store `value` at `path`, overwriting whatever was there (including a
/// whole sub-tree). Returns the stored value.
pub fn set<'a>(root: &'a mut Mapping, path: &str, value: Value, separator: &str) -> &'a Value {
    let (parents, last) = split_path(path, separator);
    let slot = parent_mut(root, &parents).slot(last);
    *slot = value;
    slot
}

/// Get-or-initialize: store `default` at `path` only if nothing is there,
/// then return what `path` holds.
pub fn def<'a>(root: &'a mut Mapping, path: &str, default: Value, separator: &str) -> &'a Value {
    let present = exists(root, path, separator);
    let (parents, last) = split_path(path, separator);
    // When the path is present every parent is already a mapping, so the walk
    // below does not modify anything.
    let slot = parent_mut(root, &parents).slot(last);
    if !present {
        *slot = default;
    }
    slot
}

/// Push `value` onto the sequence at `path`. A missing or non-sequence node
/// is replaced by a new sequence.
pub fn append<'a>(root: &'a mut Mapping, path: &str, value: Value, separator: &str) -> &'a Value {
    let (parents, last) = split_path(path, separator);
    let slot = parent_mut(root, &parents).slot(last);
    slot.force_sequence().push(value);
    slot
}

/// Remove the node at `path` and return it. Never creates or clobbers
/// intermediate nodes.
pub fn remove(root: &mut Mapping, path: &str, separator: &str) -> Option<Value> {
    let (parents, last) = split_path(path, separator);
    let mut node = root;
    for seg in parents {
        node = match node.get_mut(seg)? {
            Value::Mapping(map) => map,
            _ => return None,
        };
    }
    node.remove(last)
}

/// Flatten the tree into full-path keys. Mappings are descended into;
/// everything else (sequences included) is a leaf. Empty mappings vanish.
pub fn flatten(root: &Mapping, separator: &str) -> Mapping {
    let mut out = Mapping::new();
    flatten_into(root, None, separator, &mut out);
    out
}

fn flatten_into(map: &Mapping, prefix: Option<&str>, separator: &str, out: &mut Mapping) {
    for (key, value) in map.iter() {
        let full = match prefix {
            Some(prefix) => format!("{prefix}{separator}{key}"),
            None => key.to_owned(),
        };
        match value {
            Value::Mapping(child) => flatten_into(child, Some(&full), separator, out),
            leaf => {
                out.insert(full, leaf.clone());
            }
        }
    }
}
