//! Layering one mapping over another.
//!
//! Merge semantics:
//! - Every top-level key of the source overwrites the target, whatever the
//!   incoming value is. `0`, `""`, `false`, `-1` and `null` all win; nothing
//!   is ever tested for truthiness.
//! - Recursive mode: when both sides hold a mapping under the same key, the
//!   incoming mapping is merged into the existing one by the same rule
//!   instead of replacing it.
//! - Sequences are leaves and are replaced whole.
//! - Keys absent from the source are left untouched.
//!
//! Incoming values are cloned, so the target never shares structure with
//! the source.

use crate::value::{Mapping, Value};

/// Merge `source` into `target` in place.
pub fn merge(target: &mut Mapping, source: &Mapping, recursive: bool) {
    for (key, incoming) in source.iter() {
        match (target.get_mut(key), incoming) {
            (Some(Value::Mapping(existing)), Value::Mapping(incoming)) if recursive => {
                merge(existing, incoming, true);
            }
            _ => {
                target.insert(key, incoming.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::json;

    fn mapping(text: &str) -> Mapping {
        json::parse(text).unwrap()
    }

    #[test]
    fn falsy_values_overwrite() {
        let mut target = mapping(r#"{"param1":1,"param2":"value2"}"#);
        let source =
            mapping(r#"{"param1":2,"param2":"","param3":0,"param4":-1,"param5":1}"#);
        merge(&mut target, &source, false);
        assert_eq!(
            json::render(&target).unwrap(),
            r#"{"param1":2,"param2":"","param3":0,"param4":-1,"param5":1}"#
        );
    }

    #[test]
    fn shallow_replaces_nested_mapping() {
        let mut target = mapping(r#"{"db":{"host":"a","port":1}}"#);
        let source = mapping(r#"{"db":{"host":"b"}}"#);
        merge(&mut target, &source, false);
        assert_eq!(json::render(&target).unwrap(), r#"{"db":{"host":"b"}}"#);
    }

    #[test]
    fn recursive_merges_nested_mapping() {
        let mut target = mapping(r#"{"db":{"host":"a","port":1,"opts":{"x":1}}}"#);
        let source = mapping(r#"{"db":{"host":"b","opts":{"y":2}}}"#);
        merge(&mut target, &source, true);
        assert_eq!(
            json::render(&target).unwrap(),
            r#"{"db":{"host":"b","port":1,"opts":{"x":1,"y":2}}}"#
        );
    }

    #[test]
    fn recursive_still_replaces_mismatched_kinds() {
        let mut target = mapping(r#"{"a":{"b":1},"c":"scalar"}"#);
        let source = mapping(r#"{"a":"flat","c":{"d":1}}"#);
        merge(&mut target, &source, true);
        assert_eq!(json::render(&target).unwrap(), r#"{"a":"flat","c":{"d":1}}"#);
    }

    #[test]
    fn sequences_replace() {
        let mut target = mapping(r#"{"list":[1,2,3]}"#);
        let source = mapping(r#"{"list":[9]}"#);
        merge(&mut target, &source, true);
        assert_eq!(json::render(&target).unwrap(), r#"{"list":[9]}"#);
    }

    #[test]
    fn merged_values_are_copies() {
        let mut target = Mapping::new();
        let mut source = mapping(r#"{"n":{"v":1}}"#);
        merge(&mut target, &source, false);
        source.insert("n", "changed");
        assert_eq!(json::render(&target).unwrap(), r#"{"n":{"v":1}}"#);
    }
}
