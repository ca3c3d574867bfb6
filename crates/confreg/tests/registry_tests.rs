use confreg::{bind_keyed, Format, Key, Mapping, Options, Registry, RegistryError, Value};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Helper: path to a file under `tests/fixtures`.
fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn sections() -> Options {
    Options::default().process_sections(true)
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn new_registry_is_empty() {
    let registry = Registry::new();
    assert!(registry.is_empty());
    assert_eq!(registry.to_string(), "{}");
}

#[test]
fn construct_from_bare_json_text() {
    let registry: Registry = r#"{"param1":1, "param2":"value2"}"#.parse().unwrap();
    assert_eq!(registry.get("param1"), Some(&Value::Integer(1)));
    assert_eq!(registry.get("param2"), Some(&Value::from("value2")));
}

#[test]
fn construct_from_bare_ini_text() {
    let registry: Registry = "foo=\"bar\"".parse().unwrap();
    assert_eq!(registry.get("foo"), Some(&Value::from("bar")));
}

#[test]
fn construct_from_native_and_object() {
    #[derive(Serialize)]
    struct Settings {
        name: &'static str,
        retries: u32,
    }
    let from_native = Registry::from_native(&json!({"name": "svc", "retries": 3}));
    let from_object = Registry::from_object(&Settings {
        name: "svc",
        retries: 3,
    })
    .unwrap();
    assert_eq!(from_native, from_object);
}

#[test]
fn construct_from_null_is_empty() {
    assert!(Registry::from_native(&serde_json::Value::Null).is_empty());
}

// ============================================================================
// Clone / Display / Serialize
// ============================================================================

#[test]
fn clone_is_equal_but_independent() {
    let mut a = Registry::from_native(&json!({"a": "123", "b": "456"}));
    a.set("foo", "bar");
    let mut b = a.clone();
    assert_eq!(a, b);

    b.set("foo", "changed");
    assert_eq!(a.get("foo"), Some(&Value::from("bar")));
}

#[test]
fn display_is_compact_json() {
    let mut registry = Registry::new();
    registry.set("foo", "bar");
    assert_eq!(registry.to_string(), r#"{"foo":"bar"}"#);
    assert_eq!(
        registry.to_string(),
        registry.to_string_as(Format::Json, &Options::default()).unwrap()
    );
}

#[test]
fn serde_json_serialization_matches_display() {
    let mut registry = Registry::new();
    registry.set("foo", "bar");
    assert_eq!(serde_json::to_string(&registry).unwrap(), r#"{"foo":"bar"}"#);
}

#[test]
fn serde_round_trip() {
    let mut registry = Registry::new();
    registry.set("foo", "bar");
    registry.set("n.x", 1.5);
    let text = serde_json::to_string(&registry).unwrap();
    let back: Registry = serde_json::from_str(&text).unwrap();
    assert_eq!(back, registry);
}

#[test]
fn deserializing_non_object_fails() {
    assert!(serde_json::from_str::<Registry>("[1,2]").is_err());
}

// ============================================================================
// get / set / def / exists
// ============================================================================

#[test]
fn def_initializes_once() {
    let mut registry = Registry::new();
    assert_eq!(registry.def("foo", "bar"), "bar");
    assert_eq!(registry.get("foo"), Some(&Value::from("bar")));
    assert_eq!(registry.def("foo", "other"), "bar");
}

#[test]
fn exists_nested_paths() {
    let mut registry = Registry::new();
    registry.set("foo", "bar1");
    registry.set("config.foo", "bar2");
    registry.set("deep.level.foo", "bar3");

    assert!(registry.exists("foo"));
    assert!(registry.exists("config.foo"));
    assert!(registry.exists("deep.level.foo"));
    assert!(!registry.exists("deep.level.bar"));
    assert!(!registry.exists("bar.foo"));
}

#[test]
fn get_missing_is_none() {
    let mut registry = Registry::new();
    registry.set("foo", "bar");
    assert_eq!(registry.get("foo"), Some(&Value::from("bar")));
    assert_eq!(registry.get("xxx.yyy"), None);
    assert_eq!(registry.get_or("xxx.yyy", Value::Null), Value::Null);
}

#[test]
fn falsy_values_round_trip_through_set() {
    let mut registry = Registry::new();
    for (path, value) in [
        ("zero", Value::Integer(0)),
        ("no", Value::Bool(false)),
        ("empty", Value::from("")),
        ("minus", Value::Integer(-1)),
        ("nothing", Value::Null),
    ] {
        registry.set(path, value.clone());
        assert!(registry.exists(path));
        assert_eq!(registry.get(path), Some(&value));
    }
}

#[test]
fn set_overwrites_scalar_parent() {
    let mut registry = Registry::new();
    registry.set("a", 1);
    registry.set("a.b", 2);
    assert_eq!(registry.to_string(), r#"{"a":{"b":2}}"#);
}

#[test]
fn custom_separator_operations() {
    let mut registry = Registry::new();
    registry.set_with_separator("server/host.name", "example", "/");
    assert!(registry.exists_with_separator("server/host.name", "/"));
    assert!(!registry.exists("server.host.name"));
    assert_eq!(
        registry.get_with_separator("server/host.name", "/"),
        Some(&Value::from("example"))
    );
    assert_eq!(registry.def_with_separator("server/port", 80, "/"), &Value::Integer(80));
    assert_eq!(
        registry.remove_with_separator("server/port", "/"),
        Some(Value::Integer(80))
    );
}

#[test]
fn append_and_remove() {
    let mut registry = Registry::new();
    registry.append("hosts", "a");
    registry.append("hosts", "b");
    assert_eq!(registry.to_string(), r#"{"hosts":["a","b"]}"#);
    assert_eq!(
        registry.remove("hosts"),
        Some(Value::Sequence(vec!["a".into(), "b".into()]))
    );
    assert!(!registry.exists("hosts"));
}

#[test]
fn flatten_uses_separator() {
    let mut registry = Registry::new();
    registry.set("a.b", 1);
    registry.set("a.c.d", 2);
    let flat = registry.flatten("/");
    let keys: Vec<&str> = flat.keys().collect();
    assert_eq!(keys, ["a/b", "a/c/d"]);
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn load_array() {
    let mut registry = Registry::new();
    registry.load_array(&json!({"foo": "bar"}));
    assert_eq!(registry.get("foo"), Some(&Value::from("bar")));
}

#[test]
fn load_object_with_nested_struct() {
    #[derive(Serialize)]
    struct Inner {
        test: &'static str,
    }
    #[derive(Serialize)]
    struct Outer {
        test: Inner,
    }
    let mut registry = Registry::new();
    registry
        .load_object(&Outer {
            test: Inner { test: "testcase" },
        })
        .unwrap();
    assert_eq!(registry.get("test.test"), Some(&Value::from("testcase")));
}

#[test]
fn load_string_ini_variants() {
    let mut registry = Registry::new();
    registry
        .load_string("foo=\"testloadini1\"", Format::Ini, &Options::default())
        .unwrap();
    assert_eq!(registry.get("foo"), Some(&Value::from("testloadini1")));

    registry
        .load_string("[section]\nfoo=\"testloadini2\"", Format::Ini, &Options::default())
        .unwrap();
    assert_eq!(registry.get("foo"), Some(&Value::from("testloadini2")));

    registry
        .load_string("[section]\nfoo=\"testloadini3\"", Format::Ini, &sections())
        .unwrap();
    assert_eq!(registry.get("section.foo"), Some(&Value::from("testloadini3")));
}

#[test]
fn load_string_json() {
    let mut registry = Registry::new();
    registry
        .load_string(r#"{"foo":"testloadjson"}"#, Format::Json, &Options::default())
        .unwrap();
    assert_eq!(registry.get("foo"), Some(&Value::from("testloadjson")));
}

#[test]
fn load_string_is_a_shallow_merge() {
    let mut registry = Registry::from_native(&json!({"keep": 1, "nested": {"a": 1, "b": 2}}));
    registry
        .load_string(r#"{"nested":{"a":0},"new":""}"#, Format::Json, &Options::default())
        .unwrap();
    assert_eq!(registry.to_string(), r#"{"keep":1,"nested":{"a":0},"new":""}"#);
}

#[test]
fn load_string_ini_error_names_line() {
    let mut registry = Registry::new();
    let err = registry
        .load_string("a=\"1\"\nb=\"2", Format::Ini, &Options::default())
        .unwrap_err();
    assert_eq!(err.to_string(), "INI parse error at line 2: Unterminated quoted value");
    assert!(registry.is_empty());
}

#[test]
fn load_file_json_by_extension() {
    let mut registry = Registry::new();
    registry
        .load_file(fixture("registry.json"), None, &Options::default())
        .unwrap();
    assert_eq!(registry.get("foo"), Some(&Value::from("bar")));
    assert_eq!(registry.get("nested.ratio"), Some(&Value::Float(0.5)));
}

#[test]
fn load_file_ini_with_and_without_sections() {
    let mut registry = Registry::new();
    registry
        .load_file(fixture("registry.ini"), Some(Format::Ini), &Options::default())
        .unwrap();
    assert_eq!(registry.get("foo"), Some(&Value::from("bar")));
    assert_eq!(registry.get("name"), Some(&Value::from("plain")));

    registry
        .load_file(fixture("registry.ini"), Some(Format::Ini), &sections())
        .unwrap();
    assert_eq!(registry.get("section.foo"), Some(&Value::from("bar")));
}

#[test]
fn load_file_unknown_extension_defaults_to_ini() {
    let mut registry = Registry::new();
    registry
        .load_file(fixture("settings.conf"), None, &sections())
        .unwrap();
    assert_eq!(registry.get("section.name"), Some(&Value::from("plain")));
}

#[test]
fn load_file_missing_is_io_error() {
    let mut registry = Registry::new();
    let err = registry
        .load_file(fixture("does-not-exist.json"), None, &Options::default())
        .unwrap_err();
    assert!(matches!(err, RegistryError::Io { .. }));
    assert!(err.to_string().contains("does-not-exist.json"));
}

// ============================================================================
// Export
// ============================================================================

fn export_sample() -> Registry {
    let mut registry = Registry::new();
    registry.set("foo1", "testtoarray1");
    registry.set("foo2", "testtoarray2");
    registry.set("config.foo3", "testtoarray3");
    registry
}

#[test]
fn to_native() {
    assert_eq!(
        export_sample().to_native(),
        json!({
            "foo1": "testtoarray1",
            "foo2": "testtoarray2",
            "config": {"foo3": "testtoarray3"}
        })
    );
}

#[test]
fn to_object() {
    #[derive(Debug, Deserialize, PartialEq)]
    struct Config {
        foo3: String,
    }
    #[derive(Debug, Deserialize, PartialEq)]
    struct Expected {
        foo1: String,
        foo2: String,
        config: Config,
    }
    let object: Expected = export_sample().to_object().unwrap();
    assert_eq!(
        object,
        Expected {
            foo1: "testtoarray1".into(),
            foo2: "testtoarray2".into(),
            config: Config {
                foo3: "testtoarray3".into()
            },
        }
    );
}

#[test]
fn to_object_type_mismatch_is_error() {
    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Wrong {
        foo1: i64,
    }
    let err = export_sample().to_object::<Wrong>().unwrap_err();
    assert!(matches!(err, RegistryError::Json(_)));
}

#[test]
fn to_string_json_and_ini() {
    let mut registry = Registry::new();
    registry.set("foo1", "testtostring1");
    registry.set("foo2", "testtostring2");
    registry.set("config.foo3", "testtostring3");

    assert_eq!(
        registry.to_string_as(Format::Json, &Options::default()).unwrap(),
        r#"{"foo1":"testtostring1","foo2":"testtostring2","config":{"foo3":"testtostring3"}}"#
    );
    assert_eq!(
        registry.to_string_as(Format::Ini, &Options::default()).unwrap(),
        "foo1=\"testtostring1\"\nfoo2=\"testtostring2\"\n\n[config]\nfoo3=\"testtostring3\""
    );
}

// ============================================================================
// Keyed binding
// ============================================================================

#[test]
fn keyed_sequence_is_stored_as_sequence() {
    let mut registry = Registry::new();
    registry.set("intarray", bind_keyed([(0usize, 0), (1, 1), (2, 2)]));
    assert_eq!(registry.to_string(), r#"{"intarray":[0,1,2]}"#);
}

#[test]
fn keyed_gap_is_stored_as_mapping() {
    let mut registry = Registry::new();
    registry.set(
        "sparse",
        bind_keyed([(Key::Index(0), 0), (Key::Index(2), 2)]),
    );
    assert_eq!(registry.to_string(), r#"{"sparse":{"0":0,"2":2}}"#);
    assert!(registry.exists("sparse.2"));
}

#[test]
fn mapping_conversion_round_trip() {
    let registry = export_sample();
    let map: Mapping = registry.clone().into_mapping();
    assert_eq!(Registry::from(map), registry);
}
