//! # confreg
//!
//! In-memory, hierarchical configuration registry: a tree of named values
//! addressed by dotted (or custom-separator) paths, loadable from and
//! renderable to JSON and INI, with shallow and recursive merging for
//! layering configuration sources.
//!
//! ## Quick start
//!
//! ```rust
//! use confreg::{Format, Options, Registry};
//!
//! // Defaults from JSON
//! let mut config: Registry = r#"{"server":{"port":8080},"debug":true}"#.parse().unwrap();
//!
//! // Overrides from INI, one section per top-level mapping
//! let overrides = Registry::from_text(
//!     "[server]\nport=\"9090\"",
//!     Format::Ini,
//!     &Options::default().process_sections(true),
//! )
//! .unwrap();
//! config.merge(&overrides, true);
//!
//! assert_eq!(config.to_string(), r#"{"server":{"port":"9090"},"debug":true}"#);
//! ```
//!
//! ## Modules
//!
//! - [`value`] — `Value` / `Mapping` tree
//! - [`path`] — path get/set/exists/def over a mapping
//! - [`binder`] — native `serde_json::Value` ⇄ registry tree
//! - [`format`] — JSON and INI codecs
//! - [`merge`] — shallow and recursive merge
//! - [`registry`] — the `Registry` facade
//! - [`instances`] — named registries held by an explicit container
//! - [`error`] — error types

pub mod binder;
pub mod error;
pub mod format;
pub mod instances;
pub mod merge;
pub mod path;
pub mod registry;
pub mod value;

pub use binder::{bind_keyed, Key};
pub use error::{RegistryError, Result};
pub use format::{Format, Options};
pub use instances::Instances;
pub use registry::Registry;
pub use value::{Mapping, Value};
