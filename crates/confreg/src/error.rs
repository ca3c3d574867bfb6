//! Error types for registry loading, rendering and merging.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, converting or merging a registry.
///
/// Missing paths are never errors: lookups resolve them to `None` or a default.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The input was not valid JSON, or a serde conversion to/from a native
    /// type failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input was not valid INI.
    /// Includes the 1-based line number where the error was detected.
    #[error("INI parse error at line {line}: {message}")]
    IniParse { line: usize, message: String },

    /// A format name that no codec answers to.
    #[error("Unknown format: '{0}' (expected JSON or INI)")]
    UnknownFormat(String),

    /// `merge_value` was handed something other than a mapping.
    #[error("Merge source must be a mapping, found {found}")]
    MergeSource { found: &'static str },

    /// Reading a file for `load_file` failed.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias used throughout confreg.
pub type Result<T> = std::result::Result<T, RegistryError>;
