//! Text formats a registry can be loaded from and rendered to.
//!
//! Each codec is a `parse` / `render` pair over a root [`Mapping`]:
//!
//! - [`json`] — structural JSON, compact output in insertion order
//! - [`ini`] — flat `key="value"` lines, optionally grouped into `[sections]`

pub mod ini;
pub mod json;

use crate::error::{RegistryError, Result};
use crate::value::Mapping;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// A supported text format. Names are matched case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Format {
    #[default]
    Json,
    Ini,
}

impl Format {
    pub fn name(self) -> &'static str {
        match self {
            Format::Json => "JSON",
            Format::Ini => "INI",
        }
    }

    /// Best-effort guess for bare text: a leading `{` or `[` means JSON,
    /// anything else INI.
    pub fn sniff(text: &str) -> Format {
        match text.trim_start().chars().next() {
            Some('{') | Some('[') => Format::Json,
            _ => Format::Ini,
        }
    }

    /// Guess from a file extension. Only `.json` selects JSON.
    pub fn from_path(path: &Path) -> Format {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Format::Json,
            _ => Format::Ini,
        }
    }

    /// Parse `text` into a fresh mapping. Nothing is returned on failure, so a
    /// half-parsed document can never reach a registry.
    pub fn parse(self, text: &str, options: &Options) -> Result<Mapping> {
        match self {
            Format::Json => json::parse(text),
            Format::Ini => ini::parse(text, options),
        }
    }

    pub fn render(self, map: &Mapping, _options: &Options) -> Result<String> {
        match self {
            Format::Json => json::render(map),
            Format::Ini => Ok(ini::render(map)),
        }
    }
}

impl FromStr for Format {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        if name.eq_ignore_ascii_case("json") {
            Ok(Format::Json)
        } else if name.eq_ignore_ascii_case("ini") {
            Ok(Format::Ini)
        } else {
            Err(RegistryError::UnknownFormat(name.to_owned()))
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Codec options. The set is closed; codecs ignore options that do not
/// apply to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Options {
    /// INI only: turn `[name]` headers into nested mappings instead of
    /// treating them as markers.
    pub process_sections: bool,
}

impl Options {
    pub fn process_sections(mut self, enabled: bool) -> Self {
        self.process_sections = enabled;
        self
    }
}
