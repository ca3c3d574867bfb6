//! JSON codec.
//!
//! Parsing is a straight structural decode through `serde_json` (objects →
//! mappings, arrays → sequences, integer/float kept apart). Rendering is
//! compact, with keys in insertion order; `serde_json` is built with
//! `preserve_order`, so the intermediate native object never re-sorts keys.

use crate::binder;
use crate::error::Result;
use crate::value::Mapping;

/// Decode `text` into a fresh root mapping.
///
/// Blank input is an empty document. A non-object root is bound entry by
/// entry (array elements under `"0"`, `"1"`, …; a lone scalar under `"0"`),
/// since the registry root is always a mapping.
pub fn parse(text: &str) -> Result<Mapping> {
    let mut root = Mapping::new();
    if text.trim().is_empty() {
        return Ok(root);
    }
    let native: serde_json::Value = serde_json::from_str(text)?;
    binder::bind_into(&mut root, &native);
    Ok(root)
}

/// Compact rendering, e.g. `{"foo":"bar"}`. No trailing newline.
pub fn render(map: &Mapping) -> Result<String> {
    Ok(serde_json::to_string(map)?)
}

/// Indented rendering for humans.
pub fn render_pretty(map: &Mapping) -> Result<String> {
    Ok(serde_json::to_string_pretty(map)?)
}
