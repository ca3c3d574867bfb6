//! INI codec.
//!
//! ```text
//! foo1="a"
//! foo2="b"
//!
//! [config]
//! foo3="c"
//! ```
//!
//! # Parsing
//!
//! Line oriented. `[name]` starts a section, `key=value` assigns, lines
//! starting with `;` or `#` are comments, and anything else is skipped. A
//! `;` or `#` after whitespace also ends a header line or a bare value.
//! Values are always strings: surrounding double quotes are stripped and
//! `\"`, `\\`, `\n`, `\r`, `\t` are unescaped, but a bare `42` or `true`
//! stays the string `"42"` / `"true"`.
//!
//! Without [`Options::process_sections`] a section header is only a marker
//! and its keys land in the top-level mapping. With it, each header creates
//! a fresh sub-mapping under the root and following keys go there.
//!
//! # Rendering
//!
//! Top-level scalars first, then each top-level mapping as a section holding
//! its scalar entries. Values are always quoted. Sequences, and mappings
//! nested inside a section, have no INI form and are skipped.

use crate::error::{RegistryError, Result};
use crate::format::Options;
use crate::value::{Mapping, Value};

/// Parse INI `text` into a fresh root mapping.
pub fn parse(text: &str, options: &Options) -> Result<Mapping> {
    let mut root = Mapping::new();
    let mut section: Option<String> = None;

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        if let Some(name) = section_header(strip_comment(line)) {
            if options.process_sections {
                root.insert(name, Mapping::new());
            }
            section = Some(name.to_owned());
            continue;
        }

        let Some((key, raw_value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        let value = parse_value(raw_value.trim(), index + 1)?;

        let target = match (&section, options.process_sections) {
            (Some(name), true) => root.slot(name).force_mapping(),
            _ => &mut root,
        };
        target.insert(key, value);
    }

    Ok(root)
}

/// `[name]` → `Some("name")`. Empty names are not headers.
fn section_header(line: &str) -> Option<&str> {
    let name = line.strip_prefix('[')?.strip_suffix(']')?.trim();
    (!name.is_empty()).then_some(name)
}

/// Parse the right-hand side of `key=value`.
///
/// A quoted value must close, and only a comment may follow the closing
/// quote. Unquoted values are taken verbatim up to a trailing comment.
fn parse_value(raw: &str, line: usize) -> Result<Value> {
    if !raw.starts_with('"') {
        return Ok(Value::String(strip_comment(raw).to_owned()));
    }
    let end = find_closing_quote(raw, 1).ok_or_else(|| RegistryError::IniParse {
        line,
        message: "Unterminated quoted value".to_string(),
    })?;
    let trailing = raw[end + 1..].trim_start();
    if !(trailing.is_empty() || trailing.starts_with(';') || trailing.starts_with('#')) {
        return Err(RegistryError::IniParse {
            line,
            message: format!("Unexpected text after closing quote: '{trailing}'"),
        });
    }
    Ok(Value::String(unescape(&raw[1..end])))
}

/// Cut a trailing `; ...` or `# ...` comment. The marker must start the
/// text or follow whitespace, so `a#b` is kept whole.
fn strip_comment(text: &str) -> &str {
    let bytes = text.as_bytes();
    let cut = bytes.iter().enumerate().position(|(i, &b)| {
        (b == b';' || b == b'#') && (i == 0 || bytes[i - 1].is_ascii_whitespace())
    });
    match cut {
        Some(i) => text[..i].trim_end(),
        None => text,
    }
}

/// Find the position of the closing quote, skipping escaped characters.
fn find_closing_quote(s: &str, start: usize) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return Some(i),
            _ => i += 1,
        }
    }
    None
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Render `map` as INI text. No trailing newline.
pub fn render(map: &Mapping) -> String {
    let mut out = String::new();
    let mut first = true;

    for (key, value) in map.iter() {
        if let Some(text) = scalar_text(value) {
            push_line(&mut out, &mut first, &format_entry(key, &text));
        }
    }

    for (key, value) in map.iter() {
        let Value::Mapping(section) = value else {
            continue;
        };
        // Blank separator line, except at the very top of the output.
        if !first {
            out.push('\n');
        }
        push_line(&mut out, &mut first, &format!("[{key}]"));
        for (child_key, child) in section.iter() {
            if let Some(text) = scalar_text(child) {
                push_line(&mut out, &mut first, &format_entry(child_key, &text));
            }
        }
    }

    out
}

fn push_line(out: &mut String, first: &mut bool, line: &str) {
    if !*first {
        out.push('\n');
    }
    *first = false;
    out.push_str(line);
}

/// Text form of a scalar, or `None` for sequences and mappings.
fn scalar_text(value: &Value) -> Option<String> {
    if !value.is_scalar() {
        return None;
    }
    Some(match value {
        Value::Bool(b) => b.to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::String(s) => s.clone(),
        _ => String::new(),
    })
}

fn format_entry(key: &str, value: &str) -> String {
    let mut line = String::with_capacity(key.len() + value.len() + 3);
    line.push_str(key);
    line.push_str("=\"");
    for ch in value.chars() {
        match ch {
            '\\' => line.push_str("\\\\"),
            '"' => line.push_str("\\\""),
            '\n' => line.push_str("\\n"),
            '\r' => line.push_str("\\r"),
            '\t' => line.push_str("\\t"),
            _ => line.push(ch),
        }
    }
    line.push('"');
    line
}
