//! Format-preserving manifest patching
//!
//! Edits are computed on the JSONC syntax tree and spliced into the original
//! text, so comments, key order and whitespace outside the edited spans are
//! kept byte-for-byte.

use jsonc_parser::ast::{Object, ObjectProp, ObjectPropName, Value};
use jsonc_parser::common::Ranged;
use jsonc_parser::{parse_to_ast, CollectOptions, ParseOptions};
use std::collections::BTreeMap;
use std::ops::Range;
use thiserror::Error;

/// Failure to locate or rewrite an entry
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatchError {
    #[error("parse manifest: {0}")]
    Parse(String),

    #[error("manifest root is not an object")]
    NotAnObject,

    #[error("manifest has no \"bins\" array")]
    MissingBins,

    #[error("no entry named {0:?} in \"bins\"")]
    UnknownEntry(String),
}

/// Set `version` of the named entry and drop its `checksum`
pub fn patch_version(text: &str, name: &str, new_version: &str) -> Result<String, PatchError> {
    let parsed = parse_to_ast(text, &CollectOptions::default(), &ParseOptions::default())
        .map_err(|e| PatchError::Parse(e.to_string()))?;

    let root = match &parsed.value {
        Some(Value::Object(obj)) => obj,
        _ => return Err(PatchError::NotAnObject),
    };

    let bins = match find_prop(root, "bins").map(|p| &p.value) {
        Some(Value::Array(arr)) => arr,
        _ => return Err(PatchError::MissingBins),
    };

    let entry = bins
        .elements
        .iter()
        .filter_map(|el| match el {
            Value::Object(obj) => Some(obj),
            _ => None,
        })
        .find(|obj| string_value(obj, "name") == Some(name))
        .ok_or_else(|| PatchError::UnknownEntry(name.to_string()))?;

    let quoted = quote(new_version);
    let mut edits: Vec<(Range<usize>, String)> = Vec::new();

    match find_prop(entry, "version") {
        Some(prop) => {
            let r = prop.value.range();
            edits.push((r.start..r.end, quoted));
        }
        None => {
            // Insert right after the name property.
            let at = find_prop(entry, "name").map(|p| p.range.end).unwrap_or(entry.range.start + 1);
            edits.push((at..at, format!(", \"version\": {}", quoted)));
        }
    }

    let props = &entry.properties;
    if let Some(idx) = props.iter().position(|p| prop_name(p) == "checksum") {
        let prop = &props[idx];
        edits.push((line_start(text, prop.range.start)..prop.range.end, String::new()));

        // Drop exactly one separator: the checksum's own comma, else the one
        // before it. Comments around either comma stay where they are.
        let separator = comma_at(text, prop.range.end)
            .or_else(|| idx.checked_sub(1).and_then(|prev| comma_at(text, props[prev].range.end)));
        if let Some(at) = separator {
            edits.push((at..at + 1, String::new()));
        }
    }

    Ok(splice(text, edits))
}

/// Apply several `{name → version}` changes in turn
pub fn patch_versions(text: &str, changes: &BTreeMap<String, String>) -> Result<String, PatchError> {
    changes
        .iter()
        .try_fold(text.to_string(), |acc, (name, version)| patch_version(&acc, name, version))
}

fn splice(text: &str, mut edits: Vec<(Range<usize>, String)>) -> String {
    // Back to front, so earlier offsets stay valid.
    edits.sort_by(|a, b| (b.0.start, b.0.end).cmp(&(a.0.start, a.0.end)));
    let mut out = text.to_string();
    for (range, replacement) in edits {
        out.replace_range(range, &replacement);
    }
    out
}

/// Start of the whitespace run before `pos`, including one line break
fn line_start(text: &str, pos: usize) -> usize {
    let bytes = text.as_bytes();
    let mut start = pos;
    while start > 0 && matches!(bytes[start - 1], b' ' | b'\t') {
        start -= 1;
    }
    if start > 0 && bytes[start - 1] == b'\n' {
        start -= 1;
        if start > 0 && bytes[start - 1] == b'\r' {
            start -= 1;
        }
    }
    start
}

/// Offset of the comma following `pos`, skipping whitespace and comments
fn comma_at(text: &str, pos: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut i = pos;
    while i < bytes.len() {
        match bytes[i] {
            b',' => return Some(i),
            b' ' | b'\t' | b'\r' | b'\n' => i += 1,
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                i = text[i..].find('\n').map_or(bytes.len(), |n| i + n);
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = text[i + 2..].find("*/").map_or(bytes.len(), |n| i + 2 + n + 2);
            }
            _ => return None,
        }
    }
    None
}

fn prop_name<'a>(prop: &'a ObjectProp<'_>) -> &'a str {
    match &prop.name {
        ObjectPropName::String(s) => &*s.value,
        ObjectPropName::Word(w) => w.value,
    }
}

fn find_prop<'a, 'b>(obj: &'a Object<'b>, name: &str) -> Option<&'a ObjectProp<'b>> {
    obj.properties.iter().find(|p| prop_name(p) == name)
}

fn string_value<'a>(obj: &'a Object<'_>, name: &str) -> Option<&'a str> {
    match find_prop(obj, name).map(|p| &p.value) {
        Some(Value::StringLit(s)) => Some(&*s.value),
        _ => None,
    }
}

fn quote(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}
