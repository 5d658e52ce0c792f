//! Indented YAML encoding
//!
//! serde_yaml always emits two-space indentation and flush-left sequences.
//! Chart files are written with a caller-chosen indent width instead, so the
//! document is first normalized through `serde_json::Value` (canonical field
//! names, sorted keys, skipped empty fields) and then emitted here.
//! Scalars are still rendered by serde_yaml so quoting stays correct.

use serde::Serialize;
use serde_json::Value;
use std::fmt::Write;

/// Indent width used when the caller has no preference
pub const DEFAULT_INDENT: usize = 4;

/// Serialize `value` as a YAML document indented by `indent` spaces.
///
/// Widths outside 2..=9 are clamped, matching libyaml.
pub fn to_yaml_with_indent<T: Serialize>(value: &T, indent: usize) -> Result<String, serde_json::Error> {
    let value = serde_json::to_value(value)?;
    let indent = indent.clamp(2, 9);
    let mut out = String::new();

    match &value {
        Value::Object(map) if !map.is_empty() => emit_mapping(map, 0, indent, &mut out),
        Value::Array(items) if !items.is_empty() => emit_sequence(items, 0, indent, &mut out),
        other => {
            out.push_str(&inline_value(other));
            out.push('\n');
        }
    }

    Ok(out)
}

fn emit_mapping(map: &serde_json::Map<String, Value>, column: usize, indent: usize, out: &mut String) {
    for (key, value) in map {
        pad(column, out);
        emit_entry(key, value, column, indent, out);
    }
}

/// Writes `key: value` assuming the cursor already sits at `column`
fn emit_entry(key: &str, value: &Value, column: usize, indent: usize, out: &mut String) {
    out.push_str(&scalar_string(key));
    out.push(':');
    match value {
        Value::Object(map) if !map.is_empty() => {
            out.push('\n');
            emit_mapping(map, column + indent, indent, out);
        }
        Value::Array(items) if !items.is_empty() => {
            out.push('\n');
            emit_sequence(items, column + indent, indent, out);
        }
        other => {
            out.push(' ');
            out.push_str(&inline_value(other));
            out.push('\n');
        }
    }
}

fn emit_sequence(items: &[Value], column: usize, indent: usize, out: &mut String) {
    for item in items {
        pad(column, out);
        out.push('-');
        match item {
            Value::Object(map) if !map.is_empty() => {
                out.push(' ');
                let inner = column + 2;
                for (position, (key, value)) in map.iter().enumerate() {
                    if position > 0 {
                        pad(inner, out);
                    }
                    emit_entry(key, value, inner, indent, out);
                }
            }
            Value::Array(nested) if !nested.is_empty() => {
                out.push('\n');
                emit_sequence(nested, column + indent, indent, out);
            }
            other => {
                out.push(' ');
                out.push_str(&inline_value(other));
                out.push('\n');
            }
        }
    }
}

fn pad(column: usize, out: &mut String) {
    out.extend(std::iter::repeat(' ').take(column));
}

/// Scalars and empty collections
fn inline_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => scalar_string(s),
        Value::Array(_) => "[]".to_string(),
        Value::Object(_) => "{}".to_string(),
    }
}

fn scalar_string(s: &str) -> String {
    if s.contains(['\n', '\r']) {
        return double_quoted(s);
    }
    match serde_yaml::to_string(s) {
        Ok(rendered) => rendered.trim_end_matches('\n').to_string(),
        Err(_) => double_quoted(s),
    }
}

fn double_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
