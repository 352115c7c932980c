//! Canonical serialization of ATV documents.
//!
//! The serializer emits the one canonical rendering of a document:
//!
//! - two-space indentation per nesting level,
//! - strings re-quoted with `"` and `\` backslash-escaped,
//! - the row id header `{ rid = "…" }` on its own line before the
//!   row's settings,
//! - a blank line between consecutive top-level nodes of different
//!   classes (pragma vs setting), never before the first node,
//! - a terminal newline.
//!
//! Parsing a well-formed document and serializing it again reproduces
//! the input byte for byte, up to this canonical form (CRLF folded to
//! LF, indentation normalized, trailing newline present).

use crate::document::{Document, Node, Pragma};
use crate::value::{Row, Setting, Table, Value};

/// Characters that are backslash-escaped inside quoted strings.
const QUOTED_CHARS: &[char] = &['"', '\\'];

/// Quotes a string in the ATV fashion.
///
/// ```rust
/// use mguard_cfg::quote;
///
/// assert_eq!(quote("plain"), "\"plain\"");
/// assert_eq!(quote("a\"b\\c"), "\"a\\\"b\\\\c\"");
/// ```
#[must_use]
pub fn quote(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('"');
    for ch in s.chars() {
        if QUOTED_CHARS.contains(&ch) {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    quoted
}

fn push_indent(out: &mut String, level: usize) {
    for _ in 0..level {
        out.push_str("  ");
    }
}

pub(crate) fn write_document(doc: &Document, out: &mut String) {
    let mut last_was_pragma: Option<bool> = None;
    for node in doc.nodes() {
        let is_pragma = matches!(node, Node::Pragma(_));
        if let Some(last) = last_was_pragma {
            if last != is_pragma {
                out.push('\n');
            }
        }
        last_was_pragma = Some(is_pragma);

        match node {
            Node::Pragma(pragma) => write_pragma(pragma, out),
            Node::Setting(setting) => write_setting(setting, out, 0),
        }
    }
}

fn write_pragma(pragma: &Pragma, out: &mut String) {
    out.push('#');
    out.push_str(&pragma.name);
    if !pragma.value.is_empty() {
        out.push(' ');
        out.push_str(&pragma.value);
    }
    out.push('\n');
}

pub(crate) fn write_setting(setting: &Setting, out: &mut String, indent: usize) {
    push_indent(out, indent);
    out.push_str(&setting.name);
    out.push_str(" = ");
    match &setting.value {
        Value::Simple(text) => {
            out.push_str(&quote(text));
            out.push('\n');
        }
        Value::WithMetadata(attrs) => {
            out.push_str("{\n");
            for (key, value) in attrs.iter() {
                push_indent(out, indent + 1);
                out.push_str(key);
                out.push_str(" = ");
                out.push_str(&quote(value));
                out.push('\n');
            }
            push_indent(out, indent);
            out.push_str("}\n");
        }
        Value::Table(table) => write_table(table, out, indent),
    }
}

fn write_table(table: &Table, out: &mut String, indent: usize) {
    out.push_str("{\n");
    for (key, value) in table.attributes.iter() {
        push_indent(out, indent + 1);
        out.push_str(key);
        out.push_str(" = ");
        out.push_str(&quote(value));
        out.push('\n');
    }
    for row in &table.rows {
        write_row(row, out, indent + 1);
    }
    push_indent(out, indent);
    out.push_str("}\n");
}

fn write_row(row: &Row, out: &mut String, indent: usize) {
    push_indent(out, indent);
    out.push_str("{\n");
    if let Some(id) = &row.id {
        push_indent(out, indent + 1);
        out.push_str("{ rid = ");
        out.push_str(&quote(id));
        out.push_str(" }\n");
    }
    for setting in &row.settings {
        write_setting(setting, out, indent + 1);
    }
    push_indent(out, indent);
    out.push_str("}\n");
}

/// Renders a single setting, used for change detection when a setting
/// is overwritten with an equal value.
pub(crate) fn setting_to_string(setting: &Setting) -> String {
    let mut out = String::new();
    write_setting(setting, &mut out, 0);
    out
}
