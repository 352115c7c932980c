//! The ATV text format, as read and written by this crate.
//!
//! # Overview
//!
//! ATV is the textual configuration format of the mGuard security
//! router family: a flat list of pragmas and named settings whose
//! values nest through braces. The format is strict about very little
//! and ordered about everything — node order, attribute order and row
//! order are all significant and survive a load/store cycle.
//!
//! # Lexical structure
//!
//! | token | shape |
//! |---|---|
//! | comment | `//` through end of line |
//! | pragma | `#` + word characters + rest of line |
//! | string | `"…"`, `\` escapes `"` and `\` |
//! | identifier | letter, then letters/digits/`.`/`_` |
//! | punctuation | `=`, `{`, `}` |
//!
//! CRLF line endings are folded to LF before lexing and a trailing
//! newline is guaranteed, so end-of-file never needs special-casing.
//! Comments, whitespace and line breaks carry no meaning beyond
//! separating tokens.
//!
//! # Grammar
//!
//! ```text
//! Document      := Node*
//! Node          := Pragma | Setting
//! Setting       := Ident "=" ( Simple | WithMetadata | Table )
//! Simple        := String
//! WithMetadata  := "{" KeyValue+ "}"
//! Table         := "{" KeyValue* Row* "}"
//! Row           := "{" RowIdHeader? Setting* "}"
//! RowIdHeader   := "{" "rid" "=" String "}"
//! KeyValue      := Ident "=" String
//! ```
//!
//! A brace block containing only key/value pairs is a value with
//! metadata; an empty block or one whose pairs are followed by `{` is
//! a table.
//!
//! # Example document
//!
//! ```text
//! #version 8.1.0.default
//!
//! HOSTNAME = "mguard"
//! SNMP_CONTACT = {
//!   uuid = "8d1f…"
//!   value = "ops@example.com"
//! }
//! FIREWALL_RULES = {
//!   uuid = "77ab…"
//!   {
//!     { rid = "rule-1" }
//!     PROTOCOL = "tcp"
//!     COMMENT = "management access"
//!   }
//! }
//! ```
//!
//! # Canonical form
//!
//! Serialization always produces the same rendering for a given tree:
//!
//! - two spaces of indentation per nesting level,
//! - every string quoted, with `"` and `\` backslash-escaped,
//! - the row id header `{ rid = "…" }` on its own line,
//! - one blank line between a run of pragmas and a run of settings,
//! - a final newline.
//!
//! Parsing canonical text and re-serializing it is the identity; for
//! arbitrary well-formed input the result differs only in whitespace
//! normalization.
//!
//! # Row ids and references
//!
//! Rows may carry a `rid`. Within one table these ids are unique and
//! act as the stable key of the table merge. Settings elsewhere in the
//! document may store a `rowref` attribute naming such an id; the
//! reference is a plain string, surfaced by
//! [`Document::row_refs`](crate::Document::row_refs) but never
//! resolved by the crate.
