//! # mguard-cfg
//!
//! A toolkit for the configuration files of the mGuard industrial
//! security router family: parse, edit, merge, migrate and package
//! them without losing a byte of the parts you did not touch.
//!
//! ## What it handles
//!
//! - **ATV documents**: the textual, hierarchical configuration
//!   format. Parsed into a typed tree that preserves node order,
//!   attribute order, row ids and quoting, mutated in place and
//!   re-serialized canonically.
//! - **ECS containers**: the gzip-tar bundle a device imports — an ATV
//!   document plus a shadow file and two fixed companion blobs,
//!   optionally encrypted to a device certificate by an external
//!   collaborator.
//! - **Shadow files**: the embedded Unix-style credentials file, with
//!   SHA-512 crypt password handling.
//!
//! ## Quick start
//!
//! ```rust
//! use mguard_cfg::Document;
//!
//! let mut doc = mguard_cfg::from_str(
//!     "#version 8.1.0.default\n\nHOSTNAME = \"mguard\"\n",
//! ).unwrap();
//!
//! doc.set_simple("HOSTNAME", "edge-router").unwrap();
//! doc.set_simple("FIREWALL_RULES.0.PROTOCOL", "tcp").unwrap();
//!
//! assert!(doc.to_string().contains("edge-router"));
//! ```
//!
//! ## Merging
//!
//! Two documents merge setting by setting: scalar values overwrite,
//! tables merge row-wise keyed by row id, and an allowlist
//! ([`MergeConfiguration`]) can restrict which top-level settings are
//! taken over:
//!
//! ```rust
//! use mguard_cfg::{from_str, MergeConfiguration};
//!
//! let device = from_str("#version 8.1.0.default\n\nA = \"1\"\nB = \"2\"\n").unwrap();
//! let template = from_str("#version 8.1.0.default\n\nA = \"9\"\nB = \"8\"\n").unwrap();
//!
//! let config = MergeConfiguration::from_reader("A\n".as_bytes()).unwrap();
//! let merged = device.merge_selective(&template, &config).unwrap();
//!
//! assert!(merged.to_string().contains("A = \"9\""));
//! assert!(merged.to_string().contains("B = \"2\""));
//! ```
//!
//! ## Migrating
//!
//! Documents carry their schema version in the mandatory `version`
//! pragma. The built-in [`Migrator`] chain walks a document from its
//! version to a requested target, applying the schema rewrites along
//! the way:
//!
//! ```rust
//! use mguard_cfg::{from_str, Version};
//!
//! let doc = from_str("#version 7.5.0.default\n").unwrap();
//! let migrated = doc.migrate(&Version::new(8, 0, 2, "default")).unwrap();
//! assert_eq!(migrated.version().unwrap(), Version::new(8, 0, 2, "default"));
//! ```
//!
//! ## Design notes
//!
//! - The whole crate is synchronous and single-threaded; a document is
//!   owned by one logical writer, and cloning (a deep copy) is the way
//!   to branch a revision.
//! - No function performs I/O besides the explicit `from_file` /
//!   `to_file` / reader / writer helpers, which buffer fully before
//!   writing so no partial output is ever committed.
//! - Errors carry context (line/column, path, versions) and are never
//!   swallowed; see [`Error`].

pub mod access;
pub mod document;
pub mod ecs;
pub mod error;
pub mod format;
pub mod lexer;
pub mod map;
pub mod merge;
pub mod migrate;
mod migrations;
pub mod parser;
pub mod path;
pub mod ser;
pub mod shadow;
pub mod value;
pub mod version;

pub use access::AccessModifier;
pub use document::{Document, Node, Pragma};
pub use ecs::{Container, Encryptor};
pub use error::{Error, Result};
pub use map::AttrMap;
pub use merge::MergeConfiguration;
pub use migrate::{Migration, Migrator, VersionBump};
pub use migrations::VpnSchemaRework;
pub use path::{PathToken, SettingPath};
pub use ser::quote;
pub use shadow::ShadowFile;
pub use value::{Row, Setting, Table, Value};
pub use version::Version;

use std::io::Read;

/// Parses an ATV document from a string.
///
/// ## Examples
///
/// ```rust
/// let doc = mguard_cfg::from_str("#version 8.1.0.default\n").unwrap();
/// assert_eq!(doc.get_pragma("version"), Some("8.1.0.default"));
/// ```
///
/// ## Errors
///
/// Returns an error if the input is not well-formed ATV text or lacks
/// a parseable `version` pragma.
pub fn from_str(source: &str) -> Result<Document> {
    Document::parse(source)
}

/// Parses an ATV document from an I/O stream.
///
/// ## Errors
///
/// Returns an error if reading fails or the input is not a well-formed
/// document.
pub fn from_reader<R: Read>(reader: R) -> Result<Document> {
    Document::from_reader(reader)
}

/// Parses an ATV document from bytes.
///
/// ## Errors
///
/// Returns an error if the bytes are not valid UTF-8 or not a
/// well-formed document.
pub fn from_slice(bytes: &[u8]) -> Result<Document> {
    let source = std::str::from_utf8(bytes)
        .map_err(|err| Error::integrity(format!("document is not valid UTF-8: {err}")))?;
    Document::parse(source)
}
