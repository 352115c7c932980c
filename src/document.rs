//! The ATV document model.
//!
//! A [`Document`] is an ordered sequence of nodes, each either a
//! [`Pragma`] (`#name value`) or a [`Setting`]. The tree preserves
//! everything the wire format carries: node order, attribute order, row
//! ids and the distinction between the three value shapes, so a loaded
//! document serializes back to its canonical form byte for byte.
//!
//! Documents are mutated in place through typed setters; a deep
//! [`Clone`] is the idiomatic way to derive a new revision without
//! disturbing the original. A document is owned by a single logical
//! writer; there is no internal locking.
//!
//! ## Examples
//!
//! ```rust
//! use mguard_cfg::Document;
//!
//! let mut doc = Document::parse("#version 8.1.0.default\n\nNAME = \"a\"\n").unwrap();
//! doc.set_simple("NAME", "b").unwrap();
//! assert_eq!(doc.to_string(), "#version 8.1.0.default\n\nNAME = \"b\"\n");
//! ```

use std::fmt;
use std::io::{Read, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::access::AccessModifier;
use crate::map::AttrMap;
use crate::merge::MergeConfiguration;
use crate::parser::Parser;
use crate::path::{PathToken, SettingPath};
use crate::ser;
use crate::value::{Row, Setting, Table, Value};
use crate::version::Version;
use crate::{Error, Result};

/// Attribute key holding the uuid of a setting.
const UUID_KEY: &str = "uuid";

/// Attribute key holding the access modifier of a setting.
const ACCESS_KEY: &str = "access";

/// A `#name value` directive at the top of a document.
///
/// Every document carries exactly one `version` pragma; further pragmas
/// are preserved verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct Pragma {
    pub name: String,
    pub value: String,
}

/// A top-level document node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Pragma(Pragma),
    Setting(Setting),
}

/// An mGuard configuration document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    pub(crate) fn from_nodes(nodes: Vec<Node>) -> Self {
        Document { nodes }
    }

    /// Parses ATV text into a document.
    ///
    /// The input is canonicalized first (CRLF folded to LF, trailing
    /// newline ensured). The mandatory `version` pragma is validated;
    /// a document without one is rejected.
    pub fn parse(source: &str) -> Result<Self> {
        let doc = Parser::new(source)?.parse_document()?;
        doc.version()?;
        Ok(doc)
    }

    /// Reads and parses a document from `reader`.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut source = String::new();
        reader.read_to_string(&mut source)?;
        Self::parse(&source)
    }

    /// Reads and parses a document from the file at `path`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::parse(&source)
    }

    /// Writes the canonical rendering of the document to `writer`.
    ///
    /// The document is rendered into a buffer first, so a failing
    /// writer never receives a partial document prefix of one render
    /// and the suffix of another.
    pub fn to_writer<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(self.to_string().as_bytes())?;
        Ok(())
    }

    /// Writes the canonical rendering of the document to the file at
    /// `path`, creating parent directories as needed.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_string())?;
        Ok(())
    }

    /// The document's nodes, in order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Iterates over the top-level settings, in document order.
    pub fn settings(&self) -> impl Iterator<Item = &Setting> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Setting(setting) => Some(setting),
            Node::Pragma(_) => None,
        })
    }

    /// Iterates over the pragmas, in document order.
    pub fn pragmas(&self) -> impl Iterator<Item = &Pragma> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Pragma(pragma) => Some(pragma),
            Node::Setting(_) => None,
        })
    }

    // ----- pragmas ------------------------------------------------------

    /// Returns the value of the pragma with the given name.
    #[must_use]
    pub fn get_pragma(&self, name: &str) -> Option<&str> {
        self.pragmas()
            .find(|pragma| pragma.name == name)
            .map(|pragma| pragma.value.as_str())
    }

    /// Sets the pragma with the given name, updating an existing one in
    /// place or inserting a new one after the last pragma.
    pub fn set_pragma(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();

        for node in &mut self.nodes {
            if let Node::Pragma(pragma) = node {
                if pragma.name == name {
                    pragma.value = value;
                    return;
                }
            }
        }

        let insert_at = self
            .nodes
            .iter()
            .rposition(|node| matches!(node, Node::Pragma(_)))
            .map_or(0, |index| index + 1);
        self.nodes.insert(insert_at, Node::Pragma(Pragma { name, value }));
    }

    /// Returns the document version from the `version` pragma.
    pub fn version(&self) -> Result<Version> {
        let value = self.get_pragma("version").ok_or_else(|| {
            Error::invalid_version("the document does not contain a version pragma")
        })?;
        value.parse()
    }

    /// Stamps the document with the given version.
    pub fn set_version(&mut self, version: &Version) {
        self.set_pragma("version", version.to_string());
    }

    // ----- settings -----------------------------------------------------

    fn top_level(&self, name: &str) -> Option<&Setting> {
        self.settings().find(|setting| setting.name == name)
    }

    fn top_level_index(&self, name: &str) -> Option<usize> {
        self.nodes
            .iter()
            .position(|node| matches!(node, Node::Setting(setting) if setting.name == name))
    }

    /// Returns the setting addressed by `path`, or `None` if any
    /// segment of the path does not exist.
    pub fn get_setting(&self, path: &str) -> Result<Option<&Setting>> {
        let parsed: SettingPath = path.parse()?;
        self.get_setting_at(&parsed)
    }

    /// Returns the setting addressed by the parsed `path`.
    pub fn get_setting_at(&self, path: &SettingPath) -> Result<Option<&Setting>> {
        match self.top_level(path.first_name()) {
            Some(setting) => navigate(setting, &path.tokens()[1..], path),
            None => Ok(None),
        }
    }

    /// Returns the setting addressed by `path` mutably.
    pub fn get_setting_mut(&mut self, path: &str) -> Result<Option<&mut Setting>> {
        let parsed: SettingPath = path.parse()?;
        let Some(index) = self.top_level_index(parsed.first_name()) else {
            return Ok(None);
        };
        match &mut self.nodes[index] {
            Node::Setting(setting) => navigate_mut(setting, &parsed.tokens()[1..], &parsed),
            Node::Pragma(_) => unreachable!("top_level_index returned a pragma"),
        }
    }

    /// Replaces the value of the top-level setting with the same name,
    /// or appends the setting at the end of the document if absent.
    ///
    /// When the stored value already serializes identically to the
    /// incoming one, the node is left untouched.
    pub fn set_setting(&mut self, setting: Setting) {
        for node in &mut self.nodes {
            if let Node::Setting(existing) = node {
                if existing.name == setting.name {
                    let before = ser::setting_to_string(existing);
                    let after = ser::setting_to_string(&setting);
                    if before == after {
                        debug!(setting = %setting.name, "setting unchanged");
                    } else {
                        debug!(setting = %setting.name, "setting changed");
                        *existing = setting;
                    }
                    return;
                }
            }
        }

        self.nodes.push(Node::Setting(setting));
    }

    /// Sets the setting at `path` to a simple string value, creating
    /// intermediate tables and rows as needed.
    pub fn set_simple(&mut self, path: &str, value: impl Into<String>) -> Result<()> {
        let setting = self.create_placeholder(path)?;
        setting.value = Value::Simple(value.into());
        Ok(())
    }

    /// Ensures every node along `path` exists and returns the leaf
    /// setting. Missing intermediate rows are created empty, up to the
    /// requested index; a newly created leaf holds an empty simple
    /// value.
    pub fn create_placeholder(&mut self, path: &str) -> Result<&mut Setting> {
        let parsed: SettingPath = path.parse()?;
        let tokens = parsed.tokens();
        let name = parsed.first_name();

        let index = match self.top_level_index(name) {
            Some(index) => index,
            None => {
                let value = if tokens.len() == 1 {
                    Value::Simple(String::new())
                } else {
                    Value::Table(Table::new())
                };
                self.nodes.push(Node::Setting(Setting::new(name, value)));
                self.nodes.len() - 1
            }
        };

        match &mut self.nodes[index] {
            Node::Setting(setting) => create_in_setting(setting, &tokens[1..], &parsed),
            Node::Pragma(_) => unreachable!("top_level_index returned a pragma"),
        }
    }

    /// Removes the setting addressed by `path`. A path that does not
    /// address an existing setting is a no-op.
    pub fn remove_setting(&mut self, path: &str) -> Result<()> {
        let parsed: SettingPath = path.parse()?;
        let tokens = parsed.tokens();

        let Some(index) = self.top_level_index(parsed.first_name()) else {
            return Ok(());
        };
        if tokens.len() == 1 {
            self.nodes.remove(index);
            return Ok(());
        }
        match &mut self.nodes[index] {
            Node::Setting(setting) => remove_in_setting(setting, &tokens[1..], &parsed),
            Node::Pragma(_) => unreachable!("top_level_index returned a pragma"),
        }
    }

    // ----- attributes ---------------------------------------------------

    /// Returns the attribute `key` of the setting at `path`.
    ///
    /// Simple-valued settings have no attributes; the result is `None`.
    pub fn get_attribute(&self, path: &str, key: &str) -> Result<Option<String>> {
        let Some(setting) = self.get_setting(path)? else {
            return Ok(None);
        };
        let value = match &setting.value {
            Value::Simple(_) => None,
            Value::WithMetadata(attrs) => attrs.get(key),
            Value::Table(table) => table.attributes.get(key),
        };
        Ok(value.map(str::to_string))
    }

    /// Sets the attribute `key` on the setting at `path`.
    ///
    /// A simple-valued setting is promoted to a value with metadata,
    /// keeping its payload under the `value` key.
    pub fn set_attribute(&mut self, path: &str, key: &str, value: &str) -> Result<()> {
        let Some(setting) = self.get_setting_mut(path)? else {
            return Err(Error::not_found("setting", path));
        };
        match &mut setting.value {
            Value::Simple(text) => {
                let mut attrs = AttrMap::new();
                attrs.set(key, value);
                attrs.set(crate::value::VALUE_KEY, text.clone());
                setting.value = Value::WithMetadata(attrs);
            }
            Value::WithMetadata(attrs) => attrs.set(key, value),
            Value::Table(table) => table.attributes.set(key, value),
        }
        Ok(())
    }

    /// Removes the attribute `key` from the setting at `path`.
    ///
    /// When only the `value` key remains afterwards, the setting is
    /// demoted back to a simple value.
    pub fn remove_attribute(&mut self, path: &str, key: &str) -> Result<()> {
        let Some(setting) = self.get_setting_mut(path)? else {
            return Err(Error::not_found("setting", path));
        };
        match &mut setting.value {
            Value::Simple(_) => {}
            Value::WithMetadata(attrs) => {
                if attrs.remove(key) && attrs.len() == 1 {
                    if let Some(text) = attrs.get(crate::value::VALUE_KEY) {
                        setting.value = Value::Simple(text.to_string());
                    }
                }
            }
            Value::Table(table) => {
                table.attributes.remove(key);
            }
        }
        Ok(())
    }

    /// Returns the uuid associated with the setting at `path`.
    pub fn get_uuid(&self, path: &str) -> Result<Option<String>> {
        self.get_attribute(path, UUID_KEY)
    }

    /// Associates a uuid with the setting at `path`.
    pub fn set_uuid(&mut self, path: &str, uuid: &str) -> Result<()> {
        self.set_attribute(path, UUID_KEY, uuid)
    }

    /// Removes the uuid of the setting at `path`.
    pub fn remove_uuid(&mut self, path: &str) -> Result<()> {
        self.remove_attribute(path, UUID_KEY)
    }

    /// Returns the access modifier of the setting at `path`.
    pub fn get_access(&self, path: &str) -> Result<Option<AccessModifier>> {
        match self.get_attribute(path, ACCESS_KEY)? {
            Some(value) => Ok(Some(value.parse()?)),
            None => Ok(None),
        }
    }

    /// Sets the access modifier of the setting at `path`.
    pub fn set_access(&mut self, path: &str, access: AccessModifier) -> Result<()> {
        self.set_attribute(path, ACCESS_KEY, access.as_str())
    }

    /// Removes the access modifier of the setting at `path`.
    pub fn remove_access(&mut self, path: &str) -> Result<()> {
        self.remove_attribute(path, ACCESS_KEY)
    }

    // ----- merging ------------------------------------------------------

    /// Merges rows of a table-valued setting into the document: rows
    /// sharing a row id with an existing row replace it in place, all
    /// other rows are appended in input order. A document that does not
    /// contain the setting yet receives it verbatim.
    pub fn merge_table_setting(&mut self, setting: &Setting) -> Result<()> {
        let Value::Table(incoming) = &setting.value else {
            return Err(Error::type_mismatch(
                &setting.name,
                "a table",
                setting.value.kind(),
            ));
        };

        for node in &mut self.nodes {
            if let Node::Setting(existing) = node {
                if existing.name == setting.name {
                    let table = match &mut existing.value {
                        Value::Table(table) => table,
                        other => {
                            return Err(Error::type_mismatch(
                                &setting.name,
                                "a table",
                                other.kind(),
                            ));
                        }
                    };

                    for row in &incoming.rows {
                        match row.id.as_deref().and_then(|id| table.row_index(id)) {
                            Some(position) => {
                                debug!(
                                    setting = %setting.name,
                                    row = row.id.as_deref().unwrap_or(""),
                                    "replacing table row"
                                );
                                table.rows[position] = row.clone();
                            }
                            None => {
                                debug!(setting = %setting.name, "appending table row");
                                table.rows.push(row.clone());
                            }
                        }
                    }
                    return Ok(());
                }
            }
        }

        self.nodes.push(Node::Setting(setting.clone()));
        Ok(())
    }

    /// Merges all settings of `other` into a copy of this document.
    pub fn merge(&self, other: &Document) -> Result<Document> {
        self.merge_selective(other, &MergeConfiguration::new())
    }

    /// Merges the settings of `other` selected by `config` into a copy
    /// of this document. An empty configuration selects every setting.
    ///
    /// Scalar settings overwrite, table settings merge row-wise keyed
    /// by row id. A setting whose variant class differs between the two
    /// documents fails the merge.
    pub fn merge_selective(
        &self,
        other: &Document,
        config: &MergeConfiguration,
    ) -> Result<Document> {
        let mut merged = self.clone();

        for setting in other.settings() {
            let path: SettingPath = setting.name.parse()?;
            if !config.should_merge(&path) {
                debug!(setting = %setting.name, "setting not in merge list, skipping");
                continue;
            }

            info!(setting = %setting.name, "merging setting");
            match &setting.value {
                Value::Simple(_) | Value::WithMetadata(_) => {
                    if let Some(existing) = merged.top_level(&setting.name) {
                        if existing.value.is_table() {
                            return Err(Error::type_mismatch(
                                &setting.name,
                                "a scalar value",
                                "a table",
                            ));
                        }
                    }
                    merged.set_setting(setting.clone());
                }
                Value::Table(_) => merged.merge_table_setting(setting)?,
            }
        }

        Ok(merged)
    }

    // ----- row inventory ------------------------------------------------

    /// Collects every row id in the document, in document order.
    #[must_use]
    pub fn row_ids(&self) -> Vec<String> {
        let mut out = Vec::new();
        for setting in self.settings() {
            setting.collect_row_ids(&mut out);
        }
        out
    }

    /// Collects every row reference (`rowref` attribute value) in the
    /// document, in document order. References are surfaced, never
    /// resolved.
    #[must_use]
    pub fn row_refs(&self) -> Vec<String> {
        let mut out = Vec::new();
        for setting in self.settings() {
            setting.collect_row_refs(&mut out);
        }
        out
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        ser::write_document(self, &mut out);
        f.write_str(&out)
    }
}

// ----- path navigation ----------------------------------------------

fn split_step<'t>(
    tokens: &'t [PathToken],
    path: &SettingPath,
) -> Result<(usize, &'t str, &'t [PathToken])> {
    match tokens {
        [PathToken::Row(index), PathToken::Name(name), rest @ ..] => {
            Ok((*index, name.as_str(), rest))
        }
        _ => Err(Error::path(
            path.to_string(),
            "path does not alternate between names and row indices",
        )),
    }
}

fn navigate<'a>(
    setting: &'a Setting,
    tokens: &[PathToken],
    path: &SettingPath,
) -> Result<Option<&'a Setting>> {
    if tokens.is_empty() {
        return Ok(Some(setting));
    }
    let (index, name, rest) = split_step(tokens, path)?;
    let table = match &setting.value {
        Value::Table(table) => table,
        other => {
            return Err(Error::type_mismatch(path.to_string(), "a table", other.kind()));
        }
    };
    let Some(row) = table.rows.get(index) else {
        return Ok(None);
    };
    match row.get(name) {
        Some(inner) => navigate(inner, rest, path),
        None => Ok(None),
    }
}

fn navigate_mut<'a>(
    setting: &'a mut Setting,
    tokens: &[PathToken],
    path: &SettingPath,
) -> Result<Option<&'a mut Setting>> {
    if tokens.is_empty() {
        return Ok(Some(setting));
    }
    let (index, name, rest) = split_step(tokens, path)?;
    let table = match &mut setting.value {
        Value::Table(table) => table,
        other => {
            return Err(Error::type_mismatch(path.to_string(), "a table", other.kind()));
        }
    };
    let Some(row) = table.rows.get_mut(index) else {
        return Ok(None);
    };
    match row.get_mut(name) {
        Some(inner) => navigate_mut(inner, rest, path),
        None => Ok(None),
    }
}

fn create_in_setting<'a>(
    setting: &'a mut Setting,
    tokens: &[PathToken],
    path: &SettingPath,
) -> Result<&'a mut Setting> {
    if tokens.is_empty() {
        return Ok(setting);
    }
    let (index, name, rest) = split_step(tokens, path)?;
    let table = match &mut setting.value {
        Value::Table(table) => table,
        other => {
            return Err(Error::type_mismatch(path.to_string(), "a table", other.kind()));
        }
    };

    while table.rows.len() <= index {
        table.rows.push(Row::new());
    }
    let row = &mut table.rows[index];

    let position = match row.settings.iter().position(|s| s.name == name) {
        Some(position) => position,
        None => {
            let value = if rest.is_empty() {
                Value::Simple(String::new())
            } else {
                Value::Table(Table::new())
            };
            row.settings.push(Setting::new(name, value));
            row.settings.len() - 1
        }
    };
    create_in_setting(&mut row.settings[position], rest, path)
}

fn remove_in_setting(setting: &mut Setting, tokens: &[PathToken], path: &SettingPath) -> Result<()> {
    let (index, name, rest) = split_step(tokens, path)?;
    let table = match &mut setting.value {
        Value::Table(table) => table,
        other => {
            return Err(Error::type_mismatch(path.to_string(), "a table", other.kind()));
        }
    };
    let Some(row) = table.rows.get_mut(index) else {
        return Ok(());
    };
    let Some(position) = row.settings.iter().position(|s| s.name == name) else {
        return Ok(());
    };
    if rest.is_empty() {
        row.settings.remove(position);
        Ok(())
    } else {
        remove_in_setting(&mut row.settings[position], rest, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = concat!(
        "#version 8.1.0.default\n",
        "\n",
        "NAME = \"a\"\n",
        "T = {\n",
        "  uuid = \"U\"\n",
        "  {\n",
        "    { rid = \"R1\" }\n",
        "    INNER = \"1\"\n",
        "  }\n",
        "}\n",
    );

    #[test]
    fn round_trips_canonically() {
        let doc = Document::parse(SAMPLE).unwrap();
        assert_eq!(doc.to_string(), SAMPLE);
    }

    #[test]
    fn rejects_documents_without_version() {
        assert!(Document::parse("NAME = \"a\"\n").is_err());
    }

    #[test]
    fn navigates_paths() {
        let doc = Document::parse(SAMPLE).unwrap();
        let inner = doc.get_setting("T.0.INNER").unwrap().unwrap();
        assert_eq!(inner.value.as_simple(), Some("1"));

        assert!(doc.get_setting("T.1.INNER").unwrap().is_none());
        assert!(doc.get_setting("T.0.MISSING").unwrap().is_none());
        assert!(doc.get_setting("NAME.0.X").is_err());
    }

    #[test]
    fn create_placeholder_builds_rows_up_to_index() {
        let mut doc = Document::parse("#version 8.1.0.default\n").unwrap();
        doc.set_simple("T.2.X", "x").unwrap();

        let table = doc
            .get_setting("T")
            .unwrap()
            .unwrap()
            .value
            .as_table()
            .unwrap();
        assert_eq!(table.rows.len(), 3);
        assert!(table.rows[0].settings.is_empty());
        assert!(table.rows[1].settings.is_empty());
        assert_eq!(
            doc.get_setting("T.2.X").unwrap().unwrap().value.as_simple(),
            Some("x")
        );
    }

    #[test]
    fn remove_is_a_no_op_for_missing_paths() {
        let mut doc = Document::parse(SAMPLE).unwrap();
        let before = doc.to_string();
        doc.remove_setting("MISSING").unwrap();
        doc.remove_setting("T.5.INNER").unwrap();
        doc.remove_setting("T.0.MISSING").unwrap();
        assert_eq!(doc.to_string(), before);

        doc.remove_setting("T.0.INNER").unwrap();
        assert!(doc.get_setting("T.0.INNER").unwrap().is_none());
        doc.remove_setting("NAME").unwrap();
        assert!(doc.get_setting("NAME").unwrap().is_none());
    }

    #[test]
    fn set_pragma_inserts_after_last_pragma() {
        let mut doc = Document::parse(SAMPLE).unwrap();
        doc.set_pragma("flavor", "test");

        let pragmas: Vec<_> = doc.pragmas().map(|p| p.name.as_str()).collect();
        assert_eq!(pragmas, vec!["version", "flavor"]);
        assert!(doc.to_string().starts_with(
            "#version 8.1.0.default\n#flavor test\n\nNAME"
        ));
    }

    #[test]
    fn attribute_promotion_and_demotion() {
        let mut doc = Document::parse("#version 8.1.0.default\n\nX = \"v\"\n").unwrap();

        doc.set_uuid("X", "U1").unwrap();
        assert_eq!(
            doc.to_string(),
            "#version 8.1.0.default\n\nX = {\n  uuid = \"U1\"\n  value = \"v\"\n}\n"
        );
        assert_eq!(doc.get_uuid("X").unwrap().as_deref(), Some("U1"));

        doc.remove_uuid("X").unwrap();
        assert_eq!(doc.to_string(), "#version 8.1.0.default\n\nX = \"v\"\n");
    }

    #[test]
    fn access_modifier_round_trip() {
        let mut doc = Document::parse("#version 8.1.0.default\n\nX = \"v\"\n").unwrap();
        assert_eq!(doc.get_access("X").unwrap(), None);

        doc.set_access("X", AccessModifier::MayAppend).unwrap();
        assert_eq!(doc.get_access("X").unwrap(), Some(AccessModifier::MayAppend));

        doc.set_access("X", AccessModifier::Default).unwrap();
        assert_eq!(
            doc.get_access("X").unwrap(),
            Some(AccessModifier::MayOverwrite)
        );
    }

    #[test]
    fn set_setting_suppresses_equal_values() {
        let mut doc = Document::parse(SAMPLE).unwrap();
        let before = doc.to_string();
        doc.set_setting(Setting::simple("NAME", "a"));
        assert_eq!(doc.to_string(), before);

        doc.set_setting(Setting::simple("NAME", "b"));
        assert_eq!(
            doc.get_setting("NAME").unwrap().unwrap().value.as_simple(),
            Some("b")
        );
    }

    #[test]
    fn clone_is_independent() {
        let doc = Document::parse(SAMPLE).unwrap();
        let before = doc.to_string();

        let mut copy = doc.clone();
        copy.set_simple("NAME", "changed").unwrap();
        copy.set_simple("T.0.INNER", "changed").unwrap();

        assert_eq!(doc.to_string(), before);
    }

    #[test]
    fn row_inventory() {
        let doc = Document::parse(concat!(
            "#version 8.1.0.default\n",
            "REF = {\n  rowref = \"R1\"\n  value = \"x\"\n}\n",
            "T = {\n  {\n    { rid = \"R1\" }\n  }\n  {\n    { rid = \"R2\" }\n  }\n}\n",
        ))
        .unwrap();

        assert_eq!(doc.row_ids(), vec!["R1", "R2"]);
        assert_eq!(doc.row_refs(), vec!["R1"]);
    }
}
