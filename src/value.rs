//! Setting values of an ATV document.
//!
//! Every [`Setting`] holds exactly one [`Value`], a tagged sum over the
//! three shapes the format allows:
//!
//! - [`Value::Simple`]: a single quoted string,
//! - [`Value::WithMetadata`]: an ordered list of key/value pairs
//!   (the payload lives under the `value` key; other keys carry
//!   metadata such as `uuid`, `access` or `rowref`),
//! - [`Value::Table`]: an attribute dictionary followed by an ordered
//!   list of [`Row`]s.
//!
//! The sum type makes the "exactly one variant" invariant structural;
//! there is no way to build a setting with zero or two values.
//!
//! ## Examples
//!
//! ```rust
//! use mguard_cfg::Setting;
//!
//! let setting = Setting::simple("HOSTNAME", "mguard");
//! assert!(setting.value.is_simple());
//! assert_eq!(setting.value_text().unwrap(), "mguard");
//! ```

use crate::map::AttrMap;
use crate::{Error, Result};

/// Attribute key holding the payload of a metadata value.
pub(crate) const VALUE_KEY: &str = "value";

/// Attribute key holding a reference to a table row id.
pub(crate) const ROWREF_KEY: &str = "rowref";

/// A named setting node.
#[derive(Debug, Clone, PartialEq)]
pub struct Setting {
    pub name: String,
    pub value: Value,
}

impl Setting {
    /// Creates a setting with a simple string value.
    pub fn simple(name: impl Into<String>, value: impl Into<String>) -> Self {
        Setting {
            name: name.into(),
            value: Value::Simple(value.into()),
        }
    }

    /// Creates a setting with the given value.
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Setting {
            name: name.into(),
            value,
        }
    }

    /// Returns the scalar payload of the setting.
    ///
    /// For a simple value this is the string itself; for a value with
    /// metadata it is the entry under the `value` key. Table-valued
    /// settings fail with a type mismatch.
    pub fn value_text(&self) -> Result<&str> {
        match &self.value {
            Value::Simple(text) => Ok(text),
            Value::WithMetadata(attrs) => attrs
                .get(VALUE_KEY)
                .ok_or_else(|| Error::not_found("attribute", format!("{}.value", self.name))),
            Value::Table(_) => Err(Error::type_mismatch(
                &self.name,
                "a scalar value",
                "a table",
            )),
        }
    }

    /// Collects all row ids below this setting, in document order.
    pub(crate) fn collect_row_ids(&self, out: &mut Vec<String>) {
        if let Value::Table(table) = &self.value {
            table.collect_row_ids(out);
        }
    }

    /// Collects all row references below this setting, in document order.
    pub(crate) fn collect_row_refs(&self, out: &mut Vec<String>) {
        match &self.value {
            Value::Simple(_) => {}
            Value::WithMetadata(attrs) => {
                if let Some(rowref) = attrs.get(ROWREF_KEY) {
                    out.push(rowref.to_string());
                }
            }
            Value::Table(table) => table.collect_row_refs(out),
        }
    }
}

/// The value of a setting; exactly one of three shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A single quoted string.
    Simple(String),
    /// An ordered key/value block carrying the payload plus metadata.
    WithMetadata(AttrMap),
    /// An attribute dictionary followed by rows.
    Table(Table),
}

impl Value {
    /// Returns `true` if the value is a simple string.
    #[inline]
    #[must_use]
    pub const fn is_simple(&self) -> bool {
        matches!(self, Value::Simple(_))
    }

    /// Returns `true` if the value is a key/value block with metadata.
    #[inline]
    #[must_use]
    pub const fn is_with_metadata(&self) -> bool {
        matches!(self, Value::WithMetadata(_))
    }

    /// Returns `true` if the value is a table.
    #[inline]
    #[must_use]
    pub const fn is_table(&self) -> bool {
        matches!(self, Value::Table(_))
    }

    /// If the value is a simple string, returns it.
    #[inline]
    #[must_use]
    pub fn as_simple(&self) -> Option<&str> {
        match self {
            Value::Simple(text) => Some(text),
            _ => None,
        }
    }

    /// If the value is a key/value block, returns its attributes.
    #[must_use]
    pub fn as_metadata(&self) -> Option<&AttrMap> {
        match self {
            Value::WithMetadata(attrs) => Some(attrs),
            _ => None,
        }
    }

    /// If the value is a table, returns it.
    #[must_use]
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Value::Table(table) => Some(table),
            _ => None,
        }
    }

    /// If the value is a table, returns it mutably.
    pub fn as_table_mut(&mut self) -> Option<&mut Table> {
        match self {
            Value::Table(table) => Some(table),
            _ => None,
        }
    }

    /// A short name for the variant, used in error messages.
    #[must_use]
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Value::Simple(_) => "a simple value",
            Value::WithMetadata(_) => "a value with metadata",
            Value::Table(_) => "a table",
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Simple(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Simple(value)
    }
}

impl From<Table> for Value {
    fn from(value: Table) -> Self {
        Value::Table(value)
    }
}

/// A table value: an attribute dictionary plus ordered rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub attributes: AttrMap,
    pub rows: Vec<Row>,
}

impl Table {
    /// Creates an empty table with no attributes and no rows.
    #[must_use]
    pub fn new() -> Self {
        Table::default()
    }

    /// Returns the index of the row with the given id, if any.
    #[must_use]
    pub fn row_index(&self, id: &str) -> Option<usize> {
        self.rows.iter().position(|row| row.id.as_deref() == Some(id))
    }

    fn collect_row_ids(&self, out: &mut Vec<String>) {
        for row in &self.rows {
            if let Some(id) = &row.id {
                out.push(id.clone());
            }
            for setting in &row.settings {
                setting.collect_row_ids(out);
            }
        }
    }

    fn collect_row_refs(&self, out: &mut Vec<String>) {
        for row in &self.rows {
            for setting in &row.settings {
                setting.collect_row_refs(out);
            }
        }
    }
}

/// A table row: an optional row id plus the settings it contains.
///
/// Row ids are the stable keys of the table merge: two rows with the
/// same id within one table are "the same row".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    pub id: Option<String>,
    pub settings: Vec<Setting>,
}

impl Row {
    /// Creates an empty row without a row id.
    #[must_use]
    pub fn new() -> Self {
        Row::default()
    }

    /// Creates an empty row with the given row id.
    pub fn with_id(id: impl Into<String>) -> Self {
        Row {
            id: Some(id.into()),
            settings: Vec::new(),
        }
    }

    /// Returns `true` if the row carries a row id.
    #[inline]
    #[must_use]
    pub fn has_id(&self) -> bool {
        self.id.is_some()
    }

    /// Returns `true` if both rows carry the same row id.
    #[inline]
    #[must_use]
    pub fn has_same_id(&self, other: &Row) -> bool {
        matches!((&self.id, &other.id), (Some(a), Some(b)) if a == b)
    }

    /// Returns the contained setting with the given name, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Setting> {
        self.settings.iter().find(|setting| setting.name == name)
    }

    /// Returns the contained setting with the given name mutably.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Setting> {
        self.settings.iter_mut().find(|setting| setting.name == name)
    }
}
