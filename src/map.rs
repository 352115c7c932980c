//! Ordered attribute dictionary for ATV settings.
//!
//! This module provides [`AttrMap`], a wrapper around [`IndexMap`] that
//! maintains insertion order for the key/value pairs attached to settings
//! (metadata blocks and table attribute dictionaries). Insertion order is
//! part of the ATV wire format: re-serializing a document must emit the
//! attributes in the order they were read.
//!
//! ## Why IndexMap?
//!
//! - **Byte-faithful output**: attributes serialize in the order they
//!   appeared in the source document
//! - **Order-preserving removal**: [`AttrMap::remove`] shifts the
//!   remaining entries instead of swapping
//!
//! ## Examples
//!
//! ```rust
//! use mguard_cfg::AttrMap;
//!
//! let mut attrs = AttrMap::new();
//! attrs.set("uuid", "a0b1");
//! attrs.set("value", "1");
//!
//! let keys: Vec<_> = attrs.keys().collect();
//! assert_eq!(keys, vec!["uuid", "value"]);
//! ```

use indexmap::IndexMap;

/// An insertion-ordered map of attribute names to string values.
///
/// Lookups are keyed by name; iteration yields entries in insertion
/// order, which the canonical serializer relies on.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttrMap(IndexMap<String, String>);

impl AttrMap {
    /// Creates an empty `AttrMap`.
    #[must_use]
    pub fn new() -> Self {
        AttrMap(IndexMap::new())
    }

    /// Returns the value associated with `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Returns `true` if the map contains `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Sets `key` to `value`, overwriting an existing entry in place or
    /// appending a new one at the end.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Removes the entry with `key`, preserving the order of the
    /// remaining entries. Returns `true` if an entry was removed.
    pub fn remove(&mut self, key: &str) -> bool {
        self.0.shift_remove(key).is_some()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys, in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Returns an iterator over the entries, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for AttrMap {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        AttrMap(IndexMap::from_iter(iter))
    }
}

impl<'a> IntoIterator for &'a AttrMap {
    type Item = (&'a str, &'a str);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a str)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.0.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_appends_and_overwrites_in_place() {
        let mut attrs = AttrMap::new();
        attrs.set("a", "1");
        attrs.set("b", "2");
        attrs.set("a", "3");

        assert_eq!(attrs.get("a"), Some("3"));
        let keys: Vec<_> = attrs.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn remove_preserves_order() {
        let mut attrs = AttrMap::new();
        attrs.set("a", "1");
        attrs.set("b", "2");
        attrs.set("c", "3");

        assert!(attrs.remove("b"));
        assert!(!attrs.remove("b"));

        let keys: Vec<_> = attrs.keys().collect();
        assert_eq!(keys, vec!["a", "c"]);
    }
}
