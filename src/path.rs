//! Dotted paths addressing settings inside a document.
//!
//! A path is a dot-separated sequence of tokens alternating between
//! setting names and decimal row indices, e.g.
//! `VPN_CONNECTION.0.TUNNEL.1.LOCAL`: descend into the table
//! `VPN_CONNECTION`, take row 0, descend into its `TUNNEL` table, take
//! row 1, and address the `LOCAL` setting inside that row.
//!
//! The first and last token must be names; a row index is only valid
//! directly after a name. Violations fail the parse with a typed error.

use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// One token of a setting path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathToken {
    /// A setting name.
    Name(String),
    /// A row index into the table addressed by the preceding name.
    Row(usize),
}

impl fmt::Display for PathToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathToken::Name(name) => f.write_str(name),
            PathToken::Row(index) => write!(f, "{index}"),
        }
    }
}

/// A parsed setting path.
///
/// ## Examples
///
/// ```rust
/// use mguard_cfg::SettingPath;
///
/// let path: SettingPath = "TABLE.0.NAME".parse().unwrap();
/// assert_eq!(path.to_string(), "TABLE.0.NAME");
/// assert!("0.TABLE".parse::<SettingPath>().is_err());
/// assert!("TABLE.0".parse::<SettingPath>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingPath(Vec<PathToken>);

impl SettingPath {
    /// Parses a path string; equivalent to [`str::parse`].
    pub fn parse(s: &str) -> Result<Self> {
        s.parse()
    }

    /// The tokens of the path, in order.
    #[must_use]
    pub fn tokens(&self) -> &[PathToken] {
        &self.0
    }

    /// The leading setting name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        match &self.0[0] {
            PathToken::Name(name) => name,
            // parsing guarantees the first token is a name
            PathToken::Row(_) => unreachable!("path starts with a row index"),
        }
    }

    /// `true` if the path consists of a single setting name.
    #[must_use]
    pub fn is_top_level(&self) -> bool {
        self.0.len() == 1
    }
}

fn is_name(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_row_index(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

impl FromStr for SettingPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::path(s, "path is empty"));
        }

        let mut tokens = Vec::new();
        let mut name_preceding = false;
        for token in s.split('.') {
            if is_name(token) {
                if name_preceding {
                    return Err(Error::path(s, format!("'{token}' not expected after a name")));
                }
                tokens.push(PathToken::Name(token.to_string()));
                name_preceding = true;
            } else if is_row_index(token) {
                if !name_preceding {
                    return Err(Error::path(
                        s,
                        format!("row index '{token}' must follow a setting name"),
                    ));
                }
                let index = token
                    .parse::<usize>()
                    .map_err(|_| Error::path(s, format!("row index '{token}' is out of range")))?;
                tokens.push(PathToken::Row(index));
                name_preceding = false;
            } else {
                return Err(Error::path(s, format!("'{token}' is not a valid path token")));
            }
        }

        if !name_preceding {
            return Err(Error::path(s, "path must end with a setting name"));
        }

        Ok(SettingPath(tokens))
    }
}

impl fmt::Display for SettingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{token}")?;
        }
        Ok(())
    }
}
