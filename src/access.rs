//! Access modifiers controlling merge permissions of a setting.
//!
//! An access modifier is stored as the string attribute `access` on a
//! setting. [`AccessModifier::Default`] is what applies when the
//! attribute is absent; it serializes identically to
//! [`AccessModifier::MayOverwrite`].

use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Merge permission of a setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessModifier {
    /// The setting must not be overwritten.
    MustNotOverwrite,
    /// The setting may be overwritten.
    MayOverwrite,
    /// The setting must be overwritten.
    MustOverwrite,
    /// The setting may be extended by appending rows (tables only).
    MayAppend,
    /// No modifier specified; behaves like [`AccessModifier::MayOverwrite`].
    Default,
}

impl AccessModifier {
    /// The string representation written to documents.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            AccessModifier::MustNotOverwrite => "must-not-overwrite",
            AccessModifier::MayOverwrite | AccessModifier::Default => "may-overwrite",
            AccessModifier::MustOverwrite => "must-overwrite",
            AccessModifier::MayAppend => "may-append",
        }
    }
}

impl fmt::Display for AccessModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessModifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "must-not-overwrite" => Ok(AccessModifier::MustNotOverwrite),
            "may-overwrite" => Ok(AccessModifier::MayOverwrite),
            "must-overwrite" => Ok(AccessModifier::MustOverwrite),
            "may-append" => Ok(AccessModifier::MayAppend),
            other => Err(Error::not_found("access modifier", other)),
        }
    }
}
