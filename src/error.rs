//! Error types for the mGuard configuration toolkit.
//!
//! All fallible operations in this crate return [`Result`], a type alias
//! over the crate-wide [`Error`] enum. Errors never recover internally;
//! every failure propagates to the caller with enough context to locate
//! the affected construct:
//!
//! - parse errors carry line and column numbers,
//! - path errors carry the offending path text,
//! - migration errors carry source and target versions.
//!
//! ## Examples
//!
//! ```rust
//! use mguard_cfg::{from_str, Error};
//!
//! let result = from_str("NAME = \"unterminated");
//! match result {
//!     Err(Error::Syntax { line, .. }) => assert_eq!(line, 1),
//!     other => panic!("expected a syntax error, got {:?}", other),
//! }
//! ```

use thiserror::Error;

/// All errors that can occur while reading, editing or packaging
/// mGuard configuration documents.
#[derive(Debug, Error)]
pub enum Error {
    /// Lexical or grammatical failure; fatal to the whole parse.
    #[error("syntax error at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    /// A setting path could not be parsed or does not address a setting.
    #[error("invalid setting path '{path}': {message}")]
    Path { path: String, message: String },

    /// An operation required a value variant the setting does not have.
    #[error("setting '{path}': expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: String,
        found: String,
    },

    /// A referenced setting, table row or user is absent.
    #[error("{what} '{name}' does not exist")]
    NotFound { what: String, name: String },

    /// The version pragma is missing or not parseable.
    #[error("invalid document version: {0}")]
    InvalidVersion(String),

    /// A migration could not be carried out.
    #[error("migration from version {from} to version {to} failed: {message}")]
    Migration {
        from: String,
        to: String,
        message: String,
    },

    /// An ECS container or shadow file violates its format contract.
    #[error("integrity error: {0}")]
    Integrity(String),

    /// Password hashing or verification failed.
    #[error("password hashing failed: {0}")]
    Crypt(String),

    /// Underlying read/write failure, propagated verbatim.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates a syntax error with line and column information.
    pub fn syntax(line: usize, column: usize, message: impl Into<String>) -> Self {
        Error::Syntax {
            line,
            column,
            message: message.into(),
        }
    }

    /// Creates a path error for the given path text.
    pub fn path(path: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Path {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a type mismatch error for the setting at `path`.
    pub fn type_mismatch(
        path: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Error::TypeMismatch {
            path: path.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Creates a not-found error for a named entity (`what` names its kind).
    pub fn not_found(what: impl Into<String>, name: impl Into<String>) -> Self {
        Error::NotFound {
            what: what.into(),
            name: name.into(),
        }
    }

    /// Creates a version error.
    pub fn invalid_version(message: impl Into<String>) -> Self {
        Error::InvalidVersion(message.into())
    }

    /// Creates a migration error carrying both endpoint versions.
    pub fn migration(from: impl ToString, to: impl ToString, message: impl Into<String>) -> Self {
        Error::Migration {
            from: from.to_string(),
            to: to.to_string(),
            message: message.into(),
        }
    }

    /// Creates an integrity error for a malformed container or shadow file.
    pub fn integrity(message: impl Into<String>) -> Self {
        Error::Integrity(message.into())
    }

    /// Creates a crypt error.
    pub fn crypt(message: impl Into<String>) -> Self {
        Error::Crypt(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
