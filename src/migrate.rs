//! Version migration framework.
//!
//! A [`Migration`] transforms a document from one exact version to the
//! next and stamps the new version pragma. The [`Migrator`] holds an
//! ordered, ascending chain of migrations and walks a document along
//! it until the requested target version is reached.
//!
//! Migrations never mutate their input: each step clones the document,
//! rewrites the clone and returns it, so a failing chain leaves the
//! caller's document untouched.
//!
//! ## Examples
//!
//! ```rust
//! use mguard_cfg::{Document, Migrator, Version};
//!
//! let doc = Document::parse("#version 8.1.2.default\n").unwrap();
//! let target = Version::new(8, 1, 4, "default");
//!
//! let migrated = Migrator::with_builtin_chain()
//!     .migrate(&doc, &target)
//!     .unwrap();
//! assert_eq!(migrated.version().unwrap(), target);
//! ```

use tracing::info;

use crate::document::Document;
use crate::version::Version;
use crate::{Error, Result};

/// A transformation from one exact document version to the next.
pub trait Migration {
    /// The exact version the migration starts from.
    fn from_version(&self) -> Version;

    /// The exact version the migration produces.
    fn to_version(&self) -> Version;

    /// Transforms a clone of `doc` and stamps the new version pragma.
    fn apply(&self, doc: &Document) -> Result<Document>;
}

/// A pure version bump without content changes.
pub struct VersionBump {
    from: Version,
    to: Version,
}

impl VersionBump {
    pub fn new(from: Version, to: Version) -> Self {
        VersionBump { from, to }
    }
}

impl Migration for VersionBump {
    fn from_version(&self) -> Version {
        self.from.clone()
    }

    fn to_version(&self) -> Version {
        self.to.clone()
    }

    fn apply(&self, doc: &Document) -> Result<Document> {
        let mut next = doc.clone();
        next.set_version(&self.to);
        Ok(next)
    }
}

/// An ordered chain of migrations.
pub struct Migrator {
    steps: Vec<Box<dyn Migration>>,
}

impl Migrator {
    /// Creates a migrator without any registered steps.
    #[must_use]
    pub fn new() -> Self {
        Migrator { steps: Vec::new() }
    }

    /// Creates a migrator with the built-in migration chain.
    #[must_use]
    pub fn with_builtin_chain() -> Self {
        let mut migrator = Migrator::new();
        for step in crate::migrations::builtin_chain() {
            migrator.register(step);
        }
        migrator
    }

    /// Appends a migration to the chain. Registration order defines
    /// applicability; steps must be registered in ascending order.
    pub fn register(&mut self, step: Box<dyn Migration>) {
        self.steps.push(step);
    }

    /// Migrates `doc` to `target`.
    ///
    /// Each chain step applies when its source version matches the
    /// running document and its target does not exceed `target`. The
    /// operation fails if the document is newer than `target` or if the
    /// chain does not reach `target` exactly.
    pub fn migrate(&self, doc: &Document, target: &Version) -> Result<Document> {
        let mut version = doc.version()?;
        if version > *target {
            return Err(Error::migration(
                &version,
                target,
                "the document version is newer than the target version",
            ));
        }

        let mut running = doc.clone();
        for step in &self.steps {
            if step.from_version() == version && step.to_version() <= *target {
                info!(
                    from = %step.from_version(),
                    to = %step.to_version(),
                    "applying migration"
                );
                running = step.apply(&running)?;
                version = running.version()?;
            }
        }

        if version != *target {
            return Err(Error::migration(
                doc.version()?,
                target,
                format!("no migration path reaches the target version (stopped at {version})"),
            ));
        }

        Ok(running)
    }
}

impl Default for Migrator {
    fn default() -> Self {
        Migrator::new()
    }
}

impl Document {
    /// Migrates the document to `target` using the built-in chain.
    pub fn migrate(&self, target: &Version) -> Result<Document> {
        Migrator::with_builtin_chain().migrate(self, target)
    }
}
