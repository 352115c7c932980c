//! Merge configuration: the allowlist of settings a selective merge
//! may touch.
//!
//! The on-disk format is plain text, one setting path per line. `#`
//! starts a comment that runs to the end of the line; blank lines are
//! ignored. An empty configuration places no restriction: every
//! setting merges.
//!
//! ## Examples
//!
//! ```rust
//! use mguard_cfg::MergeConfiguration;
//!
//! let text = "\
//! \x23 settings to take over from the device template
//! HOSTNAME
//! SNMP_SYSTEM_CONTACT  # keep in sync with asset tracking
//! ";
//! let config = MergeConfiguration::from_reader(text.as_bytes()).unwrap();
//! assert!(config.should_merge(&"HOSTNAME".parse().unwrap()));
//! assert!(!config.should_merge(&"NTP_SERVER".parse().unwrap()));
//! ```

use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::path::SettingPath;
use crate::{Error, Result};

/// Defines which settings a selective merge takes over.
#[derive(Debug, Clone, Default)]
pub struct MergeConfiguration {
    paths: Vec<SettingPath>,
}

impl MergeConfiguration {
    /// Creates an empty configuration that merges every setting.
    #[must_use]
    pub fn new() -> Self {
        MergeConfiguration::default()
    }

    /// Loads a configuration from `reader`.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut config = MergeConfiguration::new();

        for (line_no, line) in BufReader::new(reader).lines().enumerate() {
            let line = line?;
            let text = match line.find('#') {
                Some(position) => &line[..position],
                None => &line,
            };
            let text = text.trim();
            if text.is_empty() {
                continue;
            }

            let path: SettingPath = text.parse().map_err(|err| {
                Error::path(
                    text,
                    format!("merge configuration line {}: {err}", line_no + 1),
                )
            })?;
            config.paths.push(path);
        }

        Ok(config)
    }

    /// Loads a configuration from the file at `path`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_reader(std::fs::File::open(path)?)
    }

    /// Adds a path to the allowlist.
    pub fn add(&mut self, path: SettingPath) {
        self.paths.push(path);
    }

    /// The allowlisted paths, in load order.
    #[must_use]
    pub fn paths(&self) -> &[SettingPath] {
        &self.paths
    }

    /// Whether the setting addressed by `path` should be merged.
    ///
    /// Matching compares the canonical path renderings. An empty
    /// configuration matches everything.
    #[must_use]
    pub fn should_merge(&self, path: &SettingPath) -> bool {
        if self.paths.is_empty() {
            return true;
        }
        let rendered = path.to_string();
        self.paths.iter().any(|entry| entry.to_string() == rendered)
    }
}
