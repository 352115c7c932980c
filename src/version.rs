//! Document versions.
//!
//! An ATV document carries its schema version in the mandatory
//! `version` pragma, formatted `MAJOR.MINOR.PATCH.SUFFIX` (the suffix
//! is usually `default`). Ordering and equality are defined over the
//! numeric triple only; the suffix is carried along but never compared.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::{Error, Result};

/// A document schema version.
///
/// ## Examples
///
/// ```rust
/// use mguard_cfg::Version;
///
/// let a: Version = "8.0.2.default".parse().unwrap();
/// let b: Version = "8.1.0.default".parse().unwrap();
/// assert!(a < b);
/// assert_eq!(a, "8.0.2.custom".parse().unwrap());
/// assert_eq!(b.to_string(), "8.1.0.default");
/// ```
#[derive(Debug, Clone, Eq)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub suffix: String,
}

impl Version {
    /// Creates a version from its components.
    pub fn new(major: u32, minor: u32, patch: u32, suffix: impl Into<String>) -> Self {
        Version {
            major,
            minor,
            patch,
            suffix: suffix.into(),
        }
    }

    fn triple(&self) -> (u32, u32, u32) {
        (self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.splitn(4, '.');
        let mut numeric = |what: &str| -> Result<u32> {
            parts
                .next()
                .ok_or_else(|| Error::invalid_version(format!("'{s}' is missing the {what} part")))?
                .parse::<u32>()
                .map_err(|_| Error::invalid_version(format!("'{s}' has a non-numeric {what} part")))
        };

        let major = numeric("major")?;
        let minor = numeric("minor")?;
        let patch = numeric("patch")?;
        let suffix = parts.next().unwrap_or("").to_string();

        Ok(Version {
            major,
            minor,
            patch,
            suffix,
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if !self.suffix.is_empty() {
            write!(f, ".{}", self.suffix)?;
        }
        Ok(())
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.triple() == other.triple()
    }
}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.triple().hash(state);
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.triple().cmp(&other.triple())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_and_without_suffix() {
        let v: Version = "8.1.0.default".parse().unwrap();
        assert_eq!((v.major, v.minor, v.patch), (8, 1, 0));
        assert_eq!(v.suffix, "default");

        let v: Version = "7.5.0".parse().unwrap();
        assert_eq!(v.suffix, "");
        assert_eq!(v.to_string(), "7.5.0");
    }

    #[test]
    fn rejects_malformed_versions() {
        assert!("".parse::<Version>().is_err());
        assert!("8.1".parse::<Version>().is_err());
        assert!("8.x.0".parse::<Version>().is_err());
        assert!("v8.1.0".parse::<Version>().is_err());
    }

    #[test]
    fn ordering_ignores_suffix() {
        let a = Version::new(8, 0, 2, "default");
        let b = Version::new(8, 0, 2, "custom");
        let c = Version::new(8, 1, 0, "default");

        assert_eq!(a, b);
        assert!(a < c);
        assert!(c > b);
    }
}
