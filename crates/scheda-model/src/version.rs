//! Semantic sheet versions driven by content hashing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A `major.minor.patch` sheet version.
///
/// Only minor and patch ever move: a keys-hash change bumps minor and resets
/// patch, a content-hash change bumps patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    /// Version assigned on the first run for a sheet.
    pub const BASELINE: Version = Version {
        major: 1,
        minor: 0,
        patch: 0,
    };

    #[must_use]
    pub fn bump_minor(self) -> Self {
        Self {
            major: self.major,
            minor: self.minor + 1,
            patch: 0,
        }
    }

    #[must_use]
    pub fn bump_patch(self) -> Self {
        Self {
            patch: self.patch + 1,
            ..self
        }
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::BASELINE
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid version string '{input}': {message}")]
pub struct VersionParseError {
    pub input: String,
    pub message: String,
}

impl FromStr for Version {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |message: &str| VersionParseError {
            input: s.to_string(),
            message: message.to_string(),
        };
        let mut parts = s.trim().splitn(3, '.');
        let mut next = |name: &str| {
            parts
                .next()
                .ok_or_else(|| invalid(&format!("missing {name} component")))?
                .parse::<u32>()
                .map_err(|_| invalid(&format!("non-numeric {name} component")))
        };
        let major = next("major")?;
        let minor = next("minor")?;
        let patch = next("patch")?;
        Ok(Self {
            major,
            minor,
            patch,
        })
    }
}

impl TryFrom<String> for Version {
    type Error = VersionParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Version> for String {
    fn from(version: Version) -> Self {
        version.to_string()
    }
}

/// Persisted per-sheet versioning state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
    pub version: Version,
    pub content_hash: String,
    pub keys_hash: String,
}

impl VersionRecord {
    pub fn baseline(content_hash: String, keys_hash: String) -> Self {
        Self {
            version: Version::BASELINE,
            content_hash,
            keys_hash,
        }
    }
}
