//! TypeScript language versions known to the rewriter.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A TypeScript release, ordered from oldest to newest.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(try_from = "String", into = "String")]
pub enum TypeScriptVersion {
    /// Anything older than 2.0.
    Before2_0,
    /// TypeScript 2.0
    V2_0,
    /// TypeScript 2.1
    V2_1,
    /// TypeScript 2.2
    V2_2,
    /// TypeScript 2.3
    V2_3,
    /// TypeScript 2.4
    V2_4,
    /// TypeScript 2.5
    V2_5,
    /// TypeScript 2.6
    V2_6,
    /// TypeScript 2.7
    V2_7,
    /// TypeScript 2.8
    V2_8,
    /// TypeScript 2.9
    V2_9,
    /// TypeScript 3.0
    V3_0,
    /// TypeScript 3.1
    V3_1,
    /// TypeScript 3.2
    V3_2,
    /// TypeScript 3.3
    V3_3,
    /// TypeScript 3.4 (`as const`)
    V3_4,
    /// TypeScript 3.5
    V3_5,
    /// TypeScript 3.6
    V3_6,
    /// TypeScript 3.7 (`?.`, `??`, assertion signatures)
    V3_7,
    /// TypeScript 3.8 (`export * as ns`)
    #[default]
    V3_8,
}

impl TypeScriptVersion {
    /// Every version, oldest first.
    pub const ALL: [Self; 20] = [
        Self::Before2_0,
        Self::V2_0,
        Self::V2_1,
        Self::V2_2,
        Self::V2_3,
        Self::V2_4,
        Self::V2_5,
        Self::V2_6,
        Self::V2_7,
        Self::V2_8,
        Self::V2_9,
        Self::V3_0,
        Self::V3_1,
        Self::V3_2,
        Self::V3_3,
        Self::V3_4,
        Self::V3_5,
        Self::V3_6,
        Self::V3_7,
        Self::V3_8,
    ];

    /// Newest version the rewriter knows about.
    pub const LATEST: Self = Self::V3_8;

    /// `(major, minor)` of the release; `(0, 0)` for [`Self::Before2_0`].
    #[must_use]
    pub const fn major_minor(self) -> (u8, u8) {
        match self {
            Self::Before2_0 => (0, 0),
            Self::V2_0 => (2, 0),
            Self::V2_1 => (2, 1),
            Self::V2_2 => (2, 2),
            Self::V2_3 => (2, 3),
            Self::V2_4 => (2, 4),
            Self::V2_5 => (2, 5),
            Self::V2_6 => (2, 6),
            Self::V2_7 => (2, 7),
            Self::V2_8 => (2, 8),
            Self::V2_9 => (2, 9),
            Self::V3_0 => (3, 0),
            Self::V3_1 => (3, 1),
            Self::V3_2 => (3, 2),
            Self::V3_3 => (3, 3),
            Self::V3_4 => (3, 4),
            Self::V3_5 => (3, 5),
            Self::V3_6 => (3, 6),
            Self::V3_7 => (3, 7),
            Self::V3_8 => (3, 8),
        }
    }
}

impl fmt::Display for TypeScriptVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.major_minor() {
            (0, 0) => write!(f, "<2.0"),
            (major, minor) => write!(f, "{major}.{minor}"),
        }
    }
}

/// Error returned when a version string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown TypeScript version `{0}` (expected 2.0 ..= 3.8)")]
pub struct UnknownVersion(pub String);

impl FromStr for TypeScriptVersion {
    type Err = UnknownVersion;

    /// Accepts `3.7`, `v3.7`, `3_7`, `V3_7` and `3.7.5` (patch ignored).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let bare = trimmed
            .strip_prefix(['v', 'V'])
            .unwrap_or(trimmed)
            .replace('_', ".");
        if bare == "<2.0" {
            return Ok(Self::Before2_0);
        }
        let mut parts = bare.split('.');
        let major = parts.next().and_then(|p| p.parse::<u8>().ok());
        let minor = parts.next().map_or(Some(0), |p| p.parse::<u8>().ok());
        let (Some(major), Some(minor)) = (major, minor) else {
            return Err(UnknownVersion(s.to_owned()));
        };
        if major > 3 || (major == 3 && minor > 8) {
            // Newer releases support everything the catalog knows about.
            return Ok(Self::LATEST);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.major_minor() == (major, minor))
            .ok_or_else(|| UnknownVersion(s.to_owned()))
    }
}

impl TryFrom<String> for TypeScriptVersion {
    type Error = UnknownVersion;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TypeScriptVersion> for String {
    fn from(value: TypeScriptVersion) -> Self {
        value.to_string()
    }
}
