//! Supported game client versions.

use std::fmt;
use std::str::FromStr;

use crate::ProtocolError;

/// A game client build the protocol library can impersonate.
///
/// Parsed from the `version` config string. Accepts the dotted version
/// (`"3.3.5"`, optionally with the `a` suffix players use) or the
/// numeric build (`"12340"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameVersion {
    /// 1.12.1, build 5875
    Vanilla,
    /// 2.4.3, build 8606
    Tbc,
    /// 3.3.5a, build 12340
    Wotlk,
    /// 4.3.4, build 15595
    Cataclysm,
}

impl GameVersion {
    pub const ALL: [GameVersion; 4] =
        [Self::Vanilla, Self::Tbc, Self::Wotlk, Self::Cataclysm];

    /// The client build number sent during the logon challenge.
    pub fn build(self) -> u16 {
        match self {
            Self::Vanilla => 5875,
            Self::Tbc => 8606,
            Self::Wotlk => 12340,
            Self::Cataclysm => 15595,
        }
    }

    /// The dotted version string, e.g. `"3.3.5"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vanilla => "1.12.1",
            Self::Tbc => "2.4.3",
            Self::Wotlk => "3.3.5",
            Self::Cataclysm => "4.3.4",
        }
    }
}

impl FromStr for GameVersion {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let dotted = trimmed.strip_suffix('a').unwrap_or(trimmed);
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == dotted || v.build().to_string() == trimmed)
            .ok_or_else(|| ProtocolError::UnsupportedVersion(s.to_string()))
    }
}

impl fmt::Display for GameVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.as_str(), self.build())
    }
}
