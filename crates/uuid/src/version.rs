use crate::{UuidError, UuidResult};
use std::{fmt, str::FromStr};

/// The UUID algorithms devkit can produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum UuidVersion {
    /// Gregorian time-based.
    V1,
    /// Random.
    V4,
    /// Name-based, SHA-1.
    V5,
    /// Unix time-ordered.
    V7,
}

impl UuidVersion {
    /// Every supported version, in ascending order.
    pub const ALL: [UuidVersion; 4] = [Self::V1, Self::V4, Self::V5, Self::V7];

    /// The value written into the version nibble.
    pub fn number(self) -> u8 {
        match self {
            Self::V1 => 1,
            Self::V4 => 4,
            Self::V5 => 5,
            Self::V7 => 7,
        }
    }

    /// Returns true if this version needs a namespace and name and cannot be generated from
    /// the version alone.
    pub fn requires_name(self) -> bool {
        matches!(self, Self::V5)
    }

    fn from_number(number: &str) -> Option<Self> {
        match number {
            "1" => Some(Self::V1),
            "4" => Some(Self::V4),
            "5" => Some(Self::V5),
            "7" => Some(Self::V7),
            _ => None,
        }
    }
}

impl fmt::Display for UuidVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.number())
    }
}

impl FromStr for UuidVersion {
    type Err = UuidError;

    /// Parses `v4`, `V4` or `4` style tokens.
    ///
    /// # Errors
    ///
    /// Returns [`UuidError::UnsupportedVersion`] for anything else. Unknown tokens never fall
    /// back to a default version.
    fn from_str(s: &str) -> UuidResult<Self> {
        let trimmed = s.trim();
        let number = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);

        Self::from_number(number).ok_or_else(|| {
            UuidError::UnsupportedVersion(format!(
                "'{}' (expected one of v1, v4, v5, v7)",
                s
            ))
        })
    }
}
