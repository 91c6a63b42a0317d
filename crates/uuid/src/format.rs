use crate::service::Uuid;
use crate::validation::is_uuid_shaped;
use crate::{UuidError, UuidResult};
use std::{fmt, str::FromStr};

/// Output renderings of a UUID.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum UuidFormat {
    /// `cfbff0d1-9375-5685-968c-48ce8b15ae17`
    #[default]
    Hyphenated,
    /// `cfbff0d193755685968c48ce8b15ae17`
    Simple,
    /// `{cfbff0d1-9375-5685-968c-48ce8b15ae17}`
    Braced,
    /// `urn:uuid:cfbff0d1-9375-5685-968c-48ce8b15ae17`
    Urn,
}

impl UuidFormat {
    pub const ALL: [UuidFormat; 4] = [Self::Hyphenated, Self::Simple, Self::Braced, Self::Urn];

    /// Renders a hyphenated `uuid` in this format.
    ///
    /// With `uppercase` the hex digits are upper-cased. The `urn:uuid:` prefix stays lowercase.
    ///
    /// # Errors
    ///
    /// Returns [`UuidError::InvalidInput`] if `uuid` is not an 8-4-4-4-12 hex string.
    pub fn render(self, uuid: &str, uppercase: bool) -> UuidResult<String> {
        if !is_uuid_shaped(uuid) {
            return Err(UuidError::InvalidInput(format!(
                "cannot format '{}': not a hyphenated UUID",
                uuid
            )));
        }
        let uuid = Uuid::parse_str(uuid).map_err(|e| UuidError::InvalidInput(e.to_string()))?;

        let mut buffer = Uuid::encode_buffer();
        let rendered: &str = match (self, uppercase) {
            (Self::Hyphenated, false) => uuid.hyphenated().encode_lower(&mut buffer),
            (Self::Hyphenated, true) => uuid.hyphenated().encode_upper(&mut buffer),
            (Self::Simple, false) => uuid.simple().encode_lower(&mut buffer),
            (Self::Simple, true) => uuid.simple().encode_upper(&mut buffer),
            (Self::Braced, false) => uuid.braced().encode_lower(&mut buffer),
            (Self::Braced, true) => uuid.braced().encode_upper(&mut buffer),
            (Self::Urn, false) => uuid.urn().encode_lower(&mut buffer),
            (Self::Urn, true) => uuid.urn().encode_upper(&mut buffer),
        };
        Ok(rendered.to_owned())
    }

    /// Name accepted by `FromStr`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hyphenated => "hyphenated",
            Self::Simple => "simple",
            Self::Braced => "braced",
            Self::Urn => "urn",
        }
    }
}

impl fmt::Display for UuidFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UuidFormat {
    type Err = UuidError;

    fn from_str(s: &str) -> UuidResult<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                UuidError::InvalidInput(format!(
                    "unknown format '{}' (expected hyphenated, simple, braced or urn)",
                    s
                ))
            })
    }
}
