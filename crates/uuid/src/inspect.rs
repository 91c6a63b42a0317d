//! Decoding the fields of an existing UUID.

use crate::constants::{GREGORIAN_OFFSET, INTERVALS_PER_MILLI};
use crate::service::Uuid;
use crate::validation::{is_uuid_shaped, is_valid};
use crate::{UuidError, UuidResult};
use chrono::{DateTime, Utc};
use std::fmt;

/// The layout family encoded in the top bits of byte 8.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Variant {
    /// `0xxx`: reserved, NCS backward compatibility.
    Ncs,
    /// `10xx`: the layout every devkit UUID uses.
    Rfc4122,
    /// `110x`: reserved, Microsoft GUIDs.
    Microsoft,
    /// `111x`: reserved for future definition.
    Future,
}

impl Variant {
    fn from_byte(byte: u8) -> Self {
        match byte >> 5 {
            0b000..=0b011 => Self::Ncs,
            0b100 | 0b101 => Self::Rfc4122,
            0b110 => Self::Microsoft,
            _ => Self::Future,
        }
    }

    /// Lowercase name of the variant.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ncs => "ncs",
            Self::Rfc4122 => "rfc4122",
            Self::Microsoft => "microsoft",
            Self::Future => "future",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded fields of a UUID.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct UuidInfo {
    /// Canonical lowercase hyphenated form.
    pub uuid: String,
    /// The version nibble, whatever its value.
    pub version: u8,
    pub variant: Variant,
    /// Whether [`crate::is_valid`] accepts the UUID.
    pub valid: bool,
    /// Embedded creation time for RFC 4122 v1 and v7 UUIDs.
    pub timestamp: Option<DateTime<Utc>>,
}

/// Decodes the version, variant and (for v1 and v7) timestamp of `candidate`.
///
/// Surrounding whitespace is ignored and any case is accepted.
///
/// # Errors
///
/// Returns [`UuidError::InvalidInput`] if `candidate` is not an 8-4-4-4-12 hex string.
pub fn inspect(candidate: &str) -> UuidResult<UuidInfo> {
    let trimmed = candidate.trim();
    if !is_uuid_shaped(trimmed) {
        return Err(UuidError::InvalidInput(format!(
            "'{}' is not a UUID (expected 8-4-4-4-12 hex digits)",
            candidate
        )));
    }
    let uuid = Uuid::parse_str(trimmed)
        .map_err(|e| UuidError::InvalidInput(format!("'{}': {}", candidate, e)))?;

    let bytes = uuid.as_bytes();
    let version = bytes[6] >> 4;
    let variant = Variant::from_byte(bytes[8]);

    let millis = match (version, variant) {
        (1, Variant::Rfc4122) => v1_millis(bytes),
        (7, Variant::Rfc4122) => Some(v7_millis(bytes)),
        _ => None,
    };
    let timestamp = millis
        .and_then(|ms| i64::try_from(ms).ok())
        .and_then(DateTime::<Utc>::from_timestamp_millis);

    let canonical = uuid.hyphenated().to_string();
    Ok(UuidInfo {
        valid: is_valid(&canonical),
        uuid: canonical,
        version,
        variant,
        timestamp,
    })
}

/// Unix milliseconds of a v1 UUID, or `None` for timestamps before 1970.
fn v1_millis(bytes: &[u8; 16]) -> Option<u64> {
    let time_low = u64::from(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]));
    let time_mid = u64::from(u16::from_be_bytes([bytes[4], bytes[5]]));
    let time_hi = u64::from(u16::from_be_bytes([bytes[6], bytes[7]]) & 0x0FFF);

    let timestamp = (time_hi << 48) | (time_mid << 32) | time_low;
    timestamp
        .checked_sub(GREGORIAN_OFFSET)
        .map(|intervals| intervals / INTERVALS_PER_MILLI)
}

fn v7_millis(bytes: &[u8; 16]) -> u64 {
    let mut prefix = [0u8; 8];
    prefix[2..].copy_from_slice(&bytes[..6]);
    u64::from_be_bytes(prefix)
}
