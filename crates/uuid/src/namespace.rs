//! Well-known namespaces for name-based UUIDs.

use crate::service::Uuid;
use crate::validation::is_uuid_shaped;
use crate::{UuidError, UuidResult};
use std::{fmt, str::FromStr};

/// The namespaces defined in RFC 4122 appendix C.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum WellKnownNamespace {
    /// Fully qualified domain names.
    Dns,
    /// URLs.
    Url,
    /// ISO object identifiers.
    Oid,
    /// X.500 distinguished names.
    X500,
}

impl WellKnownNamespace {
    pub const ALL: [WellKnownNamespace; 4] = [Self::Dns, Self::Url, Self::Oid, Self::X500];

    /// The namespace UUID.
    pub fn uuid(self) -> Uuid {
        match self {
            Self::Dns => Uuid::NAMESPACE_DNS,
            Self::Url => Uuid::NAMESPACE_URL,
            Self::Oid => Uuid::NAMESPACE_OID,
            Self::X500 => Uuid::NAMESPACE_X500,
        }
    }

    /// Alias accepted by [`resolve_namespace`].
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dns => "dns",
            Self::Url => "url",
            Self::Oid => "oid",
            Self::X500 => "x500",
        }
    }
}

impl fmt::Display for WellKnownNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WellKnownNamespace {
    type Err = UuidError;

    fn from_str(s: &str) -> UuidResult<Self> {
        Self::ALL
            .into_iter()
            .find(|ns| ns.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                UuidError::InvalidNamespace(format!(
                    "unknown namespace '{}' (expected dns, url, oid or x500)",
                    s
                ))
            })
    }
}

/// Resolves a namespace argument to a canonical namespace UUID string.
///
/// `input` may name a well-known namespace (`dns`, `url`, `oid`, `x500`, any case) or be a
/// hyphenated UUID. UUIDs are lower-cased; their version and variant bits are not checked.
///
/// # Errors
///
/// Returns [`UuidError::InvalidNamespace`] if `input` is neither.
pub fn resolve_namespace(input: &str) -> UuidResult<String> {
    let trimmed = input.trim();

    if let Ok(namespace) = trimmed.parse::<WellKnownNamespace>() {
        return Ok(namespace.uuid().hyphenated().to_string());
    }
    if is_uuid_shaped(trimmed) {
        return Ok(trimmed.to_ascii_lowercase());
    }

    Err(UuidError::InvalidNamespace(format!(
        "'{}' is neither a UUID nor one of dns, url, oid, x500",
        input
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_known_namespace_values() {
        assert_eq!(
            WellKnownNamespace::Dns.uuid().to_string(),
            "6ba7b810-9dad-11d1-80b4-00c04fd430c8"
        );
        assert_eq!(
            WellKnownNamespace::Url.uuid().to_string(),
            "6ba7b811-9dad-11d1-80b4-00c04fd430c8"
        );
        assert_eq!(
            WellKnownNamespace::Oid.uuid().to_string(),
            "6ba7b812-9dad-11d1-80b4-00c04fd430c8"
        );
        assert_eq!(
            WellKnownNamespace::X500.uuid().to_string(),
            "6ba7b814-9dad-11d1-80b4-00c04fd430c8"
        );
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            "DNS".parse::<WellKnownNamespace>().unwrap(),
            WellKnownNamespace::Dns
        );
        assert_eq!(
            " x500 ".parse::<WellKnownNamespace>().unwrap(),
            WellKnownNamespace::X500
        );
        assert!("ldap".parse::<WellKnownNamespace>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for namespace in WellKnownNamespace::ALL {
            assert_eq!(
                namespace.to_string().parse::<WellKnownNamespace>().unwrap(),
                namespace
            );
        }
    }

    #[test]
    fn test_resolve_namespace_aliases() {
        assert_eq!(
            resolve_namespace("url").unwrap(),
            "6ba7b811-9dad-11d1-80b4-00c04fd430c8"
        );
        assert_eq!(
            resolve_namespace("Oid").unwrap(),
            "6ba7b812-9dad-11d1-80b4-00c04fd430c8"
        );
    }

    #[test]
    fn test_resolve_namespace_passes_uuids_through_lowercased() {
        assert_eq!(
            resolve_namespace("550E8400-E29B-41D4-A716-446655440000").unwrap(),
            "550e8400-e29b-41d4-a716-446655440000"
        );
        assert_eq!(
            resolve_namespace("00000000-0000-0000-0000-000000000000").unwrap(),
            "00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn test_resolve_namespace_rejects_other_input() {
        for input in ["", "dns.example", "550e8400e29b41d4a716446655440000", "uuid"] {
            match resolve_namespace(input) {
                Err(UuidError::InvalidNamespace(msg)) => {
                    assert!(msg.contains("neither a UUID"));
                }
                other => panic!("Expected InvalidNamespace for '{}', got {:?}", input, other),
            }
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_uses_lowercase_names() {
        assert_eq!(
            serde_json::to_string(&WellKnownNamespace::X500).unwrap(),
            "\"x500\""
        );
    }
}
