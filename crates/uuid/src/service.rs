//! Internal implementation of UUID generation.
//!
//! This module contains the four generation algorithms. All of them reduce to producing 16 raw
//! bytes and then stamping the version and variant bits over them.

use crate::constants::{
    GREGORIAN_OFFSET, INTERVALS_PER_MILLI, V1_TIMESTAMP_MASK, V7_TIMESTAMP_MASK,
};
use crate::platform::{Clock, OsPlatform, Platform, SystemClock};
use crate::validation::{is_uuid_shaped, is_valid};
use crate::{UuidError, UuidResult, UuidVersion};
use std::fmt;
use std::sync::Arc;

/// Re-exported for convenience.
pub use ::uuid::Uuid;

/// UUID generator.
///
/// The generator holds no mutable state. Every call reads the clock and the entropy source
/// afresh, so a single `UuidService` may be cloned and shared freely.
///
/// # Construction
/// - [`UuidService::new`] uses the OS CSPRNG, the default SHA-1 backend and the system clock.
/// - [`UuidService::with_platform`] and [`UuidService::from_parts`] inject other capabilities,
///   for example the fallback [`UuidDerivedPlatform`](crate::UuidDerivedPlatform) or a fixed
///   clock in tests.
///
/// # Output format
/// Every generated UUID is returned as a 36-character lowercase hyphenated string.
#[derive(Clone)]
pub struct UuidService {
    platform: Arc<dyn Platform>,
    clock: Arc<dyn Clock>,
}

impl Default for UuidService {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for UuidService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UuidService").finish_non_exhaustive()
    }
}

impl UuidService {
    /// Creates a generator backed by the operating system.
    pub fn new() -> Self {
        Self::with_platform(OsPlatform::default(), SystemClock)
    }

    /// Creates a generator from concrete platform and clock implementations.
    pub fn with_platform(platform: impl Platform + 'static, clock: impl Clock + 'static) -> Self {
        Self::from_parts(Arc::new(platform), Arc::new(clock))
    }

    /// Creates a generator from shared platform and clock handles.
    pub fn from_parts(platform: Arc<dyn Platform>, clock: Arc<dyn Clock>) -> Self {
        Self { platform, clock }
    }

    /// Generates a UUID of `version`.
    ///
    /// # Errors
    ///
    /// - [`UuidError::UnsupportedVersion`] if `version` is v5, which needs a namespace and name.
    ///   Use [`UuidService::generate_v5`] instead.
    /// - [`UuidError::EntropyUnavailable`] if the platform has no usable random source.
    pub fn generate(&self, version: UuidVersion) -> UuidResult<String> {
        let uuid = match version {
            UuidVersion::V1 => self.v1()?,
            UuidVersion::V4 => self.v4()?,
            UuidVersion::V7 => self.v7()?,
            UuidVersion::V5 => {
                return Err(UuidError::UnsupportedVersion(
                    "v5 needs a namespace and a name; use generate_v5".into(),
                ))
            }
        };
        Ok(uuid.hyphenated().to_string())
    }

    /// Generates the name-based (v5) UUID for `name` within `namespace`.
    ///
    /// The result is a pure function of its arguments: the same pair always yields the same
    /// UUID. The namespace may be upper or lower case.
    ///
    /// # Arguments
    ///
    /// * `namespace` - Hyphenated namespace UUID, for example [`Uuid::NAMESPACE_DNS`].
    /// * `name` - Arbitrary name. Its UTF-8 bytes are hashed.
    ///
    /// # Errors
    ///
    /// Returns [`UuidError::InvalidNamespace`] if `namespace` is not an 8-4-4-4-12 hex string.
    pub fn generate_v5(&self, namespace: &str, name: &str) -> UuidResult<String> {
        if !is_uuid_shaped(namespace) {
            return Err(UuidError::InvalidNamespace(format!(
                "'{}' is not a hyphenated UUID",
                namespace
            )));
        }
        let namespace = Uuid::parse_str(namespace)
            .map_err(|e| UuidError::InvalidNamespace(format!("'{}': {}", namespace, e)))?;

        Ok(self.v5(&namespace, name).hyphenated().to_string())
    }

    /// Generates `count` independent UUIDs of `version`.
    ///
    /// A `count` of zero returns an empty list.
    ///
    /// # Errors
    ///
    /// Same as [`UuidService::generate`]. v5 is rejected even when `count` is zero. No partial
    /// list is returned on failure.
    pub fn generate_multiple(&self, count: usize, version: UuidVersion) -> UuidResult<Vec<String>> {
        if version.requires_name() {
            return Err(UuidError::UnsupportedVersion(format!(
                "{} cannot be generated in bulk without a namespace and a name",
                version
            )));
        }
        (0..count).map(|_| self.generate(version)).collect()
    }

    /// Returns true if `candidate` is a canonical UUID string.
    ///
    /// Equivalent to [`crate::is_valid`].
    pub fn is_valid(candidate: &str) -> bool {
        is_valid(candidate)
    }

    fn v1(&self) -> UuidResult<Uuid> {
        let timestamp = self
            .clock
            .now_millis()
            .wrapping_mul(INTERVALS_PER_MILLI)
            .wrapping_add(GREGORIAN_OFFSET)
            & V1_TIMESTAMP_MASK;

        let time_low = (timestamp & 0xFFFF_FFFF) as u32;
        let time_mid = ((timestamp >> 32) & 0xFFFF) as u16;
        let time_hi = ((timestamp >> 48) & 0x0FFF) as u16;

        // Two bytes of clock sequence followed by six bytes of node.
        let mut random = [0u8; 8];
        self.platform.random_bytes(&mut random)?;

        let mut bytes = [0u8; 16];
        bytes[0..4].copy_from_slice(&time_low.to_be_bytes());
        bytes[4..6].copy_from_slice(&time_mid.to_be_bytes());
        bytes[6..8].copy_from_slice(&time_hi.to_be_bytes());
        bytes[8..16].copy_from_slice(&random);

        // Multicast bit marks the node as random rather than a hardware address.
        bytes[10] |= 0x01;

        Ok(stamp(bytes, UuidVersion::V1))
    }

    fn v4(&self) -> UuidResult<Uuid> {
        let random = self.platform.random_uuid()?;
        Ok(stamp(*random.as_bytes(), UuidVersion::V4))
    }

    fn v5(&self, namespace: &Uuid, name: &str) -> Uuid {
        let mut input = Vec::with_capacity(16 + name.len());
        input.extend_from_slice(namespace.as_bytes());
        input.extend_from_slice(name.as_bytes());

        let digest = self.platform.sha1(&input);
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&digest[..16]);

        stamp(bytes, UuidVersion::V5)
    }

    fn v7(&self) -> UuidResult<Uuid> {
        let millis = self.clock.now_millis() & V7_TIMESTAMP_MASK;

        let mut bytes = [0u8; 16];
        bytes[0..6].copy_from_slice(&millis.to_be_bytes()[2..]);
        self.platform.random_bytes(&mut bytes[6..])?;

        Ok(stamp(bytes, UuidVersion::V7))
    }
}

/// Overwrites the version nibble and the RFC 4122 variant bits.
fn stamp(mut bytes: [u8; 16], version: UuidVersion) -> Uuid {
    bytes[6] = (bytes[6] & 0x0F) | (version.number() << 4);
    bytes[8] = (bytes[8] & 0x3F) | 0x80;
    Uuid::from_bytes(bytes)
}
