//! Platform capabilities consumed by the UUID algorithms.
//!
//! The generator never asks which environment it runs in. Instead it is handed a [`Platform`]
//! (random UUIDs, random bytes, SHA-1) and a [`Clock`] when it is constructed:
//!
//! - [`OsPlatform`] reads the operating system's CSPRNG.
//! - [`UuidDerivedPlatform`] only trusts a random-UUID primitive ([`os_random_uuid`] unless
//!   another [`RandomUuidSource`] is supplied) and derives every other random byte from it.
//!
//! Either platform hashes with the [`Sha1Backend`] it was built with. The native and bundled
//! backends produce identical digests.

use crate::service::Uuid;
use crate::{UuidError, UuidResult};
use chrono::Utc;
use rand::rngs::OsRng;
use rand::RngCore;
use std::str::FromStr;
use std::sync::Arc;

/// Sources of randomness and hashing used by the generator.
pub trait Platform: Send + Sync {
    /// Returns a cryptographically random (version 4) UUID.
    fn random_uuid(&self) -> UuidResult<Uuid>;

    /// Fills `buf` with cryptographically random bytes.
    fn random_bytes(&self, buf: &mut [u8]) -> UuidResult<()>;

    /// SHA-1 digest of `data`.
    fn sha1(&self, data: &[u8]) -> [u8; 20] {
        devkit_sha1::digest(data)
    }
}

/// Millisecond wall clock.
pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> u64;
}

/// The system clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        // Clocks set before 1970 clamp to the epoch.
        u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
    }
}

/// SHA-1 implementation used for name-based UUIDs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Sha1Backend {
    /// The `sha1` crate. Only available with the `native-sha1` feature.
    #[default]
    Native,
    /// The dependency-free `devkit-sha1` crate.
    Bundled,
}

impl Sha1Backend {
    /// Returns true if this backend is compiled in.
    pub fn is_available(self) -> bool {
        match self {
            Self::Native => cfg!(feature = "native-sha1"),
            Self::Bundled => true,
        }
    }

    /// Returns this backend, or [`Sha1Backend::Bundled`] if it is not compiled in.
    pub fn resolve(self) -> Self {
        if self.is_available() {
            return self;
        }
        tracing::debug!("native SHA-1 not compiled in, using bundled implementation");
        Self::Bundled
    }

    /// SHA-1 digest of `data` with this backend.
    pub fn digest(self, data: &[u8]) -> [u8; 20] {
        match self {
            Self::Native => native_sha1(data),
            Self::Bundled => devkit_sha1::digest(data),
        }
    }

    /// Configuration name of the backend.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::Bundled => "bundled",
        }
    }
}

impl FromStr for Sha1Backend {
    type Err = UuidError;

    fn from_str(s: &str) -> UuidResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "native" => Ok(Self::Native),
            "bundled" => Ok(Self::Bundled),
            _ => Err(UuidError::InvalidInput(format!(
                "unknown SHA-1 backend '{}' (expected native or bundled)",
                s
            ))),
        }
    }
}

#[cfg(feature = "native-sha1")]
fn native_sha1(data: &[u8]) -> [u8; 20] {
    use sha1::{Digest, Sha1};
    Sha1::digest(data).into()
}

#[cfg(not(feature = "native-sha1"))]
fn native_sha1(data: &[u8]) -> [u8; 20] {
    devkit_sha1::digest(data)
}

/// Operating system CSPRNG.
#[derive(Clone, Copy, Debug)]
pub struct OsPlatform {
    sha1: Sha1Backend,
}

impl Default for OsPlatform {
    fn default() -> Self {
        Self::new(Sha1Backend::default())
    }
}

impl OsPlatform {
    /// Creates a platform hashing with `sha1`, or the bundled backend if it is not compiled in.
    pub fn new(sha1: Sha1Backend) -> Self {
        Self {
            sha1: sha1.resolve(),
        }
    }

    /// The SHA-1 backend actually in use.
    pub fn sha1_backend(&self) -> Sha1Backend {
        self.sha1
    }
}

impl Platform for OsPlatform {
    fn random_uuid(&self) -> UuidResult<Uuid> {
        let mut bytes = [0u8; 16];
        self.random_bytes(&mut bytes)?;
        Ok(uuid::Builder::from_random_bytes(bytes).into_uuid())
    }

    fn random_bytes(&self, buf: &mut [u8]) -> UuidResult<()> {
        OsRng
            .try_fill_bytes(buf)
            .map_err(|e| UuidError::EntropyUnavailable(e.to_string()))
    }

    fn sha1(&self, data: &[u8]) -> [u8; 20] {
        self.sha1.digest(data)
    }
}

/// Produces one random (version 4) UUID.
pub type RandomUuidSource = fn() -> UuidResult<Uuid>;

/// Random v4 UUID from the operating system CSPRNG.
///
/// # Errors
///
/// Returns [`UuidError::EntropyUnavailable`] if the OS random source fails.
pub fn os_random_uuid() -> UuidResult<Uuid> {
    let mut bytes = [0u8; 16];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| UuidError::EntropyUnavailable(e.to_string()))?;
    Ok(uuid::Builder::from_random_bytes(bytes).into_uuid())
}

/// Fallback platform for hosts that only expose a random-UUID function.
///
/// Random bytes are sliced out of successive random UUIDs. This is not a substitute for a
/// real byte source: each UUID contributes 14 bytes and costs a full UUID generation.
#[derive(Clone, Copy, Debug)]
pub struct UuidDerivedPlatform {
    sha1: Sha1Backend,
    source: RandomUuidSource,
}

impl Default for UuidDerivedPlatform {
    fn default() -> Self {
        Self::new(Sha1Backend::default())
    }
}

impl UuidDerivedPlatform {
    /// Creates a platform drawing UUIDs from [`os_random_uuid`].
    pub fn new(sha1: Sha1Backend) -> Self {
        Self::with_source(sha1, os_random_uuid)
    }

    /// Creates a platform drawing UUIDs from `source`.
    pub fn with_source(sha1: Sha1Backend, source: RandomUuidSource) -> Self {
        Self {
            sha1: sha1.resolve(),
            source,
        }
    }
}

impl Platform for UuidDerivedPlatform {
    fn random_uuid(&self) -> UuidResult<Uuid> {
        (self.source)()
    }

    fn random_bytes(&self, buf: &mut [u8]) -> UuidResult<()> {
        fill_from_random_uuids(self, buf)
    }

    fn sha1(&self, data: &[u8]) -> [u8; 20] {
        self.sha1.digest(data)
    }
}

/// Byte positions of a v4 UUID that carry no version or variant bits.
const FULLY_RANDOM_POSITIONS: [usize; 14] = [0, 1, 2, 3, 4, 5, 7, 9, 10, 11, 12, 13, 14, 15];

/// Fills `buf` with bytes taken from successive `platform.random_uuid()` results.
///
/// Bytes 6 and 8 of each UUID hold fixed version and variant bits and are skipped.
///
/// # Errors
///
/// Propagates the first error returned by `random_uuid`.
pub fn fill_from_random_uuids<P: Platform + ?Sized>(
    platform: &P,
    buf: &mut [u8],
) -> UuidResult<()> {
    tracing::debug!(len = buf.len(), "deriving random bytes from random UUIDs");

    let mut filled = 0;
    while filled < buf.len() {
        let uuid = platform.random_uuid()?;
        let bytes = uuid.as_bytes();
        for &position in &FULLY_RANDOM_POSITIONS {
            if filled == buf.len() {
                break;
            }
            buf[filled] = bytes[position];
            filled += 1;
        }
    }
    Ok(())
}

/// Which [`Platform`] to build at startup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EntropySource {
    /// [`OsPlatform`].
    #[default]
    Os,
    /// [`UuidDerivedPlatform`].
    Uuid,
}

impl EntropySource {
    /// Builds the platform for this source.
    pub fn platform(self, sha1: Sha1Backend) -> Arc<dyn Platform> {
        match self {
            Self::Os => Arc::new(OsPlatform::new(sha1)),
            Self::Uuid => Arc::new(UuidDerivedPlatform::new(sha1)),
        }
    }

    /// Configuration name of the source.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Os => "os",
            Self::Uuid => "uuid",
        }
    }
}

impl FromStr for EntropySource {
    type Err = UuidError;

    fn from_str(s: &str) -> UuidResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "os" => Ok(Self::Os),
            "uuid" => Ok(Self::Uuid),
            _ => Err(UuidError::InvalidInput(format!(
                "unknown entropy source '{}' (expected os or uuid)",
                s
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU8, Ordering};

    /// Returns UUIDs whose bytes count up from a starting value.
    struct CountingPlatform {
        next: AtomicU8,
    }

    impl Platform for CountingPlatform {
        fn random_uuid(&self) -> UuidResult<Uuid> {
            let start = self.next.fetch_add(16, Ordering::SeqCst);
            let mut bytes = [0u8; 16];
            for (offset, byte) in bytes.iter_mut().enumerate() {
                *byte = start.wrapping_add(offset as u8);
            }
            Ok(Uuid::from_bytes(bytes))
        }

        fn random_bytes(&self, buf: &mut [u8]) -> UuidResult<()> {
            fill_from_random_uuids(self, buf)
        }
    }

    struct BrokenPlatform;

    impl Platform for BrokenPlatform {
        fn random_uuid(&self) -> UuidResult<Uuid> {
            Err(UuidError::EntropyUnavailable("no source".into()))
        }

        fn random_bytes(&self, _buf: &mut [u8]) -> UuidResult<()> {
            Err(UuidError::EntropyUnavailable("no source".into()))
        }
    }

    #[test]
    fn test_fill_from_random_uuids_skips_version_and_variant_bytes() {
        let platform = CountingPlatform {
            next: AtomicU8::new(0),
        };
        let mut buf = [0u8; 20];
        fill_from_random_uuids(&platform, &mut buf).unwrap();

        assert_eq!(
            buf,
            [0, 1, 2, 3, 4, 5, 7, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21]
        );
    }

    #[test]
    fn test_fill_from_random_uuids_empty_buffer_needs_no_uuid() {
        let mut buf: [u8; 0] = [];
        assert!(fill_from_random_uuids(&BrokenPlatform, &mut buf).is_ok());
    }

    #[test]
    fn test_fill_from_random_uuids_propagates_failure() {
        let mut buf = [0u8; 4];
        let result = fill_from_random_uuids(&BrokenPlatform, &mut buf);
        assert!(matches!(result, Err(UuidError::EntropyUnavailable(_))));
    }

    #[test]
    fn test_os_platform_random_uuid_is_version_4() {
        let uuid = OsPlatform::default().random_uuid().unwrap();
        assert_eq!(uuid.get_version_num(), 4);
        assert_eq!(uuid.as_bytes()[8] & 0xc0, 0x80);
    }

    #[test]
    fn test_os_platform_random_bytes_differ() {
        let platform = OsPlatform::default();
        let mut first = [0u8; 32];
        let mut second = [0u8; 32];
        platform.random_bytes(&mut first).unwrap();
        platform.random_bytes(&mut second).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_uuid_derived_platform_fills_odd_lengths() {
        let platform = UuidDerivedPlatform::default();
        let mut buf = [0u8; 31];
        platform.random_bytes(&mut buf).unwrap();
        assert!(buf.iter().any(|b| *b != 0));
    }

    fn failing_source() -> UuidResult<Uuid> {
        Err(UuidError::EntropyUnavailable("source offline".into()))
    }

    #[test]
    fn test_uuid_derived_platform_surfaces_source_failure() {
        let platform = UuidDerivedPlatform::with_source(Sha1Backend::Bundled, failing_source);

        assert!(matches!(
            platform.random_uuid(),
            Err(UuidError::EntropyUnavailable(_))
        ));
        let mut buf = [0u8; 8];
        match platform.random_bytes(&mut buf) {
            Err(UuidError::EntropyUnavailable(msg)) => assert_eq!(msg, "source offline"),
            other => panic!("Expected EntropyUnavailable, got {:?}", other),
        }
    }

    #[test]
    fn test_uuid_derived_platform_reads_its_source() {
        let platform = UuidDerivedPlatform::with_source(Sha1Backend::Bundled, || {
            Ok(Uuid::from_bytes([0xab; 16]))
        });
        let mut buf = [0u8; 20];
        platform.random_bytes(&mut buf).unwrap();
        assert_eq!(buf, [0xab; 20]);
    }

    #[test]
    fn test_os_random_uuid_is_version_4() {
        let uuid = os_random_uuid().unwrap();
        assert_eq!(uuid.get_version_num(), 4);
        assert_eq!(uuid.as_bytes()[8] & 0xc0, 0x80);
    }

    #[test]
    fn test_default_trait_sha1_is_bundled() {
        assert_eq!(
            hex::encode(BrokenPlatform.sha1(b"abc")),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
    }

    #[test]
    fn test_sha1_backends_agree() {
        let data: Vec<u8> = (0..=255u8).collect();
        for len in [0, 1, 3, 55, 56, 64, 65, 200, 256] {
            assert_eq!(
                Sha1Backend::Native.digest(&data[..len]),
                Sha1Backend::Bundled.digest(&data[..len]),
                "length {}",
                len
            );
        }
    }

    #[test]
    fn test_bundled_backend_matches_sha1_crate() {
        use sha1::{Digest, Sha1};

        let input = b"6ba7b810-9dad-11d1-80b4-00c04fd430c8example.com";
        let expected: [u8; 20] = Sha1::digest(input).into();
        assert_eq!(Sha1Backend::Bundled.digest(input), expected);
    }

    #[cfg(feature = "native-sha1")]
    #[test]
    fn test_native_backend_is_available_with_feature() {
        assert!(Sha1Backend::Native.is_available());
        assert_eq!(Sha1Backend::Native.resolve(), Sha1Backend::Native);
        assert_eq!(
            OsPlatform::new(Sha1Backend::Native).sha1_backend(),
            Sha1Backend::Native
        );
    }

    #[cfg(not(feature = "native-sha1"))]
    #[test]
    fn test_native_backend_falls_back_without_feature() {
        assert!(!Sha1Backend::Native.is_available());
        assert_eq!(Sha1Backend::Native.resolve(), Sha1Backend::Bundled);
    }

    #[test]
    fn test_backend_and_source_parsing() {
        assert_eq!("native".parse::<Sha1Backend>().unwrap(), Sha1Backend::Native);
        assert_eq!("BUNDLED".parse::<Sha1Backend>().unwrap(), Sha1Backend::Bundled);
        assert!("md5".parse::<Sha1Backend>().is_err());

        assert_eq!("os".parse::<EntropySource>().unwrap(), EntropySource::Os);
        assert_eq!(" uuid ".parse::<EntropySource>().unwrap(), EntropySource::Uuid);
        assert!("urandom".parse::<EntropySource>().is_err());
    }

    #[test]
    fn test_entropy_source_builds_working_platforms() {
        for source in [EntropySource::Os, EntropySource::Uuid] {
            let platform = source.platform(Sha1Backend::Bundled);
            let mut buf = [0u8; 10];
            platform.random_bytes(&mut buf).unwrap();
            assert_eq!(platform.random_uuid().unwrap().get_version_num(), 4);
        }
    }

    #[test]
    fn test_system_clock_is_after_2020() {
        // 2020-01-01T00:00:00Z
        assert!(SystemClock.now_millis() > 1_577_836_800_000);
    }
}
