//! UUID generation and validation utilities.
//!
//! devkit produces RFC 4122 identifiers under four algorithms and checks the shape of existing
//! ones. Every generated value is returned in the *canonical* representation: **36 lowercase
//! characters in 8-4-4-4-12 hyphenated groups**.
//!
//! This crate provides:
//! - A generator ([`UuidService`]) built from injected platform capabilities (entropy source,
//!   SHA-1 backend and clock), so the algorithms never branch on the host environment.
//! - Crate-level [`generate`], [`generate_v5`], [`generate_multiple`] and [`is_valid`] functions
//!   backed by the operating system's CSPRNG and clock.
//! - Inspection of existing UUIDs ([`inspect`]) and alternative renderings ([`UuidFormat`]).
//!
//! ## Canonical UUID form
//! - Layout: `xxxxxxxx-xxxx-Vxxx-Nxxx-xxxxxxxxxxxx`
//! - `V` is the version nibble (`1`, `4`, `5` or `7`)
//! - `N` is one of `8`, `9`, `a`, `b` (the RFC 4122 variant)
//! - Example: `cfbff0d1-9375-5685-968c-48ce8b15ae17`
//!
//! Version and variant bits are always overwritten after the raw bits are produced, whichever
//! algorithm produced them.
//!
//! ## Versions
//! - **v1**: Gregorian 100-ns timestamp, random clock sequence, random multicast node.
//! - **v4**: random.
//! - **v5**: SHA-1 of a namespace UUID followed by a name. Deterministic.
//! - **v7**: 48-bit Unix millisecond prefix followed by random bits.
//!
//! v5 needs a namespace and a name, so it is only reachable through [`generate_v5`].

mod constants;
mod format;
mod inspect;
mod namespace;
mod platform;
mod service;
mod validation;
mod version;

// Re-export public types
pub use constants::GREGORIAN_OFFSET;
pub use format::UuidFormat;
pub use inspect::{inspect, UuidInfo, Variant};
pub use namespace::{resolve_namespace, WellKnownNamespace};
pub use platform::{
    fill_from_random_uuids, os_random_uuid, Clock, EntropySource, OsPlatform, Platform,
    RandomUuidSource, Sha1Backend, SystemClock, UuidDerivedPlatform,
};
pub use service::{Uuid, UuidService};
pub use validation::{is_uuid_shaped, is_valid};
pub use version::UuidVersion;

/// Error type for UUID operations.
#[derive(Debug, thiserror::Error)]
pub enum UuidError {
    /// The requested version is unknown, or needs arguments the entry point cannot take.
    #[error("Unsupported UUID version: {0}")]
    UnsupportedVersion(String),

    /// The namespace for a name-based UUID is not a UUID.
    #[error("Invalid namespace: {0}")]
    InvalidNamespace(String),

    /// No cryptographically secure random source could be used.
    #[error("Secure random source unavailable: {0}")]
    EntropyUnavailable(String),

    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for UUID operations.
pub type UuidResult<T> = Result<T, UuidError>;

/// Generates a UUID of the given version token (`v1`, `v4` or `v7`).
///
/// # Errors
///
/// Returns [`UuidError::UnsupportedVersion`] for unknown tokens and for `v5`, and
/// [`UuidError::EntropyUnavailable`] if the OS random source fails.
pub fn generate(version: &str) -> UuidResult<String> {
    UuidService::new().generate(version.parse()?)
}

/// Generates the name-based (v5) UUID for `name` within `namespace`.
///
/// # Errors
///
/// Returns [`UuidError::InvalidNamespace`] if `namespace` is not a hyphenated UUID.
pub fn generate_v5(namespace: &str, name: &str) -> UuidResult<String> {
    UuidService::new().generate_v5(namespace, name)
}

/// Generates `count` independent UUIDs of the given version token.
///
/// # Errors
///
/// Same as [`generate`].
pub fn generate_multiple(count: usize, version: &str) -> UuidResult<Vec<String>> {
    UuidService::new().generate_multiple(count, version.parse()?)
}
