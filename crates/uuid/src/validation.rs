//! Syntactic UUID checks.
//!
//! Both checks look at the string only. Neither confirms that a v5 UUID hashes from any
//! particular input or that a timestamp is plausible.

use regex::Regex;
use std::sync::LazyLock;

/// 8-4-4-4-12 hex with a known version nibble and the RFC 4122 variant.
static CANONICAL_UUID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[1-57][0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$")
        .expect("canonical UUID pattern is valid")
});

/// 8-4-4-4-12 hex, any version or variant.
static UUID_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
        .expect("UUID shape pattern is valid")
});

/// Returns true if `candidate` is a hyphenated UUID with version 1, 2, 3, 4, 5 or 7 and the
/// RFC 4122 variant (`8`, `9`, `a` or `b`). Case-insensitive.
pub fn is_valid(candidate: &str) -> bool {
    CANONICAL_UUID.is_match(candidate)
}

/// Returns true if `candidate` has the hyphenated 8-4-4-4-12 hex layout, whatever its version
/// and variant bits. The nil UUID passes this check.
pub fn is_uuid_shaped(candidate: &str) -> bool {
    UUID_SHAPE.is_match(candidate)
}
