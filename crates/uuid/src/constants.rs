//! Constants shared by the UUID algorithms.

/// Count of 100-ns intervals between the Gregorian epoch (1582-10-15) and the Unix epoch.
pub const GREGORIAN_OFFSET: u64 = 0x01B2_1DD2_1381_4000;

/// 100-ns intervals per millisecond.
pub(crate) const INTERVALS_PER_MILLI: u64 = 10_000;

/// v7 carries 48 bits of Unix milliseconds.
pub(crate) const V7_TIMESTAMP_MASK: u64 = 0xFFFF_FFFF_FFFF;

/// v1 timestamps are 60 bits wide.
pub(crate) const V1_TIMESTAMP_MASK: u64 = 0x0FFF_FFFF_FFFF_FFFF;
