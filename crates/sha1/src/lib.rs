//! Bundled SHA-1 (FIPS 180-4).
//!
//! devkit derives name-based (version 5) UUIDs from a SHA-1 digest. When a library-native SHA-1
//! is not compiled in, this crate is the implementation that gets used, so it must stay
//! dependency-free and produce digests bit-identical to any other conforming implementation.
//!
//! Two entry points are provided:
//! - [`digest`] hashes a complete byte slice in one call.
//! - [`Sha1`] is a streaming hasher for input that arrives in pieces. Any split of the input
//!   yields the same digest as hashing it whole.
//!
//! SHA-1 is not collision resistant. It is used here only because RFC 4122 fixes it as the
//! hash for version 5 UUIDs.
//!
//! ## Example
//!
//! ```
//! let digest = devkit_sha1::digest(b"abc");
//! assert_eq!(digest[..4], [0xa9, 0x99, 0x3e, 0x36]);
//! ```

/// Length of a SHA-1 digest in bytes.
pub const DIGEST_LEN: usize = 20;

/// SHA-1 processes input in 512-bit blocks.
const BLOCK_LEN: usize = 64;

/// Offset within the final block where the 64-bit message length is written.
const LENGTH_OFFSET: usize = BLOCK_LEN - 8;

const INITIAL_STATE: [u32; 5] = [0x6745_2301, 0xEFCD_AB89, 0x98BA_DCFE, 0x1032_5476, 0xC3D2_E1F0];

/// Round constants for rounds 0-19, 20-39, 40-59 and 60-79.
const ROUND_CONSTANTS: [u32; 4] = [0x5A82_7999, 0x6ED9_EBA1, 0x8F1B_BCDC, 0xCA62_C1D6];

/// Computes the SHA-1 digest of `data`.
///
/// There is no failure path: every byte sequence, including the empty one, has a digest.
pub fn digest(data: &[u8]) -> [u8; DIGEST_LEN] {
    let mut hasher = Sha1::new();
    hasher.update(data);
    hasher.finalize()
}

/// Streaming SHA-1 hasher.
///
/// Bytes are buffered until a full 64-byte block is available, so `update` may be called with
/// slices of any length.
#[derive(Clone, Debug)]
pub struct Sha1 {
    state: [u32; 5],
    block: [u8; BLOCK_LEN],
    block_len: usize,
    message_len: u64,
}

impl Default for Sha1 {
    fn default() -> Self {
        Self::new()
    }
}

impl Sha1 {
    /// Creates a hasher with the standard initial register values.
    pub fn new() -> Self {
        Self {
            state: INITIAL_STATE,
            block: [0; BLOCK_LEN],
            block_len: 0,
            message_len: 0,
        }
    }

    /// Feeds more input into the hasher.
    pub fn update(&mut self, mut data: &[u8]) {
        self.message_len = self.message_len.wrapping_add(data.len() as u64);

        if self.block_len > 0 {
            let take = (BLOCK_LEN - self.block_len).min(data.len());
            self.block[self.block_len..self.block_len + take].copy_from_slice(&data[..take]);
            self.block_len += take;
            data = &data[take..];

            if self.block_len < BLOCK_LEN {
                return;
            }
            let block = self.block;
            compress(&mut self.state, &block);
            self.block_len = 0;
        }

        let mut blocks = data.chunks_exact(BLOCK_LEN);
        for block in &mut blocks {
            compress(&mut self.state, block);
        }

        let rest = blocks.remainder();
        self.block[..rest.len()].copy_from_slice(rest);
        self.block_len = rest.len();
    }

    /// Pads the buffered input and returns the 20-byte digest.
    pub fn finalize(mut self) -> [u8; DIGEST_LEN] {
        let bit_len = self.message_len.wrapping_mul(8);

        let mut block = [0u8; BLOCK_LEN];
        block[..self.block_len].copy_from_slice(&self.block[..self.block_len]);
        block[self.block_len] = 0x80;

        // No room left for the length field: it goes into an extra all-padding block.
        if self.block_len >= LENGTH_OFFSET {
            compress(&mut self.state, &block);
            block = [0u8; BLOCK_LEN];
        }
        block[LENGTH_OFFSET..].copy_from_slice(&bit_len.to_be_bytes());
        compress(&mut self.state, &block);

        let mut out = [0u8; DIGEST_LEN];
        for (chunk, word) in out.chunks_exact_mut(4).zip(self.state) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        out
    }
}

/// Runs the 80-round compression function over one 64-byte block.
fn compress(state: &mut [u32; 5], block: &[u8]) {
    debug_assert_eq!(block.len(), BLOCK_LEN);

    let mut schedule = [0u32; 80];
    for (word, bytes) in schedule.iter_mut().zip(block.chunks_exact(4)) {
        *word = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    }
    for j in 16..80 {
        schedule[j] =
            (schedule[j - 3] ^ schedule[j - 8] ^ schedule[j - 14] ^ schedule[j - 16]).rotate_left(1);
    }

    let [mut a, mut b, mut c, mut d, mut e] = *state;

    for (round, word) in schedule.iter().enumerate() {
        let (f, k) = match round {
            0..=19 => ((b & c) | (!b & d), ROUND_CONSTANTS[0]),
            20..=39 => (b ^ c ^ d, ROUND_CONSTANTS[1]),
            40..=59 => ((b & c) | (b & d) | (c & d), ROUND_CONSTANTS[2]),
            _ => (b ^ c ^ d, ROUND_CONSTANTS[3]),
        };

        let temp = a
            .rotate_left(5)
            .wrapping_add(f)
            .wrapping_add(e)
            .wrapping_add(k)
            .wrapping_add(*word);
        e = d;
        d = c;
        c = b.rotate_left(30);
        b = a;
        a = temp;
    }

    for (register, value) in state.iter_mut().zip([a, b, c, d, e]) {
        *register = register.wrapping_add(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex_digest(data: &[u8]) -> String {
        hex::encode(digest(data))
    }

    #[test]
    fn test_empty_input_vector() {
        assert_eq!(hex_digest(b""), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
    }

    #[test]
    fn test_abc_vector() {
        assert_eq!(hex_digest(b"abc"), "a9993e364706816aba3e25717850c26c9cd0d89d");
    }

    #[test]
    fn test_two_block_vector() {
        // 448-bit message: padding forces a second block.
        assert_eq!(
            hex_digest(b"abcdbcdecdefdefgefghfghighijhijkijkljklmklmnlmnomnopnopq"),
            "84983e441c3bd26ebaae4aa1f95129e5e54670f1"
        );
    }

    #[test]
    fn test_quick_brown_fox() {
        assert_eq!(
            hex_digest(b"The quick brown fox jumps over the lazy dog"),
            "2fd4e1c67a2d28fced849ee1bb76e7391b93eb12"
        );
    }

    #[test]
    fn test_million_a_vector() {
        let mut hasher = Sha1::new();
        let chunk = [b'a'; 1000];
        for _ in 0..1000 {
            hasher.update(&chunk);
        }
        assert_eq!(
            hex::encode(hasher.finalize()),
            "34aa973cd4c4daa4f61eeb2bdbad27316534016f"
        );
    }

    #[test]
    fn test_streaming_matches_one_shot_at_block_boundaries() {
        let data: Vec<u8> = (0..=255u8).cycle().take(300).collect();

        for len in [0, 1, 55, 56, 57, 63, 64, 65, 119, 120, 128, 300] {
            let expected = digest(&data[..len]);

            let mut byte_at_a_time = Sha1::new();
            for byte in &data[..len] {
                byte_at_a_time.update(std::slice::from_ref(byte));
            }
            assert_eq!(byte_at_a_time.finalize(), expected, "length {}", len);

            let mut split = Sha1::new();
            let (head, tail) = data[..len].split_at(len / 3);
            split.update(head);
            split.update(&[]);
            split.update(tail);
            assert_eq!(split.finalize(), expected, "length {}", len);
        }
    }

    #[test]
    fn test_default_matches_new() {
        assert_eq!(Sha1::default().finalize(), Sha1::new().finalize());
    }

    #[test]
    fn test_digest_is_deterministic() {
        assert_eq!(digest(b"example.com"), digest(b"example.com"));
        assert_ne!(digest(b"example.com"), digest(b"example.org"));
    }
}
