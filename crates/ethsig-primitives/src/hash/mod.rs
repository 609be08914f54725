//! Keccak-256 hash primitives.
//!
//! The digest used across account-based chains is the original Keccak-256
//! submission, whose padding differs from the standardized SHA3-256.

use sha3::{Digest, Keccak256};

/// Size of a Keccak-256 digest in bytes.
pub const DIGEST_SIZE: usize = 32;

/// Compute the Keccak-256 hash of the input data.
///
/// # Arguments
/// * `data` - Byte slice to hash.
///
/// # Returns
/// A 32-byte Keccak-256 digest.
pub fn keccak256(data: &[u8]) -> [u8; DIGEST_SIZE] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute the Keccak-256 hash of UTF-8 text.
///
/// Identical to `keccak256(text.as_bytes())`.
pub fn keccak256_text(text: &str) -> [u8; DIGEST_SIZE] {
    keccak256(text.as_bytes())
}

/// A 256-bit digest function over raw bytes.
///
/// Message framing is generic over this trait so callers can substitute
/// their own implementation (for example an instrumented one in tests).
pub trait Digester {
    /// Hash `data` into a 32-byte digest.
    fn digest(&self, data: &[u8]) -> [u8; DIGEST_SIZE];

    /// Hash UTF-8 text. Always equal to `digest(text.as_bytes())`.
    fn digest_text(&self, text: &str) -> [u8; DIGEST_SIZE] {
        self.digest(text.as_bytes())
    }
}

/// The production [`Digester`]: legacy Keccak-256.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Keccak256Digester;

impl Digester for Keccak256Digester {
    fn digest(&self, data: &[u8]) -> [u8; DIGEST_SIZE] {
        keccak256(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---- Keccak-256 published vectors ----

    #[test]
    fn test_keccak256_empty_string() {
        let hash = keccak256(b"");
        assert_eq!(
            hex::encode(hash),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_keccak256_abc() {
        let hash = keccak256(b"abc");
        assert_eq!(
            hex::encode(hash),
            "4e03657aea45a94fc7d47ba826c8d667c0d1e6e33a64a036ec44f58fa12d6c45"
        );
    }

    #[test]
    fn test_keccak256_is_not_sha3() {
        // SHA3-256("") = a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a
        let hash = keccak256(b"");
        assert_ne!(
            hex::encode(hash),
            "a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a"
        );
    }

    #[test]
    fn test_keccak256_text_matches_bytes() {
        for text in ["", "hi", "Some data", "héllo wörld", "日本語"] {
            assert_eq!(keccak256_text(text), keccak256(text.as_bytes()), "text {:?}", text);
        }
    }

    #[test]
    fn test_digester_matches_free_functions() {
        let d = Keccak256Digester;
        assert_eq!(d.digest(b"abc"), keccak256(b"abc"));
        assert_eq!(d.digest_text("abc"), keccak256_text("abc"));
    }
}
