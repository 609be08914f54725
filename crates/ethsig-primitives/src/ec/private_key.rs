//! secp256k1 private key.
//!
//! Wraps a k256 signing key. The scalar is wiped when the key is dropped
//! and never appears in `Debug` output or logs.

use std::fmt;

use k256::ecdsa::SigningKey;
use rand::rngs::OsRng;
use zeroize::{Zeroize, Zeroizing};

use crate::address::Address;
use crate::ec::public_key::PublicKey;
use crate::ec::signature::RecoverableSignature;
use crate::encoding::decode_hex;
use crate::PrimitivesError;

/// Length of a serialized private key in bytes.
pub const PRIVATE_KEY_BYTES_LEN: usize = 32;

/// A secp256k1 private key for signing message digests.
///
/// Wraps a k256 `SigningKey`, which zeroizes its scalar on drop.
#[derive(Clone)]
pub struct PrivateKey {
    /// The underlying k256 signing key.
    inner: SigningKey,
}

impl PrivateKey {
    /// Generate a new random private key using the OS random number generator.
    ///
    /// # Returns
    /// A new randomly generated `PrivateKey`.
    pub fn new() -> Self {
        PrivateKey {
            inner: SigningKey::random(&mut OsRng),
        }
    }

    /// Create a private key from a raw 32-byte big-endian scalar.
    ///
    /// # Arguments
    /// * `bytes` - A 32-byte slice representing the private key scalar.
    ///
    /// # Returns
    /// `Ok(PrivateKey)` if the bytes represent a valid scalar on secp256k1,
    /// or `InvalidPrivateKey` if the length is wrong, the scalar is zero, or it
    /// is not below the curve order.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != PRIVATE_KEY_BYTES_LEN {
            return Err(PrimitivesError::InvalidPrivateKey(format!(
                "expected {} bytes, got {}",
                PRIVATE_KEY_BYTES_LEN,
                bytes.len()
            )));
        }
        let signing_key = SigningKey::from_slice(bytes).map_err(|_| {
            PrimitivesError::InvalidPrivateKey(
                "scalar must be nonzero and below the curve order".to_string(),
            )
        })?;
        Ok(PrivateKey { inner: signing_key })
    }

    /// Create a private key from a hexadecimal string, with or without `0x`.
    ///
    /// # Arguments
    /// * `hex_str` - A 64-digit hex string representing the 32-byte scalar.
    ///
    /// # Returns
    /// `Ok(PrivateKey)` on success, or `InvalidPrivateKey` if the hex or scalar is invalid.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        let bytes = Zeroizing::new(decode_hex(hex_str).map_err(|_| {
            PrimitivesError::InvalidPrivateKey("malformed hex".to_string())
        })?);
        Self::from_bytes(&bytes)
    }

    /// Serialize the private key as a 32-byte big-endian scalar.
    ///
    /// The returned buffer is wiped when dropped.
    pub fn to_bytes(&self) -> Zeroizing<[u8; PRIVATE_KEY_BYTES_LEN]> {
        let mut scalar = self.inner.to_bytes();
        let mut out = Zeroizing::new([0u8; PRIVATE_KEY_BYTES_LEN]);
        out.copy_from_slice(&scalar);
        scalar.as_mut_slice().zeroize();
        out
    }

    /// Derive the public key corresponding to this private key.
    pub fn pub_key(&self) -> PublicKey {
        PublicKey::from_k256_verifying_key(self.inner.verifying_key())
    }

    /// Derive the account address controlled by this key.
    pub fn address(&self) -> Address {
        self.pub_key().to_address()
    }

    /// Sign a 32-byte digest using deterministic RFC 6979 nonces.
    ///
    /// The digest is used directly as the message representative; it is not
    /// hashed again. The result is low-s normalized with `v` in `{27, 28}`.
    pub fn sign(&self, digest: &[u8; 32]) -> Result<RecoverableSignature, PrimitivesError> {
        RecoverableSignature::sign_digest(digest, self)
    }

    /// Access the underlying k256 `SigningKey`.
    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.inner
    }
}

impl Default for PrivateKey {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        *self.to_bytes() == *other.to_bytes()
    }
}

impl Eq for PrivateKey {}
