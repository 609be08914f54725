//! Recoverable ECDSA signatures with RFC 6979 deterministic nonces.
//!
//! A signature is the triple `(v, r, s)`. `r` and `s` are the ECDSA scalars;
//! `v` is the recovery indicator selecting which of the two candidate public
//! keys the signature recovers to. Three `v` encodings are understood:
//! raw parity `{0, 1}`, the legacy `{27, 28}` produced by signing, and the
//! chain-bound form `parity + chain_id * 2 + 35`.
//!
//! Signing always yields the low-s form (`s <= n/2`). Recovery and
//! verification accept either form.

use std::fmt;
use std::str::FromStr;

use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::ecdsa::{self, RecoveryId, VerifyingKey};
use k256::FieldBytes;
use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::ec::private_key::PrivateKey;
use crate::ec::public_key::PublicKey;
use crate::encoding::{decode_hex, encode_hex};
use crate::PrimitivesError;

/// The secp256k1 curve order N.
/// N = FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141
const CURVE_ORDER: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFE, 0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36,
    0x41, 0x41,
];

/// Half of the secp256k1 curve order (N/2), used for low-S normalization.
const HALF_ORDER: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D, 0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B,
    0x20, 0xA0,
];

/// `v` offset of the legacy encoding.
pub const LEGACY_V_OFFSET: u64 = 27;

/// `v` offset of the chain-bound encoding, added to `chain_id * 2`.
pub const CHAIN_V_OFFSET: u64 = 35;

/// Length of the `r || s || v` byte encoding.
pub const SIGNATURE_BYTES_LEN: usize = 65;

/// An ECDSA signature with its recovery indicator.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecoverableSignature {
    /// Recovery indicator, `{27, 28}` straight from signing.
    pub v: u64,
    /// The R component (32 bytes, big-endian).
    #[serde(with = "hex_scalar")]
    pub r: [u8; 32],
    /// The S component (32 bytes, big-endian).
    #[serde(with = "hex_scalar")]
    pub s: [u8; 32],
}

impl RecoverableSignature {
    /// Create a signature from its raw components.
    pub fn new(v: u64, r: [u8; 32], s: [u8; 32]) -> Self {
        RecoverableSignature { v, r, s }
    }

    /// Sign a 32-byte digest with RFC 6979 deterministic nonces.
    ///
    /// The digest is the message representative as-is. The same
    /// `(digest, key)` always yields the same `(v, r, s)`.
    ///
    /// # Returns
    /// A low-s signature with `v` in `{27, 28}`.
    pub fn sign_digest(digest: &[u8; 32], priv_key: &PrivateKey) -> Result<Self, PrimitivesError> {
        let (sig, recovery_id) = priv_key.signing_key().sign_prehash_recoverable(digest)?;

        // k256 already emits low-s; keep the parity consistent if it ever does not.
        let (sig, recovery_id) = match sig.normalize_s() {
            Some(low) => (
                low,
                RecoveryId::new(!recovery_id.is_y_odd(), recovery_id.is_x_reduced()),
            ),
            None => (sig, recovery_id),
        };

        let (r_bytes, s_bytes) = sig.split_bytes();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&r_bytes);
        s.copy_from_slice(&s_bytes);

        let v = LEGACY_V_OFFSET + u64::from(recovery_id.is_y_odd());
        Ok(RecoverableSignature { v, r, s })
    }

    /// Decode the y-parity bit from `v`.
    ///
    /// # Returns
    /// 0 or 1, or `InvalidSignature` if `v` is in none of the known encodings.
    pub fn recovery_parity(&self) -> Result<u8, PrimitivesError> {
        match self.v {
            0 | 1 => Ok(self.v as u8),
            27 | 28 => Ok((self.v - LEGACY_V_OFFSET) as u8),
            v if v >= CHAIN_V_OFFSET => Ok(((v - CHAIN_V_OFFSET) % 2) as u8),
            v => Err(PrimitivesError::InvalidSignature(format!(
                "unrecognized recovery indicator v={}",
                v
            ))),
        }
    }

    /// The chain id embedded in a chain-bound `v`, if any.
    pub fn chain_id(&self) -> Option<u64> {
        (self.v >= CHAIN_V_OFFSET).then(|| (self.v - CHAIN_V_OFFSET) / 2)
    }

    /// Return a copy carrying a different recovery indicator.
    pub fn with_v(&self, v: u64) -> Self {
        RecoverableSignature { v, ..*self }
    }

    /// Whether `s` is in the lower half of the curve order.
    pub fn is_low_s(&self) -> bool {
        self.s <= HALF_ORDER
    }

    /// The malleated twin `(v', r, n - s)`, with the parity in `v` flipped.
    ///
    /// It recovers to the same public key as `self`.
    pub fn complement(&self) -> Result<Self, PrimitivesError> {
        let parity = u64::from(self.recovery_parity()?);
        let v = self.v - parity + (1 - parity);
        Ok(RecoverableSignature {
            v,
            r: self.r,
            s: subtract_from_order(&self.s),
        })
    }

    /// The low-s form of this signature.
    pub fn normalized(&self) -> Result<Self, PrimitivesError> {
        if self.is_low_s() {
            Ok(*self)
        } else {
            self.complement()
        }
    }

    /// Verify this signature against a digest and public key.
    ///
    /// # Returns
    /// `true` if `(r, s)` is a valid signature of `digest` under `pub_key`.
    pub fn verify(&self, digest: &[u8; 32], pub_key: &PublicKey) -> bool {
        let low = if self.is_low_s() {
            self.s
        } else {
            subtract_from_order(&self.s)
        };
        match scalars_to_k256(&self.r, &low) {
            Ok(sig) => pub_key.verifying_key().verify_prehash(digest, &sig).is_ok(),
            Err(_) => false,
        }
    }

    /// Recover the public key that produced this signature over `digest`.
    ///
    /// # Returns
    /// `Ok(PublicKey)` if recovery succeeds, or `InvalidSignature` otherwise.
    pub fn recover_public_key(&self, digest: &[u8; 32]) -> Result<PublicKey, PrimitivesError> {
        let low = self.normalized()?;
        let parity = low.recovery_parity()?;
        let recovery_id = RecoveryId::new(parity == 1, false);
        let sig = scalars_to_k256(&low.r, &low.s)?;

        let recovered = VerifyingKey::recover_from_prehash(digest, &sig, recovery_id)?;
        Ok(PublicKey::from_k256_verifying_key(&recovered))
    }

    /// Recover the signer's account address.
    pub fn recover_address(&self, digest: &[u8; 32]) -> Result<Address, PrimitivesError> {
        let address = self.recover_public_key(digest)?.to_address();
        tracing::trace!(%address, v = self.v, "recovered signer");
        Ok(address)
    }

    /// Serialize as `r || s || v` (65 bytes).
    ///
    /// # Returns
    /// The encoded bytes, or `InvalidSignature` if `v` does not fit a byte.
    pub fn to_bytes(&self) -> Result<[u8; SIGNATURE_BYTES_LEN], PrimitivesError> {
        let v = u8::try_from(self.v).map_err(|_| {
            PrimitivesError::InvalidSignature(format!("v={} does not fit in one byte", self.v))
        })?;
        let mut out = [0u8; SIGNATURE_BYTES_LEN];
        out[..32].copy_from_slice(&self.r);
        out[32..64].copy_from_slice(&self.s);
        out[64] = v;
        Ok(out)
    }

    /// Parse the 65-byte `r || s || v` encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != SIGNATURE_BYTES_LEN {
            return Err(PrimitivesError::InvalidSignature(format!(
                "expected {} bytes, got {}",
                SIGNATURE_BYTES_LEN,
                bytes.len()
            )));
        }
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);
        Ok(RecoverableSignature {
            v: u64::from(bytes[64]),
            r,
            s,
        })
    }

    /// Serialize as `0x`-prefixed hex of [`to_bytes`](Self::to_bytes).
    pub fn to_hex(&self) -> Result<String, PrimitivesError> {
        Ok(encode_hex(&self.to_bytes()?))
    }
}

impl FromStr for RecoverableSignature {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bytes(&decode_hex(s)?)
    }
}

impl fmt::Debug for RecoverableSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecoverableSignature")
            .field("v", &self.v)
            .field("r", &encode_hex(&self.r))
            .field("s", &encode_hex(&self.s))
            .finish()
    }
}

fn scalars_to_k256(r: &[u8; 32], s: &[u8; 32]) -> Result<ecdsa::Signature, PrimitivesError> {
    Ok(ecdsa::Signature::from_scalars(
        FieldBytes::from(*r),
        FieldBytes::from(*s),
    )?)
}

/// Compute N - val where N is the secp256k1 curve order.
fn subtract_from_order(val: &[u8; 32]) -> [u8; 32] {
    let mut result = [0u8; 32];
    let mut borrow: i32 = 0;
    for i in (0..32).rev() {
        let diff = CURVE_ORDER[i] as i32 - val[i] as i32 - borrow;
        if diff < 0 {
            result[i] = (diff + 256) as u8;
            borrow = 1;
        } else {
            result[i] = diff as u8;
            borrow = 0;
        }
    }
    result
}

mod hex_scalar {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::encoding::{decode_hex, encode_hex};

    pub fn serialize<S: Serializer>(value: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&encode_hex(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[u8; 32], D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = decode_hex(&s).map_err(serde::de::Error::custom)?;
        <[u8; 32]>::try_from(bytes.as_slice())
            .map_err(|_| serde::de::Error::invalid_length(bytes.len(), &"32 bytes"))
    }
}
