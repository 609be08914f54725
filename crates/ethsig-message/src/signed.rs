//! Message hashing, signing, and signer recovery.
//!
//! Pipeline: frame the message under a [`SigningMode`], hash it with
//! Keccak-256, sign the digest with secp256k1, then bind `v` to a chain id
//! when one is given. Every input error is raised before any hashing.

use ethsig_primitives::ec::signature::LEGACY_V_OFFSET;
use ethsig_primitives::ec::{PrivateKey, RecoverableSignature};
use ethsig_primitives::encoding::{encode_hex, ByteData, RawData};
use ethsig_primitives::hash::{Digester, Keccak256Digester, DIGEST_SIZE};
use ethsig_primitives::{Address, PrimitivesError};

use crate::{chain, framing, MessageError, SigningMode};

/// Hash a UTF-8 text message under `mode`.
pub fn hash_text_message<M>(message: &str, mode: M) -> Result<[u8; DIGEST_SIZE], MessageError>
where
    M: TryInto<SigningMode>,
    MessageError: From<M::Error>,
{
    framing::frame_text(message, mode)
}

/// Hash a data message (bytes, hex, or text) under `mode`.
///
/// The mode is checked first, then the data is converted to bytes, then hashed.
pub fn hash_data_message<'a, M>(
    message: impl Into<RawData<'a>>,
    mode: M,
) -> Result<[u8; DIGEST_SIZE], MessageError>
where
    M: TryInto<SigningMode>,
    MessageError: From<M::Error>,
{
    let mode = mode.try_into()?;
    let data = ByteData::parse(message.into())?;
    Ok(framing::digest_preimage(data.as_bytes(), mode))
}

/// Sign a UTF-8 text message.
///
/// # Arguments
/// * `message` - The text to sign.
/// * `private_key` - The signing key; only borrowed for this call.
/// * `mode` - A [`SigningMode`] or a raw mode tag.
/// * `chain_id` - When set, `v` is bound to this chain.
///
/// # Returns
/// The `(v, r, s)` signature.
pub fn sign_text_message<M>(
    message: &str,
    private_key: &PrivateKey,
    mode: M,
    chain_id: Option<u64>,
) -> Result<RecoverableSignature, MessageError>
where
    M: TryInto<SigningMode>,
    MessageError: From<M::Error>,
{
    sign_text_message_with(&Keccak256Digester, message, private_key, mode, chain_id)
}

/// Sign a data message (bytes, hex, or text).
pub fn sign_data_message<'a, M>(
    message: impl Into<RawData<'a>>,
    private_key: &PrivateKey,
    mode: M,
    chain_id: Option<u64>,
) -> Result<RecoverableSignature, MessageError>
where
    M: TryInto<SigningMode>,
    MessageError: From<M::Error>,
{
    sign_data_message_with(&Keccak256Digester, message, private_key, mode, chain_id)
}

/// Sign a pre-computed 32-byte digest without further hashing.
///
/// # Returns
/// The `(v, r, s)` signature, or `InvalidDigestLength` if `digest` does not
/// decode to exactly 32 bytes.
pub fn sign_digest<'a>(
    digest: impl Into<RawData<'a>>,
    private_key: &PrivateKey,
    chain_id: Option<u64>,
) -> Result<RecoverableSignature, MessageError> {
    check_chain_id(chain_id)?;
    let digest = to_digest(digest.into())?;
    sign_hash(&digest, private_key, chain_id)
}

pub(crate) fn sign_text_message_with<D, M>(
    digester: &D,
    message: &str,
    private_key: &PrivateKey,
    mode: M,
    chain_id: Option<u64>,
) -> Result<RecoverableSignature, MessageError>
where
    D: Digester + ?Sized,
    M: TryInto<SigningMode>,
    MessageError: From<M::Error>,
{
    let mode = mode.try_into()?;
    check_chain_id(chain_id)?;
    tracing::debug!(%mode, ?chain_id, len = message.len(), "signing text message");
    let digest = framing::digest_preimage_with(digester, message.as_bytes(), mode);
    sign_hash(&digest, private_key, chain_id)
}

pub(crate) fn sign_data_message_with<'a, D, M>(
    digester: &D,
    message: impl Into<RawData<'a>>,
    private_key: &PrivateKey,
    mode: M,
    chain_id: Option<u64>,
) -> Result<RecoverableSignature, MessageError>
where
    D: Digester + ?Sized,
    M: TryInto<SigningMode>,
    MessageError: From<M::Error>,
{
    let mode = mode.try_into()?;
    check_chain_id(chain_id)?;
    let data = ByteData::parse(message.into())?;
    tracing::debug!(%mode, ?chain_id, len = data.len(), "signing data message");
    let digest = framing::digest_preimage_with(digester, data.as_bytes(), mode);
    sign_hash(&digest, private_key, chain_id)
}

/// Recover the address that signed a text message.
pub fn recover_text_message_signer<M>(
    message: &str,
    signature: &RecoverableSignature,
    mode: M,
) -> Result<Address, MessageError>
where
    M: TryInto<SigningMode>,
    MessageError: From<M::Error>,
{
    let digest = hash_text_message(message, mode)?;
    recover_signer(&digest, signature)
}

/// Recover the address that signed a data message.
pub fn recover_data_message_signer<'a, M>(
    message: impl Into<RawData<'a>>,
    signature: &RecoverableSignature,
    mode: M,
) -> Result<Address, MessageError>
where
    M: TryInto<SigningMode>,
    MessageError: From<M::Error>,
{
    let digest = hash_data_message(message, mode)?;
    recover_signer(&digest, signature)
}

/// Check that a text message was signed by `expected`.
pub fn verify_text_message<M>(
    message: &str,
    signature: &RecoverableSignature,
    mode: M,
    expected: &Address,
) -> Result<bool, MessageError>
where
    M: TryInto<SigningMode>,
    MessageError: From<M::Error>,
{
    Ok(recover_text_message_signer(message, signature, mode)? == *expected)
}

/// Check that a data message was signed by `expected`.
pub fn verify_data_message<'a, M>(
    message: impl Into<RawData<'a>>,
    signature: &RecoverableSignature,
    mode: M,
    expected: &Address,
) -> Result<bool, MessageError>
where
    M: TryInto<SigningMode>,
    MessageError: From<M::Error>,
{
    Ok(recover_data_message_signer(message, signature, mode)? == *expected)
}

/// Reject a zero or overflowing chain id.
///
/// Binds the larger legacy parity, so any id that passes here also binds the smaller one.
fn check_chain_id(chain_id: Option<u64>) -> Result<(), MessageError> {
    chain::bind(LEGACY_V_OFFSET + 1, chain_id).map(|_| ())
}

fn sign_hash(
    digest: &[u8; DIGEST_SIZE],
    private_key: &PrivateKey,
    chain_id: Option<u64>,
) -> Result<RecoverableSignature, MessageError> {
    let signature = private_key.sign(digest)?;
    let v = chain::bind(signature.v, chain_id)?;
    tracing::debug!(digest = %encode_hex(digest), v, "signed digest");
    Ok(signature.with_v(v))
}

fn recover_signer(
    digest: &[u8; DIGEST_SIZE],
    signature: &RecoverableSignature,
) -> Result<Address, MessageError> {
    if signature.v > 1 {
        chain::unbind(signature.v)?;
    }
    Ok(signature.recover_address(digest)?)
}

fn to_digest(raw: RawData<'_>) -> Result<[u8; DIGEST_SIZE], MessageError> {
    let data = ByteData::parse(raw)?;
    let digest = <[u8; DIGEST_SIZE]>::try_from(data.as_bytes()).map_err(|_| {
        PrimitivesError::InvalidDigestLength {
            expected: DIGEST_SIZE,
            got: data.len(),
        }
    })?;
    Ok(digest)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use ethsig_primitives::hash::keccak256;

    #[derive(Default)]
    struct CountingDigester {
        calls: Cell<usize>,
    }

    impl Digester for CountingDigester {
        fn digest(&self, data: &[u8]) -> [u8; DIGEST_SIZE] {
            self.calls.set(self.calls.get() + 1);
            keccak256(data)
        }
    }

    const WEB3_KEY: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

    fn web3_key() -> PrivateKey {
        PrivateKey::from_hex(WEB3_KEY).unwrap()
    }

    #[test]
    fn test_sign_text_message_known_vector() {
        let sig = sign_text_message("Some data", &web3_key(), SigningMode::Prefixed, None).unwrap();
        assert_eq!(
            sig.to_hex().unwrap(),
            "0xb91467e570a6466aa9e9876cbcd013baba02900b8979d43fe208a4a4f339f5fd\
             6007e74cd82e037b800186422fc2da167c747ef045e5d18a5f5d4300f8e1a0291c"
        );
    }

    #[test]
    fn test_sign_text_message_chain_bound() {
        let key = web3_key();
        let plain = sign_text_message("Some data", &key, "personal_sign", None).unwrap();
        let bound = sign_text_message("Some data", &key, "personal_sign", Some(1)).unwrap();
        assert_eq!(plain.v, 28);
        assert_eq!(bound.v, 38);
        assert_eq!(bound.r, plain.r);
        assert_eq!(bound.s, plain.s);
        assert_eq!(bound.chain_id(), Some(1));
    }

    #[test]
    fn test_text_and_data_messages_agree() {
        let key = web3_key();
        let text = sign_text_message("hi", &key, SigningMode::Prefixed, Some(5)).unwrap();
        let hex = sign_data_message(RawData::Hex("0x6869"), &key, SigningMode::Prefixed, Some(5))
            .unwrap();
        let bytes = sign_data_message(b"hi", &key, SigningMode::Prefixed, Some(5)).unwrap();
        let as_text = sign_data_message(RawData::Text("hi"), &key, SigningMode::Prefixed, Some(5))
            .unwrap();
        assert_eq!(text, hex);
        assert_eq!(text, bytes);
        assert_eq!(text, as_text);
    }

    #[test]
    fn test_direct_mode_signs_raw_digest() {
        let key = web3_key();
        let via_message = sign_data_message(b"payload", &key, SigningMode::Direct, None).unwrap();
        let via_digest = sign_digest(&keccak256(b"payload"), &key, None).unwrap();
        assert_eq!(via_message, via_digest);
    }

    #[test]
    fn test_sign_digest_accepts_hex() {
        let key = web3_key();
        let sig = sign_digest(
            RawData::Hex("0x1da44b586eb0729ff70a73c326926f6ed5a25f5b056e7f47fbc6e58d86871655"),
            &key,
            None,
        )
        .unwrap();
        assert_eq!(sig.v, 28);
    }

    #[test]
    fn test_sign_digest_rejects_wrong_length() {
        let err = sign_digest(&[0u8; 31], &web3_key(), None).unwrap_err();
        assert!(matches!(
            err,
            MessageError::Primitives(PrimitivesError::InvalidDigestLength { expected: 32, got: 31 })
        ));
    }

    #[test]
    fn test_unrecognized_mode_rejected_before_data_conversion() {
        // Malformed hex would fail too, but the mode is checked first.
        let err = sign_data_message(RawData::Hex("0x1"), &web3_key(), "bogus", None).unwrap_err();
        assert!(matches!(err, MessageError::UnrecognizedSigningMode(_)));

        let err = hash_text_message("hi", "bogus").unwrap_err();
        assert!(matches!(err, MessageError::UnrecognizedSigningMode(_)));
    }

    #[test]
    fn test_malformed_data_is_unsupported_representation() {
        let err = hash_data_message(RawData::Hex("0xabc"), SigningMode::Direct).unwrap_err();
        assert!(matches!(
            err,
            MessageError::Primitives(PrimitivesError::UnsupportedRepresentation(_))
        ));
    }

    #[test]
    fn test_zero_chain_id_rejected() {
        let err = sign_text_message("hi", &web3_key(), SigningMode::Prefixed, Some(0)).unwrap_err();
        assert!(matches!(err, MessageError::InvalidChainId(0)));
    }

    #[test]
    fn test_recover_and_verify_round_trip() {
        let key = web3_key();
        let address = key.address();
        for chain_id in [None, Some(1), Some(5)] {
            for mode in [SigningMode::Direct, SigningMode::Prefixed] {
                let sig = sign_text_message("héllo", &key, mode, chain_id).unwrap();
                assert_eq!(recover_text_message_signer("héllo", &sig, mode).unwrap(), address);
                assert!(verify_text_message("héllo", &sig, mode, &address).unwrap());
                assert!(!verify_text_message("hello", &sig, mode, &address).unwrap());

                let sig = sign_data_message(b"\x00\xff", &key, mode, chain_id).unwrap();
                assert!(verify_data_message(b"\x00\xff", &sig, mode, &address).unwrap());
            }
        }
    }

    #[test]
    fn test_verify_with_wrong_mode_fails() {
        let key = web3_key();
        let sig = sign_text_message("hi", &key, SigningMode::Prefixed, None).unwrap();
        assert!(!verify_text_message("hi", &sig, SigningMode::Direct, &key.address()).unwrap());
    }

    #[test]
    fn test_recover_accepts_raw_parity() {
        let key = web3_key();
        let sig = sign_text_message("hi", &key, SigningMode::Prefixed, None).unwrap();
        let raw = sig.with_v(sig.v - 27);
        assert_eq!(
            recover_text_message_signer("hi", &raw, SigningMode::Prefixed).unwrap(),
            key.address()
        );
    }

    #[test]
    fn test_chain_id_overflow_rejected() {
        let err = sign_text_message("hi", &web3_key(), SigningMode::Prefixed, Some(u64::MAX))
            .unwrap_err();
        assert!(matches!(err, MessageError::ChainIdOverflow(_)));
    }

    #[test]
    fn test_recover_rejects_unknown_v() {
        let key = web3_key();
        let sig = sign_text_message("hi", &key, SigningMode::Prefixed, None).unwrap();
        let err = recover_text_message_signer("hi", &sig.with_v(30), SigningMode::Prefixed)
            .unwrap_err();
        assert!(matches!(err, MessageError::InvalidRecoveryId(30)));
    }

    #[test]
    fn test_bad_chain_id_rejected_before_hashing() {
        let key = web3_key();
        let digester = CountingDigester::default();

        let err = sign_text_message_with(&digester, "hi", &key, SigningMode::Prefixed, Some(0))
            .unwrap_err();
        assert!(matches!(err, MessageError::InvalidChainId(0)));
        let err = sign_data_message_with(&digester, b"hi", &key, "direct", Some(u64::MAX))
            .unwrap_err();
        assert!(matches!(err, MessageError::ChainIdOverflow(_)));
        // Chain id is checked before the data is decoded.
        let err = sign_data_message_with(&digester, RawData::Hex("0x1"), &key, "direct", Some(0))
            .unwrap_err();
        assert!(matches!(err, MessageError::InvalidChainId(0)));
        assert_eq!(digester.calls.get(), 0);

        let sig = sign_text_message_with(&digester, "hi", &key, SigningMode::Prefixed, Some(1))
            .unwrap();
        assert_eq!(digester.calls.get(), 1);
        assert_eq!(
            sig,
            sign_text_message("hi", &key, SigningMode::Prefixed, Some(1)).unwrap()
        );
    }

    #[test]
    fn test_sign_digest_checks_chain_id_before_length() {
        let err = sign_digest(&[0u8; 31], &web3_key(), Some(0)).unwrap_err();
        assert!(matches!(err, MessageError::InvalidChainId(0)));
    }
}
