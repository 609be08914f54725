//! Message framing for the two signing conventions.
//!
//! `direct` hashes the message bytes unmodified. `prefixed` hashes
//! `"\x19Ethereum Signed Message:\n" || len || message`, where `len` is the
//! decimal ASCII byte length of the encoded message, never its character count.

use ethsig_primitives::hash::{Digester, Keccak256Digester, DIGEST_SIZE};

use crate::{MessageError, SigningMode};

/// Header prepended to messages in [`SigningMode::Prefixed`].
pub const SIGNED_MESSAGE_HEADER: &str = "\x19Ethereum Signed Message:\n";

/// Build the exact bytes that get hashed for `message` under `mode`.
pub fn preimage(message: &[u8], mode: SigningMode) -> Vec<u8> {
    match mode {
        SigningMode::Direct => message.to_vec(),
        SigningMode::Prefixed => {
            let length = message.len().to_string();
            let mut out =
                Vec::with_capacity(SIGNED_MESSAGE_HEADER.len() + length.len() + message.len());
            out.extend_from_slice(SIGNED_MESSAGE_HEADER.as_bytes());
            out.extend_from_slice(length.as_bytes());
            out.extend_from_slice(message);
            out
        }
    }
}

/// Hash a byte message under `mode` with Keccak-256.
///
/// # Returns
/// The 32-byte digest, or `UnrecognizedSigningMode` if `mode` is a raw tag
/// that does not parse. Nothing is hashed in that case.
pub fn frame_bytes<M>(message: &[u8], mode: M) -> Result<[u8; DIGEST_SIZE], MessageError>
where
    M: TryInto<SigningMode>,
    MessageError: From<M::Error>,
{
    frame_bytes_with(&Keccak256Digester, message, mode)
}

/// Hash a text message under `mode` with Keccak-256.
///
/// Equal to `frame_bytes(text.as_bytes(), mode)`.
pub fn frame_text<M>(message: &str, mode: M) -> Result<[u8; DIGEST_SIZE], MessageError>
where
    M: TryInto<SigningMode>,
    MessageError: From<M::Error>,
{
    frame_text_with(&Keccak256Digester, message, mode)
}

/// [`frame_bytes`] with a caller-supplied digest function.
pub fn frame_bytes_with<D, M>(
    digester: &D,
    message: &[u8],
    mode: M,
) -> Result<[u8; DIGEST_SIZE], MessageError>
where
    D: Digester + ?Sized,
    M: TryInto<SigningMode>,
    MessageError: From<M::Error>,
{
    let mode = mode.try_into()?;
    Ok(digest_preimage_with(digester, message, mode))
}

/// [`frame_text`] with a caller-supplied digest function.
pub fn frame_text_with<D, M>(
    digester: &D,
    message: &str,
    mode: M,
) -> Result<[u8; DIGEST_SIZE], MessageError>
where
    D: Digester + ?Sized,
    M: TryInto<SigningMode>,
    MessageError: From<M::Error>,
{
    frame_bytes_with(digester, message.as_bytes(), mode)
}

/// Keccak-256 of the framed message for an already parsed mode.
pub(crate) fn digest_preimage(message: &[u8], mode: SigningMode) -> [u8; DIGEST_SIZE] {
    digest_preimage_with(&Keccak256Digester, message, mode)
}

pub(crate) fn digest_preimage_with<D>(
    digester: &D,
    message: &[u8],
    mode: SigningMode,
) -> [u8; DIGEST_SIZE]
where
    D: Digester + ?Sized,
{
    match mode {
        SigningMode::Direct => digester.digest(message),
        SigningMode::Prefixed => digester.digest(&preimage(message, mode)),
    }
}
