//! Signer configuration.
//!
//! A [`SignerConfig`] fixes the signing mode and optional chain id once so
//! callers don't repeat them on every call. It deserializes from any serde
//! format, with missing fields falling back to `prefixed` and no chain id.

use ethsig_primitives::ec::{PrivateKey, RecoverableSignature};
use ethsig_primitives::encoding::RawData;
use ethsig_primitives::hash::DIGEST_SIZE;
use serde::{Deserialize, Serialize};

use crate::{signed, MessageError, SigningMode};

/// Mode and replay-protection settings for a [`MessageSigner`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignerConfig {
    /// Message framing convention.
    pub mode: SigningMode,
    /// Chain to bind signatures to, if any.
    pub chain_id: Option<u64>,
}

impl SignerConfig {
    /// `personal_sign` framing, no chain binding.
    pub fn prefixed() -> Self {
        SignerConfig {
            mode: SigningMode::Prefixed,
            chain_id: None,
        }
    }

    /// `eth_sign` framing, no chain binding.
    pub fn direct() -> Self {
        SignerConfig {
            mode: SigningMode::Direct,
            chain_id: None,
        }
    }

    /// Bind signatures to `chain_id`.
    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }
}

/// Signs and hashes messages with a fixed [`SignerConfig`].
///
/// Holds no key material; the private key is borrowed per call.
#[derive(Clone, Copy, Debug, Default)]
pub struct MessageSigner {
    config: SignerConfig,
}

impl MessageSigner {
    /// Create a signer with the given configuration.
    pub fn new(config: SignerConfig) -> Self {
        MessageSigner { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &SignerConfig {
        &self.config
    }

    /// Sign a UTF-8 text message.
    pub fn sign_text(
        &self,
        message: &str,
        private_key: &PrivateKey,
    ) -> Result<RecoverableSignature, MessageError> {
        signed::sign_text_message(message, private_key, self.config.mode, self.config.chain_id)
    }

    /// Sign a data message.
    pub fn sign_data<'a>(
        &self,
        message: impl Into<RawData<'a>>,
        private_key: &PrivateKey,
    ) -> Result<RecoverableSignature, MessageError> {
        signed::sign_data_message(message, private_key, self.config.mode, self.config.chain_id)
    }

    /// Sign a pre-computed digest. The mode does not apply.
    pub fn sign_digest<'a>(
        &self,
        digest: impl Into<RawData<'a>>,
        private_key: &PrivateKey,
    ) -> Result<RecoverableSignature, MessageError> {
        signed::sign_digest(digest, private_key, self.config.chain_id)
    }

    /// Hash a UTF-8 text message under the configured mode.
    pub fn hash_text(&self, message: &str) -> Result<[u8; DIGEST_SIZE], MessageError> {
        signed::hash_text_message(message, self.config.mode)
    }

    /// Hash a data message under the configured mode.
    pub fn hash_data<'a>(
        &self,
        message: impl Into<RawData<'a>>,
    ) -> Result<[u8; DIGEST_SIZE], MessageError> {
        signed::hash_data_message(message, self.config.mode)
    }
}
