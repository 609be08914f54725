#![deny(missing_docs)]

//! Ethereum message signing SDK - `eth_sign` / `personal_sign` message signing.
//!
//! Frames application messages in one of two signing conventions, hashes
//! them with Keccak-256, signs the digest with secp256k1, and optionally
//! binds the signature's recovery indicator to a chain id.

mod error;
pub mod chain;
pub mod config;
pub mod framing;
pub mod mode;
pub mod signed;

pub use error::MessageError;
pub use config::{MessageSigner, SignerConfig};
pub use mode::SigningMode;
pub use signed::{
    hash_data_message, hash_text_message, recover_data_message_signer,
    recover_text_message_signer, sign_data_message, sign_digest, sign_text_message,
    verify_data_message, verify_text_message,
};
