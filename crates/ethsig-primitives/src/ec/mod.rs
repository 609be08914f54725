/// Elliptic curve cryptography on secp256k1.
///
/// Provides private keys, public keys, and recoverable ECDSA signatures
/// over pre-computed 32-byte digests.

pub mod private_key;
pub mod public_key;
pub mod signature;

pub use private_key::PrivateKey;
pub use public_key::PublicKey;
pub use signature::RecoverableSignature;
