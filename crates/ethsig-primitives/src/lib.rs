/// Ethereum message signing SDK - Byte conversion, hashing, and secp256k1 primitives.
///
/// This crate provides the foundational building blocks for the SDK:
/// - Byte representation conversion (raw bytes, hex text, UTF-8 text)
/// - Keccak-256 hashing over bytes and text
/// - Elliptic curve cryptography (secp256k1 keys, recoverable signatures)
/// - Account addresses with EIP-55 checksums

pub mod hash;
pub mod encoding;
pub mod ec;
pub mod address;

mod error;
pub use error::PrimitivesError;
pub use address::Address;
pub use encoding::{convert, ByteData, DataForm, FormattedData, RawData};
