/// Unified error type for all primitives operations.
///
/// Covers errors from byte conversion, EC operations, and address parsing.
#[derive(Debug, thiserror::Error)]
pub enum PrimitivesError {
    #[error("unsupported representation: {0}")]
    UnsupportedRepresentation(String),

    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid digest length: expected {expected}, got {got}")]
    InvalidDigestLength { expected: usize, got: usize },
}

impl From<hex::FromHexError> for PrimitivesError {
    fn from(e: hex::FromHexError) -> Self {
        PrimitivesError::UnsupportedRepresentation(format!("malformed hex: {}", e))
    }
}

impl From<std::string::FromUtf8Error> for PrimitivesError {
    fn from(e: std::string::FromUtf8Error) -> Self {
        PrimitivesError::UnsupportedRepresentation(format!("bytes are not valid UTF-8: {}", e))
    }
}

impl From<k256::ecdsa::Error> for PrimitivesError {
    fn from(e: k256::ecdsa::Error) -> Self {
        PrimitivesError::InvalidSignature(e.to_string())
    }
}
