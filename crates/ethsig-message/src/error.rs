use std::convert::Infallible;

/// Error types for message operations.
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    /// A signing mode tag outside `direct` / `prefixed`.
    #[error("unrecognized signing mode: {0}")]
    UnrecognizedSigningMode(String),
    /// A chain id that is not a positive integer.
    #[error("invalid chain id {0}: must be positive")]
    InvalidChainId(u64),
    /// A recovery indicator that cannot be bound or unbound.
    #[error("invalid recovery indicator v={0}")]
    InvalidRecoveryId(u64),
    /// Chain binding would overflow the `v` range.
    #[error("chain id {0} overflows the recovery indicator")]
    ChainIdOverflow(u64),
    /// Error from the primitives layer (conversion, keys, signatures).
    #[error("{0}")]
    Primitives(#[from] ethsig_primitives::PrimitivesError),
}

impl From<Infallible> for MessageError {
    fn from(e: Infallible) -> Self {
        match e {}
    }
}
