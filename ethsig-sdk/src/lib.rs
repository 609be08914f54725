#![deny(missing_docs)]

//! Ethereum message signing SDK - Complete SDK.
//!
//! Re-exports all SDK components for convenient single-crate usage.

pub use ethsig_primitives as primitives;
pub use ethsig_message as message;
