//! Chain binding of the recovery indicator (replay protection).
//!
//! A legacy `v` in `{27, 28}` is rewritten to `v - 27 + chain_id * 2 + 35`,
//! from which both the parity and the chain id can be read back.

use ethsig_primitives::ec::signature::{CHAIN_V_OFFSET, LEGACY_V_OFFSET};

use crate::MessageError;

/// Bind a legacy recovery indicator to `chain_id`.
///
/// # Returns
/// `v` unchanged when `chain_id` is `None`, otherwise the chain-bound value.
/// Fails with `InvalidRecoveryId` if `v` is not 27 or 28, `InvalidChainId` for
/// a zero chain id, and `ChainIdOverflow` if the result does not fit in `u64`.
pub fn bind(v: u64, chain_id: Option<u64>) -> Result<u64, MessageError> {
    if v != LEGACY_V_OFFSET && v != LEGACY_V_OFFSET + 1 {
        return Err(MessageError::InvalidRecoveryId(v));
    }
    let Some(chain_id) = chain_id else {
        return Ok(v);
    };
    if chain_id == 0 {
        return Err(MessageError::InvalidChainId(chain_id));
    }
    chain_id
        .checked_mul(2)
        .and_then(|doubled| doubled.checked_add(CHAIN_V_OFFSET + (v - LEGACY_V_OFFSET)))
        .ok_or(MessageError::ChainIdOverflow(chain_id))
}

/// Split a recovery indicator into its parity and optional chain id.
///
/// Accepts the legacy `{27, 28}` and chain-bound `>= 35` encodings.
pub fn unbind(v: u64) -> Result<(u8, Option<u64>), MessageError> {
    match v {
        27 | 28 => Ok(((v - LEGACY_V_OFFSET) as u8, None)),
        v if v >= CHAIN_V_OFFSET => {
            let offset = v - CHAIN_V_OFFSET;
            Ok(((offset % 2) as u8, Some(offset / 2)))
        }
        v => Err(MessageError::InvalidRecoveryId(v)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_without_chain_id_is_identity() {
        assert_eq!(bind(27, None).unwrap(), 27);
        assert_eq!(bind(28, None).unwrap(), 28);
    }

    #[test]
    fn test_bind_known_values() {
        assert_eq!(bind(27, Some(1)).unwrap(), 37);
        assert_eq!(bind(28, Some(1)).unwrap(), 38);
        assert_eq!(bind(28, Some(5)).unwrap(), 46);
        assert_eq!(bind(27, Some(137)).unwrap(), 309);
    }

    #[test]
    fn test_bind_rejects_bad_inputs() {
        assert!(matches!(bind(27, Some(0)), Err(MessageError::InvalidChainId(0))));
        assert!(matches!(bind(0, Some(1)), Err(MessageError::InvalidRecoveryId(0))));
        assert!(matches!(bind(37, Some(1)), Err(MessageError::InvalidRecoveryId(37))));
        assert!(matches!(
            bind(28, Some(u64::MAX / 2)),
            Err(MessageError::ChainIdOverflow(_))
        ));
    }

    #[test]
    fn test_bind_largest_chain_id() {
        let max = (u64::MAX - CHAIN_V_OFFSET - 1) / 2;
        let v = bind(28, Some(max)).unwrap();
        assert_eq!(unbind(v).unwrap(), (1, Some(max)));
    }

    #[test]
    fn test_unbind_inverts_bind() {
        for v in [27, 28] {
            for chain_id in [1u64, 5, 56, 137, 42161, 11155111] {
                let bound = bind(v, Some(chain_id)).unwrap();
                assert_eq!(unbind(bound).unwrap(), ((v - 27) as u8, Some(chain_id)));
            }
            assert_eq!(unbind(v).unwrap(), ((v - 27) as u8, None));
        }
        assert!(unbind(30).is_err());
        assert!(unbind(1).is_err());
    }
}
