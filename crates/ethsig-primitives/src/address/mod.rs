//! Account address type.
//!
//! An `Address` is 20 bytes, displayed in the EIP-55 mixed-case checksum
//! form: hex digits are upper-cased where the matching nibble of the
//! Keccak-256 hash of the lowercase hex address is 8 or more.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::encoding::strip_hex_prefix;
use crate::hash::keccak256;
use crate::PrimitivesError;

/// Size of an Address in bytes.
pub const ADDRESS_SIZE: usize = 20;

/// A 20-byte account address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; ADDRESS_SIZE]);

impl Address {
    /// Create an Address from a raw 20-byte array.
    pub fn new(bytes: [u8; ADDRESS_SIZE]) -> Self {
        Address(bytes)
    }

    /// Create an Address from a byte slice.
    ///
    /// # Returns
    /// `Ok(Address)` if the slice is 20 bytes, or `InvalidAddress` otherwise.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        let arr = <[u8; ADDRESS_SIZE]>::try_from(bytes).map_err(|_| {
            PrimitivesError::InvalidAddress(format!(
                "invalid address length of {}, want {}",
                bytes.len(),
                ADDRESS_SIZE
            ))
        })?;
        Ok(Address(arr))
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_SIZE] {
        &self.0
    }

    /// Render with the EIP-55 checksum casing and a `0x` prefix.
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let hash = keccak256(lower.as_bytes());

        let mut out = String::with_capacity(2 + lower.len());
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let nibble = if i % 2 == 0 {
                hash[i / 2] >> 4
            } else {
                hash[i / 2] & 0x0f
            };
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_checksum())
    }
}

impl FromStr for Address {
    type Err = PrimitivesError;

    /// Parse hex in any casing; the checksum is not enforced.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = strip_hex_prefix(s);
        if digits.len() != ADDRESS_SIZE * 2 {
            return Err(PrimitivesError::InvalidAddress(format!(
                "expected {} hex digits, got {}",
                ADDRESS_SIZE * 2,
                digits.len()
            )));
        }
        let bytes = hex::decode(digits).map_err(|e| PrimitivesError::InvalidAddress(e.to_string()))?;
        Self::from_bytes(&bytes)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_checksum())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Address::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // EIP-55 reference vectors.
    const CHECKSUMMED: [&str; 4] = [
        "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
        "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
        "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
        "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
    ];

    #[test]
    fn test_eip55_vectors() {
        for expected in CHECKSUMMED {
            let addr: Address = expected.to_lowercase().parse().unwrap();
            assert_eq!(addr.to_string(), expected);
        }
    }

    #[test]
    fn test_parse_without_prefix_and_uppercase() {
        let a: Address = "5AAEB6053F3E94C9B9A09F33669435E7EF1BEAED".parse().unwrap();
        let b: Address = CHECKSUMMED[0].parse().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_addresses() {
        for bad in ["0x1234", "0xzzAeb6053F3E94C9b9A09f33669435E7Ef1BeAed", ""] {
            assert!(matches!(
                bad.parse::<Address>(),
                Err(PrimitivesError::InvalidAddress(_))
            ));
        }
        assert!(Address::from_bytes(&[0u8; 19]).is_err());
    }

    #[test]
    fn test_address_serde() {
        let addr: Address = CHECKSUMMED[1].parse().unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{}\"", CHECKSUMMED[1]));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }
}
