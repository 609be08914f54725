//! Signing mode tag.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::MessageError;

/// The two message signing conventions of account-based chains.
///
/// Raw tags are parsed at the boundary; `"eth_sign"` and `"personal_sign"`
/// are accepted as aliases of `direct` and `prefixed`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SigningMode {
    /// Sign the digest of the message bytes as-is (`eth_sign`).
    #[serde(alias = "eth_sign")]
    Direct,
    /// Sign the digest of the length-prefixed message (`personal_sign`).
    #[default]
    #[serde(alias = "personal_sign")]
    Prefixed,
}

impl SigningMode {
    /// Canonical tag for this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            SigningMode::Direct => "direct",
            SigningMode::Prefixed => "prefixed",
        }
    }
}

impl fmt::Display for SigningMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SigningMode {
    type Err = MessageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "direct" | "eth_sign" => Ok(SigningMode::Direct),
            "prefixed" | "personal_sign" => Ok(SigningMode::Prefixed),
            other => Err(MessageError::UnrecognizedSigningMode(other.to_string())),
        }
    }
}

impl TryFrom<&str> for SigningMode {
    type Error = MessageError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}
