//! Byte representation conversion.
//!
//! Every value that crosses the SDK boundary as "data" is normalized here
//! into one canonical byte sequence, [`ByteData`], and can be rendered back
//! as raw bytes, `0x`-prefixed hex, or UTF-8 text.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::PrimitivesError;

/// Input accepted by [`convert`] and [`ByteData::parse`].
///
/// Strings are never classified implicitly; the caller says whether a
/// string holds hex digits or plain text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RawData<'a> {
    /// Raw bytes, taken as-is.
    Binary(&'a [u8]),
    /// Hex text, case-insensitive, with or without a `0x` prefix.
    Hex(&'a str),
    /// UTF-8 text, converted to its encoded bytes.
    Text(&'a str),
}

/// Target representation for [`convert`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DataForm {
    Binary,
    Hex,
    Text,
}

/// Output of [`convert`], one variant per [`DataForm`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormattedData {
    Binary(Vec<u8>),
    Hex(String),
    Text(String),
}

/// Convert `value` into the requested representation.
///
/// # Arguments
/// * `value` - Bytes, hex text, or UTF-8 text.
/// * `form` - The representation to produce.
///
/// # Returns
/// The converted value, or `UnsupportedRepresentation` if `value` is malformed
/// hex or the bytes are not valid UTF-8 when `Text` is requested.
pub fn convert(value: RawData<'_>, form: DataForm) -> Result<FormattedData, PrimitivesError> {
    let data = ByteData::parse(value)?;
    Ok(match form {
        DataForm::Binary => FormattedData::Binary(data.into_bytes()),
        DataForm::Hex => FormattedData::Hex(data.to_hex()),
        DataForm::Text => FormattedData::Text(data.into_text()?),
    })
}

/// Decode hex text into bytes.
///
/// Accepts an optional `0x`/`0X` prefix and digits in either case. The empty
/// string and a bare prefix both decode to an empty sequence.
pub fn decode_hex(text: &str) -> Result<Vec<u8>, PrimitivesError> {
    let digits = strip_hex_prefix(text);
    if digits.len() % 2 != 0 {
        return Err(PrimitivesError::UnsupportedRepresentation(format!(
            "odd-length hex string ({} digits)",
            digits.len()
        )));
    }
    Ok(hex::decode(digits)?)
}

/// Encode bytes as lowercase hex with a `0x` prefix.
pub fn encode_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

pub(crate) fn strip_hex_prefix(text: &str) -> &str {
    text.strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text)
}

impl FormattedData {
    /// The representation this value is in.
    pub fn form(&self) -> DataForm {
        match self {
            FormattedData::Binary(_) => DataForm::Binary,
            FormattedData::Hex(_) => DataForm::Hex,
            FormattedData::Text(_) => DataForm::Text,
        }
    }

    /// View this value as converter input, for chaining conversions.
    pub fn as_raw(&self) -> RawData<'_> {
        match self {
            FormattedData::Binary(b) => RawData::Binary(b),
            FormattedData::Hex(h) => RawData::Hex(h),
            FormattedData::Text(t) => RawData::Text(t),
        }
    }

    /// Normalize back to canonical bytes.
    pub fn into_byte_data(self) -> Result<ByteData, PrimitivesError> {
        match self {
            FormattedData::Binary(b) => Ok(ByteData(b)),
            FormattedData::Hex(h) => ByteData::from_hex(&h),
            FormattedData::Text(t) => Ok(ByteData(t.into_bytes())),
        }
    }
}

/// An immutable canonical byte sequence.
///
/// Displayed and serialized as `0x`-prefixed lowercase hex.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct ByteData(Vec<u8>);

impl ByteData {
    /// Wrap raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        ByteData(bytes.to_vec())
    }

    /// Parse hex text (see [`decode_hex`]).
    pub fn from_hex(text: &str) -> Result<Self, PrimitivesError> {
        decode_hex(text).map(ByteData)
    }

    /// Take the UTF-8 encoding of `text`.
    pub fn from_text(text: &str) -> Self {
        ByteData(text.as_bytes().to_vec())
    }

    /// Normalize any [`RawData`] variant.
    pub fn parse(value: RawData<'_>) -> Result<Self, PrimitivesError> {
        match value {
            RawData::Binary(b) => Ok(Self::from_bytes(b)),
            RawData::Hex(h) => Self::from_hex(h),
            RawData::Text(t) => Ok(Self::from_text(t)),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render as lowercase hex with a `0x` prefix.
    pub fn to_hex(&self) -> String {
        encode_hex(&self.0)
    }

    /// Interpret the bytes as UTF-8 text.
    ///
    /// # Returns
    /// The decoded string, or `UnsupportedRepresentation` if the bytes are not valid UTF-8.
    pub fn to_text(&self) -> Result<String, PrimitivesError> {
        self.clone().into_text()
    }

    fn into_text(self) -> Result<String, PrimitivesError> {
        Ok(String::from_utf8(self.0)?)
    }
}

impl AsRef<[u8]> for ByteData {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for ByteData {
    fn from(bytes: Vec<u8>) -> Self {
        ByteData(bytes)
    }
}

impl<'a> From<&'a [u8]> for RawData<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        RawData::Binary(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for RawData<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        RawData::Binary(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for RawData<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        RawData::Binary(bytes)
    }
}

impl<'a> From<&'a ByteData> for RawData<'a> {
    fn from(data: &'a ByteData) -> Self {
        RawData::Binary(&data.0)
    }
}

impl fmt::Display for ByteData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ByteData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ByteData({})", self.to_hex())
    }
}

impl FromStr for ByteData {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for ByteData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ByteData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ByteData::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
