//! Object identifier codec.
//!
//! Active Directory stores `objectGUID` as 16 raw bytes. The usual textual
//! GUID form swaps the byte order of the first three fields, which breaks
//! `<GUID=...>` query embedding. [`ObjectGuid`] renders the bytes as plain
//! lowercase hex in storage order instead.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::error::{DirectoryError, DirectoryResult};

/// Length of an object identifier in bytes.
pub const GUID_LEN: usize = 16;

/// A 16-byte directory object identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectGuid([u8; GUID_LEN]);

impl ObjectGuid {
    /// Wraps raw identifier bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; GUID_LEN]) -> Self {
        Self(bytes)
    }

    /// Builds an identifier from a byte slice as returned by the directory.
    ///
    /// ## Errors
    ///
    /// Returns [`DirectoryError::MalformedIdentifier`] if the slice is not
    /// exactly 16 bytes.
    pub fn from_slice(bytes: &[u8]) -> DirectoryResult<Self> {
        let array: [u8; GUID_LEN] = bytes.try_into().map_err(|_| {
            DirectoryError::MalformedIdentifier(format!(
                "expected {GUID_LEN} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(array))
    }

    /// Decodes the canonical hex form. Upper and lower case are accepted.
    ///
    /// ## Errors
    ///
    /// Returns [`DirectoryError::MalformedIdentifier`] on odd length,
    /// non-hex characters, or a decoded length other than 16 bytes.
    pub fn from_hex(text: &str) -> DirectoryResult<Self> {
        if text.len() % 2 != 0 {
            return Err(DirectoryError::MalformedIdentifier(format!(
                "odd-length hex string: {text}"
            )));
        }
        let bytes = hex::decode(text)
            .map_err(|e| DirectoryError::MalformedIdentifier(format!("{text}: {e}")))?;
        Self::from_slice(&bytes)
    }

    /// Returns the raw bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; GUID_LEN] {
        &self.0
    }

    /// Encodes as 32 lowercase hex characters in byte order.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Value used to address the object in a filter or search base.
    #[must_use]
    pub fn filter_value(&self) -> String {
        format!("<GUID={}>", self.to_hex())
    }

    /// The platform's mixed-endian rendering, for display only.
    #[must_use]
    pub fn to_native_uuid(&self) -> Uuid {
        Uuid::from_bytes_le(self.0)
    }
}

/// Encodes raw identifier bytes.
#[must_use]
pub fn encode(bytes: &[u8; GUID_LEN]) -> String {
    hex::encode(bytes)
}

/// Decodes a canonical hex identifier.
///
/// ## Errors
///
/// See [`ObjectGuid::from_hex`].
pub fn decode(text: &str) -> DirectoryResult<[u8; GUID_LEN]> {
    ObjectGuid::from_hex(text).map(|guid| guid.0)
}

impl fmt::Display for ObjectGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for ObjectGuid {
    type Err = DirectoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for ObjectGuid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ObjectGuid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::from_hex(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BYTES: [u8; 16] = [
        0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F,
        0xF0,
    ];

    #[test]
    fn encode_preserves_byte_order() {
        let text = encode(&BYTES);
        assert_eq!(text, "0102030405060708090a0b0c0d0e0ff0");
        assert_eq!(text.len(), 32);
        assert!(text.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn decode_reverses_encode() {
        for seed in 0u8..=255 {
            let mut bytes = [0u8; 16];
            for (i, b) in bytes.iter_mut().enumerate() {
                *b = seed.wrapping_mul(31).wrapping_add(i as u8 * 17);
            }
            assert_eq!(decode(&encode(&bytes)).unwrap(), bytes);
        }
    }

    #[test]
    fn decode_accepts_uppercase() {
        let guid = ObjectGuid::from_hex("0102030405060708090A0B0C0D0E0FF0").unwrap();
        assert_eq!(guid.as_bytes(), &BYTES);
        assert_eq!(guid.to_string(), "0102030405060708090a0b0c0d0e0ff0");
    }

    #[test]
    fn decode_rejects_bad_input() {
        assert!(matches!(
            ObjectGuid::from_hex("abc"),
            Err(DirectoryError::MalformedIdentifier(_))
        ));
        assert!(matches!(
            ObjectGuid::from_hex("zz02030405060708090a0b0c0d0e0ff0"),
            Err(DirectoryError::MalformedIdentifier(_))
        ));
        assert!(matches!(
            ObjectGuid::from_hex("0102"),
            Err(DirectoryError::MalformedIdentifier(_))
        ));
    }

    #[test]
    fn native_form_is_reordered() {
        let guid = ObjectGuid::from_bytes(BYTES);
        assert_eq!(
            guid.to_native_uuid().to_string(),
            "04030201-0605-0807-090a-0b0c0d0e0ff0"
        );
        assert_eq!(guid.filter_value(), "<GUID=0102030405060708090a0b0c0d0e0ff0>");
    }

    #[test]
    fn serde_uses_hex_string() {
        let guid = ObjectGuid::from_bytes(BYTES);
        let json = serde_json::to_string(&guid).unwrap();
        assert_eq!(json, "\"0102030405060708090a0b0c0d0e0ff0\"");
        let back: ObjectGuid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, guid);
    }
}
