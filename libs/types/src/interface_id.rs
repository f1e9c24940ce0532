//! # Interface Identifier
//!
//! ## Purpose
//!
//! 8-byte opaque identifier naming a service interface. The value is derived
//! off-line from the canonical form of the interface description (see
//! `codec::hashing`), so every conforming client computes the same id for the
//! same interface without a central registry.
//!
//! The bytes have no inherent byte-order meaning; only when an id is viewed
//! as an integer (display, manifests) are the bytes read big-endian.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Errors from [`InterfaceId`] construction and wire reads.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InterfaceIdError {
    /// Input slice cannot supply the 8 id bytes.
    #[error("interface id length mismatch: need {need} bytes, got {got}")]
    LengthMismatch { need: usize, got: usize },

    /// Hex form is malformed (wrong digit count or non-hex characters).
    #[error("invalid interface id encoding: {reason}")]
    InvalidEncoding { reason: String },

    /// Buffer ends before the 8 id bytes at the requested offset.
    #[error("buffer underrun reading interface id: need {need} bytes at offset {offset}, buffer has {got}")]
    BufferUnderrun {
        need: usize,
        got: usize,
        offset: usize,
    },
}

/// Unique identifier for a service interface.
///
/// Exactly 8 raw bytes, immutable, compared byte-wise. Construction is
/// all-or-nothing: a partially built id is never observable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InterfaceId([u8; 8]);

impl InterfaceId {
    /// Identifier size in bytes.
    pub const LEN: usize = 8;

    /// The all-zero identifier.
    pub const fn zero() -> Self {
        Self([0u8; 8])
    }

    /// Create an id from the first 8 bytes of `bytes`.
    ///
    /// Longer inputs are accepted (e.g. a full 32-byte digest); shorter
    /// inputs fail with [`InterfaceIdError::LengthMismatch`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, InterfaceIdError> {
        if bytes.len() < Self::LEN {
            return Err(InterfaceIdError::LengthMismatch {
                need: Self::LEN,
                got: bytes.len(),
            });
        }

        let mut inner = [0u8; Self::LEN];
        inner.copy_from_slice(&bytes[..Self::LEN]);
        Ok(Self(inner))
    }

    /// Create an id from its numeric value (big-endian byte layout).
    pub const fn from_u64(value: u64) -> Self {
        Self(value.to_be_bytes())
    }

    /// Parse an id from its hex form: optional `0x`/`0X` prefix followed by
    /// exactly 16 hex digits, case-insensitive.
    pub fn from_hex(s: &str) -> Result<Self, InterfaceIdError> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);

        if digits.len() != Self::LEN * 2 {
            return Err(InterfaceIdError::InvalidEncoding {
                reason: format!("expected 16 hex digits, got {}", digits.len()),
            });
        }

        let mut inner = [0u8; Self::LEN];
        hex::decode_to_slice(digits, &mut inner).map_err(|e| {
            InterfaceIdError::InvalidEncoding {
                reason: e.to_string(),
            }
        })?;
        Ok(Self(inner))
    }

    /// Read an id from `buffer` starting at `offset`, returning the id and
    /// the advanced offset.
    pub fn read_from(buffer: &[u8], offset: usize) -> Result<(Self, usize), InterfaceIdError> {
        let remaining = buffer.len().saturating_sub(offset);
        if remaining < Self::LEN {
            return Err(InterfaceIdError::BufferUnderrun {
                need: Self::LEN,
                got: remaining,
                offset,
            });
        }

        let mut inner = [0u8; Self::LEN];
        inner.copy_from_slice(&buffer[offset..offset + Self::LEN]);
        Ok((Self(inner), offset + Self::LEN))
    }

    /// The raw 8 bytes (a copy; the id itself stays immutable).
    pub const fn as_bytes(&self) -> [u8; 8] {
        self.0
    }

    /// The bytes read as a big-endian unsigned 64-bit integer.
    pub const fn as_u64(&self) -> u64 {
        u64::from_be_bytes(self.0)
    }

    /// `0x`-prefixed lowercase 16-digit hex form.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for InterfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for InterfaceId {
    type Err = InterfaceIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

// Manifests and canonical documents carry ids in hex form.
impl Serialize for InterfaceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for InterfaceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_all_zero_bytes() {
        assert_eq!(InterfaceId::zero().as_bytes(), [0u8; 8]);
        assert_eq!(InterfaceId::zero().as_u64(), 0);
    }

    #[test]
    fn from_bytes_takes_prefix_of_longer_input() {
        let digest = [
            1u8, 2, 3, 4, 5, 6, 7, 8, 0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF, 0x10, 0x20,
        ];
        let id = InterfaceId::from_bytes(&digest).unwrap();
        assert_eq!(id.as_bytes(), [1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn from_bytes_rejects_short_input() {
        let err = InterfaceId::from_bytes(&[1, 2, 3]).unwrap_err();
        assert_eq!(err, InterfaceIdError::LengthMismatch { need: 8, got: 3 });
    }

    #[test]
    fn from_u64_is_big_endian() {
        let id = InterfaceId::from_u64(0x0102_0304_0506_0708);
        assert_eq!(id.as_bytes(), [1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(id.as_u64(), 0x0102_0304_0506_0708);
    }

    #[test]
    fn hex_round_trip_with_and_without_prefix() {
        let id = InterfaceId::from_u64(0xDEAD_BEEF_CAFE_F00D);
        assert_eq!(id.to_hex(), "0xdeadbeefcafef00d");
        assert_eq!(InterfaceId::from_hex(&id.to_hex()).unwrap(), id);
        assert_eq!(InterfaceId::from_hex("deadbeefcafef00d").unwrap(), id);
        assert_eq!(InterfaceId::from_hex("0XDEADBEEFCAFEF00D").unwrap(), id);
    }

    #[test]
    fn from_hex_rejects_bad_input() {
        assert!(matches!(
            InterfaceId::from_hex("0x1234").unwrap_err(),
            InterfaceIdError::InvalidEncoding { .. }
        ));
        assert!(matches!(
            InterfaceId::from_hex("0xzzzzzzzzzzzzzzzz").unwrap_err(),
            InterfaceIdError::InvalidEncoding { .. }
        ));
        // 17 digits
        assert!(matches!(
            InterfaceId::from_hex("0x00112233445566778").unwrap_err(),
            InterfaceIdError::InvalidEncoding { .. }
        ));
    }

    #[test]
    fn read_from_advances_offset() {
        let buffer = [0u8, 0, 1, 2, 3, 4, 5, 6, 7, 8, 99];
        let (id, offset) = InterfaceId::read_from(&buffer, 2).unwrap();
        assert_eq!(id.as_bytes(), [1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(offset, 10);
    }

    #[test]
    fn read_from_reports_underrun() {
        let buffer = [1u8, 2, 3, 4, 5];
        let err = InterfaceId::read_from(&buffer, 2).unwrap_err();
        assert_eq!(
            err,
            InterfaceIdError::BufferUnderrun {
                need: 8,
                got: 3,
                offset: 2
            }
        );

        // Offset past the end must not panic.
        let err = InterfaceId::read_from(&buffer, 100).unwrap_err();
        assert_eq!(
            err,
            InterfaceIdError::BufferUnderrun {
                need: 8,
                got: 0,
                offset: 100
            }
        );
    }

    #[test]
    fn equality_is_byte_wise() {
        let a = InterfaceId::from_bytes(&[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        let b = InterfaceId::from_u64(0x0102_0304_0506_0708);
        let c = InterfaceId::from_bytes(&[8, 7, 6, 5, 4, 3, 2, 1]).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn serde_uses_hex_form() {
        let id = InterfaceId::from_u64(0x0102_0304_0506_0708);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"0x0102030405060708\"");
        let back: InterfaceId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
