//! # Sails Message Header - Fixed-Layout Wire Codec
//!
//! ## Purpose
//!
//! Encoding and decoding of the 16-byte header prepended to every message
//! exchanged with a program. The layout is bit-exact across all client
//! implementations:
//!
//! ```text
//! ┌────────┬─────────┬──────┬──────────────┬─────────┬──────────┬──────────┐
//! │ magic  │ version │ hlen │ interface id │ entry   │ route    │ reserved │
//! │ 2B GM  │ 1B      │ 1B   │ 8B opaque    │ 2B LE   │ 1B       │ 1B = 0   │
//! └────────┴─────────┴──────┴──────────────┴─────────┴──────────┴──────────┘
//!   0..2     2         3      4..12          12..14    14         15
//! ```
//!
//! `hlen` declares the total header length and may exceed 16; the extra
//! bytes are reserved for future versions. Decode consumes exactly the
//! fixed 16-byte prefix - the trailing declared region is payload-adjacent
//! and skipping to it via `hlen` is the caller's responsibility.

use tracing::trace;
use types::InterfaceId;

use crate::constants::{offsets, HIGHEST_SUPPORTED_VERSION, MAGIC_BYTES, MINIMAL_HLEN};
use crate::error::{ProtocolError, ProtocolResult};

/// Sails message header.
///
/// Immutable once constructed; a partially validated header is never
/// observable. Carries the interface id addressing a service, the entry id
/// of the targeted function or event, and the route index disambiguating
/// multiple local occurrences of the same interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SailsMessageHeader {
    version: u8,
    hlen: u8,
    interface_id: InterfaceId,
    entry_id: u16,
    route_idx: u8,
}

impl SailsMessageHeader {
    /// Create a header, validating version and declared length.
    pub fn new(
        version: u8,
        hlen: u8,
        interface_id: InterfaceId,
        entry_id: u16,
        route_idx: u8,
    ) -> ProtocolResult<Self> {
        if version == 0 || version > HIGHEST_SUPPORTED_VERSION {
            return Err(ProtocolError::unsupported_version(version));
        }
        if hlen < MINIMAL_HLEN {
            return Err(ProtocolError::header_too_short(hlen));
        }

        Ok(Self {
            version,
            hlen,
            interface_id,
            entry_id,
            route_idx,
        })
    }

    /// Canonical version-1 header with the fixed 16-byte length.
    pub fn v1(interface_id: InterfaceId, entry_id: u16, route_idx: u8) -> Self {
        Self {
            version: 1,
            hlen: MINIMAL_HLEN,
            interface_id,
            entry_id,
            route_idx,
        }
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn hlen(&self) -> u8 {
        self.hlen
    }

    pub fn interface_id(&self) -> InterfaceId {
        self.interface_id
    }

    pub fn entry_id(&self) -> u16 {
        self.entry_id
    }

    pub fn route_idx(&self) -> u8 {
        self.route_idx
    }

    /// Serialize the header to `hlen` bytes.
    ///
    /// Writes the 16-byte fixed prefix; any declared trailing region is
    /// zero-filled (undefined trailing content defaults to zero).
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = vec![0u8; self.hlen as usize];
        bytes[offsets::MAGIC..offsets::MAGIC + 2].copy_from_slice(&MAGIC_BYTES);
        bytes[offsets::VERSION] = self.version;
        bytes[offsets::HLEN] = self.hlen;
        bytes[offsets::INTERFACE_ID..offsets::INTERFACE_ID + InterfaceId::LEN]
            .copy_from_slice(&self.interface_id.as_bytes());
        bytes[offsets::ENTRY_ID..offsets::ENTRY_ID + 2]
            .copy_from_slice(&self.entry_id.to_le_bytes());
        bytes[offsets::ROUTE_IDX] = self.route_idx;
        bytes[offsets::RESERVED] = 0;

        bytes
    }

    /// Deserialize a header from `bytes` starting at `offset`, returning the
    /// header and the advanced offset.
    ///
    /// Consumes exactly the fixed 16-byte prefix regardless of the declared
    /// `hlen`; callers that need the payload skip to `offset + hlen`
    /// themselves. Validation order is fixed: buffer bounds, magic, version,
    /// hlen, interface id, reserved byte.
    pub fn decode(bytes: &[u8], offset: usize) -> ProtocolResult<(Self, usize)> {
        let remaining = bytes.len().saturating_sub(offset);
        if remaining < MINIMAL_HLEN as usize {
            return Err(ProtocolError::buffer_too_short(
                MINIMAL_HLEN as usize,
                remaining,
                offset,
            ));
        }

        let prefix = &bytes[offset..offset + MINIMAL_HLEN as usize];

        let magic = [prefix[offsets::MAGIC], prefix[offsets::MAGIC + 1]];
        if magic != MAGIC_BYTES {
            return Err(ProtocolError::bad_magic(magic, offset));
        }

        let version = prefix[offsets::VERSION];
        if version == 0 || version > HIGHEST_SUPPORTED_VERSION {
            return Err(ProtocolError::unsupported_version(version));
        }

        let hlen = prefix[offsets::HLEN];
        if hlen < MINIMAL_HLEN {
            return Err(ProtocolError::header_too_short(hlen));
        }

        let (interface_id, _) = InterfaceId::read_from(prefix, offsets::INTERFACE_ID)?;

        let entry_id =
            u16::from_le_bytes([prefix[offsets::ENTRY_ID], prefix[offsets::ENTRY_ID + 1]]);
        let route_idx = prefix[offsets::ROUTE_IDX];
        let reserved = prefix[offsets::RESERVED];

        if version == 1 && reserved != 0 {
            return Err(ProtocolError::ReservedNonZero { value: reserved });
        }

        trace!(
            %interface_id,
            entry_id,
            route_idx,
            hlen,
            "decoded message header"
        );

        Ok((
            Self {
                version,
                hlen,
                interface_id,
                entry_id,
                route_idx,
            },
            offset + MINIMAL_HLEN as usize,
        ))
    }

    /// Deserialize a header from the start of `bytes` without offset
    /// bookkeeping.
    pub fn from_bytes(bytes: &[u8]) -> ProtocolResult<Self> {
        Self::decode(bytes, 0).map(|(header, _)| header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_id() -> InterfaceId {
        InterfaceId::from_bytes(&[1, 2, 3, 4, 5, 6, 7, 8]).unwrap()
    }

    #[test]
    fn new_validates_version_and_hlen() {
        assert_eq!(
            SailsMessageHeader::new(0, 16, sample_id(), 1, 1).unwrap_err(),
            ProtocolError::unsupported_version(0)
        );
        assert_eq!(
            SailsMessageHeader::new(2, 16, sample_id(), 1, 1).unwrap_err(),
            ProtocolError::unsupported_version(2)
        );
        assert_eq!(
            SailsMessageHeader::new(1, 15, sample_id(), 1, 1).unwrap_err(),
            ProtocolError::header_too_short(15)
        );
        assert!(SailsMessageHeader::new(1, 20, sample_id(), 1, 1).is_ok());
    }

    #[test]
    fn v1_fixes_version_and_hlen() {
        let header = SailsMessageHeader::v1(sample_id(), 1234, 42);
        assert_eq!(header.version(), 1);
        assert_eq!(header.hlen(), MINIMAL_HLEN);
        assert_eq!(header.entry_id(), 1234);
        assert_eq!(header.route_idx(), 42);
    }

    #[test]
    fn encode_writes_fixed_prefix() {
        let header = SailsMessageHeader::v1(sample_id(), 1234, 42);
        let bytes = header.encode();
        assert_eq!(
            bytes,
            vec![
                0x47, 0x4D, // magic ("GM")
                1,    // version
                16,   // hlen
                1, 2, 3, 4, 5, 6, 7, 8, // interface id
                210, 4,  // entry id (1234 little-endian)
                42, // route index
                0,  // reserved
            ]
        );
    }

    #[test]
    fn encode_zero_fills_declared_trailing_region() {
        let header = SailsMessageHeader::new(1, 24, sample_id(), 7, 3).unwrap();
        let bytes = header.encode();
        assert_eq!(bytes.len(), 24);
        assert_eq!(&bytes[16..], &[0u8; 8]);
        assert_eq!(bytes[3], 24);
    }

    #[test]
    fn decode_consumes_exactly_sixteen_bytes() {
        let header = SailsMessageHeader::new(1, 20, sample_id(), 7, 3).unwrap();
        let mut bytes = header.encode();
        // Payload after the declared trailing region.
        bytes.extend_from_slice(&[99, 100, 101]);

        let (decoded, offset) = SailsMessageHeader::decode(&bytes, 0).unwrap();
        assert_eq!(decoded, header);
        // Fixed prefix only; the caller skips to hlen for the payload.
        assert_eq!(offset, 16);
        assert_eq!(&bytes[decoded.hlen() as usize..], &[99, 100, 101]);
    }

    #[test]
    fn decode_at_nonzero_offset() {
        let header = SailsMessageHeader::v1(sample_id(), 5, 1);
        let mut bytes = vec![0xAB, 0xCD];
        bytes.extend_from_slice(&header.encode());

        let (decoded, offset) = SailsMessageHeader::decode(&bytes, 2).unwrap();
        assert_eq!(decoded, header);
        assert_eq!(offset, 18);
    }

    #[test]
    fn decode_rejects_short_buffer() {
        let bytes = [0x47, 0x4D, 1, 16, 1, 2, 3];
        let err = SailsMessageHeader::decode(&bytes, 0).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::BufferTooShort {
                need: 16,
                got: 7,
                offset: 0
            }
        );
    }

    #[test]
    fn decode_rejects_bad_magic() {
        let mut bytes = SailsMessageHeader::v1(sample_id(), 1, 1).encode();
        bytes[0] = 0x00;
        assert!(matches!(
            SailsMessageHeader::decode(&bytes, 0).unwrap_err(),
            ProtocolError::BadMagic { .. }
        ));

        let mut bytes = SailsMessageHeader::v1(sample_id(), 1, 1).encode();
        bytes[1] ^= 0xFF;
        assert!(matches!(
            SailsMessageHeader::decode(&bytes, 0).unwrap_err(),
            ProtocolError::BadMagic { .. }
        ));
    }

    #[test]
    fn decode_rejects_nonzero_reserved_in_v1() {
        let mut bytes = SailsMessageHeader::v1(sample_id(), 1, 1).encode();
        bytes[15] = 1;
        assert_eq!(
            SailsMessageHeader::decode(&bytes, 0).unwrap_err(),
            ProtocolError::ReservedNonZero { value: 1 }
        );
    }

    #[test]
    fn version_is_checked_before_reserved_byte() {
        // Unsupported version plus non-zero reserved byte: version wins.
        let mut bytes = SailsMessageHeader::v1(sample_id(), 1, 1).encode();
        bytes[2] = 2;
        bytes[15] = 1;
        assert_eq!(
            SailsMessageHeader::decode(&bytes, 0).unwrap_err(),
            ProtocolError::unsupported_version(2)
        );
    }

    #[test]
    fn from_bytes_matches_decode_at_zero() {
        let header = SailsMessageHeader::v1(sample_id(), 77, 9);
        let bytes = header.encode();
        assert_eq!(SailsMessageHeader::from_bytes(&bytes).unwrap(), header);
    }
}
