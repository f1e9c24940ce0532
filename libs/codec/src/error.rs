//! Protocol-level errors for Sails header processing
//!
//! Provides error handling for header decoding and interface routing. Each
//! variant carries the specific context of what went wrong and what was
//! expected, so transport-layer callers can log actionable diagnostics.
//! Every error here is synchronous and non-retryable at this layer:
//! construction and decoding are all-or-nothing, and a failure is fatal to
//! the single operation but never to the process.

use thiserror::Error;
use types::{InterfaceId, InterfaceIdError};

use crate::constants::{HIGHEST_SUPPORTED_VERSION, MINIMAL_HLEN};

/// Header decoding and route matching errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Buffer cannot supply the fixed 16-byte header prefix.
    #[error("buffer too short: need {need} bytes at offset {offset}, got {got}")]
    BufferTooShort {
        need: usize,
        got: usize,
        offset: usize,
    },

    /// First two bytes are not the protocol magic.
    #[error("bad magic at offset {offset}: expected {expected:#06x}, got {actual:#06x}")]
    BadMagic {
        expected: u16,
        actual: u16,
        offset: usize,
    },

    /// Header version is zero or above the highest this codec understands.
    #[error("unsupported header version {version}: supported versions are 1..={highest}")]
    UnsupportedVersion { version: u8, highest: u8 },

    /// Declared header length is below the fixed prefix size.
    #[error("declared header length {hlen} is below the minimal {minimal}-byte header")]
    HeaderTooShort { hlen: u8, minimal: u8 },

    /// Reserved trailing byte of the fixed prefix must be zero in version 1.
    #[error("reserved byte must be zero in version 1, got {value:#04x}")]
    ReservedNonZero { value: u8 },

    /// Interface id construction or wire read failed.
    #[error("interface id: {0}")]
    InterfaceId(#[from] InterfaceIdError),

    /// No locally implemented interface occurrence has the header's id.
    #[error("no matching interface id found for {interface_id}")]
    NoMatchingInterface { interface_id: InterfaceId },

    /// Route index 0 means "the unique occurrence", but the interface is
    /// implemented more than once locally.
    #[error("can't infer the interface by route index 0: {occurrences} occurrences of {interface_id}")]
    AmbiguousZeroRoute {
        interface_id: InterfaceId,
        occurrences: usize,
    },

    /// The interface is implemented locally, but not under the requested
    /// route index.
    #[error("no matching route index {route_idx} found for interface {interface_id}")]
    NoMatchingRoute {
        interface_id: InterfaceId,
        route_idx: u8,
    },
}

impl ProtocolError {
    /// Create a BufferTooShort error from the bytes remaining at `offset`.
    pub fn buffer_too_short(need: usize, got: usize, offset: usize) -> Self {
        Self::BufferTooShort { need, got, offset }
    }

    /// Create a BadMagic error against the protocol magic.
    pub fn bad_magic(actual: [u8; 2], offset: usize) -> Self {
        Self::BadMagic {
            expected: u16::from_be_bytes(crate::constants::MAGIC_BYTES),
            actual: u16::from_be_bytes(actual),
            offset,
        }
    }

    /// Create an UnsupportedVersion error against the supported ceiling.
    pub fn unsupported_version(version: u8) -> Self {
        Self::UnsupportedVersion {
            version,
            highest: HIGHEST_SUPPORTED_VERSION,
        }
    }

    /// Create a HeaderTooShort error against the fixed prefix size.
    pub fn header_too_short(hlen: u8) -> Self {
        Self::HeaderTooShort {
            hlen,
            minimal: MINIMAL_HLEN,
        }
    }
}

/// Result type for protocol operations.
pub type ProtocolResult<T> = std::result::Result<T, ProtocolError>;
