//! # Protocol Constants - Sails Wire Header Core Constants
//!
//! ## Purpose
//!
//! Central registry of wire-level constants shared by every client
//! implementation that talks to the same program. These values are a
//! cross-implementation interoperability contract and must remain stable:
//! a change here breaks every client in every language simultaneously.
//!
//! ## Integration Points
//!
//! - **Message Headers**: [`MAGIC_BYTES`] identify the protocol on the wire
//! - **Version Negotiation**: [`HIGHEST_SUPPORTED_VERSION`] bounds decoding
//! - **Validation**: [`MINIMAL_HLEN`] is the fixed prefix every decoder
//!   must understand

/// Protocol magic bytes. Stand for "GM" in utf-8.
pub const MAGIC_BYTES: [u8; 2] = [0x47, 0x4D];

/// Highest header version this codec understands. Version 0 is invalid;
/// anything above this is rejected rather than misparsed.
pub const HIGHEST_SUPPORTED_VERSION: u8 = 1;

/// Minimal header length in bytes - the fixed prefix. `hlen` may declare
/// more; bytes beyond the prefix are reserved and not consumed by decode.
pub const MINIMAL_HLEN: u8 = 16;

/// Byte offsets of the fixed 16-byte prefix.
pub(crate) mod offsets {
    pub const MAGIC: usize = 0;
    pub const VERSION: usize = 2;
    pub const HLEN: usize = 3;
    pub const INTERFACE_ID: usize = 4;
    pub const ENTRY_ID: usize = 12;
    pub const ROUTE_IDX: usize = 14;
    pub const RESERVED: usize = 15;
}
