//! # Sails Wire Codec - Message Addressing & Interface Identification
//!
//! ## Purpose
//!
//! This crate contains the "Rules" layer of the Sails wire addressing core:
//! - Fixed-layout 16-byte message header encoding/decoding
//! - Deterministic routing of decoded headers to local interface occurrences
//! - Content-addressed interface-id derivation (canonical JSON + blake3)
//! - Protocol constants and error types
//!
//! ## Architecture Role
//!
//! ```text
//! types → [codec] → transport (external)
//!   ↑        ↓           ↓
//! Pure Data  Protocol    Remoting, signing,
//! InterfaceId  Rules     payload encoding
//! ```
//!
//! ## What This Crate Contains
//! - **SailsMessageHeader**: validated construct/encode/decode of the wire
//!   header (magic, version, hlen, interface id, entry id, route index)
//! - **MatchedInterface**: deterministic header-to-occurrence resolution
//! - **Canonical hasher**: single-service envelope assembly, RFC 8785
//!   canonical bytes, domain-separated blake3 digest
//!
//! ## What This Crate Does NOT Contain
//! - IDL text parsing (external parser service)
//! - Code generation from parsed documents
//! - Transport, account signing, subscriptions, retries
//! - SCALE/JSON payload encoding - payload bytes are opaque here
//!
//! Every operation is a pure, synchronous function over immutable buffers
//! and value objects: no shared mutable state, no I/O, nothing to cancel.

pub mod constants;
pub mod error;
pub mod hashing;
pub mod header;
pub mod routing;

// Re-export key types for convenience
pub use constants::{HIGHEST_SUPPORTED_VERSION, MAGIC_BYTES, MINIMAL_HLEN};
pub use error::{ProtocolError, ProtocolResult};
pub use hashing::{
    canonical_bytes, canonical_envelope, compute_interface_id, CanonicalError, InterfaceIdResult,
};
pub use header::SailsMessageHeader;
pub use routing::{MatchedInterface, SailsMessage};

// Re-export the data layer so callers get one coherent surface
pub use types::{canonical, InterfaceId, InterfaceIdError};
