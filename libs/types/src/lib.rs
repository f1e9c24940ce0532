//! # Sails Wire Types - Pure Data Structures
//!
//! ## Purpose
//!
//! Pure data layer of the Sails wire addressing core: the 8-byte opaque
//! [`InterfaceId`] that names a service interface, and the canonical
//! interface-description model that serves as hashing input for interface-id
//! derivation. No protocol rules, no I/O - encoding/decoding and hashing
//! logic live in the `codec` crate.
//!
//! ## Architecture Role
//!
//! ```text
//! types → codec → transport (external)
//!   ↑        ↓
//! Pure Data  Protocol Rules
//! InterfaceId  Header codec, routing, hashing
//! ```
//!
//! Every value in this crate is immutable once constructed and safe to share
//! across threads without synchronization.

pub mod canonical;
pub mod interface_id;

pub use canonical::{
    CanonicalAggregate, CanonicalEnvelope, CanonicalEvent, CanonicalFunction,
    CanonicalFunctionKind, CanonicalHashSettings, CanonicalNamedType, CanonicalNamedTypeKind,
    CanonicalParent, CanonicalService, CanonicalType, CanonicalVariant,
};
pub use interface_id::{InterfaceId, InterfaceIdError};
