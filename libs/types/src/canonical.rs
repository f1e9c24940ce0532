//! # Canonical Interface Model
//!
//! ## Purpose
//!
//! Deterministically-serializable form of a service interface description,
//! used as the sole input to interface-id hashing. The model mirrors the
//! JSON payload of the canonical envelope without committing to a
//! serializer; canonicalization (RFC 8785) and hashing live in the `codec`
//! crate so the model stays pure data.
//!
//! Two semantically equal documents must always serialize to byte-identical
//! canonical output, which is why every collection here is either ordered by
//! construction (`Vec` in caller-determined order) or keyed (`BTreeMap`).
//!
//! The structured document itself is produced by an external IDL parser;
//! this crate only defines its shape.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::interface_id::InterfaceId;

/// Canonical envelope hashed to derive an interface id.
///
/// Layout: schema tag, version tag, hash-domain descriptor, the service
/// definitions keyed by name, and all transitively referenced named types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalEnvelope {
    pub canon_schema: String,
    pub canon_version: String,
    pub hash: CanonicalHashSettings,
    pub services: BTreeMap<String, CanonicalService>,
    pub types: BTreeMap<String, CanonicalNamedType>,
}

impl Default for CanonicalEnvelope {
    fn default() -> Self {
        Self {
            canon_schema: CanonicalHashSettings::SCHEMA.to_string(),
            canon_version: CanonicalHashSettings::VERSION.to_string(),
            hash: CanonicalHashSettings::default(),
            services: BTreeMap::new(),
            types: BTreeMap::new(),
        }
    }
}

/// Hash-domain descriptor embedded in every canonical envelope.
///
/// Naming the algorithm and domain tag inside the hashed bytes means a future
/// algorithm or domain change can never collide with v1 output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalHashSettings {
    pub algo: String,
    pub domain: String,
}

impl CanonicalHashSettings {
    /// Canonicalization scheme tag.
    pub const SCHEMA: &'static str = "sails-idl-jcs";
    /// Canonicalization scheme version.
    pub const VERSION: &'static str = "1";
    /// Domain separation tag prepended to the canonical bytes before hashing.
    pub const HASH_DOMAIN: &'static str = "SAILS-IDL/v1/interface-id";
    /// Hash algorithm identifier.
    pub const HASH_ALGO: &'static str = "blake3";
}

impl Default for CanonicalHashSettings {
    fn default() -> Self {
        Self {
            algo: Self::HASH_ALGO.to_string(),
            domain: Self::HASH_DOMAIN.to_string(),
        }
    }
}

/// A single service definition: parent interfaces, callable functions and
/// emitted events.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CanonicalService {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extends: Vec<CanonicalParent>,
    pub functions: Vec<CanonicalFunction>,
    pub events: Vec<CanonicalEvent>,
}

/// Reference to a parent interface by its already-computed id.
///
/// Serialized in hex form: RFC 8785 confines JSON numbers to IEEE doubles,
/// which cannot carry a uniform 64-bit id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalParent {
    pub interface_id: InterfaceId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalFunction {
    pub name: String,
    pub kind: CanonicalFunctionKind,
    pub params: Vec<CanonicalType>,
    pub output: CanonicalType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub throws: Option<CanonicalType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanonicalFunctionKind {
    Command,
    Query,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalEvent {
    pub name: String,
    pub payload: CanonicalAggregate,
}

/// A named type referenced (transitively) by a service surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalNamedType {
    #[serde(flatten)]
    pub kind: CanonicalNamedTypeKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CanonicalNamedTypeKind {
    Struct { fields: Vec<CanonicalType> },
    Enum { variants: Vec<CanonicalVariant> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalVariant {
    pub name: String,
    pub payload: CanonicalAggregate,
}

/// Ordered field list of a struct, enum variant or event payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CanonicalAggregate {
    pub fields: Vec<CanonicalType>,
}

impl CanonicalAggregate {
    /// Payload-less aggregate (unit variant, bare event).
    pub fn unit() -> Self {
        Self::default()
    }
}

/// Recursive type grammar of the canonical model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CanonicalType {
    Primitive {
        name: String,
    },
    Slice {
        item: Box<CanonicalType>,
    },
    Array {
        item: Box<CanonicalType>,
        len: u32,
    },
    Tuple {
        items: Vec<CanonicalType>,
    },
    Option {
        item: Box<CanonicalType>,
    },
    Result {
        ok: Box<CanonicalType>,
        err: Box<CanonicalType>,
    },
    Named {
        name: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        args: Vec<CanonicalType>,
    },
}

impl CanonicalType {
    /// Shorthand for a primitive type reference.
    pub fn primitive(name: &str) -> Self {
        Self::Primitive {
            name: name.to_string(),
        }
    }

    /// Shorthand for a named type reference without generic arguments.
    pub fn named(name: &str) -> Self {
        Self::Named {
            name: name.to_string(),
            args: Vec::new(),
        }
    }
}
