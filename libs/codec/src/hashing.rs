//! # Canonical Hasher - Interface Id Derivation
//!
//! ## Purpose
//!
//! Turns a service's canonical interface description into its 8-byte
//! interface id. Two independent, conforming implementations fed the same
//! logical interface definition compute the identical id without any
//! out-of-band coordination - the property that lets clients in different
//! languages address the same service without a central registry.
//!
//! ## Derivation Pipeline
//!
//! ```text
//! CanonicalService ──▶ single-service envelope ──▶ JCS bytes ──▶ blake3
//!        + types         (closure of referenced    (RFC 8785)     (domain-
//!                         named types, sorted                      separated)
//!                         declarations)                 │
//!                                   first 8 digest bytes, little-endian u64
//!                                                       ▼
//!                                                  InterfaceId
//! ```
//!
//! JCS only orders object keys, so envelope assembly normalizes the arrays
//! too: functions, events and enum variants are sorted by a `(name,
//! signature)` key before serialization. Declaration order in the source
//! document never reaches the hash.
//!
//! The hash input is `domain || canonical_bytes` where the domain tag
//! namespaces this use of blake3 from every other one.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde_json_canonicalizer as jcs;
use thiserror::Error;
use types::canonical::{
    CanonicalEnvelope, CanonicalEvent, CanonicalFunction, CanonicalFunctionKind,
    CanonicalHashSettings, CanonicalNamedType, CanonicalNamedTypeKind, CanonicalService,
    CanonicalType, CanonicalVariant,
};
use types::InterfaceId;

/// Canonicalization and hashing errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CanonicalError {
    /// Service surface references a named type absent from the type table.
    #[error("unknown type `{0}`")]
    UnknownType(String),

    /// Canonical serialization failed (non-JCS-representable content).
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Everything derived for one service: the envelope that was hashed, its
/// exact canonical bytes, and the resulting id.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceIdResult {
    pub envelope: CanonicalEnvelope,
    pub canonical_json: Vec<u8>,
    pub interface_id: InterfaceId,
}

/// Build the single-service canonical envelope for `service_name`.
///
/// The envelope carries the schema, version and hash-domain tags plus the
/// transitive closure of named types the service surface references -
/// unreferenced entries of `type_table` are pruned so that adding unrelated
/// types to a document never shifts an id.
///
/// Declaration order is normalized on the way in: parents are sorted and
/// deduplicated by id, functions and events by their `(name, signature)`
/// keys, enum variants likewise during the closure walk. Two semantically
/// equal definitions that differ only in declaration order yield
/// byte-identical envelopes.
pub fn canonical_envelope(
    service_name: &str,
    service: &CanonicalService,
    type_table: &BTreeMap<String, CanonicalNamedType>,
) -> Result<CanonicalEnvelope, CanonicalError> {
    let types = reachable_type_table(service, type_table)?;

    let mut service = service.clone();
    service.extends.sort_by_key(|parent| parent.interface_id);
    service.extends.dedup();
    service
        .functions
        .sort_by(|lhs, rhs| function_sort_key(lhs).cmp(&function_sort_key(rhs)));
    service
        .events
        .sort_by(|lhs, rhs| event_sort_key(lhs).cmp(&event_sort_key(rhs)));

    let mut envelope = CanonicalEnvelope {
        types,
        ..CanonicalEnvelope::default()
    };
    envelope.services.insert(service_name.to_string(), service);
    Ok(envelope)
}

/// Serialize an envelope to its canonical bytes (RFC 8785 JCS:
/// deterministic key ordering, no insignificant whitespace).
pub fn canonical_bytes(envelope: &CanonicalEnvelope) -> Result<Vec<u8>, CanonicalError> {
    jcs::to_vec(envelope).map_err(|e| CanonicalError::Serialization(e.to_string()))
}

/// Derive the interface id for one service.
///
/// Hashes `domain || canonical_bytes` with blake3 and reads the first 8
/// digest bytes as a little-endian u64 - the numeric interface id value.
pub fn compute_interface_id(
    service_name: &str,
    service: &CanonicalService,
    type_table: &BTreeMap<String, CanonicalNamedType>,
) -> Result<InterfaceIdResult, CanonicalError> {
    let envelope = canonical_envelope(service_name, service, type_table)?;
    let canonical_json = canonical_bytes(&envelope)?;

    let mut hasher = blake3::Hasher::new();
    hasher.update(CanonicalHashSettings::HASH_DOMAIN.as_bytes());
    hasher.update(&canonical_json);
    let digest = hasher.finalize();

    let mut id_bytes = [0u8; 8];
    id_bytes.copy_from_slice(&digest.as_bytes()[..8]);
    let interface_id = InterfaceId::from_u64(u64::from_le_bytes(id_bytes));

    Ok(InterfaceIdResult {
        envelope,
        canonical_json,
        interface_id,
    })
}

/// Walk the service surface and the type table, returning a clone of every
/// named type the service transitively references - already normalized:
/// enum variants come out sorted by their `(name, signature)` key.
fn reachable_type_table(
    service: &CanonicalService,
    type_table: &BTreeMap<String, CanonicalNamedType>,
) -> Result<BTreeMap<String, CanonicalNamedType>, CanonicalError> {
    let mut types = BTreeMap::new();
    let mut reachable = BTreeSet::new();
    let mut pending = VecDeque::new();

    for func in &service.functions {
        for param in &func.params {
            visit_type(param, &mut reachable, &mut pending);
        }
        visit_type(&func.output, &mut reachable, &mut pending);
        if let Some(throws) = &func.throws {
            visit_type(throws, &mut reachable, &mut pending);
        }
    }
    for event in &service.events {
        for field in &event.payload.fields {
            visit_type(field, &mut reachable, &mut pending);
        }
    }

    while let Some(name) = pending.pop_front() {
        let mut ty = type_table
            .get(&name)
            .ok_or_else(|| CanonicalError::UnknownType(name.clone()))?
            .clone();
        match &mut ty.kind {
            CanonicalNamedTypeKind::Struct { fields } => {
                for field in fields.iter() {
                    visit_type(field, &mut reachable, &mut pending);
                }
            }
            CanonicalNamedTypeKind::Enum { variants } => {
                for variant in variants.iter() {
                    for field in &variant.payload.fields {
                        visit_type(field, &mut reachable, &mut pending);
                    }
                }
                variants
                    .sort_by(|lhs, rhs| variant_sort_key(lhs).cmp(&variant_sort_key(rhs)));
            }
        }
        types.insert(name, ty);
    }

    Ok(types)
}

fn visit_type(ty: &CanonicalType, reachable: &mut BTreeSet<String>, pending: &mut VecDeque<String>) {
    match ty {
        CanonicalType::Primitive { .. } => {}
        CanonicalType::Slice { item } | CanonicalType::Array { item, .. } => {
            visit_type(item, reachable, pending)
        }
        CanonicalType::Option { item } => visit_type(item, reachable, pending),
        CanonicalType::Tuple { items } => {
            for item in items {
                visit_type(item, reachable, pending);
            }
        }
        CanonicalType::Result { ok, err } => {
            visit_type(ok, reachable, pending);
            visit_type(err, reachable, pending);
        }
        CanonicalType::Named { name, args } => {
            if reachable.insert(name.clone()) {
                pending.push_back(name.clone());
            }
            for arg in args {
                visit_type(arg, reachable, pending);
            }
        }
    }
}

// Sort keys for declaration-order normalization. The signature component
// keeps the order total when a name is declared more than once.

fn function_sort_key(func: &CanonicalFunction) -> (String, String) {
    let mut signature = String::new();
    signature.push_str(match func.kind {
        CanonicalFunctionKind::Command => "command",
        CanonicalFunctionKind::Query => "query",
    });
    signature.push('|');
    signature.push_str(&join_type_list(&func.params));
    signature.push('|');
    signature.push_str(&type_repr(&func.output));
    if let Some(throws) = &func.throws {
        signature.push('|');
        signature.push_str(&type_repr(throws));
    }

    (func.name.clone(), signature)
}

fn event_sort_key(event: &CanonicalEvent) -> (String, String) {
    (event.name.clone(), join_type_list(&event.payload.fields))
}

fn variant_sort_key(variant: &CanonicalVariant) -> (String, String) {
    (variant.name.clone(), join_type_list(&variant.payload.fields))
}

fn join_type_list(types: &[CanonicalType]) -> String {
    types.iter().map(type_repr).collect::<Vec<_>>().join(",")
}

/// Compact textual form of a type, used only inside sort keys.
fn type_repr(ty: &CanonicalType) -> String {
    match ty {
        CanonicalType::Primitive { name } => name.clone(),
        CanonicalType::Slice { item } => format!("[{}]", type_repr(item)),
        CanonicalType::Array { item, len } => format!("[{}; {len}]", type_repr(item)),
        CanonicalType::Tuple { items } => {
            let items = items.iter().map(type_repr).collect::<Vec<_>>().join(", ");
            format!("({items})")
        }
        CanonicalType::Option { item } => format!("Option<{}>", type_repr(item)),
        CanonicalType::Result { ok, err } => {
            format!("Result<{}, {}>", type_repr(ok), type_repr(err))
        }
        CanonicalType::Named { name, args } => {
            if args.is_empty() {
                name.clone()
            } else {
                let args = args.iter().map(type_repr).collect::<Vec<_>>().join(", ");
                format!("{name}<{args}>")
            }
        }
    }
}
