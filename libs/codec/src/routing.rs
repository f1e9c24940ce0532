//! # Interface Route Matching
//!
//! ## Purpose
//!
//! Resolves a decoded message header against the set of interface
//! occurrences a program locally implements. A program may implement the
//! same interface more than once; occurrences are distinguished by a local
//! route index. Route index `0` in a header is a reserved sentinel meaning
//! "no explicit disambiguation requested" and is only valid when the
//! interface occurs exactly once locally.
//!
//! Matching is deterministic and total over its inputs: the same header and
//! registry always produce the same occurrence or the same error.

use tracing::trace;
use types::InterfaceId;

use crate::error::{ProtocolError, ProtocolResult};
use crate::header::SailsMessageHeader;

/// The outcome of matching a message header against known interfaces.
///
/// Only instantiated upon successful matching, which guarantees the
/// contained triple refers to an occurrence the program implements. A
/// short-lived value handed to the dispatch layer, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchedInterface {
    interface_id: InterfaceId,
    route_idx: u8,
    entry_id: u16,
}

impl MatchedInterface {
    pub fn interface_id(&self) -> InterfaceId {
        self.interface_id
    }

    pub fn route_idx(&self) -> u8 {
        self.route_idx
    }

    pub fn entry_id(&self) -> u16 {
        self.entry_id
    }

    /// Consumes the matched interface and returns its components.
    pub fn into_inner(self) -> (InterfaceId, u8, u16) {
        (self.interface_id, self.route_idx, self.entry_id)
    }
}

impl SailsMessageHeader {
    /// Match this header against the program's interface occurrence table.
    ///
    /// `interfaces` holds one `(interface id, local route index)` pair per
    /// occurrence. Resolution order is fixed: unknown interface id first,
    /// then the route-zero ambiguity rule, then exact route lookup.
    pub fn try_match_interfaces(
        &self,
        interfaces: &[(InterfaceId, u8)],
    ) -> ProtocolResult<MatchedInterface> {
        let interface_id = self.interface_id();
        let route_idx = self.route_idx();

        let mut same_interface_ids = 0usize;
        let mut has_route = false;
        for (id, local_route_idx) in interfaces {
            if *id == interface_id {
                same_interface_ids += 1;
                has_route = has_route || *local_route_idx == route_idx;
            }
        }

        if same_interface_ids == 0 {
            return Err(ProtocolError::NoMatchingInterface { interface_id });
        }
        if route_idx == 0 && same_interface_ids > 1 {
            return Err(ProtocolError::AmbiguousZeroRoute {
                interface_id,
                occurrences: same_interface_ids,
            });
        }
        if route_idx != 0 && !has_route {
            return Err(ProtocolError::NoMatchingRoute {
                interface_id,
                route_idx,
            });
        }

        trace!(%interface_id, route_idx, "matched interface occurrence");

        Ok(MatchedInterface {
            interface_id,
            route_idx,
            entry_id: self.entry_id(),
        })
    }
}

/// Sails message owning both header and opaque payload bytes.
///
/// Decoded from incoming messages by the transport layer; the payload is
/// never interpreted here. This is where the `hlen` skip happens: the
/// payload starts at the declared header length, not at the fixed prefix
/// end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SailsMessage {
    header: SailsMessageHeader,
    payload: Vec<u8>,
}

impl SailsMessage {
    /// Create a message from a header and already-encoded payload bytes.
    pub fn new(header: SailsMessageHeader, payload: Vec<u8>) -> Self {
        Self { header, payload }
    }

    pub fn header(&self) -> &SailsMessageHeader {
        &self.header
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Serialize header and payload into one buffer.
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = self.header.encode();
        bytes.extend_from_slice(&self.payload);
        bytes
    }

    /// Decode a full message: fixed header prefix, then the payload starting
    /// at the declared header length.
    pub fn from_bytes(bytes: &[u8]) -> ProtocolResult<Self> {
        let (header, _) = SailsMessageHeader::decode(bytes, 0)?;

        let payload_start = header.hlen() as usize;
        if bytes.len() < payload_start {
            return Err(ProtocolError::buffer_too_short(
                payload_start,
                bytes.len(),
                0,
            ));
        }

        Ok(Self {
            header,
            payload: bytes[payload_start..].to_vec(),
        })
    }

    /// Match the header against known interfaces and hand back the routing
    /// triple together with the owned payload.
    pub fn try_match_interfaces(
        self,
        interfaces: &[(InterfaceId, u8)],
    ) -> ProtocolResult<(InterfaceId, u8, u16, Vec<u8>)> {
        let matched = self.header.try_match_interfaces(interfaces)?;
        let (interface_id, route_idx, entry_id) = matched.into_inner();
        Ok((interface_id, route_idx, entry_id, self.payload))
    }
}
