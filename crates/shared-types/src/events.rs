//! # Votable Events
//!
//! A [`VotableEvent`] is the `(type, body)` pair validators vote on. Its
//! [`ResolutionId`] is a UUIDv5 over the type and body, so the same event
//! observed by different validators always maps to the same resolution.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Namespace for resolution IDs.
const RESOLUTION_NAMESPACE: Uuid = Uuid::from_bytes([
    0x6b, 0x77, 0x69, 0x6c, 0x2d, 0x72, 0x65, 0x73, 0x6f, 0x6c, 0x75, 0x74, 0x69, 0x6f, 0x6e, 0x73,
]);

/// Content-derived identifier of a resolution.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResolutionId(pub Uuid);

impl ResolutionId {
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl fmt::Display for ResolutionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for ResolutionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResolutionId({})", self.0)
    }
}

impl FromStr for ResolutionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// An event proposed for validator agreement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotableEvent {
    /// Resolution type, e.g. `validator_join`.
    pub event_type: String,
    /// Opaque, type-specific body.
    pub body: Vec<u8>,
}

impl VotableEvent {
    pub fn new(event_type: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            event_type: event_type.into(),
            body,
        }
    }

    /// Deterministic ID derived from the type and body.
    ///
    /// The type is length-prefixed so that `("ab", "c")` and `("a", "bc")`
    /// never collide.
    pub fn id(&self) -> ResolutionId {
        let type_bytes = self.event_type.as_bytes();
        let mut data = Vec::with_capacity(4 + type_bytes.len() + self.body.len());
        data.extend_from_slice(&(type_bytes.len() as u32).to_be_bytes());
        data.extend_from_slice(type_bytes);
        data.extend_from_slice(&self.body);
        ResolutionId(Uuid::new_v5(&RESOLUTION_NAMESPACE, &data))
    }
}
