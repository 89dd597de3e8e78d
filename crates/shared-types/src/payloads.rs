//! # Transaction Payloads
//!
//! One body struct per [`PayloadType`]. Bodies are carried inside a
//! transaction as opaque bytes and decoded by the route that owns them.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::PayloadError;
use crate::events::{ResolutionId, VotableEvent};
use crate::identity::Identity;

/// Discriminant carried in every transaction body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PayloadType {
    Transfer,
    ValidatorJoin,
    ValidatorApprove,
    ValidatorRemove,
    ValidatorLeave,
    ValidatorVoteIds,
    ValidatorVoteBodies,
    CreateResolution,
    ApproveResolution,
}

impl PayloadType {
    pub const ALL: [PayloadType; 9] = [
        PayloadType::Transfer,
        PayloadType::ValidatorJoin,
        PayloadType::ValidatorApprove,
        PayloadType::ValidatorRemove,
        PayloadType::ValidatorLeave,
        PayloadType::ValidatorVoteIds,
        PayloadType::ValidatorVoteBodies,
        PayloadType::CreateResolution,
        PayloadType::ApproveResolution,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PayloadType::Transfer => "transfer",
            PayloadType::ValidatorJoin => "validator_join",
            PayloadType::ValidatorApprove => "validator_approve",
            PayloadType::ValidatorRemove => "validator_remove",
            PayloadType::ValidatorLeave => "validator_leave",
            PayloadType::ValidatorVoteIds => "validator_vote_ids",
            PayloadType::ValidatorVoteBodies => "validator_vote_bodies",
            PayloadType::CreateResolution => "create_resolution",
            PayloadType::ApproveResolution => "approve_resolution",
        }
    }
}

impl fmt::Display for PayloadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PayloadType {
    type Err = PayloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PayloadType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| PayloadError::UnknownPayloadType(s.to_string()))
    }
}

/// A typed payload body with its binary encoding.
pub trait Payload: Serialize + DeserializeOwned {
    const TYPE: PayloadType;

    fn encode(&self) -> Result<Vec<u8>, PayloadError> {
        bincode::serialize(self).map_err(|e| PayloadError::Encode {
            payload_type: Self::TYPE.as_str(),
            reason: e.to_string(),
        })
    }

    fn decode(bytes: &[u8]) -> Result<Self, PayloadError> {
        bincode::deserialize(bytes).map_err(|e| PayloadError::Decode {
            payload_type: Self::TYPE.as_str(),
            reason: e.to_string(),
        })
    }
}

/// Move tokens to another account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub to: Identity,
    /// Decimal string; parsed by the route so malformed or negative
    /// amounts are rejected there rather than at decode time.
    pub amount: String,
}

impl Payload for Transfer {
    const TYPE: PayloadType = PayloadType::Transfer;
}

/// Request to join the validator set with the given power.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorJoin {
    pub power: u64,
}

impl Payload for ValidatorJoin {
    const TYPE: PayloadType = PayloadType::ValidatorJoin;
}

/// Vote for a pending join request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorApprove {
    pub candidate: Identity,
}

impl Payload for ValidatorApprove {
    const TYPE: PayloadType = PayloadType::ValidatorApprove;
}

/// Vote to remove a validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorRemove {
    pub validator: Identity,
}

impl Payload for ValidatorRemove {
    const TYPE: PayloadType = PayloadType::ValidatorRemove;
}

/// Leave the validator set. Carries no fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ValidatorLeave;

impl Payload for ValidatorLeave {
    const TYPE: PayloadType = PayloadType::ValidatorLeave;
}

/// Approve a batch of resolutions whose bodies are already on chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorVoteIds {
    pub resolution_ids: Vec<ResolutionId>,
}

impl Payload for ValidatorVoteIds {
    const TYPE: PayloadType = PayloadType::ValidatorVoteIds;
}

/// Event bodies broadcast by the block proposer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorVoteBodies {
    pub events: Vec<VotableEvent>,
}

impl ValidatorVoteBodies {
    /// Sum of all event body lengths.
    pub fn body_bytes(&self) -> u64 {
        self.events.iter().map(|e| e.body.len() as u64).sum()
    }
}

impl Payload for ValidatorVoteBodies {
    const TYPE: PayloadType = PayloadType::ValidatorVoteBodies;
}

/// Propose an arbitrary event of a registered resolution type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateResolution {
    pub resolution: VotableEvent,
}

impl Payload for CreateResolution {
    const TYPE: PayloadType = PayloadType::CreateResolution;
}

/// Vote for an existing resolution by ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproveResolution {
    pub resolution_id: ResolutionId,
}

impl Payload for ApproveResolution {
    const TYPE: PayloadType = PayloadType::ApproveResolution;
}
