//! Resolution entity
//!
//! A resolution is the durable record of a [`VotableEvent`] that validators
//! are voting on. It is `Pending` from creation until the end-of-block sweep
//! either finalizes it (quorum reached) or expires it.

use serde::{Deserialize, Serialize};
use shared_types::{Identity, ResolutionId, VotableEvent};

use crate::error::{VotingError, VotingResult};

/// Lifecycle state of a resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolutionStatus {
    Pending,
    Finalized,
    Expired,
}

/// A validator that approved a resolution, with its power at read time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Voter {
    pub identity: Identity,
    pub power: i64,
}

/// A pending resolution as read from the store.
///
/// `voters` and `approved_power` reflect validator power at the moment the
/// resolution was read, not when each vote was cast.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub id: ResolutionId,
    pub event_type: String,
    pub body: Vec<u8>,
    pub proposer: Identity,
    /// Fixed at creation; never changes.
    pub expiry_height: i64,
    /// Sorted by identity.
    pub voters: Vec<Voter>,
    pub approved_power: i64,
}

impl Resolution {
    pub fn event(&self) -> VotableEvent {
        VotableEvent::new(self.event_type.clone(), self.body.clone())
    }

    pub fn has_voted(&self, identity: &Identity) -> bool {
        self.voters.iter().any(|v| v.identity == *identity)
    }

    /// Status at `height` given the power a quorum requires.
    ///
    /// Quorum wins over expiry when both hold in the same block.
    pub fn status_at(&self, height: i64, required_power: i64) -> ResolutionStatus {
        if self.approved_power >= required_power {
            ResolutionStatus::Finalized
        } else if self.expiry_height <= height {
            ResolutionStatus::Expired
        } else {
            ResolutionStatus::Pending
        }
    }
}

/// Body of a `validator_join` or `validator_remove` resolution.
///
/// `power > 0` sets the validator's power; `power == 0` removes it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePowerRequest {
    pub pub_key: Identity,
    pub power: i64,
}

impl UpdatePowerRequest {
    pub fn encode(&self) -> VotingResult<Vec<u8>> {
        bincode::serialize(self).map_err(|e| VotingError::Encoding(e.to_string()))
    }

    pub fn decode(bytes: &[u8]) -> VotingResult<Self> {
        bincode::deserialize(bytes).map_err(|e| VotingError::Encoding(e.to_string()))
    }
}
