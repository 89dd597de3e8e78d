//! Driving Ports (API - Inbound)

use shared_types::{BlockContext, Identity, ResolutionId, U256};

use crate::error::VotingResult;
use crate::ports::outbound::VoteState;

/// What the end-of-block sweep did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VoteOutcome {
    /// Resolutions whose effect ran successfully.
    pub finalized: Vec<ResolutionId>,
    /// Resolutions that reached quorum but whose effect failed and was rolled back.
    pub failed: Vec<ResolutionId>,
    pub expired: Vec<ResolutionId>,
    /// Rewards owed to voters and proposers, sorted by identity.
    pub credits: Vec<(Identity, U256)>,
}

/// Primary resolution API, driven once per block after the last transaction.
pub trait VoteProcessingApi: Send + Sync {
    /// Finalize resolutions that reached quorum, expire stale ones and
    /// compute voter credits.
    fn process_votes(&self, state: &dyn VoteState, block: &BlockContext) -> VotingResult<VoteOutcome>;
}
