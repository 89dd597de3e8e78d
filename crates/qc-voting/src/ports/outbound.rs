//! Driven Ports (SPI - Outbound Dependencies)
//!
//! The storage contracts routes and the vote processor rely on. All calls
//! run inside the current block's write scope; [`Savepoint`] gives each
//! transaction and each resolution effect its own atomic unit.

use shared_types::{Identity, MigrationStatus, NetworkParameters, ResolutionId, VotableEvent};

use crate::domain::{Resolution, Voter};
use crate::error::VotingResult;

/// Nested atomic scopes over the block's write set.
pub trait Savepoint: Send + Sync {
    /// Open a nested scope.
    fn savepoint(&self) -> VotingResult<()>;

    /// Keep the changes made since the matching `savepoint`.
    fn release_savepoint(&self) -> VotingResult<()>;

    /// Discard the changes made since the matching `savepoint`.
    fn rollback_savepoint(&self) -> VotingResult<()>;
}

/// Validator power table.
pub trait ValidatorStore: Send + Sync {
    /// Current power, 0 for unknown identities.
    fn validator_power(&self, identity: &Identity) -> VotingResult<i64>;

    /// Set power; 0 removes the validator, negative power is rejected.
    fn set_validator_power(&self, identity: &Identity, power: i64) -> VotingResult<()>;

    /// All validators with power > 0, sorted by identity.
    fn validators(&self) -> VotingResult<Vec<Voter>>;

    fn total_power(&self) -> VotingResult<i64>;
}

/// Resolution table, processed-ID table and local event cache.
pub trait ResolutionStore: Send + Sync {
    /// Create a pending resolution.
    ///
    /// Fails if a resolution with the same ID is pending or was processed.
    fn create_resolution(
        &self,
        event: &VotableEvent,
        expiry_height: i64,
        proposer: &Identity,
    ) -> VotingResult<ResolutionId>;

    /// Record `voter`'s approval. Approving twice records one vote.
    fn approve_resolution(&self, id: &ResolutionId, voter: &Identity) -> VotingResult<()>;

    fn resolution_exists(&self, id: &ResolutionId) -> VotingResult<bool>;

    fn resolution_by_id(&self, id: &ResolutionId) -> VotingResult<Option<Resolution>>;

    fn resolutions_by_type(&self, event_type: &str) -> VotingResult<Vec<Resolution>>;

    fn resolutions_by_type_and_proposer(
        &self,
        event_type: &str,
        proposer: &Identity,
    ) -> VotingResult<Vec<Resolution>>;

    /// Pending resolutions of `event_type` with at least `required_power` approved.
    fn resolutions_by_threshold(
        &self,
        event_type: &str,
        required_power: i64,
    ) -> VotingResult<Vec<Resolution>>;

    /// Pending resolutions with `expiry_height <= height`.
    fn expired_resolutions(&self, height: i64) -> VotingResult<Vec<Resolution>>;

    fn delete_resolutions(&self, ids: &[ResolutionId]) -> VotingResult<()>;

    fn mark_processed(&self, ids: &[ResolutionId]) -> VotingResult<()>;

    fn is_processed(&self, id: &ResolutionId) -> VotingResult<bool>;

    /// IDs from `ids` that were never processed, in input order.
    ///
    /// IDs that do not exist at all are included.
    fn filter_not_processed(&self, ids: &[ResolutionId]) -> VotingResult<Vec<ResolutionId>>;

    /// Buffer an event this node observed, for a later vote-bodies broadcast.
    fn store_event(&self, event: &VotableEvent) -> VotingResult<()>;

    /// Evict a locally buffered event. Missing entries are ignored.
    fn delete_event(&self, id: &ResolutionId) -> VotingResult<()>;

    /// Locally buffered events, sorted by ID.
    fn local_events(&self) -> VotingResult<Vec<VotableEvent>>;
}

/// Chain-wide parameters.
pub trait ParameterStore: Send + Sync {
    fn network_parameters(&self) -> VotingResult<NetworkParameters>;

    fn set_migration_status(&self, status: MigrationStatus) -> VotingResult<()>;
}

/// Everything resolution effects and the vote processor touch.
pub trait VoteState: ValidatorStore + ResolutionStore + ParameterStore + Savepoint {}

impl<T: ValidatorStore + ResolutionStore + ParameterStore + Savepoint> VoteState for T {}
