//! Built-in resolution effects.

use shared_types::{BlockContext, MigrationStatus};
use tracing::info;

use crate::domain::{Resolution, UpdatePowerRequest};
use crate::error::VotingResult;
use crate::ports::{ParameterStore, ValidatorStore, VoteState};
use crate::registry::ResolutionHandler;

/// `validator_join`: set the candidate's power to the requested value.
pub struct ValidatorJoinHandler;

impl ResolutionHandler for ValidatorJoinHandler {
    fn resolve(
        &self,
        resolution: &Resolution,
        state: &dyn VoteState,
        block: &BlockContext,
    ) -> VotingResult<()> {
        let request = UpdatePowerRequest::decode(&resolution.body)?;
        state.set_validator_power(&request.pub_key, request.power)?;
        info!(
            "[qc-voting] validator {} joined with power {} at height {}",
            request.pub_key, request.power, block.height
        );
        Ok(())
    }
}

/// `validator_remove`: drop the target from the validator set.
pub struct ValidatorRemoveHandler;

impl ResolutionHandler for ValidatorRemoveHandler {
    fn resolve(
        &self,
        resolution: &Resolution,
        state: &dyn VoteState,
        block: &BlockContext,
    ) -> VotingResult<()> {
        let request = UpdatePowerRequest::decode(&resolution.body)?;
        state.set_validator_power(&request.pub_key, 0)?;
        info!(
            "[qc-voting] validator {} removed at height {}",
            request.pub_key, block.height
        );
        Ok(())
    }
}

/// `start_migration`: move the network into its activation period.
pub struct StartMigrationHandler;

impl ResolutionHandler for StartMigrationHandler {
    fn resolve(
        &self,
        resolution: &Resolution,
        state: &dyn VoteState,
        block: &BlockContext,
    ) -> VotingResult<()> {
        state.set_migration_status(MigrationStatus::ActivationPeriod)?;
        info!(
            resolution_id = %resolution.id,
            height = block.height,
            "[qc-voting] migration approved, entering activation period"
        );
        Ok(())
    }
}
