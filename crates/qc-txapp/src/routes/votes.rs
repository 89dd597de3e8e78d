//! Validator vote routes.
//!
//! Event bodies enter the chain through the block proposer's
//! [`VoteBodiesRoute`]; other validators then vote on them cheaply by ID
//! through [`VoteIdsRoute`].

use qc_voting::{ResolutionStore, VotingError};
use shared_types::{
    Payload, PayloadType, ResolutionId, Transaction, TxCode, U256, ValidatorVoteBodies,
    ValidatorVoteIds, VotableEvent,
};
use tracing::{debug, warn};

use super::{require_validator, Route, RouteEnv};
use crate::domain::migration_gate;
use crate::error::{Rejection, RouteError};
use crate::state::BlockState;

/// Approve a batch of resolutions by ID.
///
/// IDs already finalized or expired are dropped; the sender still pays for
/// the whole batch.
pub struct VoteIdsRoute;

impl Route for VoteIdsRoute {
    type Validated = Vec<ResolutionId>;

    fn payload_type(&self) -> PayloadType {
        PayloadType::ValidatorVoteIds
    }

    fn price(&self, env: &RouteEnv<'_>, tx: &Transaction) -> Result<U256, Rejection> {
        let votes = ValidatorVoteIds::decode(&tx.body.payload)?;
        Ok(env
            .config
            .prices
            .vote_id()
            .saturating_mul(U256::from(votes.resolution_ids.len())))
    }

    fn pre_validate(
        &self,
        env: &RouteEnv<'_>,
        tx: &Transaction,
    ) -> Result<Vec<ResolutionId>, Rejection> {
        migration_gate(env.block)?;
        Ok(ValidatorVoteIds::decode(&tx.body.payload)?.resolution_ids)
    }

    fn apply(
        &self,
        env: &RouteEnv<'_>,
        state: &BlockState,
        tx: &Transaction,
        ids: Vec<ResolutionId>,
    ) -> Result<(), Rejection> {
        require_validator(state, &tx.sender)?;

        let pending = state.votes().filter_not_processed(&ids)?;
        let from_local = env.is_local(&tx.sender);

        for id in &pending {
            state.votes().approve_resolution(id, &tx.sender)?;
            if from_local {
                state.votes().delete_event(id)?;
            }
        }

        let too_late = ids.len() - pending.len();
        if too_late > 0 {
            warn!(
                voter = %tx.sender,
                too_late,
                "[qc-txapp] vote contains already processed resolutions, no refund"
            );
        }
        Ok(())
    }
}

/// Broadcast event bodies; only the block proposer may send this.
///
/// Each event becomes a resolution the proposer immediately votes for.
pub struct VoteBodiesRoute;

impl Route for VoteBodiesRoute {
    type Validated = Vec<VotableEvent>;

    fn payload_type(&self) -> PayloadType {
        PayloadType::ValidatorVoteBodies
    }

    fn price(&self, env: &RouteEnv<'_>, tx: &Transaction) -> Result<U256, Rejection> {
        let bodies = ValidatorVoteBodies::decode(&tx.body.payload)?;
        Ok(env
            .config
            .prices
            .vote_body_byte()
            .saturating_mul(U256::from(bodies.body_bytes())))
    }

    fn pre_validate(
        &self,
        env: &RouteEnv<'_>,
        tx: &Transaction,
    ) -> Result<Vec<VotableEvent>, Rejection> {
        migration_gate(env.block)?;
        if tx.sender != env.block.proposer {
            return Err(Rejection::invalid_sender(RouteError::CallerNotProposer));
        }
        Ok(ValidatorVoteBodies::decode(&tx.body.payload)?.events)
    }

    fn apply(
        &self,
        env: &RouteEnv<'_>,
        state: &BlockState,
        tx: &Transaction,
        events: Vec<VotableEvent>,
    ) -> Result<(), Rejection> {
        let from_local = env.is_local(&tx.sender);

        for event in &events {
            let config = env.registry.get(&event.event_type).map_err(|e| match e {
                VotingError::UnknownResolutionType(_) => {
                    Rejection::new(TxCode::InvalidResolutionType, RouteError::Voting(e))
                }
                other => Rejection::from(other),
            })?;

            let expiry = env.block.height.saturating_add(config.expiration_period);
            let id = state.votes().create_resolution(event, expiry, &tx.sender)?;
            state.votes().approve_resolution(&id, &tx.sender)?;
            if from_local {
                state.votes().delete_event(&id)?;
            }

            debug!(
                resolution_id = %id,
                event_type = %event.event_type,
                expiry,
                "[qc-txapp] resolution proposed"
            );
        }
        Ok(())
    }
}
