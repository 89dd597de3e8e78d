//! Generic resolution routes for event types without a dedicated route.

use qc_voting::ResolutionStore;
use shared_types::{
    ApproveResolution, CreateResolution, Payload, PayloadType, ResolutionId, Transaction, TxCode,
    U256, VotableEvent,
};

use super::{require_validator, Route, RouteEnv};
use crate::domain::{migration_gate, start_migration_gate};
use crate::error::{Rejection, RouteError};
use crate::state::BlockState;

/// Create a resolution of a registered type and vote for it.
pub struct CreateResolutionRoute;

pub struct ValidatedCreate {
    event: VotableEvent,
    expiry: i64,
}

impl Route for CreateResolutionRoute {
    type Validated = ValidatedCreate;

    fn payload_type(&self) -> PayloadType {
        PayloadType::CreateResolution
    }

    fn price(&self, env: &RouteEnv<'_>, tx: &Transaction) -> Result<U256, Rejection> {
        let create = CreateResolution::decode(&tx.body.payload)?;
        Ok(env
            .config
            .prices
            .vote_body_byte()
            .saturating_mul(U256::from(create.resolution.body.len())))
    }

    fn pre_validate(
        &self,
        env: &RouteEnv<'_>,
        tx: &Transaction,
    ) -> Result<ValidatedCreate, Rejection> {
        migration_gate(env.block)?;
        let event = CreateResolution::decode(&tx.body.payload)?.resolution;
        start_migration_gate(env.block, &event.event_type)?;

        let config = env
            .registry
            .get(&event.event_type)
            .map_err(|e| Rejection::new(TxCode::InvalidResolutionType, RouteError::Voting(e)))?;
        let expiry = env.block.height.saturating_add(config.expiration_period);

        Ok(ValidatedCreate { event, expiry })
    }

    fn apply(
        &self,
        _env: &RouteEnv<'_>,
        state: &BlockState,
        tx: &Transaction,
        validated: ValidatedCreate,
    ) -> Result<(), Rejection> {
        require_validator(state, &tx.sender)?;
        let id = state
            .votes()
            .create_resolution(&validated.event, validated.expiry, &tx.sender)?;
        state.votes().approve_resolution(&id, &tx.sender)?;
        Ok(())
    }
}

/// Vote for an existing resolution by ID.
pub struct ApproveResolutionRoute;

impl Route for ApproveResolutionRoute {
    type Validated = ResolutionId;

    fn payload_type(&self) -> PayloadType {
        PayloadType::ApproveResolution
    }

    fn price(&self, env: &RouteEnv<'_>, _tx: &Transaction) -> Result<U256, Rejection> {
        Ok(env.config.prices.vote_id())
    }

    fn pre_validate(
        &self,
        env: &RouteEnv<'_>,
        tx: &Transaction,
    ) -> Result<ResolutionId, Rejection> {
        migration_gate(env.block)?;
        Ok(ApproveResolution::decode(&tx.body.payload)?.resolution_id)
    }

    fn apply(
        &self,
        env: &RouteEnv<'_>,
        state: &BlockState,
        tx: &Transaction,
        id: ResolutionId,
    ) -> Result<(), Rejection> {
        require_validator(state, &tx.sender)?;

        let Some(resolution) = state.votes().resolution_by_id(&id)? else {
            return Err(Rejection::new(
                TxCode::InvalidResolutionType,
                RouteError::ResolutionNotFound(id),
            ));
        };
        start_migration_gate(env.block, &resolution.event_type)?;

        state.votes().approve_resolution(&id, &tx.sender)?;
        Ok(())
    }
}
