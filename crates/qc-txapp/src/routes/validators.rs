//! Validator membership routes: join, approve, remove, leave.

use qc_voting::{
    ResolutionStore, UpdatePowerRequest, ValidatorStore, VALIDATOR_JOIN_EVENT_TYPE,
    VALIDATOR_REMOVE_EVENT_TYPE,
};
use shared_types::{
    Identity, Payload, PayloadType, Transaction, TxCode, U256, ValidatorApprove, ValidatorJoin,
    ValidatorRemove, VotableEvent,
};
use tracing::debug;

use super::{require_validator, Route, RouteEnv};
use crate::domain::migration_gate;
use crate::error::{Rejection, RouteError};
use crate::state::BlockState;

/// Open a join request. The candidate does not vote on its own request.
pub struct ValidatorJoinRoute;

impl Route for ValidatorJoinRoute {
    type Validated = i64;

    fn payload_type(&self) -> PayloadType {
        PayloadType::ValidatorJoin
    }

    fn price(&self, env: &RouteEnv<'_>, _tx: &Transaction) -> Result<U256, Rejection> {
        Ok(env.config.prices.validator_join())
    }

    fn pre_validate(&self, env: &RouteEnv<'_>, tx: &Transaction) -> Result<i64, Rejection> {
        migration_gate(env.block)?;
        let join = ValidatorJoin::decode(&tx.body.payload)?;
        match i64::try_from(join.power) {
            Ok(power) if power > 0 => Ok(power),
            _ => Err(Rejection::new(
                TxCode::InvalidAmount,
                RouteError::InvalidPower(join.power),
            )),
        }
    }

    fn apply(
        &self,
        env: &RouteEnv<'_>,
        state: &BlockState,
        tx: &Transaction,
        power: i64,
    ) -> Result<(), Rejection> {
        if state.votes().validator_power(&tx.sender)? > 0 {
            return Err(Rejection::invalid_sender(RouteError::CallerIsValidator));
        }

        let pending = state
            .votes()
            .resolutions_by_type_and_proposer(VALIDATOR_JOIN_EVENT_TYPE, &tx.sender)?;
        if !pending.is_empty() {
            return Err(Rejection::invalid_sender(RouteError::PendingJoinExists));
        }

        let request = UpdatePowerRequest {
            pub_key: tx.sender,
            power,
        };
        let event = VotableEvent::new(VALIDATOR_JOIN_EVENT_TYPE, request.encode()?);
        let expiry = env.block.height.saturating_add(env.block.params.join_expiry);
        let id = state
            .votes()
            .create_resolution(&event, expiry, &tx.sender)?;

        debug!(
            resolution_id = %id,
            candidate = %tx.sender,
            power,
            expiry,
            "[qc-txapp] join request opened"
        );
        Ok(())
    }
}

/// Vote for a candidate's pending join request.
pub struct ValidatorApproveRoute;

impl Route for ValidatorApproveRoute {
    type Validated = Identity;

    fn payload_type(&self) -> PayloadType {
        PayloadType::ValidatorApprove
    }

    fn price(&self, env: &RouteEnv<'_>, _tx: &Transaction) -> Result<U256, Rejection> {
        Ok(env.config.prices.validator_approve())
    }

    fn pre_validate(&self, env: &RouteEnv<'_>, tx: &Transaction) -> Result<Identity, Rejection> {
        migration_gate(env.block)?;
        let approve = ValidatorApprove::decode(&tx.body.payload)?;
        if approve.candidate == tx.sender {
            return Err(Rejection::invalid_sender(RouteError::SelfApproval));
        }
        Ok(approve.candidate)
    }

    fn apply(
        &self,
        _env: &RouteEnv<'_>,
        state: &BlockState,
        tx: &Transaction,
        candidate: Identity,
    ) -> Result<(), Rejection> {
        let pending = state
            .votes()
            .resolutions_by_type_and_proposer(VALIDATOR_JOIN_EVENT_TYPE, &candidate)?;
        let resolution = match pending.as_slice() {
            [] => {
                return Err(Rejection::invalid_sender(RouteError::JoinRequestNotFound(
                    candidate,
                )))
            }
            [resolution] => resolution,
            _ => {
                return Err(Rejection::new(
                    TxCode::UnknownError,
                    RouteError::MultipleJoinRequests {
                        candidate,
                        count: pending.len(),
                    },
                ))
            }
        };

        require_validator(state, &tx.sender)?;
        state
            .votes()
            .approve_resolution(&resolution.id, &tx.sender)?;
        Ok(())
    }
}

/// Start or join a vote to remove a validator.
///
/// Removal has no request phase: the first remover creates the resolution
/// and every remover, including the first, approves it.
pub struct ValidatorRemoveRoute;

impl Route for ValidatorRemoveRoute {
    type Validated = Identity;

    fn payload_type(&self) -> PayloadType {
        PayloadType::ValidatorRemove
    }

    fn price(&self, env: &RouteEnv<'_>, _tx: &Transaction) -> Result<U256, Rejection> {
        Ok(env.config.prices.validator_remove())
    }

    fn pre_validate(&self, env: &RouteEnv<'_>, tx: &Transaction) -> Result<Identity, Rejection> {
        migration_gate(env.block)?;
        Ok(ValidatorRemove::decode(&tx.body.payload)?.validator)
    }

    fn apply(
        &self,
        env: &RouteEnv<'_>,
        state: &BlockState,
        tx: &Transaction,
        target: Identity,
    ) -> Result<(), Rejection> {
        require_validator(state, &tx.sender)?;
        if state.votes().validator_power(&target)? <= 0 {
            return Err(Rejection::invalid_sender(RouteError::TargetNotValidator));
        }

        let request = UpdatePowerRequest {
            pub_key: target,
            power: 0,
        };
        let event = VotableEvent::new(VALIDATOR_REMOVE_EVENT_TYPE, request.encode()?);
        let id = event.id();

        if !state.votes().resolution_exists(&id)? {
            let expiry = env.block.height.saturating_add(env.block.params.join_expiry);
            state.votes().create_resolution(&event, expiry, &tx.sender)?;
        }
        state.votes().approve_resolution(&id, &tx.sender)?;
        Ok(())
    }
}

/// Leave the validator set unilaterally.
pub struct ValidatorLeaveRoute;

impl Route for ValidatorLeaveRoute {
    type Validated = ();

    fn payload_type(&self) -> PayloadType {
        PayloadType::ValidatorLeave
    }

    fn price(&self, env: &RouteEnv<'_>, _tx: &Transaction) -> Result<U256, Rejection> {
        Ok(env.config.prices.validator_leave())
    }

    fn pre_validate(&self, env: &RouteEnv<'_>, _tx: &Transaction) -> Result<(), Rejection> {
        migration_gate(env.block)
    }

    fn apply(
        &self,
        _env: &RouteEnv<'_>,
        state: &BlockState,
        tx: &Transaction,
        _validated: (),
    ) -> Result<(), Rejection> {
        require_validator(state, &tx.sender)?;
        state.votes().set_validator_power(&tx.sender, 0)?;
        Ok(())
    }
}
