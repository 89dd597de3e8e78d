//! # Routes
//!
//! One route per payload type. Each route is split in two steps:
//!
//! - `pre_validate` decodes the payload and checks everything that needs
//!   only the transaction and the block context; it never touches state
//!   and returns an immutable validated value.
//! - `apply` takes that value and performs the state changes.
//!
//! The dispatcher only calls `apply` after `pre_validate` succeeded.

mod resolutions;
mod transfer;
mod validators;
mod votes;

pub use resolutions::{ApproveResolutionRoute, CreateResolutionRoute};
pub use transfer::TransferRoute;
pub use validators::{
    ValidatorApproveRoute, ValidatorJoinRoute, ValidatorLeaveRoute, ValidatorRemoveRoute,
};
pub use votes::{VoteBodiesRoute, VoteIdsRoute};

use qc_voting::{ResolutionRegistry, ValidatorStore};
use shared_types::{BlockContext, Identity, PayloadType, Transaction, U256};

use crate::config::TxAppConfig;
use crate::error::{Rejection, RouteError};
use crate::state::BlockState;

/// Read-only inputs shared by every route call in a block.
#[derive(Clone, Copy)]
pub struct RouteEnv<'a> {
    pub block: &'a BlockContext,
    pub config: &'a TxAppConfig,
    pub registry: &'a ResolutionRegistry,
}

impl RouteEnv<'_> {
    /// True when `identity` is this node's own validator identity.
    pub fn is_local(&self, identity: &Identity) -> bool {
        self.config.local_identity.as_ref() == Some(identity)
    }
}

/// The per-payload-type capability the dispatcher drives.
pub trait Route {
    /// Fields extracted by `pre_validate` and consumed by `apply`.
    type Validated;

    fn payload_type(&self) -> PayloadType;

    /// Fee for this transaction.
    fn price(&self, env: &RouteEnv<'_>, tx: &Transaction) -> Result<U256, Rejection>;

    /// Decode and validate without touching state.
    fn pre_validate(&self, env: &RouteEnv<'_>, tx: &Transaction)
        -> Result<Self::Validated, Rejection>;

    /// Apply the validated transaction.
    fn apply(
        &self,
        env: &RouteEnv<'_>,
        state: &BlockState,
        tx: &Transaction,
        validated: Self::Validated,
    ) -> Result<(), Rejection>;
}

/// Require `identity` to hold voting power.
fn require_validator(state: &BlockState, identity: &Identity) -> Result<i64, Rejection> {
    let power = state.votes().validator_power(identity)?;
    if power <= 0 {
        return Err(Rejection::invalid_sender(RouteError::CallerNotValidator));
    }
    Ok(power)
}
