//! Driving Ports (API - Inbound)
//!
//! The calls a consensus engine makes per block: begin, deliver each
//! transaction in order, finalize.

use qc_voting::VoteOutcome;
use shared_types::{BlockContext, Identity, Transaction, TxCode, U256};

use crate::context::TxContext;
use crate::error::{Rejection, TxAppResult};
use crate::state::BlockState;

/// Outcome of one delivered transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxResponse {
    pub code: TxCode,
    /// Amount debited from the sender for fees, kept even on rejection.
    pub spend: U256,
    /// Rejection reason; empty on success.
    pub log: String,
}

impl TxResponse {
    pub fn ok(spend: U256) -> Self {
        Self {
            code: TxCode::Ok,
            spend,
            log: String::new(),
        }
    }

    pub fn rejected(rejection: &Rejection, spend: U256) -> Self {
        Self {
            code: rejection.code,
            spend,
            log: rejection.error.to_string(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code.is_ok()
    }
}

/// Primary transaction router API.
pub trait TxAppApi: Send + Sync {
    /// Snapshot the network parameters for a new block.
    fn begin_block(
        &self,
        state: &BlockState,
        height: i64,
        proposer: Identity,
    ) -> TxAppResult<BlockContext>;

    /// Price, validate and apply one transaction.
    ///
    /// Rejections are returned as `Ok` with a non-zero code; `Err` means
    /// block processing must stop.
    fn execute(
        &self,
        ctx: &TxContext,
        block: &BlockContext,
        state: &BlockState,
        tx: &Transaction,
    ) -> TxAppResult<TxResponse>;

    /// Resolve votes and pay voter credits after the last transaction.
    fn finalize_block(
        &self,
        ctx: &TxContext,
        block: &BlockContext,
        state: &BlockState,
    ) -> TxAppResult<VoteOutcome>;
}
