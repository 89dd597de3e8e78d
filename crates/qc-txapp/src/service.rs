//! Transaction router service
//!
//! Every delivered transaction goes through the same pipeline:
//!
//! 1. resolve the payload type to a route (`InvalidTxType` otherwise)
//! 2. price it, zero when gas costs are disabled
//! 3. check the consented fee and spend it together with the nonce
//! 4. `pre_validate` the payload
//! 5. `apply` inside a savepoint, rolled back on rejection
//!
//! Fees spent in step 3 are kept even when a later step rejects the
//! transaction. Cancellation and store failures revert the transaction
//! entirely, fee included, and return `Err`.
//!
//! Pricing a size-dependent payload decodes it, so during a migration a
//! malformed vote or resolution payload is rejected with `EncodingError`
//! before the migration gate in step 4 is reached.

use std::collections::BTreeSet;
use std::sync::Arc;

use qc_voting::{
    ParameterStore, ResolutionRegistry, ResolutionStore, VoteOutcome, VotePrices,
    VoteProcessingApi, VoteProcessor,
};
use shared_types::{
    BlockContext, Identity, PayloadType, Transaction, TxCode, U256, ValidatorVoteBodies,
};
use tracing::{debug, info};

use crate::config::TxAppConfig;
use crate::context::TxContext;
use crate::error::{AccountError, Rejection, RouteError, TxAppError, TxAppResult};
use crate::metrics;
use crate::ports::{AccountStore, TxAppApi, TxResponse};
use crate::routes::{
    ApproveResolutionRoute, CreateResolutionRoute, Route, RouteEnv, TransferRoute,
    ValidatorApproveRoute, ValidatorJoinRoute, ValidatorLeaveRoute, ValidatorRemoveRoute,
    VoteBodiesRoute, VoteIdsRoute,
};
use crate::state::BlockState;

/// Most events a proposer packs into one vote-bodies transaction.
pub const MAX_PROPOSED_EVENTS: usize = 50;

/// Encoding overhead per event: the type and body length prefixes.
const EVENT_ENCODING_OVERHEAD: usize = 16;

/// The transaction router.
pub struct TxApp {
    config: TxAppConfig,
    registry: Arc<ResolutionRegistry>,
    processor: VoteProcessor,
}

impl TxApp {
    pub fn new(config: TxAppConfig, registry: ResolutionRegistry) -> Self {
        let registry = Arc::new(registry);
        let prices = VotePrices {
            vote_id_price: config.prices.vote_id(),
            vote_body_byte_price: config.prices.vote_body_byte(),
        };
        let processor = VoteProcessor::new(Arc::clone(&registry), prices);
        Self {
            config,
            registry,
            processor,
        }
    }

    /// Router with the built-in validator and migration resolution types.
    pub fn with_defaults(config: TxAppConfig) -> Self {
        Self::new(config, ResolutionRegistry::with_defaults())
    }

    pub fn config(&self) -> &TxAppConfig {
        &self.config
    }

    pub fn registry(&self) -> &ResolutionRegistry {
        &self.registry
    }

    pub fn processor(&self) -> &VoteProcessor {
        &self.processor
    }

    fn env<'a>(&'a self, block: &'a BlockContext) -> RouteEnv<'a> {
        RouteEnv {
            block,
            config: &self.config,
            registry: &self.registry,
        }
    }

    /// Fee a transaction would be charged in `block`, for mempool checks.
    pub fn price(&self, block: &BlockContext, tx: &Transaction) -> Result<U256, Rejection> {
        let payload_type = parse_payload_type(tx)?;
        if block.params.disabled_gas_costs {
            return Ok(U256::zero());
        }

        let env = self.env(block);
        match payload_type {
            PayloadType::Transfer => TransferRoute.price(&env, tx),
            PayloadType::ValidatorJoin => ValidatorJoinRoute.price(&env, tx),
            PayloadType::ValidatorApprove => ValidatorApproveRoute.price(&env, tx),
            PayloadType::ValidatorRemove => ValidatorRemoveRoute.price(&env, tx),
            PayloadType::ValidatorLeave => ValidatorLeaveRoute.price(&env, tx),
            PayloadType::ValidatorVoteIds => VoteIdsRoute.price(&env, tx),
            PayloadType::ValidatorVoteBodies => VoteBodiesRoute.price(&env, tx),
            PayloadType::CreateResolution => CreateResolutionRoute.price(&env, tx),
            PayloadType::ApproveResolution => ApproveResolutionRoute.price(&env, tx),
        }
    }

    /// Build the vote-bodies transaction the block proposer should include.
    ///
    /// Packs locally observed events that have no resolution yet, were never
    /// processed and have a registered type, in ID order, until
    /// [`MAX_PROPOSED_EVENTS`] or `max_bytes` is reached. `nonce` overrides
    /// the account's next nonce when the proposer already included its own
    /// transactions in the block. Returns `None` when there is nothing to
    /// propose or the proposer could not pay for it.
    pub fn propose_vote_bodies(
        &self,
        block: &BlockContext,
        state: &BlockState,
        nonce: Option<u64>,
        max_bytes: usize,
    ) -> TxAppResult<Option<Transaction>> {
        let account = state.accounts().account(&block.proposer)?;
        if !block.params.disabled_gas_costs && account.nonce == 0 && account.balance.is_zero() {
            debug!(
                proposer = %block.proposer,
                "[qc-txapp] proposer account is empty, not proposing vote bodies"
            );
            return Ok(None);
        }

        let candidates = state.votes().local_events()?;
        let ids: Vec<_> = candidates.iter().map(|event| event.id()).collect();
        let unprocessed: BTreeSet<_> = state
            .votes()
            .filter_not_processed(&ids)?
            .into_iter()
            .collect();

        let mut budget = max_bytes;
        let mut events = Vec::new();
        for (event, id) in candidates.into_iter().zip(ids) {
            if events.len() == MAX_PROPOSED_EVENTS {
                break;
            }
            if !unprocessed.contains(&id)
                || !self.registry.contains(&event.event_type)
                || state.votes().resolution_exists(&id)?
            {
                continue;
            }

            let size = event.event_type.len() + event.body.len() + EVENT_ENCODING_OVERHEAD;
            if size > budget {
                break;
            }
            budget -= size;
            events.push(event);
        }

        if events.is_empty() {
            return Ok(None);
        }

        let payload = ValidatorVoteBodies { events };
        let fee = if block.params.disabled_gas_costs {
            U256::zero()
        } else {
            self.config
                .prices
                .vote_body_byte()
                .saturating_mul(U256::from(payload.body_bytes()))
        };
        let nonce = nonce.unwrap_or_else(|| account.nonce.saturating_add(1));

        info!(
            events = payload.events.len(),
            nonce,
            "[qc-txapp] creating vote bodies transaction"
        );
        Ok(Some(Transaction::new(block.proposer, &payload, fee, nonce)?))
    }

    fn run_route<R: Route>(
        &self,
        route: &R,
        ctx: &TxContext,
        block: &BlockContext,
        state: &BlockState,
        tx: &Transaction,
    ) -> TxAppResult<TxResponse> {
        ctx.check()?;
        let env = self.env(block);
        let route_name = route.payload_type().as_str();

        let price = if block.params.disabled_gas_costs {
            U256::zero()
        } else {
            match route.price(&env, tx) {
                Ok(price) => price,
                Err(rejection) => return Ok(rejected(route_name, tx, &rejection, U256::zero())),
            }
        };

        // The outer savepoint keeps the fee on rejection but lets
        // cancellation and store failures revert the whole transaction.
        state.savepoint()?;
        match self.charge_and_apply(route, ctx, &env, state, tx, price) {
            Ok(response) => {
                state.release_savepoint()?;
                Ok(response)
            }
            Err(e) => {
                state.rollback_savepoint()?;
                Err(e)
            }
        }
    }

    fn charge_and_apply<R: Route>(
        &self,
        route: &R,
        ctx: &TxContext,
        env: &RouteEnv<'_>,
        state: &BlockState,
        tx: &Transaction,
        price: U256,
    ) -> TxAppResult<TxResponse> {
        let route_name = route.payload_type().as_str();

        let spend = match check_and_spend(state.accounts(), tx, price) {
            Ok(spend) => spend,
            Err((rejection, spend)) => {
                let rejection = rejection.into_abort()?;
                return Ok(rejected(route_name, tx, &rejection, spend));
            }
        };

        let validated = match route.pre_validate(env, tx) {
            Ok(validated) => validated,
            Err(rejection) => return Ok(rejected(route_name, tx, &rejection, spend)),
        };

        ctx.check()?;
        state.savepoint()?;
        let result = route.apply(env, state, tx, validated);

        if ctx.is_cancelled() {
            state.rollback_savepoint()?;
            return Err(TxAppError::Cancelled);
        }

        match result {
            Ok(()) => {
                state.release_savepoint()?;
                debug!(
                    route = route_name,
                    sender = %tx.sender,
                    nonce = tx.body.nonce,
                    %spend,
                    "[qc-txapp] transaction applied"
                );
                metrics::record_transaction(route_name, TxCode::Ok, spend);
                Ok(TxResponse::ok(spend))
            }
            Err(rejection) => {
                state.rollback_savepoint()?;
                let rejection = rejection.into_abort()?;
                Ok(rejected(route_name, tx, &rejection, spend))
            }
        }
    }
}

impl TxAppApi for TxApp {
    fn begin_block(
        &self,
        state: &BlockState,
        height: i64,
        proposer: Identity,
    ) -> TxAppResult<BlockContext> {
        let params = state.votes().network_parameters()?;
        debug!(
            height,
            %proposer,
            migration_status = %params.migration_status,
            "[qc-txapp] beginning block"
        );
        Ok(BlockContext::new(height, proposer, params))
    }

    fn execute(
        &self,
        ctx: &TxContext,
        block: &BlockContext,
        state: &BlockState,
        tx: &Transaction,
    ) -> TxAppResult<TxResponse> {
        let payload_type = match parse_payload_type(tx) {
            Ok(payload_type) => payload_type,
            Err(rejection) => return Ok(rejected("unknown", tx, &rejection, U256::zero())),
        };

        match payload_type {
            PayloadType::Transfer => self.run_route(&TransferRoute, ctx, block, state, tx),
            PayloadType::ValidatorJoin => {
                self.run_route(&ValidatorJoinRoute, ctx, block, state, tx)
            }
            PayloadType::ValidatorApprove => {
                self.run_route(&ValidatorApproveRoute, ctx, block, state, tx)
            }
            PayloadType::ValidatorRemove => {
                self.run_route(&ValidatorRemoveRoute, ctx, block, state, tx)
            }
            PayloadType::ValidatorLeave => {
                self.run_route(&ValidatorLeaveRoute, ctx, block, state, tx)
            }
            PayloadType::ValidatorVoteIds => self.run_route(&VoteIdsRoute, ctx, block, state, tx),
            PayloadType::ValidatorVoteBodies => {
                self.run_route(&VoteBodiesRoute, ctx, block, state, tx)
            }
            PayloadType::CreateResolution => {
                self.run_route(&CreateResolutionRoute, ctx, block, state, tx)
            }
            PayloadType::ApproveResolution => {
                self.run_route(&ApproveResolutionRoute, ctx, block, state, tx)
            }
        }
    }

    fn finalize_block(
        &self,
        ctx: &TxContext,
        block: &BlockContext,
        state: &BlockState,
    ) -> TxAppResult<VoteOutcome> {
        ctx.check()?;
        let outcome = self.processor.process_votes(state.votes(), block)?;

        for (identity, amount) in &outcome.credits {
            state.accounts().credit(identity, *amount)?;
        }
        metrics::record_vote_credits(outcome.credits.len());

        info!(
            height = block.height,
            finalized = outcome.finalized.len(),
            failed = outcome.failed.len(),
            expired = outcome.expired.len(),
            credits = outcome.credits.len(),
            "[qc-txapp] block finalized"
        );
        Ok(outcome)
    }
}

fn parse_payload_type(tx: &Transaction) -> Result<PayloadType, Rejection> {
    tx.body
        .payload_type
        .parse()
        .map_err(|e| Rejection::new(TxCode::InvalidTxType, RouteError::Payload(e)))
}

fn rejected(route: &str, tx: &Transaction, rejection: &Rejection, spend: U256) -> TxResponse {
    debug!(
        route,
        sender = %tx.sender,
        nonce = tx.body.nonce,
        code = %rejection.code,
        %spend,
        reason = %rejection.error,
        "[qc-txapp] transaction rejected"
    );
    metrics::record_transaction(route, rejection.code, spend);
    TxResponse::rejected(rejection, spend)
}

fn account_rejection(e: AccountError) -> Rejection {
    let code = match e {
        AccountError::InvalidNonce { .. } => TxCode::InvalidNonce,
        AccountError::InsufficientFunds { .. } => TxCode::InsufficientBalance,
        AccountError::BalanceOverflow(_) => TxCode::InvalidAmount,
        AccountError::NoSavepoint | AccountError::Storage(_) => TxCode::UnknownError,
    };
    Rejection::new(code, RouteError::Account(e))
}

/// Debit the fee for `tx` given its `price`.
///
/// A fee below the price spends the offered fee and rejects with
/// `InsufficientFee`. A balance below the amount to spend spends the whole
/// balance and rejects with `InsufficientBalance`. The returned spend is
/// what was actually debited.
fn check_and_spend(
    accounts: &dyn AccountStore,
    tx: &Transaction,
    price: U256,
) -> Result<U256, (Rejection, U256)> {
    let sender = &tx.sender;
    let nonce = tx.body.nonce;
    let fee = tx.body.fee;

    if fee < price {
        return match accounts.spend(sender, fee, nonce) {
            Ok(()) => Err((
                Rejection::new(
                    TxCode::InsufficientFee,
                    RouteError::InsufficientFee {
                        offered: fee,
                        required: price,
                    },
                ),
                fee,
            )),
            Err(AccountError::InsufficientFunds { .. }) => {
                Err(spend_balance(accounts, sender, nonce, fee))
            }
            Err(e) => Err((account_rejection(e), U256::zero())),
        };
    }

    match accounts.spend(sender, price, nonce) {
        Ok(()) => Ok(price),
        Err(AccountError::InsufficientFunds { .. }) => {
            Err(spend_balance(accounts, sender, nonce, price))
        }
        Err(e) => Err((account_rejection(e), U256::zero())),
    }
}

fn spend_balance(
    accounts: &dyn AccountStore,
    sender: &Identity,
    nonce: u64,
    needed: U256,
) -> (Rejection, U256) {
    let balance = match accounts.account(sender) {
        Ok(account) => account.balance,
        Err(e) => return (account_rejection(e), U256::zero()),
    };
    match accounts.spend(sender, balance, nonce) {
        Ok(()) => (
            account_rejection(AccountError::InsufficientFunds { balance, needed }),
            balance,
        ),
        Err(e) => (account_rejection(e), U256::zero()),
    }
}
