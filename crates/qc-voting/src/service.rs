//! Vote processing service
//!
//! Runs once per block after the last transaction:
//!
//! 1. collect every pending resolution whose approved power meets its
//!    type's confirmation threshold (all lookups happen before any effect,
//!    so power changes made by effects cannot move thresholds this block)
//! 2. run each type's effect inside its own savepoint
//! 3. expire resolutions at or past their expiry height, refunding voters
//!    of those that still reached the refund threshold
//! 4. delete finalized and expired resolutions, record them as processed
//!    and evict their locally buffered events
//! 5. compute voter and proposer credits

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use shared_types::{BlockContext, Identity, ResolutionId, U256};
use tracing::{debug, info, warn};

use crate::domain::{Resolution, ResolutionStatus};
use crate::error::VotingResult;
use crate::metrics;
use crate::ports::{
    ResolutionStore, Savepoint, ValidatorStore, VoteOutcome, VoteProcessingApi, VoteState,
};
use crate::registry::{is_recurring_type, ResolutionHandler, ResolutionRegistry};

/// Amounts credited to validators for carrying votes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VotePrices {
    /// Paid to each voter of a finalized or refunded resolution.
    pub vote_id_price: U256,
    /// Paid to the proposer per byte of resolution body.
    pub vote_body_byte_price: U256,
}

/// Accumulates credits keyed by identity so they apply in sorted order.
#[derive(Default)]
struct CreditLedger {
    credits: BTreeMap<Identity, U256>,
}

impl CreditLedger {
    fn add(&mut self, identity: Identity, amount: U256) {
        if amount.is_zero() {
            return;
        }
        let entry = self.credits.entry(identity).or_default();
        *entry = entry.saturating_add(amount);
    }

    fn apply_resolution(&mut self, resolution: &Resolution, prices: &VotePrices) {
        for voter in &resolution.voters {
            self.add(voter.identity, prices.vote_id_price);
        }
        let body_len = U256::from(resolution.body.len());
        self.add(
            resolution.proposer,
            prices.vote_body_byte_price.saturating_mul(body_len),
        );
    }

    fn into_sorted(self) -> Vec<(Identity, U256)> {
        self.credits.into_iter().collect()
    }
}

/// Finalizes and expires resolutions at the end of each block.
pub struct VoteProcessor {
    registry: Arc<ResolutionRegistry>,
    prices: VotePrices,
}

impl VoteProcessor {
    pub fn new(registry: Arc<ResolutionRegistry>, prices: VotePrices) -> Self {
        Self { registry, prices }
    }

    pub fn registry(&self) -> &ResolutionRegistry {
        &self.registry
    }

    /// Status a resolution would get if the block at `height` ended now.
    ///
    /// Returns `None` when no pending resolution has this ID.
    pub fn resolution_status(
        &self,
        state: &dyn VoteState,
        id: &ResolutionId,
        height: i64,
    ) -> VotingResult<Option<ResolutionStatus>> {
        let Some(resolution) = state.resolution_by_id(id)? else {
            return Ok(None);
        };
        let config = self.registry.get(&resolution.event_type)?;
        let required = config
            .confirmation_threshold
            .required_power(state.total_power()?);
        Ok(Some(resolution.status_at(height, required)))
    }

    fn collect_finalized(
        &self,
        state: &dyn VoteState,
        total_power: i64,
    ) -> VotingResult<Vec<(Resolution, Arc<dyn ResolutionHandler>)>> {
        let mut finalized = Vec::new();
        for event_type in self.registry.types() {
            let config = self.registry.get(event_type)?;
            let required = config.confirmation_threshold.required_power(total_power);
            for resolution in state.resolutions_by_threshold(event_type, required)? {
                finalized.push((resolution, Arc::clone(&config.handler)));
            }
        }
        Ok(finalized)
    }
}

impl VoteProcessingApi for VoteProcessor {
    fn process_votes(
        &self,
        state: &dyn VoteState,
        block: &BlockContext,
    ) -> VotingResult<VoteOutcome> {
        let total_power = state.total_power()?;
        let finalized = self.collect_finalized(state, total_power)?;

        let mut outcome = VoteOutcome::default();
        let mut ledger = CreditLedger::default();
        let mut done: BTreeSet<ResolutionId> = BTreeSet::new();
        let mut mark_processed = Vec::new();

        for (resolution, handler) in &finalized {
            ledger.apply_resolution(resolution, &self.prices);

            state.savepoint()?;
            match handler.resolve(resolution, state, block) {
                Ok(()) => {
                    state.release_savepoint()?;
                    info!(
                        resolution_id = %resolution.id,
                        event_type = %resolution.event_type,
                        approved_power = resolution.approved_power,
                        height = block.height,
                        "[qc-voting] resolution finalized"
                    );
                    metrics::record_resolution_finalized(&resolution.event_type);
                    outcome.finalized.push(resolution.id);
                }
                Err(e) => {
                    state.rollback_savepoint()?;
                    warn!(
                        resolution_id = %resolution.id,
                        event_type = %resolution.event_type,
                        error = %e,
                        "[qc-voting] resolution effect failed, rolled back"
                    );
                    metrics::record_resolution_failed(&resolution.event_type);
                    outcome.failed.push(resolution.id);
                }
            }

            done.insert(resolution.id);
            if !is_recurring_type(&resolution.event_type) {
                mark_processed.push(resolution.id);
            }
        }

        let mut refund_required: BTreeMap<String, i64> = BTreeMap::new();
        for resolution in state.expired_resolutions(block.height)? {
            if done.contains(&resolution.id) {
                continue;
            }

            let required = match refund_required.get(&resolution.event_type) {
                Some(required) => *required,
                None => {
                    let config = self.registry.get(&resolution.event_type)?;
                    let required = config.refund_threshold.required_power(total_power);
                    refund_required.insert(resolution.event_type.clone(), required);
                    required
                }
            };

            let refunded = resolution.approved_power >= required;
            if refunded {
                ledger.apply_resolution(&resolution, &self.prices);
            }

            info!(
                resolution_id = %resolution.id,
                event_type = %resolution.event_type,
                refunded,
                "[qc-voting] resolution expired"
            );
            metrics::record_resolution_expired(&resolution.event_type, refunded);

            done.insert(resolution.id);
            if !is_recurring_type(&resolution.event_type) {
                mark_processed.push(resolution.id);
            }
            outcome.expired.push(resolution.id);
        }

        let all: Vec<ResolutionId> = done.into_iter().collect();
        state.delete_resolutions(&all)?;
        state.mark_processed(&mark_processed)?;
        for id in &all {
            state.delete_event(id)?;
        }

        if block.params.disabled_gas_costs {
            debug!("[qc-voting] gas costs disabled, skipping vote credits");
        } else {
            outcome.credits = ledger.into_sorted();
        }

        Ok(outcome)
    }
}
