//! Resolution type registry
//!
//! Maps a resolution type string to how long it stays open, what share of
//! power finalizes or refunds it, and the effect run once it finalizes.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use shared_types::params::DEFAULT_JOIN_EXPIRY;
use shared_types::BlockContext;

use crate::domain::{Resolution, Threshold};
use crate::error::{VotingError, VotingResult};
use crate::handlers::{StartMigrationHandler, ValidatorJoinHandler, ValidatorRemoveHandler};
use crate::ports::VoteState;

pub const VALIDATOR_JOIN_EVENT_TYPE: &str = "validator_join";
pub const VALIDATOR_REMOVE_EVENT_TYPE: &str = "validator_remove";
pub const START_MIGRATION_EVENT_TYPE: &str = "start_migration";

/// One day of blocks at a 6 second block time.
pub const DEFAULT_EXPIRATION_PERIOD: i64 = 14_400;

/// Effect applied when a resolution of a type reaches quorum.
///
/// Runs inside its own savepoint; returning an error rolls the effect back
/// without failing the block.
pub trait ResolutionHandler: Send + Sync {
    fn resolve(
        &self,
        resolution: &Resolution,
        state: &dyn VoteState,
        block: &BlockContext,
    ) -> VotingResult<()>;
}

/// Configuration for one resolution type.
#[derive(Clone)]
pub struct ResolutionConfig {
    /// Blocks a resolution stays open after creation.
    pub expiration_period: i64,
    pub confirmation_threshold: Threshold,
    pub refund_threshold: Threshold,
    pub handler: Arc<dyn ResolutionHandler>,
}

impl ResolutionConfig {
    pub fn new(expiration_period: i64, handler: Arc<dyn ResolutionHandler>) -> Self {
        Self {
            expiration_period,
            confirmation_threshold: Threshold::TWO_THIRDS,
            refund_threshold: Threshold::ONE_THIRD,
            handler,
        }
    }

    pub fn with_confirmation_threshold(mut self, threshold: Threshold) -> Self {
        self.confirmation_threshold = threshold;
        self
    }

    pub fn with_refund_threshold(mut self, threshold: Threshold) -> Self {
        self.refund_threshold = threshold;
        self
    }
}

impl fmt::Debug for ResolutionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolutionConfig")
            .field("expiration_period", &self.expiration_period)
            .field("confirmation_threshold", &self.confirmation_threshold)
            .field("refund_threshold", &self.refund_threshold)
            .finish_non_exhaustive()
    }
}

/// Registered resolution types, iterated in sorted order.
#[derive(Clone, Debug, Default)]
pub struct ResolutionRegistry {
    types: BTreeMap<String, ResolutionConfig>,
}

impl ResolutionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in validator and migration types.
    pub fn with_defaults() -> Self {
        let mut types = BTreeMap::new();
        types.insert(
            VALIDATOR_JOIN_EVENT_TYPE.to_string(),
            ResolutionConfig::new(DEFAULT_JOIN_EXPIRY, Arc::new(ValidatorJoinHandler)),
        );
        types.insert(
            VALIDATOR_REMOVE_EVENT_TYPE.to_string(),
            ResolutionConfig::new(DEFAULT_JOIN_EXPIRY, Arc::new(ValidatorRemoveHandler)),
        );
        types.insert(
            START_MIGRATION_EVENT_TYPE.to_string(),
            ResolutionConfig::new(DEFAULT_EXPIRATION_PERIOD, Arc::new(StartMigrationHandler)),
        );
        Self { types }
    }

    pub fn register(&mut self, event_type: &str, config: ResolutionConfig) -> VotingResult<()> {
        if self.types.contains_key(event_type) {
            return Err(VotingError::DuplicateResolutionType(event_type.to_string()));
        }
        self.types.insert(event_type.to_string(), config);
        Ok(())
    }

    pub fn get(&self, event_type: &str) -> VotingResult<&ResolutionConfig> {
        self.types
            .get(event_type)
            .ok_or_else(|| VotingError::UnknownResolutionType(event_type.to_string()))
    }

    pub fn contains(&self, event_type: &str) -> bool {
        self.types.contains_key(event_type)
    }

    /// Registered type names in sorted order.
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }
}

/// Resolution types whose IDs may legitimately recur and therefore are
/// never recorded as processed.
pub fn is_recurring_type(event_type: &str) -> bool {
    event_type == VALIDATOR_JOIN_EVENT_TYPE || event_type == VALIDATOR_REMOVE_EVENT_TYPE
}
