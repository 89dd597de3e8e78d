//! Network parameters and per-block context.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::identity::Identity;

/// Default number of blocks a validator join request stays open.
pub const DEFAULT_JOIN_EXPIRY: i64 = 14_400;

/// Chain migration lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MigrationStatus {
    /// No migration is proposed or running.
    #[default]
    NoActiveMigration,
    /// A migration was approved and nodes are preparing for it.
    ActivationPeriod,
    /// The old network is replicating its changes to the new one.
    MigrationInProgress,
    /// The old network finished migrating and awaits decommission.
    MigrationCompleted,
}

impl MigrationStatus {
    /// True when ordinary transactions must be refused.
    pub fn blocks_transactions(self) -> bool {
        matches!(
            self,
            MigrationStatus::MigrationInProgress | MigrationStatus::MigrationCompleted
        )
    }

    /// True when no migration has been approved or started.
    pub fn is_idle(self) -> bool {
        self == MigrationStatus::NoActiveMigration
    }
}

impl fmt::Display for MigrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MigrationStatus::NoActiveMigration => "NoActiveMigration",
            MigrationStatus::ActivationPeriod => "ActivationPeriod",
            MigrationStatus::MigrationInProgress => "MigrationInProgress",
            MigrationStatus::MigrationCompleted => "MigrationCompleted",
        };
        f.write_str(s)
    }
}

/// Chain-wide parameters every route reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkParameters {
    pub migration_status: MigrationStatus,
    /// Blocks a validator join request stays open for approvals.
    pub join_expiry: i64,
    /// When set, transactions are not charged and voters are not credited.
    pub disabled_gas_costs: bool,
}

impl Default for NetworkParameters {
    fn default() -> Self {
        Self {
            migration_status: MigrationStatus::NoActiveMigration,
            join_expiry: DEFAULT_JOIN_EXPIRY,
            disabled_gas_costs: false,
        }
    }
}

/// Immutable view of the block being executed.
///
/// Built once at the start of a block and passed to every route call, so
/// routes never read ambient state for height, proposer or parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockContext {
    pub height: i64,
    pub proposer: Identity,
    pub params: NetworkParameters,
}

impl BlockContext {
    pub fn new(height: i64, proposer: Identity, params: NetworkParameters) -> Self {
        Self {
            height,
            proposer,
            params,
        }
    }
}
