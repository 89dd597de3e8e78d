//! Migration gate
//!
//! Every route's validation starts with [`migration_gate`]. Routes that
//! can propose or approve a migration additionally consult
//! [`start_migration_gate`].

use qc_voting::START_MIGRATION_EVENT_TYPE;
use shared_types::{BlockContext, TxCode};

use crate::error::{Rejection, RouteError};

/// Refuse all transactions while a migration is running or completed.
pub fn migration_gate(block: &BlockContext) -> Result<(), Rejection> {
    let status = block.params.migration_status;
    if status.blocks_transactions() {
        return Err(Rejection::new(
            TxCode::NetworkInMigration,
            RouteError::NetworkInMigration(status),
        ));
    }
    Ok(())
}

/// Refuse a new migration proposal unless no migration is active at all.
pub fn start_migration_gate(block: &BlockContext, event_type: &str) -> Result<(), Rejection> {
    let status = block.params.migration_status;
    if event_type == START_MIGRATION_EVENT_TYPE && !status.is_idle() {
        return Err(Rejection::new(
            TxCode::NetworkInMigration,
            RouteError::MigrationAlreadyActive(status),
        ));
    }
    Ok(())
}
