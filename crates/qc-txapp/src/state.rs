//! Block-scoped write state.

use std::sync::Arc;

use qc_voting::{InMemoryVoteStore, Savepoint, VoteState};

use crate::adapters::InMemoryAccountStore;
use crate::error::TxAppResult;
use crate::ports::AccountStore;

/// The storage handles a block executes against.
///
/// A savepoint spans both the vote store and the account ledger so a
/// rejected transaction's route effects roll back together.
#[derive(Clone)]
pub struct BlockState {
    votes: Arc<dyn VoteState>,
    accounts: Arc<dyn AccountStore>,
}

impl BlockState {
    pub fn new(votes: Arc<dyn VoteState>, accounts: Arc<dyn AccountStore>) -> Self {
        Self { votes, accounts }
    }

    /// Empty in-memory state.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryVoteStore::new()),
            Arc::new(InMemoryAccountStore::new()),
        )
    }

    pub fn votes(&self) -> &dyn VoteState {
        self.votes.as_ref()
    }

    pub fn accounts(&self) -> &dyn AccountStore {
        self.accounts.as_ref()
    }

    pub fn savepoint(&self) -> TxAppResult<()> {
        self.votes.savepoint()?;
        if let Err(e) = self.accounts.savepoint() {
            self.votes.rollback_savepoint()?;
            return Err(e.into());
        }
        Ok(())
    }

    pub fn release_savepoint(&self) -> TxAppResult<()> {
        self.votes.release_savepoint()?;
        self.accounts.release_savepoint()?;
        Ok(())
    }

    pub fn rollback_savepoint(&self) -> TxAppResult<()> {
        self.votes.rollback_savepoint()?;
        self.accounts.rollback_savepoint()?;
        Ok(())
    }
}
