//! Driven Ports (SPI - Outbound Dependencies)

use shared_types::{Identity, U256};

use crate::error::AccountResult;

/// Balance and nonce of one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Account {
    pub identity: Identity,
    pub balance: U256,
    /// Nonce of the last transaction spent from this account.
    pub nonce: u64,
}

/// Account ledger consumed by the transfer route and fee accounting.
pub trait AccountStore: Send + Sync {
    /// Account state; unknown identities read as an empty account.
    fn account(&self, identity: &Identity) -> AccountResult<Account>;

    fn credit(&self, identity: &Identity, amount: U256) -> AccountResult<()>;

    /// Move `amount` from `from` to `to`.
    ///
    /// Fails with `InsufficientFunds` without moving anything.
    fn transfer(&self, from: &Identity, to: &Identity, amount: U256) -> AccountResult<()>;

    /// Debit `amount` for a transaction with `nonce` and advance the nonce.
    ///
    /// `nonce` must be exactly one above the stored nonce; the nonce check
    /// runs before the balance check.
    fn spend(&self, identity: &Identity, amount: U256, nonce: u64) -> AccountResult<()>;

    fn savepoint(&self) -> AccountResult<()>;

    fn release_savepoint(&self) -> AccountResult<()>;

    fn rollback_savepoint(&self) -> AccountResult<()>;
}
