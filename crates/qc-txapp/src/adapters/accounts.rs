use std::collections::BTreeMap;

use parking_lot::RwLock;
use shared_types::{Identity, U256};

use crate::error::{AccountError, AccountResult};
use crate::ports::{Account, AccountStore};

#[derive(Default)]
struct Inner {
    accounts: BTreeMap<Identity, Account>,
    savepoints: Vec<BTreeMap<Identity, Account>>,
}

impl Inner {
    fn get(&self, identity: &Identity) -> Account {
        self.accounts.get(identity).copied().unwrap_or(Account {
            identity: *identity,
            balance: U256::zero(),
            nonce: 0,
        })
    }
}

/// In-memory account ledger for testing and single-node execution.
#[derive(Default)]
pub struct InMemoryAccountStore {
    inner: RwLock<Inner>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed balances, e.g. from genesis allocations.
    pub fn with_balances<I>(balances: I) -> Self
    where
        I: IntoIterator<Item = (Identity, U256)>,
    {
        let store = Self::new();
        {
            let mut inner = store.inner.write();
            for (identity, balance) in balances {
                inner.accounts.insert(
                    identity,
                    Account {
                        identity,
                        balance,
                        nonce: 0,
                    },
                );
            }
        }
        store
    }
}

impl AccountStore for InMemoryAccountStore {
    fn account(&self, identity: &Identity) -> AccountResult<Account> {
        Ok(self.inner.read().get(identity))
    }

    fn credit(&self, identity: &Identity, amount: U256) -> AccountResult<()> {
        let mut inner = self.inner.write();
        let mut account = inner.get(identity);
        account.balance = account
            .balance
            .checked_add(amount)
            .ok_or(AccountError::BalanceOverflow(*identity))?;
        inner.accounts.insert(*identity, account);
        Ok(())
    }

    fn transfer(&self, from: &Identity, to: &Identity, amount: U256) -> AccountResult<()> {
        let mut inner = self.inner.write();
        let mut sender = inner.get(from);
        if sender.balance < amount {
            return Err(AccountError::InsufficientFunds {
                balance: sender.balance,
                needed: amount,
            });
        }
        if from == to {
            return Ok(());
        }

        let mut receiver = inner.get(to);
        receiver.balance = receiver
            .balance
            .checked_add(amount)
            .ok_or(AccountError::BalanceOverflow(*to))?;
        sender.balance -= amount;

        inner.accounts.insert(*from, sender);
        inner.accounts.insert(*to, receiver);
        Ok(())
    }

    fn spend(&self, identity: &Identity, amount: U256, nonce: u64) -> AccountResult<()> {
        let mut inner = self.inner.write();
        let mut account = inner.get(identity);

        let expected = account.nonce.saturating_add(1);
        if nonce != expected {
            return Err(AccountError::InvalidNonce {
                expected,
                got: nonce,
            });
        }
        if account.balance < amount {
            return Err(AccountError::InsufficientFunds {
                balance: account.balance,
                needed: amount,
            });
        }

        account.balance -= amount;
        account.nonce = nonce;
        inner.accounts.insert(*identity, account);
        Ok(())
    }

    fn savepoint(&self) -> AccountResult<()> {
        let mut inner = self.inner.write();
        let snapshot = inner.accounts.clone();
        inner.savepoints.push(snapshot);
        Ok(())
    }

    fn release_savepoint(&self) -> AccountResult<()> {
        self.inner
            .write()
            .savepoints
            .pop()
            .map(|_| ())
            .ok_or(AccountError::NoSavepoint)
    }

    fn rollback_savepoint(&self) -> AccountResult<()> {
        let mut inner = self.inner.write();
        let snapshot = inner.savepoints.pop().ok_or(AccountError::NoSavepoint)?;
        inner.accounts = snapshot;
        Ok(())
    }
}
