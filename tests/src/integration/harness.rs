//! Block driver shared by the integration tests.

use std::sync::Arc;

use qc_txapp::{
    AccountStore, BlockState, InMemoryAccountStore, TxApp, TxAppApi, TxAppConfig, TxContext,
    TxResponse,
};
use qc_voting::{InMemoryVoteStore, ResolutionRegistry, ValidatorStore, VoteOutcome};
use shared_types::{BlockContext, Identity, NetworkParameters, Payload, Transaction, U256};

/// Balance every funded test account starts with.
pub const GENESIS_BALANCE: u128 = 1_000_000_000_000_000_000;

pub fn test_identity(n: u8) -> Identity {
    Identity::new([n; 32])
}

/// A single-node chain: one router, one in-memory state, a block height.
pub struct TestChain {
    pub app: TxApp,
    pub state: BlockState,
    pub height: i64,
}

pub struct TestChainBuilder {
    params: NetworkParameters,
    validators: Vec<(u8, i64)>,
    funded: Vec<u8>,
    registry: ResolutionRegistry,
    config: TxAppConfig,
}

impl TestChainBuilder {
    pub fn params(mut self, params: NetworkParameters) -> Self {
        self.params = params;
        self
    }

    pub fn validator(mut self, n: u8, power: i64) -> Self {
        self.validators.push((n, power));
        self
    }

    pub fn funded(mut self, accounts: &[u8]) -> Self {
        self.funded.extend_from_slice(accounts);
        self
    }

    pub fn registry(mut self, registry: ResolutionRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn config(mut self, config: TxAppConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> TestChain {
        let votes = InMemoryVoteStore::with_params(self.params)
            .with_validators(
                self.validators
                    .iter()
                    .map(|(n, power)| (test_identity(*n), *power)),
            )
            .expect("seed validators");
        let accounts = InMemoryAccountStore::with_balances(
            self.funded
                .iter()
                .map(|n| (test_identity(*n), U256::from(GENESIS_BALANCE))),
        );

        TestChain {
            app: TxApp::new(self.config, self.registry),
            state: BlockState::new(Arc::new(votes), Arc::new(accounts)),
            height: 1,
        }
    }
}

impl TestChain {
    pub fn builder() -> TestChainBuilder {
        TestChainBuilder {
            params: NetworkParameters::default(),
            validators: Vec::new(),
            funded: Vec::new(),
            registry: ResolutionRegistry::with_defaults(),
            config: TxAppConfig::default(),
        }
    }

    /// Start the block at the current height.
    pub fn begin(&self, proposer: u8) -> BlockContext {
        self.app
            .begin_block(&self.state, self.height, test_identity(proposer))
            .expect("begin block")
    }

    /// Build a transaction with the next nonce and exactly the required fee.
    pub fn tx<P: Payload>(&self, block: &BlockContext, sender: u8, payload: &P) -> Transaction {
        let nonce = self.nonce(sender) + 1;
        let mut tx = Transaction::new(test_identity(sender), payload, U256::zero(), nonce)
            .expect("encode payload");
        tx.body.fee = self.app.price(block, &tx).unwrap_or_default();
        tx
    }

    pub fn deliver(&self, block: &BlockContext, tx: &Transaction) -> TxResponse {
        self.app
            .execute(&TxContext::new(), block, &self.state, tx)
            .expect("execute")
    }

    pub fn submit<P: Payload>(&self, block: &BlockContext, sender: u8, payload: &P) -> TxResponse {
        let tx = self.tx(block, sender, payload);
        self.deliver(block, &tx)
    }

    /// Run end-of-block processing and advance the height.
    pub fn finalize(&mut self, block: &BlockContext) -> VoteOutcome {
        let outcome = self
            .app
            .finalize_block(&TxContext::new(), block, &self.state)
            .expect("finalize block");
        self.height += 1;
        outcome
    }

    pub fn power(&self, n: u8) -> i64 {
        self.state
            .votes()
            .validator_power(&test_identity(n))
            .expect("validator power")
    }

    pub fn balance(&self, n: u8) -> U256 {
        self.state
            .accounts()
            .account(&test_identity(n))
            .expect("account")
            .balance
    }

    pub fn nonce(&self, n: u8) -> u64 {
        self.state
            .accounts()
            .account(&test_identity(n))
            .expect("account")
            .nonce
    }
}
