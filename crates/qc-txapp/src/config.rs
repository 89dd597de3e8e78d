//! Transaction router configuration.

use std::env;

use serde::{Deserialize, Serialize};
use shared_types::{Identity, U256};

use crate::error::{TxAppError, TxAppResult};

/// Fees charged per route, in the chain's base unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutePrices {
    pub transfer: u128,
    pub validator_join: u128,
    pub validator_approve: u128,
    pub validator_remove: u128,
    pub validator_leave: u128,
    /// Per resolution ID in a vote, and per voter credit at finalization.
    pub vote_id: u128,
    /// Per byte of event body proposed.
    pub vote_body_byte: u128,
}

impl Default for RoutePrices {
    fn default() -> Self {
        Self {
            transfer: 210_000,
            validator_join: 10_000_000_000_000,
            validator_approve: 10_000_000_000_000,
            validator_remove: 100_000,
            validator_leave: 10_000_000_000_000,
            vote_id: 16_000,
            vote_body_byte: 1_000,
        }
    }
}

impl RoutePrices {
    pub fn transfer(&self) -> U256 {
        U256::from(self.transfer)
    }

    pub fn validator_join(&self) -> U256 {
        U256::from(self.validator_join)
    }

    pub fn validator_approve(&self) -> U256 {
        U256::from(self.validator_approve)
    }

    pub fn validator_remove(&self) -> U256 {
        U256::from(self.validator_remove)
    }

    pub fn validator_leave(&self) -> U256 {
        U256::from(self.validator_leave)
    }

    pub fn vote_id(&self) -> U256 {
        U256::from(self.vote_id)
    }

    pub fn vote_body_byte(&self) -> U256 {
        U256::from(self.vote_body_byte)
    }
}

/// Configuration for the transaction router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TxAppConfig {
    pub prices: RoutePrices,
    /// This node's own validator identity; votes it sends evict its
    /// locally buffered events.
    #[serde(skip)]
    pub local_identity: Option<Identity>,
}

impl TxAppConfig {
    pub fn with_local_identity(mut self, identity: Identity) -> Self {
        self.local_identity = Some(identity);
        self
    }

    /// Overlay environment variables on the defaults.
    ///
    /// # Environment Variables
    ///
    /// - `QC_TXAPP_TRANSFER_PRICE`, `QC_TXAPP_JOIN_PRICE`,
    ///   `QC_TXAPP_APPROVE_PRICE`, `QC_TXAPP_REMOVE_PRICE`,
    ///   `QC_TXAPP_LEAVE_PRICE`: per-route fees
    /// - `QC_TXAPP_VOTE_ID_PRICE`: fee per voted resolution ID
    /// - `QC_TXAPP_VOTE_BODY_BYTE_PRICE`: fee per proposed body byte
    /// - `QC_TXAPP_LOCAL_IDENTITY`: hex identity of this node
    pub fn from_env() -> TxAppResult<Self> {
        let mut config = Self::default();
        let prices = &mut config.prices;

        for (var, slot) in [
            ("QC_TXAPP_TRANSFER_PRICE", &mut prices.transfer),
            ("QC_TXAPP_JOIN_PRICE", &mut prices.validator_join),
            ("QC_TXAPP_APPROVE_PRICE", &mut prices.validator_approve),
            ("QC_TXAPP_REMOVE_PRICE", &mut prices.validator_remove),
            ("QC_TXAPP_LEAVE_PRICE", &mut prices.validator_leave),
            ("QC_TXAPP_VOTE_ID_PRICE", &mut prices.vote_id),
            ("QC_TXAPP_VOTE_BODY_BYTE_PRICE", &mut prices.vote_body_byte),
        ] {
            if let Ok(value) = env::var(var) {
                *slot = value
                    .parse()
                    .map_err(|_| TxAppError::Config(format!("{var}: not an integer: {value}")))?;
            }
        }

        if let Ok(value) = env::var("QC_TXAPP_LOCAL_IDENTITY") {
            let identity = value
                .parse::<Identity>()
                .map_err(|e| TxAppError::Config(format!("QC_TXAPP_LOCAL_IDENTITY: {e}")))?;
            config.local_identity = Some(identity);
        }

        Ok(config)
    }

    /// Parse a JSON document; missing fields keep their defaults.
    pub fn from_json(json: &str) -> TxAppResult<Self> {
        serde_json::from_str(json).map_err(|e| TxAppError::Config(e.to_string()))
    }
}
