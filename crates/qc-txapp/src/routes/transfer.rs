use shared_types::{Identity, Payload, PayloadType, Transaction, Transfer, TxCode, U256};

use super::{Route, RouteEnv};
use crate::domain::{migration_gate, parse_amount};
use crate::error::{AccountError, Rejection, RouteError};
use crate::state::BlockState;

/// Token transfer between accounts.
pub struct TransferRoute;

pub struct ValidatedTransfer {
    to: Identity,
    amount: U256,
}

impl Route for TransferRoute {
    type Validated = ValidatedTransfer;

    fn payload_type(&self) -> PayloadType {
        PayloadType::Transfer
    }

    fn price(&self, env: &RouteEnv<'_>, _tx: &Transaction) -> Result<U256, Rejection> {
        Ok(env.config.prices.transfer())
    }

    fn pre_validate(
        &self,
        env: &RouteEnv<'_>,
        tx: &Transaction,
    ) -> Result<ValidatedTransfer, Rejection> {
        migration_gate(env.block)?;
        let transfer = Transfer::decode(&tx.body.payload)?;
        let amount = parse_amount(&transfer.amount)?;
        Ok(ValidatedTransfer {
            to: transfer.to,
            amount,
        })
    }

    fn apply(
        &self,
        _env: &RouteEnv<'_>,
        state: &BlockState,
        tx: &Transaction,
        validated: ValidatedTransfer,
    ) -> Result<(), Rejection> {
        state
            .accounts()
            .transfer(&tx.sender, &validated.to, validated.amount)
            .map_err(|e| {
                let code = match e {
                    AccountError::InsufficientFunds { .. } => TxCode::InsufficientBalance,
                    AccountError::BalanceOverflow(_) => TxCode::InvalidAmount,
                    _ => TxCode::UnknownError,
                };
                Rejection::new(code, RouteError::Account(e))
            })
    }
}
