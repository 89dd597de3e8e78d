//! Transaction result codes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result code returned to consensus for every delivered transaction.
///
/// Exactly one code is produced per transaction. `Ok` keeps the route's
/// state effects; any other code discards them (the fee spend is kept).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum TxCode {
    Ok = 0,
    EncodingError = 1,
    InvalidTxType = 2,
    InvalidNonce = 4,
    InsufficientBalance = 6,
    InsufficientFee = 7,
    InvalidAmount = 8,
    InvalidSender = 9,

    InvalidResolutionType = 130,

    NetworkInMigration = 200,

    UnknownError = u16::MAX,
}

impl TxCode {
    pub fn as_u16(self) -> u16 {
        self as u16
    }

    pub fn is_ok(self) -> bool {
        self == TxCode::Ok
    }

    /// Conditions the sender can fix and resubmit (funding, nonce).
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            TxCode::InsufficientBalance | TxCode::InsufficientFee | TxCode::InvalidNonce
        )
    }

    /// Short label used for logs and metric labels.
    pub fn label(self) -> &'static str {
        match self {
            TxCode::Ok => "ok",
            TxCode::EncodingError => "encoding_error",
            TxCode::InvalidTxType => "invalid_tx_type",
            TxCode::InvalidNonce => "invalid_nonce",
            TxCode::InsufficientBalance => "insufficient_balance",
            TxCode::InsufficientFee => "insufficient_fee",
            TxCode::InvalidAmount => "invalid_amount",
            TxCode::InvalidSender => "invalid_sender",
            TxCode::InvalidResolutionType => "invalid_resolution_type",
            TxCode::NetworkInMigration => "network_in_migration",
            TxCode::UnknownError => "unknown_error",
        }
    }
}

impl fmt::Display for TxCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.as_u16())
    }
}
