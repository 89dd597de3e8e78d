//! Error types for transaction routing
//!
//! Two layers:
//! - [`Rejection`]: an expected, per-transaction outcome carrying the
//!   [`TxCode`] returned to consensus and the reason for the log.
//! - [`TxAppError`]: a condition that must abort block processing.

use qc_voting::VotingError;
use shared_types::{Identity, MigrationStatus, PayloadError, ResolutionId, TxCode, U256};
use thiserror::Error;

/// Why a route refused a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("caller is not a validator")]
    CallerNotValidator,

    #[error("caller is already a validator")]
    CallerIsValidator,

    #[error("target is not a validator")]
    TargetNotValidator,

    #[error("caller is not the block proposer")]
    CallerNotProposer,

    #[error("validators cannot approve their own join request")]
    SelfApproval,

    #[error("a join request from this candidate is already pending")]
    PendingJoinExists,

    #[error("no pending join request for candidate {0}")]
    JoinRequestNotFound(Identity),

    #[error("{count} pending join requests for candidate {candidate}")]
    MultipleJoinRequests { candidate: Identity, count: usize },

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("transaction fee {offered} is below the required {required}")]
    InsufficientFee { offered: U256, required: U256 },

    #[error("invalid validator power: {0}")]
    InvalidPower(u64),

    #[error("network is in migration ({0})")]
    NetworkInMigration(MigrationStatus),

    #[error("a migration is already active ({0}), cannot accept migration proposals")]
    MigrationAlreadyActive(MigrationStatus),

    #[error("resolution {0} does not exist")]
    ResolutionNotFound(ResolutionId),

    #[error(transparent)]
    Payload(#[from] PayloadError),

    #[error(transparent)]
    Voting(#[from] VotingError),

    #[error(transparent)]
    Account(#[from] AccountError),
}

/// A transaction outcome other than success.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {error}")]
pub struct Rejection {
    pub code: TxCode,
    pub error: RouteError,
}

impl Rejection {
    pub fn new(code: TxCode, error: RouteError) -> Self {
        Self { code, error }
    }

    pub fn invalid_sender(error: RouteError) -> Self {
        Self::new(TxCode::InvalidSender, error)
    }

    /// Split store failures, which abort the block, from ordinary rejections.
    pub fn into_abort(self) -> Result<Self, TxAppError> {
        let Rejection { code, error } = self;
        match error {
            RouteError::Voting(e @ (VotingError::Storage(_) | VotingError::NoSavepoint)) => {
                Err(TxAppError::Voting(e))
            }
            RouteError::Account(e @ (AccountError::Storage(_) | AccountError::NoSavepoint)) => {
                Err(TxAppError::Account(e))
            }
            error => Ok(Rejection { code, error }),
        }
    }
}

/// Payload decode failures never escape as anything but an encoding error.
impl From<PayloadError> for Rejection {
    fn from(e: PayloadError) -> Self {
        Self::new(TxCode::EncodingError, RouteError::Payload(e))
    }
}

/// Domain errors from the vote store are reported as unknown; store
/// failures are separated out again by [`Rejection::into_abort`].
impl From<VotingError> for Rejection {
    fn from(e: VotingError) -> Self {
        Self::new(TxCode::UnknownError, RouteError::Voting(e))
    }
}

/// Account store errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    #[error("insufficient funds: balance {balance}, need {needed}")]
    InsufficientFunds { balance: U256, needed: U256 },

    /// The credited balance would exceed the representable maximum.
    #[error("balance overflow for account {0}")]
    BalanceOverflow(Identity),

    #[error("invalid nonce: expected {expected}, got {got}")]
    InvalidNonce { expected: u64, got: u64 },

    #[error("no open savepoint")]
    NoSavepoint,

    #[error("storage error: {0}")]
    Storage(String),
}

pub type AccountResult<T> = Result<T, AccountError>;

/// Errors that abort block processing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TxAppError {
    /// The surrounding context was cancelled
    #[error("transaction processing cancelled")]
    Cancelled,

    #[error("voting store error: {0}")]
    Voting(#[from] VotingError),

    #[error("account store error: {0}")]
    Account(#[from] AccountError),

    #[error("payload error: {0}")]
    Payload(#[from] PayloadError),

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type for transaction processing
pub type TxAppResult<T> = Result<T, TxAppError>;
