//! Error types for the resolution subsystem

use shared_types::{Identity, ResolutionId};
use thiserror::Error;

/// Resolution subsystem errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VotingError {
    /// A resolution with this ID is already pending
    #[error("Resolution already exists: {id}")]
    ResolutionExists { id: ResolutionId },

    /// The resolution was finalized or expired earlier
    #[error("Resolution already processed: {id}")]
    ResolutionProcessed { id: ResolutionId },

    /// No pending resolution with this ID
    #[error("Resolution not found: {id}")]
    ResolutionNotFound { id: ResolutionId },

    /// Voter holds no power
    #[error("Voter is not a validator: {voter}")]
    VoterNotFound { voter: Identity },

    /// Type string not present in the registry
    #[error("Unknown resolution type: {0}")]
    UnknownResolutionType(String),

    /// Type registered twice
    #[error("Resolution type already registered: {0}")]
    DuplicateResolutionType(String),

    /// Power must be zero (remove) or positive
    #[error("Invalid power {power} for validator {validator}")]
    NegativePower { validator: Identity, power: i64 },

    /// Threshold fraction outside (0, 1]
    #[error("Invalid threshold {numerator}/{denominator}")]
    InvalidThreshold { numerator: i64, denominator: i64 },

    /// Resolution body could not be encoded or decoded
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Savepoint released or rolled back without a matching savepoint
    #[error("No open savepoint")]
    NoSavepoint,

    /// Storage backend failure
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type for voting operations
pub type VotingResult<T> = Result<T, VotingError>;
