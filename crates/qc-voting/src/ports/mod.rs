//! Ports module for the resolution subsystem

pub mod inbound;
pub mod outbound;

pub use inbound::{VoteOutcome, VoteProcessingApi};
pub use outbound::{ParameterStore, ResolutionStore, Savepoint, ValidatorStore, VoteState};
