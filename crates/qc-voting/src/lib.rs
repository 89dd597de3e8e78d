//! # Resolution Voting Subsystem
//!
//! Turns "N validators individually approved event X" into "event X is
//! agreed and its effect applied exactly once".
//!
//! ## Lifecycle
//!
//! ```text
//!   create_resolution          approvals (weighted by current power)
//!  ──────────────────▶ Pending ─────────────────────────────────────┐
//!                         │                                         │
//!                         │ expiry_height <= height                 │ approved_power >=
//!                         ▼  (end of block)                         ▼ required_power
//!                      Expired                                  Finalized
//!              (refund if >= refund threshold)          (type handler runs once)
//! ```
//!
//! Quorum is `ceil(total_power * n / d)` of the type's confirmation
//! threshold, two thirds by default. Both transitions are evaluated by
//! [`VoteProcessor::process_votes`] after the block's last transaction,
//! never inside `approve_resolution`.
//!
//! ## Invariants
//!
//! | Invariant | Enforced by |
//! |-----------|-------------|
//! | At most one resolution per ID | `create_resolution` fails on existing or processed IDs |
//! | One vote per voter | approvals are a set |
//! | Expiry fixed at creation | no update path exists |
//! | Effects are atomic | each handler runs in its own savepoint |
//!
//! ## Module Structure
//!
//! - `domain/` - resolutions, power update requests, thresholds
//! - `ports/` - store traits (outbound) and the processing API (inbound)
//! - `adapters/` - in-memory store
//! - `registry` - resolution type configuration
//! - `handlers` - built-in validator and migration effects
//! - `service` - end-of-block processing

pub mod adapters;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod ports;
pub mod registry;
pub mod service;

pub use adapters::InMemoryVoteStore;
pub use domain::{Resolution, ResolutionStatus, Threshold, UpdatePowerRequest, Voter};
pub use error::{VotingError, VotingResult};
pub use ports::{
    ParameterStore, ResolutionStore, Savepoint, ValidatorStore, VoteOutcome, VoteProcessingApi,
    VoteState,
};
pub use registry::{
    ResolutionConfig, ResolutionHandler, ResolutionRegistry, START_MIGRATION_EVENT_TYPE,
    VALIDATOR_JOIN_EVENT_TYPE, VALIDATOR_REMOVE_EVENT_TYPE,
};
pub use service::{VotePrices, VoteProcessor};
