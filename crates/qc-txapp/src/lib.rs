//! # Transaction Routing Subsystem
//!
//! Dispatches each delivered transaction to the route for its payload type,
//! charges its fee and applies it against the block's state. After the
//! last transaction, [`TxApp::finalize_block`](ports::TxAppApi::finalize_block)
//! hands over to the vote processor and pays out voter credits.
//!
//! ## Block Flow
//!
//! ```text
//!  begin_block ──▶ execute(tx₁) ──▶ ... ──▶ execute(txₙ) ──▶ finalize_block
//!       │               │                                         │
//!  snapshot params   price → spend → pre_validate → apply    process_votes
//!                                   (migration gate)         + credit voters
//! ```
//!
//! ## Routes
//!
//! | Payload type | Who may send | Effect |
//! |--------------|--------------|--------|
//! | `transfer` | anyone | move tokens |
//! | `validator_join` | non-validators | open a join resolution |
//! | `validator_approve` | validators other than the candidate | vote on a join |
//! | `validator_remove` | validators | open or vote on a removal |
//! | `validator_leave` | validators | drop own power to zero |
//! | `validator_vote_ids` | validators | vote by resolution ID |
//! | `validator_vote_bodies` | block proposer | propose events and vote |
//! | `create_resolution` | validators | propose an event of a registered type |
//! | `approve_resolution` | validators | vote on one resolution |
//!
//! ## Response Codes
//!
//! A rejection never aborts the block: it is returned as a
//! [`TxResponse`] with a non-zero [`TxCode`](shared_types::TxCode) and the
//! fee already spent. Only store failures and cancellation surface as
//! [`TxAppError`].
//!
//! ## Module Structure
//!
//! - `domain/` - migration gate, amount parsing
//! - `routes/` - one route per payload type
//! - `ports/` - account store (outbound) and router API (inbound)
//! - `adapters/` - in-memory account ledger
//! - `state` - block-scoped stores with joint savepoints
//! - `service` - the dispatcher

pub mod adapters;
pub mod config;
pub mod context;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod routes;
pub mod service;
pub mod state;

pub use adapters::InMemoryAccountStore;
pub use config::{RoutePrices, TxAppConfig};
pub use context::TxContext;
pub use error::{
    AccountError, AccountResult, Rejection, RouteError, TxAppError, TxAppResult,
};
pub use ports::{Account, AccountStore, TxAppApi, TxResponse};
pub use service::{TxApp, MAX_PROPOSED_EVENTS};
pub use state::BlockState;
