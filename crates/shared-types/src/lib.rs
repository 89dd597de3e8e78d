//! # Shared Types Crate
//!
//! Domain types shared by the transaction router (`qc-txapp`) and the
//! resolution subsystem (`qc-voting`).
//!
//! ## Contents
//!
//! - **Identity**: 32-byte account/validator identifiers ([`Identity`])
//! - **Transactions**: [`Transaction`], [`TransactionBody`] and the result
//!   taxonomy [`TxCode`]
//! - **Payloads**: one struct per [`PayloadType`], encoded with `bincode`
//!   through the [`Payload`] trait
//! - **Events**: [`VotableEvent`] and its content-addressed [`ResolutionId`]
//! - **Parameters**: [`NetworkParameters`], [`MigrationStatus`] and the
//!   per-block [`BlockContext`]
//!
//! ## Design Principles
//!
//! - **Content addressing**: a resolution ID is derived only from the
//!   event's type and body, so identical events always collide.
//! - **Opaque payloads**: a transaction carries its payload as bytes; only
//!   the route that owns the payload type decodes it.

pub mod codes;
pub mod errors;
pub mod events;
pub mod identity;
pub mod params;
pub mod payloads;
pub mod transaction;

pub use codes::TxCode;
pub use errors::PayloadError;
pub use events::{ResolutionId, VotableEvent};
pub use identity::Identity;
pub use params::{BlockContext, MigrationStatus, NetworkParameters};
pub use payloads::*;
pub use transaction::{Transaction, TransactionBody};

// Re-export U256 from primitive-types for balances, fees and amounts
pub use primitive_types::U256;
