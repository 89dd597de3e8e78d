//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements outbound port traits.

mod accounts;

pub use accounts::InMemoryAccountStore;
