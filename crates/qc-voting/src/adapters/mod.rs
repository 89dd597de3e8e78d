//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements outbound port traits.

mod memory;

pub use memory::InMemoryVoteStore;
