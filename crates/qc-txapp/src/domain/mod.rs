//! Domain module for transaction routing
//!
//! Pure checks shared by several routes.

pub mod amount;
pub mod gate;

pub use amount::parse_amount;
pub use gate::{migration_gate, start_migration_gate};
