//! Ports module for transaction routing

pub mod inbound;
pub mod outbound;

pub use inbound::{TxAppApi, TxResponse};
pub use outbound::{Account, AccountStore};
