//! # Transaction Routing Metrics
//!
//! Enable with the `metrics` feature:
//! ```toml
//! qc-txapp = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `txapp_transactions_total` - Delivered transactions (by route, code)
//! - `txapp_fees_spent_total` - Fee units debited, saturating at `u64::MAX` per tx (by route)
//! - `txapp_vote_credits_total` - Credits paid to voters and proposers

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec};

use shared_types::{TxCode, U256};

#[cfg(feature = "metrics")]
lazy_static! {
    pub static ref TRANSACTIONS: IntCounterVec = register_int_counter_vec!(
        "txapp_transactions_total",
        "Total number of transactions delivered",
        &["route", "code"]
    )
    .expect("Failed to create TRANSACTIONS metric");

    pub static ref FEES_SPENT: IntCounterVec = register_int_counter_vec!(
        "txapp_fees_spent_total",
        "Total fee units debited from senders",
        &["route"]
    )
    .expect("Failed to create FEES_SPENT metric");

    pub static ref VOTE_CREDITS: IntCounter = register_int_counter!(
        "txapp_vote_credits_total",
        "Total number of vote credits paid"
    )
    .expect("Failed to create VOTE_CREDITS metric");
}

#[cfg(feature = "metrics")]
pub fn record_transaction(route: &str, code: TxCode, spend: U256) {
    TRANSACTIONS
        .with_label_values(&[route, code.label()])
        .inc();
    let spend = if spend > U256::from(u64::MAX) {
        u64::MAX
    } else {
        spend.low_u64()
    };
    FEES_SPENT.with_label_values(&[route]).inc_by(spend);
}

#[cfg(feature = "metrics")]
pub fn record_vote_credits(count: usize) {
    VOTE_CREDITS.inc_by(count as u64);
}

// =============================================================================
// NO-OP IMPLEMENTATIONS (when metrics feature disabled)
// =============================================================================

#[cfg(not(feature = "metrics"))]
pub fn record_transaction(_route: &str, _code: TxCode, _spend: U256) {}

#[cfg(not(feature = "metrics"))]
pub fn record_vote_credits(_count: usize) {}
