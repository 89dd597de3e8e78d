//! # Voting Metrics
//!
//! Prometheus metrics for resolution processing.
//!
//! Enable with the `metrics` feature:
//! ```toml
//! qc-voting = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `voting_resolutions_finalized_total` - Resolutions whose effect ran (by type)
//! - `voting_resolutions_failed_total` - Resolutions whose effect was rolled back (by type)
//! - `voting_resolutions_expired_total` - Expired resolutions (by type, refunded)

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{register_int_counter_vec, IntCounterVec};

#[cfg(feature = "metrics")]
lazy_static! {
    pub static ref RESOLUTIONS_FINALIZED: IntCounterVec = register_int_counter_vec!(
        "voting_resolutions_finalized_total",
        "Total number of resolutions finalized",
        &["type"]
    )
    .expect("Failed to create RESOLUTIONS_FINALIZED metric");

    pub static ref RESOLUTIONS_FAILED: IntCounterVec = register_int_counter_vec!(
        "voting_resolutions_failed_total",
        "Total number of resolutions whose effect failed",
        &["type"]
    )
    .expect("Failed to create RESOLUTIONS_FAILED metric");

    pub static ref RESOLUTIONS_EXPIRED: IntCounterVec = register_int_counter_vec!(
        "voting_resolutions_expired_total",
        "Total number of resolutions expired",
        &["type", "refunded"]
    )
    .expect("Failed to create RESOLUTIONS_EXPIRED metric");
}

#[cfg(feature = "metrics")]
pub fn record_resolution_finalized(event_type: &str) {
    RESOLUTIONS_FINALIZED.with_label_values(&[event_type]).inc();
}

#[cfg(feature = "metrics")]
pub fn record_resolution_failed(event_type: &str) {
    RESOLUTIONS_FAILED.with_label_values(&[event_type]).inc();
}

#[cfg(feature = "metrics")]
pub fn record_resolution_expired(event_type: &str, refunded: bool) {
    let refunded = if refunded { "true" } else { "false" };
    RESOLUTIONS_EXPIRED
        .with_label_values(&[event_type, refunded])
        .inc();
}

// =============================================================================
// NO-OP IMPLEMENTATIONS (when metrics feature disabled)
// =============================================================================

#[cfg(not(feature = "metrics"))]
pub fn record_resolution_finalized(_event_type: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_resolution_failed(_event_type: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_resolution_expired(_event_type: &str, _refunded: bool) {}
