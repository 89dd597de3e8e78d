//! Prometheus text exposition.
//!
//! Component crates register their counters on the default registry when
//! built with their `metrics` feature; this renders whatever is registered.

use prometheus::{Encoder, TextEncoder};

use crate::TelemetryError;

/// Render the default registry in the Prometheus text format.
pub fn render_metrics() -> Result<String, TelemetryError> {
    let families = prometheus::gather();
    let mut buffer = Vec::new();
    TextEncoder::new()
        .encode(&families, &mut buffer)
        .map_err(|e| TelemetryError::Metrics(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::Metrics(e.to_string()))
}
