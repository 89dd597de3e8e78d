//! # Error Types
//!
//! Errors raised while encoding or decoding payloads and identifiers.

use thiserror::Error;

/// Payload and identifier decoding failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    /// The payload bytes could not be decoded into the expected body.
    #[error("Failed to decode {payload_type} payload: {reason}")]
    Decode {
        payload_type: &'static str,
        reason: String,
    },

    /// The payload body could not be serialized.
    #[error("Failed to encode {payload_type} payload: {reason}")]
    Encode {
        payload_type: &'static str,
        reason: String,
    },

    /// Unknown payload type string.
    #[error("Unknown payload type: {0}")]
    UnknownPayloadType(String),

    /// An identity was not exactly 32 bytes.
    #[error("Invalid identity length: expected 32 bytes, got {0}")]
    InvalidIdentityLength(usize),

    /// An identity string was not valid hex.
    #[error("Invalid identity hex: {0}")]
    InvalidIdentityHex(String),
}
