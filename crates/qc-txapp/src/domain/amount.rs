//! Token amount parsing.

use shared_types::{TxCode, U256};

use crate::error::{Rejection, RouteError};

/// Parse a decimal token amount.
///
/// Negative, empty and non-numeric strings are `InvalidAmount`; upstream
/// validation is not trusted to have excluded them.
pub fn parse_amount(raw: &str) -> Result<U256, Rejection> {
    let invalid = |reason: String| Rejection::new(TxCode::InvalidAmount, RouteError::InvalidAmount(reason));

    let trimmed = raw.trim();
    if trimmed.starts_with('-') {
        return Err(invalid(format!("negative amount {raw}")));
    }
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(format!("not a decimal integer: {raw:?}")));
    }
    U256::from_dec_str(trimmed).map_err(|e| invalid(format!("{raw}: {e:?}")))
}
