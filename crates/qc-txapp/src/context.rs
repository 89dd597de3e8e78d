//! Per-call execution context.

use tokio_util::sync::CancellationToken;

use crate::error::{TxAppError, TxAppResult};

/// Ambient context threaded through every transaction and block call.
///
/// Cancelling the token aborts the current transaction: its route effects
/// are rolled back and [`TxAppError::Cancelled`] is returned.
#[derive(Clone, Debug, Default)]
pub struct TxContext {
    cancel: CancellationToken,
}

impl TxContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(cancel: CancellationToken) -> Self {
        Self { cancel }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn check(&self) -> TxAppResult<()> {
        if self.cancel.is_cancelled() {
            return Err(TxAppError::Cancelled);
        }
        Ok(())
    }
}
