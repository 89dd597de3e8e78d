//! Quorum thresholds as exact fractions.

use crate::error::{VotingError, VotingResult};

/// A fraction of total validator power.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Threshold {
    numerator: i64,
    denominator: i64,
}

impl Threshold {
    /// BFT supermajority used to finalize resolutions.
    pub const TWO_THIRDS: Threshold = Threshold {
        numerator: 2,
        denominator: 3,
    };

    pub const ONE_HALF: Threshold = Threshold {
        numerator: 1,
        denominator: 2,
    };

    /// Approval an expired resolution needs for its voters to be refunded.
    pub const ONE_THIRD: Threshold = Threshold {
        numerator: 1,
        denominator: 3,
    };

    pub fn new(numerator: i64, denominator: i64) -> VotingResult<Self> {
        if denominator <= 0 || numerator <= 0 || numerator > denominator {
            return Err(VotingError::InvalidThreshold {
                numerator,
                denominator,
            });
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    pub fn numerator(&self) -> i64 {
        self.numerator
    }

    pub fn denominator(&self) -> i64 {
        self.denominator
    }

    /// Power needed to meet this threshold: `ceil(total * n / d)`, at least 1.
    ///
    /// The floor of 1 keeps an empty validator set from finalizing
    /// resolutions nobody approved.
    pub fn required_power(&self, total_power: i64) -> i64 {
        let total = i128::from(total_power.max(0));
        let n = i128::from(self.numerator);
        let d = i128::from(self.denominator);
        let required = (total * n + d - 1) / d;
        i64::try_from(required).unwrap_or(i64::MAX).max(1)
    }
}
