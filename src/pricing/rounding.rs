//! Currency rounding policy
//!
//! Every payout rounding goes through here so the calculator and the
//! verifier can never disagree.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Granularity payouts are rounded to
///
/// Ties round toward positive infinity (`floor(x + 0.5)`), the same rule
/// the ledger's historical records were produced with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingPolicy {
    /// Whole currency units (dollars)
    #[default]
    WholeUnit,
    /// Hundredths of a unit (cents)
    Cent,
}

impl RoundingPolicy {
    fn decimal_places(&self) -> u32 {
        match self {
            RoundingPolicy::WholeUnit => 0,
            RoundingPolicy::Cent => 2,
        }
    }

    /// Round an amount to this policy's granularity
    ///
    /// Equivalent to `floor(amount * 10^dp + 0.5) / 10^dp`, but only ever
    /// drops digits, so it cannot overflow even at `Decimal::MAX`.
    pub fn round(&self, amount: Decimal) -> Decimal {
        let strategy = if amount.is_sign_negative() {
            RoundingStrategy::MidpointTowardZero
        } else {
            RoundingStrategy::MidpointAwayFromZero
        };
        amount.round_dp_with_strategy(self.decimal_places(), strategy)
    }

    pub fn name(&self) -> &'static str {
        match self {
            RoundingPolicy::WholeUnit => "whole_unit",
            RoundingPolicy::Cent => "cent",
        }
    }
}
