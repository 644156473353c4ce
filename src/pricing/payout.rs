//! Payout rate schedule
//!
//! Jobs are offered to pros in cascade tiers. Later tiers carry a payout
//! sweetener so that a job nobody picked up in the first rounds still
//! gets taken.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{PricingError, Ratio, DEFAULT_PRO_PAYOUT_PCT};

/// Payout rate for one cascade tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierRate {
    pub tier: u8,
    pub rate: Ratio,
}

/// Maps cascade tiers to payout rates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayoutSchedule {
    /// Rate used when no tier is given
    pub default_rate: Ratio,
    pub tiers: Vec<TierRate>,
}

/// Cascade tiers 1-2 pay the standard rate, 3-4 the sweetener
pub fn default_tiers() -> Vec<TierRate> {
    vec![
        TierRate { tier: 1, rate: dec!(0.85) },
        TierRate { tier: 2, rate: dec!(0.85) },
        TierRate { tier: 3, rate: dec!(0.90) }, // sweetener
        TierRate { tier: 4, rate: dec!(0.90) },
    ]
}

impl Default for PayoutSchedule {
    fn default() -> Self {
        Self {
            default_rate: DEFAULT_PRO_PAYOUT_PCT,
            tiers: default_tiers(),
        }
    }
}

/// Check a payout rate lies in (0, 1]
pub fn check_rate(field: &'static str, rate: Ratio) -> Result<Ratio, PricingError> {
    if rate <= Decimal::ZERO || rate > Decimal::ONE {
        return Err(PricingError::InvalidInput {
            field,
            value: rate,
            reason: "must be within (0, 1]",
        });
    }
    Ok(rate)
}

impl PayoutSchedule {
    /// Look up the rate for a cascade tier
    pub fn rate_for_tier(&self, tier: u8) -> Result<Ratio, PricingError> {
        self.tiers
            .iter()
            .find(|t| t.tier == tier)
            .map(|t| t.rate)
            .ok_or(PricingError::UnknownTier(tier))
    }

    /// Resolve the rate for an optional tier, falling back to the default
    pub fn resolve(&self, tier: Option<u8>) -> Result<Ratio, PricingError> {
        match tier {
            Some(tier) => self.rate_for_tier(tier),
            None => Ok(self.default_rate),
        }
    }

    /// Reject out-of-range rates and duplicate tiers
    pub fn validate(&self) -> Result<(), PricingError> {
        check_rate("default_rate", self.default_rate)
            .map_err(|e| PricingError::InvalidSchedule(e.to_string()))?;

        for (i, entry) in self.tiers.iter().enumerate() {
            check_rate("tier_rate", entry.rate).map_err(|_| {
                PricingError::InvalidSchedule(format!(
                    "tier {} rate {} outside (0, 1]",
                    entry.tier, entry.rate
                ))
            })?;
            if self.tiers[..i].iter().any(|t| t.tier == entry.tier) {
                return Err(PricingError::InvalidSchedule(format!(
                    "tier {} listed more than once",
                    entry.tier
                )));
            }
        }
        Ok(())
    }
}
