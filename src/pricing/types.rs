//! Pricing types
//!
//! The calculation record, the validated settlement built on top of it,
//! and the errors the validated engine can return.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Money, Ratio};

/// Result of pricing one job
///
/// Field names serialize in camelCase to match persisted ledger records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingCalculation {
    /// Nominal price agreed for the job before any credit
    pub job_price: Money,
    /// Amount charged to the customer after credit
    pub customer_pays: Money,
    /// Amount paid to the pro, a fixed share of the job price
    pub pro_payout: Money,
    /// Platform margin, clamped at zero
    pub platform_fee: Money,
    /// Referral credit consumed by this calculation
    pub referral_credit_applied: Money,
    /// Contractual payout rate (e.g. 0.85)
    pub pro_payout_percentage: Ratio,
}

impl PricingCalculation {
    /// Amount by which the pro payout exceeds the customer charge
    ///
    /// This is the loss the clamped `platform_fee` cannot express. Zero when
    /// the customer charge covers the payout.
    pub fn unrecorded_subsidy(&self) -> Money {
        self.pro_payout
            .saturating_sub(self.customer_pays)
            .max(Decimal::ZERO)
    }

    /// Sum of the three buckets the job price should split into
    ///
    /// `None` when the sum leaves the decimal range, which only a corrupt
    /// record can do.
    pub fn accounted_total(&self) -> Option<Money> {
        self.pro_payout
            .checked_add(self.platform_fee)?
            .checked_add(self.referral_credit_applied)
    }
}

/// Input to [`PricingEngine::settle`](super::PricingEngine::settle)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementRequest {
    /// Nominal job price
    pub job_price: Money,
    /// Referral credit the customer offers toward this job
    #[serde(default)]
    pub referral_credit: Money,
    /// Explicit payout rate, takes precedence over the tier
    #[serde(default)]
    pub pro_payout_percentage: Option<Ratio>,
    /// Dispatch cascade tier the pro accepted the job at
    #[serde(default)]
    pub cascade_tier: Option<u8>,
}

impl SettlementRequest {
    /// Create a request with no credit and the default payout rate
    pub fn new(job_price: Money) -> Self {
        Self {
            job_price,
            ..Self::default()
        }
    }

    /// Set the referral credit
    pub fn with_credit(mut self, referral_credit: Money) -> Self {
        self.referral_credit = referral_credit;
        self
    }

    /// Set an explicit payout rate
    pub fn with_payout_percentage(mut self, pct: Ratio) -> Self {
        self.pro_payout_percentage = Some(pct);
        self
    }

    /// Set the cascade tier
    pub fn with_tier(mut self, tier: u8) -> Self {
        self.cascade_tier = Some(tier);
        self
    }
}

/// How a settlement's margin came out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SettlementOutcome {
    /// Customer charge covers the payout; the platform keeps the rest
    Settled {
        #[serde(rename = "platformFee")]
        platform_fee: Money,
    },
    /// Payout exceeds the customer charge; the platform pays the difference
    Subsidized {
        #[serde(rename = "subsidyAmount")]
        subsidy_amount: Money,
    },
}

/// Validated settlement of one job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    pub calculation: PricingCalculation,
    pub outcome: SettlementOutcome,
    /// Credit offered beyond the job price, left on the customer's balance
    pub unapplied_credit: Money,
}

impl Settlement {
    /// Amount the platform absorbs, zero for a settled job
    pub fn subsidy(&self) -> Money {
        match self.outcome {
            SettlementOutcome::Settled { .. } => Decimal::ZERO,
            SettlementOutcome::Subsidized { subsidy_amount } => subsidy_amount,
        }
    }

    /// Signed platform result: positive margin or negative subsidy
    pub fn platform_net(&self) -> Money {
        match self.outcome {
            SettlementOutcome::Settled { platform_fee } => platform_fee,
            SettlementOutcome::Subsidized { subsidy_amount } => -subsidy_amount,
        }
    }

    pub fn is_subsidized(&self) -> bool {
        matches!(self.outcome, SettlementOutcome::Subsidized { .. })
    }
}

/// Pricing errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// An input failed boundary validation
    #[error("Invalid input: {field} = {value} ({reason})")]
    InvalidInput {
        field: &'static str,
        value: Decimal,
        reason: &'static str,
    },
    /// No payout rate configured for the cascade tier
    #[error("Unknown cascade tier: {0}")]
    UnknownTier(u8),
    /// The payout schedule itself is malformed
    #[error("Invalid payout schedule: {0}")]
    InvalidSchedule(String),
}
