//! Commission pricing calculator
//!
//! The pro's payout is always a fixed share of the original job price.
//! A referral credit lowers what the customer pays and is funded entirely
//! out of the platform's margin.

use rust_decimal::Decimal;

use super::payout::{check_rate, PayoutSchedule};
use super::{
    InvariantVerifier, Money, PricingCalculation, PricingError, Ratio, RoundingPolicy,
    Settlement, SettlementOutcome, SettlementRequest, DEFAULT_PRO_PAYOUT_PCT, MAX_AMOUNT,
};
use crate::config::PricingConfig;

/// Price a job with whole-unit rounding
///
/// Inputs are not validated and the result never fails: negative
/// intermediates clamp to zero, and arithmetic that would leave the decimal
/// range saturates at `Decimal::MAX` / `Decimal::MIN`. When the credit pushes the customer charge
/// below the payout, `platform_fee` reads 0 and the subsidy is not recorded;
/// use [`PricingEngine::settle`] when that matters.
pub fn calculate(
    job_price: Money,
    referral_credit: Money,
    pro_payout_percentage: Option<Ratio>,
) -> PricingCalculation {
    calculate_with(
        RoundingPolicy::WholeUnit,
        job_price,
        referral_credit,
        pro_payout_percentage.unwrap_or(DEFAULT_PRO_PAYOUT_PCT),
    )
}

/// Price a job with an explicit rounding policy
///
/// Saturates instead of overflowing, like [`calculate`].
pub fn calculate_with(
    rounding: RoundingPolicy,
    job_price: Money,
    referral_credit: Money,
    pro_payout_percentage: Ratio,
) -> PricingCalculation {
    let pro_payout = rounding.round(job_price.saturating_mul(pro_payout_percentage));
    let customer_pays = job_price.saturating_sub(referral_credit).max(Decimal::ZERO);
    let platform_fee = customer_pays.saturating_sub(pro_payout).max(Decimal::ZERO);

    PricingCalculation {
        job_price,
        customer_pays,
        pro_payout,
        platform_fee,
        referral_credit_applied: referral_credit,
        pro_payout_percentage,
    }
}

fn check_amount(field: &'static str, value: Money) -> Result<Money, PricingError> {
    if value < Decimal::ZERO {
        return Err(PricingError::InvalidInput {
            field,
            value,
            reason: "must be non-negative",
        });
    }
    if value > MAX_AMOUNT {
        return Err(PricingError::InvalidInput {
            field,
            value,
            reason: "exceeds maximum amount",
        });
    }
    Ok(value)
}

/// Configured pricing engine
#[derive(Debug, Clone)]
pub struct PricingEngine {
    rounding: RoundingPolicy,
    tolerance: Decimal,
    schedule: PayoutSchedule,
}

impl PricingEngine {
    /// Create an engine from a rounding policy and payout schedule
    pub fn new(
        rounding: RoundingPolicy,
        tolerance: Decimal,
        schedule: PayoutSchedule,
    ) -> Result<Self, PricingError> {
        schedule.validate()?;
        Ok(Self {
            rounding,
            tolerance,
            schedule,
        })
    }

    /// Create from PricingConfig
    pub fn from_config(config: &PricingConfig) -> Result<Self, PricingError> {
        Self::new(
            config.rounding,
            config.tolerance,
            PayoutSchedule {
                default_rate: config.default_payout_pct,
                tiers: config.tiers.clone(),
            },
        )
    }

    pub fn rounding(&self) -> RoundingPolicy {
        self.rounding
    }

    pub fn schedule(&self) -> &PayoutSchedule {
        &self.schedule
    }

    /// Verifier sharing this engine's rounding and tolerance
    pub fn verifier(&self) -> InvariantVerifier {
        InvariantVerifier::new(self.rounding, self.tolerance)
    }

    /// Unvalidated calculation with this engine's defaults
    pub fn calculate(
        &self,
        job_price: Money,
        referral_credit: Money,
        pro_payout_percentage: Option<Ratio>,
    ) -> PricingCalculation {
        calculate_with(
            self.rounding,
            job_price,
            referral_credit,
            pro_payout_percentage.unwrap_or(self.schedule.default_rate),
        )
    }

    /// Validate the request and settle the job
    ///
    /// Amounts must lie in `[0, MAX_AMOUNT]`. The applied credit is capped at the job price; any excess is returned
    /// as `unapplied_credit`. A payout larger than the customer charge is
    /// reported as a [`SettlementOutcome::Subsidized`] outcome.
    pub fn settle(&self, request: &SettlementRequest) -> Result<Settlement, PricingError> {
        let job_price = check_amount("job_price", request.job_price)?;
        let offered_credit = check_amount("referral_credit", request.referral_credit)?;
        let pct = match request.pro_payout_percentage {
            Some(pct) => check_rate("pro_payout_percentage", pct)?,
            None => self.schedule.resolve(request.cascade_tier)?,
        };

        let applied_credit = offered_credit.min(job_price);
        let calculation = calculate_with(self.rounding, job_price, applied_credit, pct);

        let margin = calculation.customer_pays - calculation.pro_payout;
        let outcome = if margin >= Decimal::ZERO {
            SettlementOutcome::Settled {
                platform_fee: calculation.platform_fee,
            }
        } else {
            SettlementOutcome::Subsidized {
                subsidy_amount: -margin,
            }
        };

        let settlement = Settlement {
            calculation,
            outcome,
            unapplied_credit: offered_credit - applied_credit,
        };

        tracing::debug!(
            job_price = %job_price,
            customer_pays = %calculation.customer_pays,
            pro_payout = %calculation.pro_payout,
            platform_fee = %calculation.platform_fee,
            credit = %applied_credit,
            "Job settled"
        );
        if settlement.is_subsidized() {
            tracing::info!(
                job_price = %job_price,
                subsidy = %settlement.subsidy(),
                "Referral credit exceeds platform margin, platform subsidizes payout"
            );
        }

        Ok(settlement)
    }
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self {
            rounding: RoundingPolicy::default(),
            tolerance: super::DEFAULT_TOLERANCE,
            schedule: PayoutSchedule::default(),
        }
    }
}
