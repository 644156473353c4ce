//! Invariant verifier
//!
//! Re-derives each field of a calculation from the others and reports
//! every mismatch as a readable diagnostic. Nothing here fails: callers
//! decide whether an invalid record is logged, alerted on or blocked.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{PricingCalculation, RoundingPolicy, Settlement, SettlementOutcome, DEFAULT_TOLERANCE};

/// Outcome of a verification pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl VerificationResult {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Verify a calculation with whole-unit rounding and a 0.01 tolerance
pub fn verify(calculation: &PricingCalculation) -> VerificationResult {
    InvariantVerifier::default().verify(calculation)
}

/// Checks pricing records against the pricing rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvariantVerifier {
    rounding: RoundingPolicy,
    tolerance: Decimal,
}

impl InvariantVerifier {
    pub fn new(rounding: RoundingPolicy, tolerance: Decimal) -> Self {
        Self {
            rounding,
            tolerance,
        }
    }

    pub fn tolerance(&self) -> Decimal {
        self.tolerance
    }

    /// Run the conservation, customer-charge and payout-rate checks
    pub fn verify(&self, calc: &PricingCalculation) -> VerificationResult {
        let mut errors = Vec::new();

        let derived = calc
            .accounted_total()
            .and_then(|accounted| Some((accounted, accounted.checked_sub(calc.job_price)?)));
        match derived {
            Some((accounted, difference)) if self.exceeds_tolerance(difference) => {
                errors.push(format!(
                    "Conservation violated: proPayout ({}) + platformFee ({}) + referralCreditApplied ({}) = {}, expected jobPrice {} (difference {})",
                    calc.pro_payout,
                    calc.platform_fee,
                    calc.referral_credit_applied,
                    accounted,
                    calc.job_price,
                    difference
                ));
            }
            Some(_) => {}
            None => errors.push(overflow(
                "summing proPayout + platformFee + referralCreditApplied",
            )),
        }

        self.check_customer_charge(calc, &mut errors);
        self.check_payout_rate(calc, &mut errors);

        VerificationResult::from_errors(errors)
    }

    /// Verify a settlement, counting any subsidy toward conservation
    ///
    /// `proPayout + platformFee + referralCreditApplied - subsidy` must equal
    /// the job price, and the outcome must agree with the record.
    pub fn verify_settlement(&self, settlement: &Settlement) -> VerificationResult {
        let calc = &settlement.calculation;
        let mut errors = Vec::new();

        let subsidy = settlement.subsidy();
        let derived = calc
            .accounted_total()
            .and_then(|total| total.checked_sub(subsidy))
            .and_then(|accounted| Some((accounted, accounted.checked_sub(calc.job_price)?)));
        match derived {
            Some((accounted, difference)) if self.exceeds_tolerance(difference) => {
                errors.push(format!(
                    "Conservation violated: proPayout ({}) + platformFee ({}) + referralCreditApplied ({}) - subsidyAmount ({}) = {}, expected jobPrice {}",
                    calc.pro_payout,
                    calc.platform_fee,
                    calc.referral_credit_applied,
                    subsidy,
                    accounted,
                    calc.job_price
                ));
            }
            Some(_) => {}
            None => errors.push(overflow(
                "summing proPayout + platformFee + referralCreditApplied - subsidyAmount",
            )),
        }

        self.check_customer_charge(calc, &mut errors);
        self.check_payout_rate(calc, &mut errors);

        match settlement.outcome {
            SettlementOutcome::Settled { platform_fee } => {
                if platform_fee != calc.platform_fee {
                    errors.push(format!(
                        "platformFee mismatch: settled outcome carries {}, record has {}",
                        platform_fee, calc.platform_fee
                    ));
                }
                if calc.pro_payout > calc.customer_pays {
                    errors.push(format!(
                        "Outcome mismatch: proPayout ({}) exceeds customerPays ({}) but outcome is settled",
                        calc.pro_payout, calc.customer_pays
                    ));
                }
            }
            SettlementOutcome::Subsidized { subsidy_amount } => {
                if calc.platform_fee != Decimal::ZERO {
                    errors.push(format!(
                        "platformFee mismatch: subsidized outcome requires 0, record has {}",
                        calc.platform_fee
                    ));
                }
                match calc.pro_payout.checked_sub(calc.customer_pays) {
                    Some(expected) => {
                        let off = subsidy_amount
                            .checked_sub(expected)
                            .map_or(true, |d| self.exceeds_tolerance(d));
                        if off {
                            errors.push(format!(
                                "subsidyAmount mismatch: expected {} (proPayout - customerPays), got {}",
                                expected, subsidy_amount
                            ));
                        }
                    }
                    None => errors.push(overflow("re-deriving subsidyAmount")),
                }
            }
        }

        VerificationResult::from_errors(errors)
    }

    fn exceeds_tolerance(&self, difference: Decimal) -> bool {
        difference.abs() > self.tolerance
    }

    fn check_customer_charge(&self, calc: &PricingCalculation, errors: &mut Vec<String>) {
        let Some(expected) = calc.job_price.checked_sub(calc.referral_credit_applied) else {
            errors.push(overflow("re-deriving customerPays"));
            return;
        };
        // A difference too large to represent is a mismatch too
        let off = calc
            .customer_pays
            .checked_sub(expected)
            .map_or(true, |d| self.exceeds_tolerance(d));
        if off {
            errors.push(format!(
                "customerPays mismatch: expected {} (jobPrice - referralCreditApplied), got {}",
                expected, calc.customer_pays
            ));
        }
    }

    // Exact comparison: this is a straight re-derivation of the payout.
    fn check_payout_rate(&self, calc: &PricingCalculation, errors: &mut Vec<String>) {
        let Some(raw) = calc.job_price.checked_mul(calc.pro_payout_percentage) else {
            errors.push(overflow(&format!(
                "re-deriving proPayout (jobPrice {} x proPayoutPercentage {})",
                calc.job_price, calc.pro_payout_percentage
            )));
            return;
        };
        let expected = self.rounding.round(raw);
        if calc.pro_payout != expected {
            errors.push(format!(
                "proPayout mismatch: expected {} (jobPrice {} x proPayoutPercentage {}), got {}",
                expected, calc.job_price, calc.pro_payout_percentage, calc.pro_payout
            ));
        }
    }
}

fn overflow(what: &str) -> String {
    format!("Arithmetic overflow {}", what)
}

impl Default for InvariantVerifier {
    fn default() -> Self {
        Self::new(RoundingPolicy::WholeUnit, DEFAULT_TOLERANCE)
    }
}
