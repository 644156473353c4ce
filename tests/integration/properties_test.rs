//! Property tests for the pricing calculator
//!
//! Uses proptest to check the pricing invariants across a wide range of inputs

use commission_pricing::pricing::{
    calculate, verify, PricingEngine, SettlementRequest,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn cents(value: u32) -> Decimal {
    Decimal::new(value as i64, 2)
}

fn ratio(basis_points: u32) -> Decimal {
    Decimal::new(basis_points as i64, 4)
}

proptest! {
    /// Property: buckets sum to the job price unless the clamp hides a subsidy
    #[test]
    fn test_conservation_or_exact_subsidy(
        price in 0u32..10_000_000u32,
        credit in 0u32..10_000_000u32,
        pct_bp in 1u32..=10_000u32,
    ) {
        let job_price = cents(price);
        let referral_credit = cents(credit);
        prop_assume!(referral_credit <= job_price);

        let calc = calculate(job_price, referral_credit, Some(ratio(pct_bp)));
        let diff = calc.accounted_total().unwrap() - calc.job_price;

        if calc.pro_payout <= calc.customer_pays {
            prop_assert!(diff.abs() <= dec!(0.01));
            prop_assert!(verify(&calc).valid);
        } else {
            prop_assert!(diff > Decimal::ZERO);
            prop_assert_eq!(diff, calc.unrecorded_subsidy());
        }
    }

    /// Property: payout never depends on the credit
    #[test]
    fn test_payout_independent_of_credit(
        price in 0u32..10_000_000u32,
        credit_a in 0u32..20_000_000u32,
        credit_b in 0u32..20_000_000u32,
        pct_bp in 1u32..=10_000u32,
    ) {
        let pct = Some(ratio(pct_bp));
        let a = calculate(cents(price), cents(credit_a), pct);
        let b = calculate(cents(price), cents(credit_b), pct);
        prop_assert_eq!(a.pro_payout, b.pro_payout);
    }

    /// Property: identical inputs give identical outputs
    #[test]
    fn test_calculation_idempotent(
        price in 0u32..10_000_000u32,
        credit in 0u32..10_000_000u32,
        pct_bp in 1u32..=10_000u32,
    ) {
        let a = calculate(cents(price), cents(credit), Some(ratio(pct_bp)));
        let b = calculate(cents(price), cents(credit), Some(ratio(pct_bp)));
        prop_assert_eq!(a, b);
    }

    /// Property: outputs are never negative for valid inputs
    #[test]
    fn test_outputs_non_negative(
        price in 0u32..10_000_000u32,
        credit in 0u32..20_000_000u32,
        pct_bp in 1u32..=10_000u32,
    ) {
        let calc = calculate(cents(price), cents(credit), Some(ratio(pct_bp)));
        prop_assert!(calc.customer_pays >= Decimal::ZERO);
        prop_assert!(calc.pro_payout >= Decimal::ZERO);
        prop_assert!(calc.platform_fee >= Decimal::ZERO);
    }

    /// Property: a validated settlement always conserves the job price
    #[test]
    fn test_settlement_conserves_unconditionally(
        price in 0u32..10_000_000u32,
        credit in 0u32..20_000_000u32,
        pct_bp in 1u32..=10_000u32,
    ) {
        let engine = PricingEngine::default();
        let request = SettlementRequest::new(cents(price))
            .with_credit(cents(credit))
            .with_payout_percentage(ratio(pct_bp));
        let settlement = engine.settle(&request).unwrap();
        let calc = settlement.calculation;

        prop_assert_eq!(
            calc.pro_payout + calc.platform_fee + calc.referral_credit_applied - settlement.subsidy(),
            calc.job_price
        );
        prop_assert_eq!(
            calc.referral_credit_applied + settlement.unapplied_credit,
            cents(credit)
        );
        prop_assert!(engine.verifier().verify_settlement(&settlement).valid);
    }
}
