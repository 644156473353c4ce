//! Integration tests for the pricing calculator and verifier

use commission_pricing::pricing::{
    calculate, verify, PricingEngine, PricingError, SettlementOutcome, SettlementRequest,
};
use rust_decimal_macros::dec;

#[test]
fn test_zero_credit_boundary() {
    let calc = calculate(dec!(300), dec!(0), Some(dec!(0.85)));
    assert_eq!(calc.pro_payout, dec!(255));
    assert_eq!(calc.customer_pays, dec!(300));
    assert_eq!(calc.platform_fee, dec!(45));
    assert_eq!(calc.referral_credit_applied, dec!(0));
    assert!(verify(&calc).valid);
}

#[test]
fn test_moderate_credit_boundary() {
    let calc = calculate(dec!(300), dec!(25), Some(dec!(0.85)));
    assert_eq!(calc.pro_payout, dec!(255));
    assert_eq!(calc.customer_pays, dec!(275));
    assert_eq!(calc.platform_fee, dec!(20));
    assert!(verify(&calc).valid);
}

#[test]
fn test_over_credit_discrepancy_equals_subsidy() {
    let calc = calculate(dec!(100), dec!(25), Some(dec!(0.85)));
    assert_eq!(calc.pro_payout, dec!(85));
    assert_eq!(calc.customer_pays, dec!(75));
    assert_eq!(calc.platform_fee, dec!(0));

    // 85 + 0 + 25 = 110: the clamp hides a 10 subsidy
    let total = calc.pro_payout + calc.platform_fee + calc.referral_credit_applied;
    assert_eq!(total, dec!(110));
    assert_eq!(total - calc.job_price, calc.pro_payout - calc.customer_pays);
    assert_eq!(calc.unrecorded_subsidy(), dec!(10));
    assert!(!verify(&calc).valid);
}

#[test]
fn test_payout_independent_of_credit() {
    let payouts: Vec<_> = [dec!(0), dec!(10), dec!(250), dec!(1000)]
        .into_iter()
        .map(|credit| calculate(dec!(300), credit, None).pro_payout)
        .collect();
    assert!(payouts.iter().all(|p| *p == dec!(255)));
}

#[test]
fn test_calculation_is_idempotent() {
    let a = calculate(dec!(187.50), dec!(12.25), Some(dec!(0.9)));
    let b = calculate(dec!(187.50), dec!(12.25), Some(dec!(0.9)));
    assert_eq!(a, b);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn test_verifier_flags_corrupted_payout() {
    let mut calc = calculate(dec!(300), dec!(25), None);
    calc.pro_payout -= dec!(1);

    let result = verify(&calc);
    assert!(!result.valid);
    assert!(result.errors.iter().any(|e| e.contains("proPayout")));
}

#[test]
fn test_verifier_flags_corrupted_fee() {
    let mut calc = calculate(dec!(300), dec!(25), None);
    calc.platform_fee = dec!(25);

    let result = verify(&calc);
    assert!(!result.valid);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("platformFee (25)"));
}

#[test]
fn test_unvalidated_inputs_do_not_panic() {
    let calc = calculate(dec!(-50), dec!(0), Some(dec!(1.5)));
    assert_eq!(calc.customer_pays, dec!(0));
    assert_eq!(calc.pro_payout, dec!(-75));
    assert_eq!(calc.platform_fee, dec!(75));
}

#[test]
fn test_strict_settlement_over_credit() {
    let engine = PricingEngine::default();
    let settlement = engine
        .settle(&SettlementRequest::new(dec!(100)).with_credit(dec!(25)))
        .unwrap();

    assert_eq!(
        settlement.outcome,
        SettlementOutcome::Subsidized {
            subsidy_amount: dec!(10)
        }
    );
    let calc = settlement.calculation;
    assert_eq!(
        calc.pro_payout + calc.platform_fee + calc.referral_credit_applied - settlement.subsidy(),
        calc.job_price
    );
    assert!(engine.verifier().verify_settlement(&settlement).valid);
}

#[test]
fn test_strict_settlement_rejects_invalid_input() {
    let engine = PricingEngine::default();
    let err = engine
        .settle(&SettlementRequest::new(dec!(100)).with_payout_percentage(dec!(1.1)))
        .unwrap_err();
    assert_eq!(
        err,
        PricingError::InvalidInput {
            field: "pro_payout_percentage",
            value: dec!(1.1),
            reason: "must be within (0, 1]",
        }
    );
}

#[test]
fn test_settlement_json_shape() {
    let engine = PricingEngine::default();
    let settlement = engine
        .settle(&SettlementRequest::new(dec!(300)).with_credit(dec!(25)))
        .unwrap();
    let json = serde_json::to_value(settlement).unwrap();

    assert_eq!(json["outcome"]["status"], "settled");
    assert!(json["outcome"].get("platformFee").is_some());
    assert!(json["calculation"].get("customerPays").is_some());
    assert!(json.get("unappliedCredit").is_some());
}
