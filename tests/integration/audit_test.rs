//! Integration tests for the reconciliation audit

use commission_pricing::audit::audit_file;
use commission_pricing::pricing::{calculate, InvariantVerifier, PricingCalculation};
use rust_decimal_macros::dec;
use std::io::Write;

fn write_ledger(records: &[PricingCalculation]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for record in records {
        writeln!(file, "{}", serde_json::to_string(record).unwrap()).unwrap();
    }
    file
}

#[test]
fn test_audit_clean_ledger() {
    let ledger = write_ledger(&[
        calculate(dec!(300), dec!(0), None),
        calculate(dec!(300), dec!(25), None),
        calculate(dec!(149), dec!(10), None),
    ]);

    let report = audit_file(&InvariantVerifier::default(), ledger.path()).unwrap();
    assert!(report.is_clean());
    assert_eq!(report.records_checked, 3);
    assert!(report.failures.is_empty());
}

#[test]
fn test_audit_detects_drift_and_subsidy() {
    let mut drifted = calculate(dec!(300), dec!(25), None);
    drifted.pro_payout = dec!(254);

    let ledger = write_ledger(&[
        calculate(dec!(300), dec!(25), None),
        drifted,
        calculate(dec!(100), dec!(25), None),
        calculate(dec!(80), dec!(20), None),
    ]);

    let report = audit_file(&InvariantVerifier::default(), ledger.path()).unwrap();
    assert_eq!(report.records_checked, 4);
    assert_eq!(report.records_failed, 3);
    assert_eq!(
        report.failures.iter().map(|f| f.line).collect::<Vec<_>>(),
        vec![2, 3, 4]
    );
    // 100/25: 85 - 75 = 10; 80/20: 68 - 60 = 8
    assert_eq!(report.unrecorded_subsidy_total, dec!(18));
}

#[test]
fn test_audit_with_cent_rounding() {
    use commission_pricing::pricing::{PricingEngine, RoundingPolicy};

    let engine =
        PricingEngine::new(RoundingPolicy::Cent, dec!(0.01), Default::default()).unwrap();
    let ledger = write_ledger(&[engine.calculate(dec!(129.99), dec!(5), None)]);

    let cent_report = audit_file(&engine.verifier(), ledger.path()).unwrap();
    assert!(cent_report.is_clean());

    let whole_report = audit_file(&InvariantVerifier::default(), ledger.path()).unwrap();
    assert_eq!(whole_report.records_failed, 1);
}
