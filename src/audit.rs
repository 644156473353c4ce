//! Reconciliation audit
//!
//! Re-runs the invariant verifier over historical pricing records to catch
//! drift from schema or rounding changes, and totals the subsidy that
//! clamped platform fees hide.

use anyhow::Context;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io::BufRead;
use std::path::Path;

use crate::pricing::{InvariantVerifier, Money, PricingCalculation};
use crate::telemetry::{self, CounterMetric, GaugeMetric};

/// One record that did not pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditFailure {
    /// 1-based line (or position) of the record
    pub line: usize,
    pub errors: Vec<String>,
}

/// Summary of an audit run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    pub generated_at: DateTime<Utc>,
    /// Records parsed and verified
    pub records_checked: usize,
    /// Verified records with at least one violation
    pub records_failed: usize,
    /// Lines that could not be parsed
    pub unreadable_records: usize,
    /// Sum of payout in excess of customer charge across all records
    pub unrecorded_subsidy_total: Money,
    pub failures: Vec<AuditFailure>,
}

impl AuditReport {
    /// True when every record parsed and verified
    pub fn is_clean(&self) -> bool {
        self.records_failed == 0 && self.unreadable_records == 0
    }

    /// Format as table for CLI output
    pub fn format_table(&self) -> String {
        let mut out = format!(
            r#"
══════════════════════════════════════════════════════
               PRICING AUDIT
══════════════════════════════════════════════════════
Generated:          {}
Records Checked:    {}
Records Failed:     {}
Unreadable:         {}
Unrecorded Subsidy: {:.2}
"#,
            self.generated_at.to_rfc3339(),
            self.records_checked,
            self.records_failed,
            self.unreadable_records,
            self.unrecorded_subsidy_total,
        );

        if !self.failures.is_empty() {
            out.push_str("\nFAILURES\n───────────────────────────────────────────────────────\n");
            for failure in &self.failures {
                for error in &failure.errors {
                    out.push_str(&format!("line {:>5}: {}\n", failure.line, error));
                }
            }
        }
        out.push_str("══════════════════════════════════════════════════════\n");
        out
    }
}

/// Accumulates verification results record by record
struct Auditor<'a> {
    verifier: &'a InvariantVerifier,
    records_checked: usize,
    records_failed: usize,
    unreadable_records: usize,
    unrecorded_subsidy_total: Money,
    failures: Vec<AuditFailure>,
}

impl<'a> Auditor<'a> {
    fn new(verifier: &'a InvariantVerifier) -> Self {
        Self {
            verifier,
            records_checked: 0,
            records_failed: 0,
            unreadable_records: 0,
            unrecorded_subsidy_total: Decimal::ZERO,
            failures: Vec::new(),
        }
    }

    fn record(&mut self, line: usize, calc: &PricingCalculation) {
        self.records_checked += 1;
        self.unrecorded_subsidy_total = self
            .unrecorded_subsidy_total
            .checked_add(calc.unrecorded_subsidy())
            .unwrap_or_else(|| {
                tracing::warn!(line, "Unrecorded subsidy total out of range, saturating");
                Decimal::MAX
            });

        let result = self.verifier.verify(calc);
        if !result.valid {
            self.records_failed += 1;
            tracing::warn!(
                line,
                job_price = %calc.job_price,
                errors = result.errors.len(),
                "Pricing record failed verification"
            );
            self.failures.push(AuditFailure {
                line,
                errors: result.errors,
            });
        }
    }

    fn unreadable(&mut self, line: usize, err: &serde_json::Error) {
        self.unreadable_records += 1;
        tracing::warn!(line, error = %err, "Unreadable pricing record");
        self.failures.push(AuditFailure {
            line,
            errors: vec![format!("Unreadable record: {}", err)],
        });
    }

    fn finish(self) -> AuditReport {
        telemetry::increment(CounterMetric::AuditRecords, self.records_checked as u64);
        telemetry::increment(CounterMetric::AuditFailures, self.records_failed as u64);
        telemetry::increment(CounterMetric::AuditUnreadable, self.unreadable_records as u64);
        telemetry::set_gauge(
            GaugeMetric::UnrecordedSubsidy,
            self.unrecorded_subsidy_total.to_f64().unwrap_or_default(),
        );

        tracing::info!(
            checked = self.records_checked,
            failed = self.records_failed,
            unreadable = self.unreadable_records,
            subsidy = %self.unrecorded_subsidy_total,
            "Audit complete"
        );

        AuditReport {
            generated_at: Utc::now(),
            records_checked: self.records_checked,
            records_failed: self.records_failed,
            unreadable_records: self.unreadable_records,
            unrecorded_subsidy_total: self.unrecorded_subsidy_total,
            failures: self.failures,
        }
    }
}

/// Audit an in-memory batch; failure lines are 1-based positions
pub fn audit_calculations(
    verifier: &InvariantVerifier,
    calculations: &[PricingCalculation],
) -> AuditReport {
    let mut auditor = Auditor::new(verifier);
    for (i, calc) in calculations.iter().enumerate() {
        auditor.record(i + 1, calc);
    }
    auditor.finish()
}

/// Audit JSON-lines records
///
/// Blank lines are skipped. A line that does not parse is reported as a
/// failure and the audit continues; only I/O errors abort.
pub fn audit_reader<R: BufRead>(
    verifier: &InvariantVerifier,
    reader: R,
) -> anyhow::Result<AuditReport> {
    let mut auditor = Auditor::new(verifier);

    for (i, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", i + 1))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match serde_json::from_str::<PricingCalculation>(trimmed) {
            Ok(calc) => auditor.record(i + 1, &calc),
            Err(e) => auditor.unreadable(i + 1, &e),
        }
    }

    Ok(auditor.finish())
}

/// Audit a JSON-lines file
pub fn audit_file(
    verifier: &InvariantVerifier,
    path: impl AsRef<Path>,
) -> anyhow::Result<AuditReport> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    audit_reader(verifier, std::io::BufReader::new(file))
}
