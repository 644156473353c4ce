//! CLI interface for commission-pricing
//!
//! Provides subcommands for:
//! - `quote`: Price a job
//! - `verify`: Check a stored calculation
//! - `audit`: Reconcile a ledger of calculations
//! - `config`: Show the effective configuration

mod audit;
mod quote;
mod verify;

pub use audit::AuditArgs;
pub use quote::QuoteArgs;
pub use verify::VerifyArgs;

use clap::{Parser, Subcommand, ValueEnum};

use crate::pricing::{PricingCalculation, Settlement, SettlementOutcome, VerificationResult};

#[derive(Parser, Debug)]
#[command(name = "commission-pricing")]
#[command(about = "Referral-adjusted commission pricing for job settlement")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Price a job
    Quote(QuoteArgs),
    /// Check a stored calculation
    Verify(VerifyArgs),
    /// Reconcile a ledger of calculations
    Audit(AuditArgs),
    /// Show the effective configuration
    Config,
}

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

fn format_calculation(calc: &PricingCalculation) -> String {
    format!(
        r#"Job Price:          {}
Referral Credit:    {}
Customer Pays:      {}
Pro Payout:         {} ({}%)
Platform Fee:       {}
"#,
        calc.job_price,
        calc.referral_credit_applied,
        calc.customer_pays,
        calc.pro_payout,
        calc.pro_payout_percentage.saturating_mul(rust_decimal_macros::dec!(100)),
        calc.platform_fee,
    )
}

fn format_settlement(settlement: &Settlement) -> String {
    let mut out = format_calculation(&settlement.calculation);
    match settlement.outcome {
        SettlementOutcome::Settled { .. } => out.push_str("Outcome:            settled\n"),
        SettlementOutcome::Subsidized { subsidy_amount } => {
            out.push_str(&format!("Outcome:            subsidized ({})\n", subsidy_amount))
        }
    }
    if !settlement.unapplied_credit.is_zero() {
        out.push_str(&format!(
            "Unapplied Credit:   {}\n",
            settlement.unapplied_credit
        ));
    }
    out
}

fn format_verification(result: &VerificationResult) -> String {
    if result.valid {
        return "Verification:       passed\n".to_string();
    }
    let mut out = format!("Verification:       FAILED ({})\n", result.errors.len());
    for error in &result.errors {
        out.push_str(&format!("  - {}\n", error));
    }
    out
}
