//! Quote command implementation

use clap::Args;
use rust_decimal::Decimal;

use super::{format_calculation, format_settlement, format_verification, OutputFormat};
use crate::config::Config;
use crate::pricing::{PricingEngine, SettlementRequest};

#[derive(Args, Debug)]
pub struct QuoteArgs {
    /// Nominal job price
    #[arg(long)]
    pub job_price: Decimal,

    /// Referral credit toward the job
    #[arg(long, default_value = "0")]
    pub credit: Decimal,

    /// Explicit payout rate (overrides --tier)
    #[arg(long)]
    pub payout_pct: Option<Decimal>,

    /// Dispatch cascade tier the pro accepted the job at
    #[arg(long)]
    pub tier: Option<u8>,

    /// Validate inputs and report subsidies explicitly
    #[arg(long)]
    pub strict: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

impl QuoteArgs {
    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let engine = PricingEngine::from_config(&config.pricing)?;
        let verifier = engine.verifier();

        if self.strict {
            let request = SettlementRequest {
                job_price: self.job_price,
                referral_credit: self.credit,
                pro_payout_percentage: self.payout_pct,
                cascade_tier: self.tier,
            };
            let settlement = engine.settle(&request)?;
            let verification = verifier.verify_settlement(&settlement);

            match self.format {
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "settlement": settlement,
                        "verification": verification,
                    }))?
                ),
                OutputFormat::Table => print!(
                    "{}{}",
                    format_settlement(&settlement),
                    format_verification(&verification)
                ),
            }
            return Ok(());
        }

        let pct = match (self.payout_pct, self.tier) {
            (Some(pct), _) => Some(pct),
            (None, Some(tier)) => Some(engine.schedule().rate_for_tier(tier)?),
            (None, None) => None,
        };
        let calculation = engine.calculate(self.job_price, self.credit, pct);
        let verification = verifier.verify(&calculation);
        if !verification.valid {
            tracing::warn!(
                errors = verification.errors.len(),
                "Quote does not satisfy pricing invariants"
            );
        }

        match self.format {
            OutputFormat::Json => println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "calculation": calculation,
                    "verification": verification,
                }))?
            ),
            OutputFormat::Table => print!(
                "{}{}",
                format_calculation(&calculation),
                format_verification(&verification)
            ),
        }
        Ok(())
    }
}
