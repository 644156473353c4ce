//! Verify command implementation

use anyhow::Context;
use clap::Args;
use std::path::PathBuf;

use super::{format_verification, OutputFormat};
use crate::config::Config;
use crate::pricing::{PricingCalculation, PricingEngine, Settlement};

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// JSON file holding one calculation
    #[arg(long)]
    pub input: PathBuf,

    /// Input is a settlement rather than a bare calculation
    #[arg(long)]
    pub settlement: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

impl VerifyArgs {
    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let verifier = PricingEngine::from_config(&config.pricing)?.verifier();
        let content = std::fs::read_to_string(&self.input)
            .with_context(|| format!("Failed to read {}", self.input.display()))?;

        let result = if self.settlement {
            let settlement: Settlement = serde_json::from_str(&content)
                .with_context(|| format!("Invalid settlement in {}", self.input.display()))?;
            verifier.verify_settlement(&settlement)
        } else {
            let calculation: PricingCalculation = serde_json::from_str(&content)
                .with_context(|| format!("Invalid calculation in {}", self.input.display()))?;
            verifier.verify(&calculation)
        };

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
            OutputFormat::Table => print!("{}", format_verification(&result)),
        }

        if !result.valid {
            anyhow::bail!("{} invariant violation(s)", result.errors.len());
        }
        Ok(())
    }
}
