//! Audit command implementation

use anyhow::Context;
use clap::Args;
use std::path::PathBuf;

use super::OutputFormat;
use crate::audit::audit_file;
use crate::config::Config;
use crate::pricing::PricingEngine;
use crate::telemetry;

#[derive(Args, Debug)]
pub struct AuditArgs {
    /// JSON-lines file of historical calculations
    #[arg(long)]
    pub input: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Write Prometheus metrics for this run to a file
    #[arg(long)]
    pub metrics_out: Option<PathBuf>,
}

impl AuditArgs {
    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let verifier = PricingEngine::from_config(&config.pricing)?.verifier();
        tracing::info!("Auditing {:?}...", self.input);

        let report = match &self.metrics_out {
            Some(path) => {
                let recorder = telemetry::build_prometheus_recorder();
                let report = metrics::with_local_recorder(&recorder, || {
                    audit_file(&verifier, &self.input)
                })?;
                std::fs::write(path, recorder.handle().render())
                    .with_context(|| format!("Failed to write metrics to {}", path.display()))?;
                report
            }
            None => audit_file(&verifier, &self.input)?,
        };

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            OutputFormat::Table => print!("{}", report.format_table()),
        }

        if !report.is_clean() {
            anyhow::bail!(
                "{} record(s) failed, {} unreadable",
                report.records_failed,
                report.unreadable_records
            );
        }
        Ok(())
    }
}
