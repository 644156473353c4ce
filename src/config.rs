//! Configuration types for commission-pricing

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pricing::{default_tiers, RoundingPolicy, TierRate, DEFAULT_PRO_PAYOUT_PCT, DEFAULT_TOLERANCE};
use crate::telemetry::LogFormat;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Pricing engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Payout rate used when neither a rate nor a tier is given
    #[serde(default = "default_payout_pct")]
    pub default_payout_pct: Decimal,

    /// Rounding granularity for payouts
    #[serde(default)]
    pub rounding: RoundingPolicy,

    /// Verifier tolerance for rounding noise
    #[serde(default = "default_tolerance")]
    pub tolerance: Decimal,

    /// Payout rate per dispatch cascade tier
    #[serde(default = "default_tiers")]
    pub tiers: Vec<TierRate>,
}

fn default_payout_pct() -> Decimal {
    DEFAULT_PRO_PAYOUT_PCT
}
fn default_tolerance() -> Decimal {
    DEFAULT_TOLERANCE
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            default_payout_pct: DEFAULT_PRO_PAYOUT_PCT,
            rounding: RoundingPolicy::WholeUnit,
            tolerance: DEFAULT_TOLERANCE,
            tiers: default_tiers(),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
