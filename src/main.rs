use clap::Parser;
use commission_pricing::cli::{Cli, Commands};
use commission_pricing::config::Config;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
        eprintln!("Using default configuration");
        Config::default()
    });

    // Initialize telemetry
    let _telemetry = commission_pricing::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Quote(args) => {
            tracing::debug!("Pricing job");
            args.execute(&config)?;
        }
        Commands::Verify(args) => {
            tracing::debug!("Verifying calculation");
            args.execute(&config)?;
        }
        Commands::Audit(args) => {
            tracing::info!("Starting audit");
            args.execute(&config)?;
        }
        Commands::Config => {
            println!("Current configuration:");
            println!(
                "  Default payout: {}%",
                config.pricing.default_payout_pct.saturating_mul(rust_decimal_macros::dec!(100))
            );
            println!("  Rounding: {}", config.pricing.rounding.name());
            println!("  Tolerance: {}", config.pricing.tolerance);
            for tier in &config.pricing.tiers {
                println!(
                    "  Tier {}: {}%",
                    tier.tier,
                    tier.rate.saturating_mul(rust_decimal_macros::dec!(100))
                );
            }
            println!(
                "  Logging: {} ({:?})",
                config.telemetry.log_level, config.telemetry.log_format
            );
        }
    }

    Ok(())
}
