//! commission-pricing: Referral-adjusted commission pricing for job settlement
//!
//! This library provides the core components for:
//! - Pricing a job so the pro payout is a fixed share of the job price
//! - Funding referral credits from the platform margin
//! - Validated settlement with explicit platform subsidies
//! - Invariant verification of pricing records
//! - Reconciliation audits over historical records
//! - Configuration, logging and metrics

pub mod audit;
pub mod cli;
pub mod config;
pub mod pricing;
pub mod telemetry;
