//! Pricing module
//!
//! Referral-adjusted commission pricing and the invariant checks that
//! keep it honest.

mod calculator;
mod payout;
mod rounding;
mod types;
mod verifier;

pub use calculator::{calculate, calculate_with, PricingEngine};
pub use payout::{check_rate, default_tiers, PayoutSchedule, TierRate};
pub use rounding::RoundingPolicy;
pub use types::{
    PricingCalculation, PricingError, Settlement, SettlementOutcome, SettlementRequest,
};
pub use verifier::{verify, InvariantVerifier, VerificationResult};

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Currency amount
pub type Money = Decimal;

/// Fraction in [0, 1]
pub type Ratio = Decimal;

/// Payout rate when none is given: 85% of the job price
pub const DEFAULT_PRO_PAYOUT_PCT: Ratio = dec!(0.85);

/// Largest job price or credit the validated engine accepts
pub const MAX_AMOUNT: Money = dec!(1000000000000);

/// Differences at or below this are rounding noise
pub const DEFAULT_TOLERANCE: Decimal = dec!(0.01);
