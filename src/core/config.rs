//! Dispatch configuration
//!
//! The probabilities, market variance, rate floor, platform fee and processing
//! delay used by the dispatch engine. Defaults reproduce the demo platform's behavior; any
//! invalid override is replaced by its default with a warning.

use rust_decimal::Decimal;
use std::time::Duration;
use tracing::warn;

/// Largest accepted market adjustment, in currency units
pub const MARKET_ADJUSTMENT_CAP: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Tunable constants for one dispatch engine
#[derive(Clone, Debug, PartialEq)]
pub struct DispatchConfig {
    /// Probability that the selected carrier accepts the booking
    pub booking_success_probability: f64,
    /// Probability that the simulated payment goes through
    pub payment_success_probability: f64,
    /// Largest market adjustment applied during negotiation, in currency units
    pub max_market_adjustment: Decimal,
    /// Fraction of the carrier's base rate below which no rate is accepted
    pub rate_floor_ratio: Decimal,
    /// Fraction of each accepted payment kept by the platform
    pub platform_fee_ratio: Decimal,
    /// Simulated payment gateway latency
    pub processing_delay: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            booking_success_probability: 0.9,
            payment_success_probability: 0.95,
            max_market_adjustment: Decimal::new(200, 0),
            rate_floor_ratio: Decimal::new(9, 1),
            platform_fee_ratio: Decimal::new(3, 2),
            processing_delay: Duration::from_millis(1000),
        }
    }
}

impl DispatchConfig {
    /// Create a DispatchConfig with custom values
    ///
    /// Probabilities must lie in `0.0..=1.0`, the market adjustment must not be
    /// negative and both ratios must lie in `0..=1`. Values outside those
    /// ranges fall back to the defaults. A market adjustment above
    /// [`MARKET_ADJUSTMENT_CAP`] is lowered to the cap.
    pub fn new(
        booking_success_probability: f64,
        payment_success_probability: f64,
        max_market_adjustment: Decimal,
        rate_floor_ratio: Decimal,
        platform_fee_ratio: Decimal,
        processing_delay: Duration,
    ) -> Self {
        let default = Self::default();

        let booking_success_probability = valid_probability(
            "booking_success_probability",
            booking_success_probability,
            default.booking_success_probability,
        );
        let payment_success_probability = valid_probability(
            "payment_success_probability",
            payment_success_probability,
            default.payment_success_probability,
        );

        let max_market_adjustment = if max_market_adjustment.is_sign_negative() {
            warn!(
                value = %max_market_adjustment,
                default = %default.max_market_adjustment,
                "Invalid max_market_adjustment, using default"
            );
            default.max_market_adjustment
        } else if max_market_adjustment > MARKET_ADJUSTMENT_CAP {
            warn!(
                value = %max_market_adjustment,
                cap = %MARKET_ADJUSTMENT_CAP,
                "max_market_adjustment too large, using cap"
            );
            MARKET_ADJUSTMENT_CAP
        } else {
            max_market_adjustment
        };

        let rate_floor_ratio =
            valid_ratio("rate_floor_ratio", rate_floor_ratio, default.rate_floor_ratio);
        let platform_fee_ratio = valid_ratio(
            "platform_fee_ratio",
            platform_fee_ratio,
            default.platform_fee_ratio,
        );

        Self {
            booking_success_probability,
            payment_success_probability,
            max_market_adjustment,
            rate_floor_ratio,
            platform_fee_ratio,
            processing_delay,
        }
    }

    /// Configuration that never fails a roll, never moves the market and never waits
    pub fn deterministic() -> Self {
        Self {
            booking_success_probability: 1.0,
            payment_success_probability: 1.0,
            max_market_adjustment: Decimal::ZERO,
            processing_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

fn valid_probability(name: &str, value: f64, default: f64) -> f64 {
    if (0.0..=1.0).contains(&value) {
        value
    } else {
        warn!(field = name, value, default, "Invalid probability, using default");
        default
    }
}

fn valid_ratio(name: &str, value: Decimal, default: Decimal) -> Decimal {
    if value < Decimal::ZERO || value > Decimal::ONE {
        warn!(field = name, value = %value, default = %default, "Invalid ratio, using default");
        default
    } else {
        value
    }
}
