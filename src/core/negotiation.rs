//! Rate negotiation
//!
//! The agreed rate starts at the midpoint between the carrier's base rate and
//! the shipper's requested rate, moves by a random market adjustment, is
//! rounded to a whole currency unit and is finally raised to the carrier's
//! floor (`ceil(base_rate × rate_floor_ratio)`) if it fell below it.

use crate::core::config::DispatchConfig;
use crate::core::traits::RandomSource;
use rust_decimal::{Decimal, RoundingStrategy};

/// Lowest whole rate the carrier accepts
pub fn rate_floor(base_rate: Decimal, rate_floor_ratio: Decimal) -> Decimal {
    (base_rate * rate_floor_ratio).ceil()
}

/// Negotiate with a known market adjustment
pub fn negotiate_with_adjustment(
    base_rate: Decimal,
    requested_rate: Decimal,
    adjustment: Decimal,
    rate_floor_ratio: Decimal,
) -> Decimal {
    let midpoint = (base_rate + requested_rate) / Decimal::TWO;
    let negotiated = (midpoint + adjustment)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    negotiated.max(rate_floor(base_rate, rate_floor_ratio))
}

/// Negotiate a final rate, drawing the market adjustment from `random`
pub fn negotiate(
    base_rate: Decimal,
    requested_rate: Decimal,
    config: &DispatchConfig,
    random: &dyn RandomSource,
) -> Decimal {
    let adjustment = random.market_adjustment(config.max_market_adjustment);
    negotiate_with_adjustment(base_rate, requested_rate, adjustment, config.rate_floor_ratio)
}
