//! Random source implementations
//!
//! - `SeededRandom` wraps a `StdRng` behind a mutex. Seed it for reproducible
//!   runs or build it from entropy for normal use.
//! - `FixedRandom` answers every call with scripted values; it drives the
//!   deterministic tests and demos.

use crate::core::traits::RandomSource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

/// Seedable random source backed by `StdRng`
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    /// Deterministic source; two instances with the same seed produce the same draws
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Non-reproducible source seeded from the operating system
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        // A poisoned lock only means another task panicked mid-draw; the
        // generator state is still usable.
        let mut guard = self
            .rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }
}

impl RandomSource for SeededRandom {
    fn roll(&self, probability: f64) -> bool {
        let probability = if probability.is_nan() {
            0.0
        } else {
            probability.clamp(0.0, 1.0)
        };
        self.with_rng(|rng| rng.gen_bool(probability))
    }

    fn market_adjustment(&self, bound: Decimal) -> Decimal {
        // Bounds past i64 cents saturate instead of collapsing to zero
        let cents = bound
            .abs()
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|cents| cents.trunc().to_i64())
            .unwrap_or(i64::MAX);
        if cents == 0 {
            return Decimal::ZERO;
        }
        let drawn = self.with_rng(|rng| rng.gen_range(-cents..=cents));
        Decimal::new(drawn, 2)
    }

    fn token(&self) -> u32 {
        self.with_rng(|rng| rng.gen())
    }
}

/// Scripted random source
///
/// Every roll returns the same answer, every market adjustment the same amount
/// (clamped to the requested bound), and tokens count up from 1.
#[derive(Debug)]
pub struct FixedRandom {
    roll: bool,
    adjustment: Decimal,
    next_token: AtomicU32,
}

impl FixedRandom {
    pub fn new(roll: bool, adjustment: Decimal) -> Self {
        Self {
            roll,
            adjustment,
            next_token: AtomicU32::new(1),
        }
    }

    /// Every roll succeeds and the market never moves
    pub fn always_succeed() -> Self {
        Self::new(true, Decimal::ZERO)
    }

    /// Every roll fails
    pub fn always_fail() -> Self {
        Self::new(false, Decimal::ZERO)
    }
}

impl RandomSource for FixedRandom {
    fn roll(&self, _probability: f64) -> bool {
        self.roll
    }

    fn market_adjustment(&self, bound: Decimal) -> Decimal {
        let bound = bound.abs();
        self.adjustment.clamp(-bound, bound)
    }

    fn token(&self) -> u32 {
        self.next_token.fetch_add(1, Ordering::Relaxed)
    }
}
