//! Core traits for injectable dispatch behavior
//!
//! The dispatch engine never reaches for an ambient random generator. Every
//! roll, market adjustment and id suffix comes from a `RandomSource` handed to
//! the engine at construction time, so tests can script the outcome of each
//! stage and runs can be reproduced from a seed.

use rust_decimal::Decimal;

/// Source of every random decision made during a dispatch
///
/// Implementations must be shareable across concurrently running dispatch
/// tasks, hence `&self` receivers and the `Send + Sync` bound.
pub trait RandomSource: Send + Sync {
    /// Return `true` with the given probability
    ///
    /// Probabilities outside `0.0..=1.0` are clamped.
    fn roll(&self, probability: f64) -> bool;

    /// Draw a market adjustment uniformly from `[-bound, +bound]` in whole cents
    fn market_adjustment(&self, bound: Decimal) -> Decimal;

    /// Draw a random suffix for booking and transaction ids
    fn token(&self) -> u32;
}
