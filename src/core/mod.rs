//! Core business logic module
//!
//! This module contains the dispatch components, leaves first:
//! - `traits` - Injectable random source
//! - `random` - Seeded and scripted random sources
//! - `config` - Probabilities, market variance, rate floor and gateway delay
//! - `registry` - Thread-safe carrier registry
//! - `regions` - State-to-region table used for coverage matching
//! - `matching` - Equipment, coverage and auto-booking filter
//! - `scoring` - Candidate scoring and ranking
//! - `negotiation` - Final rate negotiation
//! - `transaction` - Simulated payment gateway
//! - `stats` - Dispatch counters
//! - `engine` - Dispatch orchestration

pub mod config;
pub mod engine;
pub mod matching;
pub mod negotiation;
pub mod random;
pub mod regions;
pub mod registry;
pub mod scoring;
pub mod stats;
pub mod traits;
pub mod transaction;

pub use config::DispatchConfig;
pub use engine::DispatchEngine;
pub use random::{FixedRandom, SeededRandom};
pub use registry::CarrierRegistry;
pub use scoring::ScoredCarrier;
pub use stats::{DispatchStats, DispatchSummary};
pub use traits::RandomSource;
pub use transaction::{TransactionReceipt, TransactionRequest, TransactionSimulator};
