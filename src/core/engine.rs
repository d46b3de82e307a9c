//! Dispatch orchestration
//!
//! This module provides the `DispatchEngine`, which runs one shipment through
//! the dispatch stages:
//!
//! ```text
//! Received → Filtering → Scoring → Negotiating → Booking → Completed
//!     └──────────┴──────────┴────────────┴───────────┴─────→ Failed
//! ```
//!
//! - **Received**: validate the shipment
//! - **Filtering**: match registry carriers on equipment, coverage and auto-booking
//! - **Scoring**: rank the matches, pick the best, roll for the carrier's acceptance
//! - **Negotiating**: agree a final rate
//! - **Booking**: run the payment through the transaction simulator and issue ids
//!
//! Every failure is terminal for the attempt and nothing is retried. The engine
//! reads from the shared `CarrierRegistry` but never writes to it, so any number
//! of dispatches may run concurrently on the same engine.

use crate::core::config::DispatchConfig;
use crate::core::matching::match_carriers;
use crate::core::negotiation::negotiate;
use crate::core::registry::CarrierRegistry;
use crate::core::scoring::select_best;
use crate::core::stats::{DispatchStats, DispatchSummary};
use crate::core::traits::RandomSource;
use crate::core::transaction::{TransactionReceipt, TransactionRequest, TransactionSimulator};
use crate::types::{DispatchError, DispatchOutcome, DispatchStage, Shipment};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Shipment-to-carrier dispatch orchestrator
///
/// Holds the shared carrier registry, the injected random source and the
/// configuration. The engine can be shared by reference (or `Arc`) across
/// concurrently running dispatch tasks.
pub struct DispatchEngine {
    registry: Arc<CarrierRegistry>,
    random: Arc<dyn RandomSource>,
    config: DispatchConfig,
    simulator: TransactionSimulator,
    /// Sequence used to make booking and transaction ids unique per engine
    sequence: AtomicU64,
    stats: DispatchStats,
}

impl DispatchEngine {
    /// Create a new DispatchEngine
    ///
    /// # Arguments
    ///
    /// * `registry` - Carrier registry shared with whoever manages carriers
    /// * `random` - Source of every random decision the engine makes
    /// * `config` - Probabilities, market variance, rate floor and gateway delay
    pub fn new(
        registry: Arc<CarrierRegistry>,
        random: Arc<dyn RandomSource>,
        config: DispatchConfig,
    ) -> Self {
        let simulator = TransactionSimulator::from_config(&config);
        Self {
            registry,
            random,
            config,
            simulator,
            sequence: AtomicU64::new(0),
            stats: DispatchStats::new(),
        }
    }

    pub fn registry(&self) -> &Arc<CarrierRegistry> {
        &self.registry
    }

    /// Counters accumulated over every dispatch this engine has run
    pub fn stats(&self) -> DispatchSummary {
        self.stats.snapshot()
    }

    /// Dispatch one shipment
    ///
    /// Never fails: errors from any stage, and panics, become a failed
    /// `DispatchOutcome` whose `error_reason` names the failure.
    pub async fn dispatch(&self, shipment: &Shipment) -> DispatchOutcome {
        let result = match AssertUnwindSafe(self.run(shipment)).catch_unwind().await {
            Ok(result) => result,
            Err(panic) => Err(DispatchError::internal(panic_message(panic.as_ref()))),
        };

        match result {
            Ok((outcome, receipt)) => {
                self.stats.record_success(receipt.amount, receipt.fee);
                outcome
            }
            Err(err) => {
                if matches!(err, DispatchError::Internal { .. }) {
                    error!(shipment_id = %shipment.id, error = %err, "Dispatch aborted");
                } else {
                    info!(
                        shipment_id = %shipment.id,
                        kind = err.kind(),
                        error = %err,
                        "Dispatch failed"
                    );
                }
                debug!(shipment_id = %shipment.id, stage = %DispatchStage::Failed);
                self.stats.record_failure(&err);
                DispatchOutcome::failed(err.reason())
            }
        }
    }

    /// Run the stages, stopping at the first error
    async fn run(
        &self,
        shipment: &Shipment,
    ) -> Result<(DispatchOutcome, TransactionReceipt), DispatchError> {
        enter(shipment, DispatchStage::Received);
        shipment.validate()?;

        enter(shipment, DispatchStage::Filtering);
        let candidates = match_carriers(shipment, &self.registry.list());
        if candidates.is_empty() {
            return Err(DispatchError::no_match(&shipment.id));
        }

        enter(shipment, DispatchStage::Scoring);
        let best = select_best(shipment, &candidates)
            .ok_or_else(|| DispatchError::internal("scoring returned no candidate"))?;
        debug!(
            shipment_id = %shipment.id,
            carrier_id = %best.carrier.id,
            score = best.score,
            candidates = candidates.len(),
            "Carrier selected"
        );
        if !self.random.roll(self.config.booking_success_probability) {
            return Err(DispatchError::booking_rejected(&best.carrier.id));
        }

        enter(shipment, DispatchStage::Negotiating);
        let final_rate = negotiate(
            best.carrier.base_rate,
            shipment.requested_rate,
            &self.config,
            self.random.as_ref(),
        );

        enter(shipment, DispatchStage::Booking);
        let request = TransactionRequest {
            amount: final_rate,
            carrier_id: best.carrier.id.clone(),
            shipment_id: shipment.id.clone(),
        };
        let receipt = self
            .simulator
            .process(&request, self.random.as_ref())
            .await?;

        let seq = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let booking_id = format!("BK{:06}-{:08X}", seq, self.random.token());
        let transaction_id = format!("TXN{:06}-{:08X}", seq, self.random.token());

        enter(shipment, DispatchStage::Completed);
        info!(
            shipment_id = %shipment.id,
            carrier_id = %best.carrier.id,
            final_rate = %receipt.amount,
            fee = %receipt.fee,
            booking_id = %booking_id,
            "Shipment dispatched"
        );

        let outcome =
            DispatchOutcome::completed(&best.carrier, receipt.amount, booking_id, transaction_id);
        Ok((outcome, receipt))
    }
}

fn enter(shipment: &Shipment, stage: DispatchStage) {
    debug!(shipment_id = %shipment.id, stage = %stage);
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "dispatch stage panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::random::{FixedRandom, SeededRandom};
    use crate::types::{Carrier, CarrierUpdate};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    fn reference_carrier() -> Carrier {
        Carrier {
            id: "CAR001".to_string(),
            name: "Swift Transport Solutions".to_string(),
            rating: Decimal::new(48, 1),
            equipment_types: vec!["Dry Van".to_string()],
            coverage_regions: vec!["Midwest".to_string()],
            auto_booking_enabled: true,
            base_rate: Decimal::new(1500, 0),
        }
    }

    fn shipment(equipment: &str) -> Shipment {
        Shipment {
            id: "LD1001".to_string(),
            origin: "Chicago, IL".to_string(),
            destination: "Miami, FL".to_string(),
            weight: Decimal::new(42000, 0),
            equipment_type: equipment.to_string(),
            requested_rate: Decimal::new(1600, 0),
            pickup_date: NaiveDate::from_ymd_opt(2024, 3, 1),
            delivery_date: NaiveDate::from_ymd_opt(2024, 3, 4),
        }
    }

    fn engine_with(random: Arc<dyn RandomSource>, config: DispatchConfig) -> DispatchEngine {
        let registry = CarrierRegistry::from_carriers(vec![reference_carrier()]).unwrap();
        DispatchEngine::new(Arc::new(registry), random, config)
    }

    fn deterministic_engine() -> DispatchEngine {
        engine_with(
            Arc::new(FixedRandom::always_succeed()),
            DispatchConfig::deterministic(),
        )
    }

    /// Succeeds the first `successes` rolls, then fails every roll
    struct CountedRolls {
        successes: usize,
        rolls: AtomicUsize,
    }

    impl RandomSource for CountedRolls {
        fn roll(&self, _probability: f64) -> bool {
            self.rolls.fetch_add(1, Ordering::Relaxed) < self.successes
        }

        fn market_adjustment(&self, _bound: Decimal) -> Decimal {
            Decimal::ZERO
        }

        fn token(&self) -> u32 {
            0xABCD
        }
    }

    struct PanickingTokens;

    impl RandomSource for PanickingTokens {
        fn roll(&self, _probability: f64) -> bool {
            true
        }

        fn market_adjustment(&self, _bound: Decimal) -> Decimal {
            Decimal::ZERO
        }

        fn token(&self) -> u32 {
            panic!("token generator exploded")
        }
    }

    #[tokio::test]
    async fn test_reference_scenario_succeeds() {
        let engine = deterministic_engine();

        let outcome = engine.dispatch(&shipment("Dry Van")).await;

        assert!(outcome.success());
        assert_eq!(outcome.carrier_id(), Some("CAR001"));
        assert_eq!(outcome.carrier_name(), Some("Swift Transport Solutions"));
        assert_eq!(outcome.final_rate(), Some(Decimal::new(1550, 0)));
        assert_eq!(outcome.booking_id(), Some("BK000001-00000001"));
        assert_eq!(outcome.transaction_id(), Some("TXN000001-00000002"));
        assert!(outcome.error_reason().is_none());
        assert_eq!(engine.stats().booked_volume, Decimal::new(1550, 0));
        assert_eq!(engine.stats().fees_collected, Decimal::new(46, 0));
    }

    #[tokio::test]
    async fn test_random_runs_stay_in_reference_range() {
        let engine = engine_with(
            Arc::new(SeededRandom::from_seed(2024)),
            DispatchConfig {
                processing_delay: Duration::ZERO,
                ..DispatchConfig::default()
            },
        );

        let mut successes = 0;
        let mut volume = Decimal::ZERO;
        let mut fees = Decimal::ZERO;
        for _ in 0..200 {
            let outcome = engine.dispatch(&shipment("Dry Van")).await;
            if let Some(rate) = outcome.final_rate() {
                successes += 1;
                volume += rate;
                fees += (rate * Decimal::new(3, 2)).floor();
                assert!(outcome.success());
                assert!(rate >= Decimal::new(1350, 0) && rate <= Decimal::new(1900, 0));
            } else {
                assert!(!outcome.success());
                assert!(outcome.booking_id().is_none());
            }
        }
        assert!(successes > 0);
        assert_eq!(engine.stats().total_processed, 200);
        assert_eq!(engine.stats().successful, successes);
        assert_eq!(engine.stats().booked_volume, volume);
        assert_eq!(engine.stats().fees_collected, fees);
    }

    #[tokio::test]
    async fn test_no_matching_equipment() {
        let engine = deterministic_engine();

        let outcome = engine.dispatch(&shipment("Tanker")).await;

        assert!(!outcome.success());
        assert_eq!(outcome.error_reason(), Some("no suitable carriers found"));
        assert!(outcome.final_rate().is_none());
        assert_eq!(engine.stats().no_match, 1);
    }

    #[tokio::test]
    async fn test_invalid_shipment() {
        let engine = deterministic_engine();
        let invalid = Shipment {
            destination: String::new(),
            ..shipment("Dry Van")
        };

        let outcome = engine.dispatch(&invalid).await;

        assert_eq!(outcome.error_reason(), Some("invalid shipment data"));
        assert_eq!(engine.stats().invalid_input, 1);
    }

    #[tokio::test]
    async fn test_carrier_declines_booking() {
        let engine = engine_with(
            Arc::new(CountedRolls {
                successes: 0,
                rolls: AtomicUsize::new(0),
            }),
            DispatchConfig::deterministic(),
        );

        let outcome = engine.dispatch(&shipment("Dry Van")).await;

        assert_eq!(outcome.error_reason(), Some("carrier booking failed"));
        assert!(outcome.carrier_id().is_none());
        assert_eq!(engine.stats().booking_rejected, 1);
    }

    #[tokio::test]
    async fn test_payment_failure_issues_no_ids() {
        let engine = engine_with(
            Arc::new(CountedRolls {
                successes: 1,
                rolls: AtomicUsize::new(0),
            }),
            DispatchConfig::deterministic(),
        );

        let outcome = engine.dispatch(&shipment("Dry Van")).await;

        assert!(!outcome.success());
        assert_eq!(outcome.error_reason(), Some("transaction processing failed"));
        assert!(outcome.booking_id().is_none());
        assert!(outcome.transaction_id().is_none());
        assert!(outcome.final_rate().is_none());
        assert_eq!(engine.stats().transaction_failed, 1);
        assert_eq!(engine.stats().booked_volume, Decimal::ZERO);
        assert_eq!(engine.stats().fees_collected, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_panic_becomes_internal_error() {
        let engine = engine_with(Arc::new(PanickingTokens), DispatchConfig::deterministic());

        let outcome = engine.dispatch(&shipment("Dry Van")).await;

        assert!(!outcome.success());
        assert_eq!(outcome.error_reason(), Some("internal dispatch service error"));
        assert_eq!(engine.stats().internal, 1);
        assert_eq!(engine.stats().successful, 0);
        assert_eq!(engine.stats().booked_volume, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_disabled_carrier_never_selected() {
        let engine = deterministic_engine();
        engine
            .registry()
            .update(
                "CAR001",
                CarrierUpdate {
                    auto_booking_enabled: Some(false),
                    rating: Some(Decimal::new(5, 0)),
                    ..Default::default()
                },
            )
            .unwrap();

        let outcome = engine.dispatch(&shipment("Dry Van")).await;

        assert_eq!(outcome.error_reason(), Some("no suitable carriers found"));
    }

    #[tokio::test]
    async fn test_dispatch_never_mutates_registry() {
        let engine = engine_with(
            Arc::new(SeededRandom::from_seed(8)),
            DispatchConfig {
                processing_delay: Duration::ZERO,
                ..DispatchConfig::default()
            },
        );
        let before = engine.registry().list();

        for _ in 0..20 {
            engine.dispatch(&shipment("Dry Van")).await;
        }

        assert_eq!(engine.registry().list(), before);
    }

    #[tokio::test]
    async fn test_picks_highest_score_among_matches() {
        let low = Carrier {
            id: "CAR001".to_string(),
            rating: Decimal::new(30, 1),
            ..reference_carrier()
        };
        let high = Carrier {
            id: "CAR002".to_string(),
            name: "Better Freight".to_string(),
            rating: Decimal::new(49, 1),
            ..reference_carrier()
        };
        let registry = CarrierRegistry::from_carriers(vec![low, high]).unwrap();
        let engine = DispatchEngine::new(
            Arc::new(registry),
            Arc::new(FixedRandom::always_succeed()),
            DispatchConfig::deterministic(),
        );

        let outcome = engine.dispatch(&shipment("Dry Van")).await;

        assert_eq!(outcome.carrier_id(), Some("CAR002"));
    }

    #[tokio::test]
    async fn test_ids_are_unique_across_dispatches() {
        let engine = deterministic_engine();

        let first = engine.dispatch(&shipment("Dry Van")).await;
        let second = engine.dispatch(&shipment("Dry Van")).await;

        assert_ne!(first.booking_id(), second.booking_id());
        assert_ne!(first.transaction_id(), second.transaction_id());
        assert!(second.booking_id().unwrap().starts_with("BK000002-"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_dispatches_interleave_at_payment_delay() {
        let engine = engine_with(
            Arc::new(FixedRandom::always_succeed()),
            DispatchConfig {
                processing_delay: Duration::from_millis(1000),
                ..DispatchConfig::deterministic()
            },
        );
        let shipments: Vec<Shipment> = (0..5)
            .map(|i| Shipment {
                id: format!("LD{}", i),
                ..shipment("Dry Van")
            })
            .collect();
        let started = tokio::time::Instant::now();

        let outcomes =
            futures::future::join_all(shipments.iter().map(|s| engine.dispatch(s))).await;

        assert!(outcomes.iter().all(|o| o.success()));
        // All five waited on the gateway at the same time
        assert!(started.elapsed() < Duration::from_millis(2000));
    }
}
