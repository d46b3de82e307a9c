//! Dispatch counters
//!
//! Running totals kept by the engine across dispatch attempts: how many were
//! processed, how many booked, and why the rest failed. Booked volume and
//! platform fees only grow when a payment goes through.

use crate::types::DispatchError;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

/// Counters updated once per dispatch attempt
///
/// Outcome counts are atomics; the money totals sit behind a mutex.
#[derive(Debug, Default)]
pub struct DispatchStats {
    total: AtomicU64,
    successful: AtomicU64,
    invalid_input: AtomicU64,
    no_match: AtomicU64,
    booking_rejected: AtomicU64,
    transaction_failed: AtomicU64,
    internal: AtomicU64,
    money: Mutex<MoneyTotals>,
}

#[derive(Debug, Default)]
struct MoneyTotals {
    volume: Decimal,
    fees: Decimal,
}

/// Point-in-time copy of [`DispatchStats`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSummary {
    pub total_processed: u64,
    pub successful: u64,
    pub invalid_input: u64,
    pub no_match: u64,
    pub booking_rejected: u64,
    pub transaction_failed: u64,
    pub internal: u64,
    /// Percentage of attempts that booked, rounded to the nearest whole number
    pub success_rate: u64,
    /// Sum of accepted payment amounts
    pub booked_volume: Decimal,
    /// Sum of platform fees on accepted payments
    pub fees_collected: Decimal,
}

impl DispatchStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a booked dispatch whose payment of `amount` carried `fee`
    pub fn record_success(&self, amount: Decimal, fee: Decimal) {
        {
            let mut money = self.money();
            money.volume += amount;
            money.fees += fee;
        }
        self.total.fetch_add(1, Ordering::Relaxed);
        self.successful.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self, error: &DispatchError) {
        self.total.fetch_add(1, Ordering::Relaxed);
        let counter = match error {
            DispatchError::InvalidInput { .. } => &self.invalid_input,
            DispatchError::NoMatch { .. } => &self.no_match,
            DispatchError::BookingRejected { .. } => &self.booking_rejected,
            DispatchError::TransactionFailed { .. } => &self.transaction_failed,
            _ => &self.internal,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn money(&self) -> MutexGuard<'_, MoneyTotals> {
        // Totals only ever receive whole additions
        self.money
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> DispatchSummary {
        let total_processed = self.total.load(Ordering::Relaxed);
        let successful = self.successful.load(Ordering::Relaxed);
        let success_rate = if total_processed == 0 {
            0
        } else {
            (successful * 200 + total_processed) / (total_processed * 2)
        };
        let (booked_volume, fees_collected) = {
            let money = self.money();
            (money.volume, money.fees)
        };

        DispatchSummary {
            total_processed,
            successful,
            invalid_input: self.invalid_input.load(Ordering::Relaxed),
            no_match: self.no_match.load(Ordering::Relaxed),
            booking_rejected: self.booking_rejected.load(Ordering::Relaxed),
            transaction_failed: self.transaction_failed.load(Ordering::Relaxed),
            internal: self.internal.load(Ordering::Relaxed),
            success_rate,
            booked_volume,
            fees_collected,
        }
    }
}
