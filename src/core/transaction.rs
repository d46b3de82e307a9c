//! Simulated payment gateway
//!
//! `TransactionSimulator` stands in for an external payment processor. Each
//! request waits for the configured processing delay, which is the only point
//! where a dispatch task yields, and then succeeds or fails on a random roll.
//! An accepted payment carries the platform fee, rounded down to a whole unit.

use crate::core::config::DispatchConfig;
use crate::core::traits::RandomSource;
use crate::types::{CarrierId, DispatchError, ShipmentId};
use rust_decimal::Decimal;
use std::time::Duration;
use tracing::debug;

/// Reason reported by the simulated gateway when it declines a payment
pub const PAYMENT_FAILED: &str = "payment processing failed";

/// Payment for booking one carrier on one shipment
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRequest {
    pub amount: Decimal,
    pub carrier_id: CarrierId,
    pub shipment_id: ShipmentId,
}

/// Confirmation returned by the gateway for an accepted payment
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionReceipt {
    pub amount: Decimal,
    /// Platform share of `amount`
    pub fee: Decimal,
    pub carrier_id: CarrierId,
    pub shipment_id: ShipmentId,
}

/// Payment gateway simulation with configurable latency and success rate
#[derive(Debug, Clone)]
pub struct TransactionSimulator {
    delay: Duration,
    success_probability: f64,
    fee_ratio: Decimal,
}

impl TransactionSimulator {
    pub fn new(delay: Duration, success_probability: f64, fee_ratio: Decimal) -> Self {
        Self {
            delay,
            success_probability,
            fee_ratio,
        }
    }

    /// Build a simulator from the engine configuration
    pub fn from_config(config: &DispatchConfig) -> Self {
        Self::new(
            config.processing_delay,
            config.payment_success_probability,
            config.platform_fee_ratio,
        )
    }

    /// Platform fee for a payment of `amount`
    pub fn fee_for(&self, amount: Decimal) -> Decimal {
        (amount * self.fee_ratio).floor()
    }

    /// Process one payment
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::TransactionFailed` with [`PAYMENT_FAILED`] when the
    /// success roll fails.
    pub async fn process(
        &self,
        request: &TransactionRequest,
        random: &dyn RandomSource,
    ) -> Result<TransactionReceipt, DispatchError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if !random.roll(self.success_probability) {
            debug!(
                shipment_id = %request.shipment_id,
                carrier_id = %request.carrier_id,
                amount = %request.amount,
                "Payment declined"
            );
            return Err(DispatchError::transaction_failed(PAYMENT_FAILED));
        }

        Ok(TransactionReceipt {
            amount: request.amount,
            fee: self.fee_for(request.amount),
            carrier_id: request.carrier_id.clone(),
            shipment_id: request.shipment_id.clone(),
        })
    }
}
