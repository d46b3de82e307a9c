//! Shipment-related types for the Freight Dispatch Engine
//!
//! A Shipment is the load request submitted to the dispatch engine. Fields
//! default to empty values when missing from the input so that the engine's
//! validation step, not the parser, decides whether the request is usable.

use super::error::DispatchError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Shipment identifier (e.g. `LD7F3K2A`)
pub type ShipmentId = String;

/// A load request describing route, equipment need and requested price
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Shipment {
    /// Unique load identifier
    pub id: ShipmentId,

    /// Pickup location, e.g. "Chicago, IL"
    pub origin: String,

    /// Drop-off location, e.g. "Miami, FL"
    pub destination: String,

    /// Load weight in pounds
    #[serde(with = "rust_decimal::serde::float")]
    pub weight: Decimal,

    /// Equipment the load requires, e.g. "Dry Van"
    pub equipment_type: String,

    /// Price the shipper is offering
    #[serde(with = "rust_decimal::serde::float")]
    pub requested_rate: Decimal,

    /// Date the load is ready
    pub pickup_date: Option<NaiveDate>,

    /// Date the load must arrive
    pub delivery_date: Option<NaiveDate>,
}

impl Shipment {
    /// Check that every required field is present and sensible
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::InvalidInput` naming the first offending field.
    pub fn validate(&self) -> Result<(), DispatchError> {
        let required_text = [
            ("id", &self.id),
            ("origin", &self.origin),
            ("destination", &self.destination),
            ("equipmentType", &self.equipment_type),
        ];
        for (field, value) in required_text {
            if value.trim().is_empty() {
                return Err(DispatchError::invalid_input(field, "must not be empty"));
            }
        }

        if self.weight <= Decimal::ZERO {
            return Err(DispatchError::invalid_input("weight", "must be positive"));
        }
        if self.requested_rate <= Decimal::ZERO {
            return Err(DispatchError::invalid_input(
                "requestedRate",
                "must be positive",
            ));
        }

        let pickup = self
            .pickup_date
            .ok_or_else(|| DispatchError::invalid_input("pickupDate", "is required"))?;
        let delivery = self
            .delivery_date
            .ok_or_else(|| DispatchError::invalid_input("deliveryDate", "is required"))?;
        if delivery < pickup {
            return Err(DispatchError::invalid_input(
                "deliveryDate",
                format!("{} is before pickup date {}", delivery, pickup),
            ));
        }

        Ok(())
    }
}
