//! Carrier-related types for the Freight Dispatch Engine
//!
//! This module defines the Carrier record held by the registry, the input used
//! to register a new carrier, and the partial update applied by
//! `CarrierRegistry::update`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Carrier identifier (e.g. `CAR001`)
pub type CarrierId = String;

/// Highest rating a carrier can hold
pub const MAX_RATING: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// A transportation provider that can be matched to shipments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Carrier {
    /// Unique registry id
    pub id: CarrierId,

    /// Display name
    pub name: String,

    /// Customer rating between 0 and 5
    #[serde(with = "rust_decimal::serde::float")]
    pub rating: Decimal,

    /// Equipment this carrier operates (e.g. "Dry Van", "Refrigerated")
    pub equipment_types: Vec<String>,

    /// Regions this carrier serves (e.g. "Midwest", "West Coast")
    pub coverage_regions: Vec<String>,

    /// Whether the carrier accepts automated bookings
    ///
    /// Carriers without auto-booking are never eligible for dispatch.
    pub auto_booking_enabled: bool,

    /// Usual rate the carrier charges for a load
    #[serde(with = "rust_decimal::serde::float")]
    pub base_rate: Decimal,
}

impl Carrier {
    /// Whether the carrier operates the given equipment type
    pub fn has_equipment(&self, equipment_type: &str) -> bool {
        self.equipment_types.iter().any(|e| e == equipment_type)
    }
}

/// Input for registering a carrier whose id the registry assigns
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCarrier {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub rating: Decimal,
    pub equipment_types: Vec<String>,
    pub coverage_regions: Vec<String>,
    pub auto_booking_enabled: bool,
    #[serde(with = "rust_decimal::serde::float")]
    pub base_rate: Decimal,
}

impl NewCarrier {
    /// Attach an id, producing a registry record
    pub fn into_carrier(self, id: CarrierId) -> Carrier {
        Carrier {
            id,
            name: self.name,
            rating: self.rating,
            equipment_types: self.equipment_types,
            coverage_regions: self.coverage_regions,
            auto_booking_enabled: self.auto_booking_enabled,
            base_rate: self.base_rate,
        }
    }
}

/// Partial update for an existing carrier
///
/// Every field is optional; `None` leaves the stored value untouched. The id
/// itself cannot be changed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CarrierUpdate {
    pub name: Option<String>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub rating: Option<Decimal>,
    pub equipment_types: Option<Vec<String>>,
    pub coverage_regions: Option<Vec<String>>,
    pub auto_booking_enabled: Option<bool>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub base_rate: Option<Decimal>,
}

impl CarrierUpdate {
    /// Merge the present fields into `carrier`
    pub fn apply(self, carrier: &mut Carrier) {
        if let Some(name) = self.name {
            carrier.name = name;
        }
        if let Some(rating) = self.rating {
            carrier.rating = rating;
        }
        if let Some(equipment_types) = self.equipment_types {
            carrier.equipment_types = equipment_types;
        }
        if let Some(coverage_regions) = self.coverage_regions {
            carrier.coverage_regions = coverage_regions;
        }
        if let Some(auto_booking_enabled) = self.auto_booking_enabled {
            carrier.auto_booking_enabled = auto_booking_enabled;
        }
        if let Some(base_rate) = self.base_rate {
            carrier.base_rate = base_rate;
        }
    }
}
