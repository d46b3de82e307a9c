//! Thread-safe carrier registry
//!
//! This module provides the `CarrierRegistry` struct, which holds the working
//! set of carriers that the dispatch engine matches shipments against.
//!
//! # Design
//!
//! Carriers live in a `DashMap` keyed by carrier id, so lookups and updates from
//! concurrently running dispatch tasks never take a global lock. Each entry also
//! records the sequence number it was inserted with; `list()` sorts on it to
//! return carriers in insertion order, which the scoring step relies on for
//! tie-breaking.
//!
//! The registry is shared by `Arc` between the engine and whoever manages
//! carriers. Dispatch passes only read from it.

use crate::types::{Carrier, CarrierId, CarrierUpdate, DispatchError, NewCarrier, MAX_RATING};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

#[derive(Debug, Clone)]
struct RegistryEntry {
    seq: u64,
    carrier: Carrier,
}

/// Registry of carriers eligible for automated matching
#[derive(Debug)]
pub struct CarrierRegistry {
    /// Concurrent map of carrier id to record
    carriers: DashMap<CarrierId, RegistryEntry>,
    /// Next insertion sequence number
    next_seq: AtomicU64,
    /// Next numeric suffix tried when assigning a `CAR###` id
    next_id: AtomicU64,
}

impl CarrierRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            carriers: DashMap::new(),
            next_seq: AtomicU64::new(0),
            next_id: AtomicU64::new(1),
        }
    }

    /// Create a registry seeded with the three demo carriers
    pub fn with_default_carriers() -> Self {
        let registry = Self::new();
        for carrier in default_carriers() {
            // Ids are distinct constants, insertion cannot collide
            let _ = registry.insert(carrier);
        }
        registry
    }

    /// Create a registry from an explicit carrier list
    ///
    /// # Errors
    ///
    /// Returns the first validation or duplicate-id error encountered.
    pub fn from_carriers(carriers: Vec<Carrier>) -> Result<Self, DispatchError> {
        let registry = Self::new();
        for carrier in carriers {
            registry.insert(carrier)?;
        }
        Ok(registry)
    }

    /// All carriers, in insertion order
    ///
    /// The returned vector is a snapshot; later updates are not reflected in it.
    pub fn list(&self) -> Vec<Carrier> {
        let mut entries: Vec<RegistryEntry> = self
            .carriers
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        entries.sort_by_key(|entry| entry.seq);
        entries.into_iter().map(|entry| entry.carrier).collect()
    }

    /// Look up one carrier by id
    pub fn get(&self, id: &str) -> Option<Carrier> {
        self.carriers.get(id).map(|entry| entry.carrier.clone())
    }

    /// Number of registered carriers
    pub fn len(&self) -> usize {
        self.carriers.len()
    }

    /// Whether the registry holds no carriers
    pub fn is_empty(&self) -> bool {
        self.carriers.is_empty()
    }

    /// Register a new carrier under the next free `CAR###` id
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::InvalidInput` if the name is empty, the rating lies
    /// outside 0–5 or the base rate is negative.
    pub fn add(&self, new_carrier: NewCarrier) -> Result<Carrier, DispatchError> {
        validate_fields(&new_carrier.name, new_carrier.rating, new_carrier.base_rate)?;

        loop {
            let suffix = self.next_id.fetch_add(1, Ordering::Relaxed);
            let id = format!("CAR{:03}", suffix);
            if let Entry::Vacant(vacant) = self.carriers.entry(id.clone()) {
                let carrier = new_carrier.into_carrier(id);
                vacant.insert(RegistryEntry {
                    seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
                    carrier: carrier.clone(),
                });
                debug!(carrier_id = %carrier.id, name = %carrier.name, "Carrier added");
                return Ok(carrier);
            }
        }
    }

    /// Register a carrier that already carries its id
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::DuplicateCarrier` if the id is taken, or
    /// `DispatchError::InvalidInput` for an empty id or invalid fields.
    pub fn insert(&self, carrier: Carrier) -> Result<(), DispatchError> {
        if carrier.id.trim().is_empty() {
            return Err(DispatchError::invalid_input("id", "must not be empty"));
        }
        validate_fields(&carrier.name, carrier.rating, carrier.base_rate)?;

        match self.carriers.entry(carrier.id.clone()) {
            Entry::Occupied(_) => Err(DispatchError::DuplicateCarrier { id: carrier.id }),
            Entry::Vacant(vacant) => {
                debug!(carrier_id = %carrier.id, name = %carrier.name, "Carrier registered");
                vacant.insert(RegistryEntry {
                    seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
                    carrier,
                });
                Ok(())
            }
        }
    }

    /// Merge a partial update into an existing carrier
    ///
    /// Returns `Ok(false)` without touching anything if no carrier has that id.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::InvalidInput` if the merged record would have an
    /// empty name, a rating outside 0–5 or a negative base rate. The stored
    /// record is left unchanged.
    pub fn update(&self, id: &str, update: CarrierUpdate) -> Result<bool, DispatchError> {
        let Some(mut entry) = self.carriers.get_mut(id) else {
            return Ok(false);
        };

        let mut merged = entry.carrier.clone();
        update.apply(&mut merged);
        validate_fields(&merged.name, merged.rating, merged.base_rate)?;

        entry.carrier = merged;
        debug!(carrier_id = %id, "Carrier updated");
        Ok(true)
    }
}

impl Default for CarrierRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_fields(name: &str, rating: Decimal, base_rate: Decimal) -> Result<(), DispatchError> {
    if name.trim().is_empty() {
        return Err(DispatchError::invalid_input("name", "must not be empty"));
    }
    if rating < Decimal::ZERO || rating > MAX_RATING {
        return Err(DispatchError::invalid_input(
            "rating",
            format!("{} is outside 0-5", rating),
        ));
    }
    if base_rate < Decimal::ZERO {
        return Err(DispatchError::invalid_input("baseRate", "must not be negative"));
    }
    Ok(())
}

/// The demo platform's built-in carrier list
pub fn default_carriers() -> Vec<Carrier> {
    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    vec![
        Carrier {
            id: "CAR001".to_string(),
            name: "Swift Transport Solutions".to_string(),
            rating: Decimal::new(48, 1),
            equipment_types: strings(&["Dry Van", "Refrigerated"]),
            coverage_regions: strings(&["Midwest", "Southeast"]),
            auto_booking_enabled: true,
            base_rate: Decimal::new(1500, 0),
        },
        Carrier {
            id: "CAR002".to_string(),
            name: "Prime Logistics Network".to_string(),
            rating: Decimal::new(46, 1),
            equipment_types: strings(&["Flatbed", "Step Deck"]),
            coverage_regions: strings(&["West Coast", "Southwest"]),
            auto_booking_enabled: true,
            base_rate: Decimal::new(1800, 0),
        },
        Carrier {
            id: "CAR003".to_string(),
            name: "Reliable Freight Co".to_string(),
            rating: Decimal::new(44, 1),
            equipment_types: strings(&["Dry Van", "Box Truck"]),
            coverage_regions: strings(&["Northeast", "Mid-Atlantic"]),
            auto_booking_enabled: true,
            base_rate: Decimal::new(1600, 0),
        },
    ]
}
