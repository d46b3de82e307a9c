//! Matching filter
//!
//! Narrows a registry snapshot to the carriers that can take a shipment:
//! they operate the requested equipment, cover the origin or the destination,
//! and accept automated bookings. Registry order is preserved.

use crate::core::regions;
use crate::types::{Carrier, Shipment};

/// Whether one carrier can take the shipment
pub fn is_eligible(carrier: &Carrier, shipment: &Shipment) -> bool {
    carrier.auto_booking_enabled
        && carrier.has_equipment(&shipment.equipment_type)
        && carrier.coverage_regions.iter().any(|region| {
            regions::covers(region, &shipment.origin)
                || regions::covers(region, &shipment.destination)
        })
}

/// Filter `carriers` down to those eligible for `shipment`
///
/// An empty result is not an error; the engine reports it as a failed dispatch.
pub fn match_carriers(shipment: &Shipment, carriers: &[Carrier]) -> Vec<Carrier> {
    carriers
        .iter()
        .filter(|carrier| is_eligible(carrier, shipment))
        .cloned()
        .collect()
}
