//! Dispatch outcome types
//!
//! A `DispatchOutcome` is created exactly once per dispatch attempt and is
//! immutable afterwards: fields are private and only the two constructors can
//! build one, which keeps the booking fields and `final_rate` tied to success.

use super::carrier::{Carrier, CarrierId};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// Stages a dispatch attempt moves through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchStage {
    Received,
    Filtering,
    Scoring,
    Negotiating,
    Booking,
    Completed,
    Failed,
}

impl fmt::Display for DispatchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DispatchStage::Received => "received",
            DispatchStage::Filtering => "filtering",
            DispatchStage::Scoring => "scoring",
            DispatchStage::Negotiating => "negotiating",
            DispatchStage::Booking => "booking",
            DispatchStage::Completed => "completed",
            DispatchStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Terminal result of one dispatch attempt
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchOutcome {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    booking_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    carrier_id: Option<CarrierId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    carrier_name: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    final_rate: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    transaction_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_reason: Option<String>,
}

impl DispatchOutcome {
    /// A successful booking of `carrier` at `final_rate`
    pub fn completed(
        carrier: &Carrier,
        final_rate: Decimal,
        booking_id: String,
        transaction_id: String,
    ) -> Self {
        DispatchOutcome {
            success: true,
            booking_id: Some(booking_id),
            carrier_id: Some(carrier.id.clone()),
            carrier_name: Some(carrier.name.clone()),
            final_rate: Some(final_rate),
            transaction_id: Some(transaction_id),
            error_reason: None,
        }
    }

    /// A failed attempt carrying only the reason
    pub fn failed(reason: impl Into<String>) -> Self {
        DispatchOutcome {
            success: false,
            booking_id: None,
            carrier_id: None,
            carrier_name: None,
            final_rate: None,
            transaction_id: None,
            error_reason: Some(reason.into()),
        }
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn booking_id(&self) -> Option<&str> {
        self.booking_id.as_deref()
    }

    pub fn carrier_id(&self) -> Option<&str> {
        self.carrier_id.as_deref()
    }

    pub fn carrier_name(&self) -> Option<&str> {
        self.carrier_name.as_deref()
    }

    pub fn final_rate(&self) -> Option<Decimal> {
        self.final_rate
    }

    pub fn transaction_id(&self) -> Option<&str> {
        self.transaction_id.as_deref()
    }

    pub fn error_reason(&self) -> Option<&str> {
        self.error_reason.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn carrier() -> Carrier {
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

    #[test]
    fn test_completed_outcome_carries_booking_fields() {
        let outcome = DispatchOutcome::completed(
            &carrier(),
            Decimal::new(1550, 0),
            "BK000001-1A2B3C4D".to_string(),
            "TXN000001-5E6F7A8B".to_string(),
        );

        assert!(outcome.success());
        assert_eq!(outcome.carrier_id(), Some("CAR001"));
        assert_eq!(outcome.final_rate(), Some(Decimal::new(1550, 0)));
        assert!(outcome.error_reason().is_none());
    }

    #[test]
    fn test_failed_outcome_has_no_rate_or_ids() {
        let outcome = DispatchOutcome::failed("no suitable carriers found");

        assert!(!outcome.success());
        assert!(outcome.final_rate().is_none());
        assert!(outcome.booking_id().is_none());
        assert!(outcome.transaction_id().is_none());
        assert_eq!(outcome.error_reason(), Some("no suitable carriers found"));
    }

    #[test]
    fn test_failed_outcome_json_omits_absent_fields() {
        let json = serde_json::to_value(DispatchOutcome::failed("carrier booking failed")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": false, "errorReason": "carrier booking failed"})
        );
    }

    #[test]
    fn test_completed_outcome_json_shape() {
        let outcome = DispatchOutcome::completed(
            &carrier(),
            Decimal::new(1550, 0),
            "BK1".to_string(),
            "TXN1".to_string(),
        );
        let json = serde_json::to_value(outcome).unwrap();
        assert_eq!(json["bookingId"], "BK1");
        assert_eq!(json["carrierName"], "Swift Transport Solutions");
        assert_eq!(json["finalRate"], serde_json::json!(1550.0));
        assert!(json.get("errorReason").is_none());
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(DispatchStage::Negotiating.to_string(), "negotiating");
        assert_eq!(DispatchStage::Completed.to_string(), "completed");
    }
}
