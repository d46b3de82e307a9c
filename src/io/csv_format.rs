//! CSV format handling for shipments, carriers and dispatch reports
//!
//! This module centralizes all file format concerns, providing:
//! - `ShipmentCsvRecord` / `CarrierCsvRecord` structures for deserialization
//! - Conversion from CSV records to domain types
//! - Dispatch report serialization (CSV and JSON)
//!
//! All functions are pure (no file access) for easy testing.
//!
//! Missing shipment fields convert to empty values instead of errors: the
//! dispatch engine's validation step reports them as an invalid shipment.
//! Values that are present but malformed (a non-numeric weight, an unparseable
//! date) reject the record.

use crate::types::{Carrier, DispatchOutcome, Shipment, ShipmentId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::str::FromStr;

/// Separator for list-valued carrier columns
pub const LIST_SEPARATOR: char = ';';

/// Column names of the CSV dispatch report
pub const REPORT_HEADER: [&str; 8] = [
    "shipment_id",
    "success",
    "carrier_id",
    "carrier_name",
    "final_rate",
    "booking_id",
    "transaction_id",
    "error",
];

/// Shipment CSV row
///
/// Columns: id, origin, destination, weight, equipment_type, requested_rate,
/// pickup_date, delivery_date. Every column may be missing or empty, so each
/// one is optional; a short row leaves the trailing columns as `None`.
#[derive(Debug, Default, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ShipmentCsvRecord {
    pub id: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub weight: Option<String>,
    pub equipment_type: Option<String>,
    pub requested_rate: Option<String>,
    pub pickup_date: Option<String>,
    pub delivery_date: Option<String>,
}

/// Carrier CSV row
///
/// Columns: id, name, rating, equipment_types, coverage_regions,
/// auto_booking_enabled, base_rate. List columns use `;` between entries.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CarrierCsvRecord {
    pub id: String,
    pub name: String,
    pub rating: String,
    pub equipment_types: String,
    pub coverage_regions: String,
    pub auto_booking_enabled: String,
    pub base_rate: String,
}

/// One row of the dispatch report
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchReport {
    pub shipment_id: ShipmentId,
    #[serde(flatten)]
    pub outcome: DispatchOutcome,
}

fn parse_decimal(field: &str, value: Option<&str>, id: &str) -> Result<Decimal, String> {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => Decimal::from_str(text)
            .map_err(|_| format!("Invalid {} '{}' for shipment {}", field, text, id)),
        _ => Ok(Decimal::ZERO),
    }
}

fn parse_date(field: &str, value: Option<&str>, id: &str) -> Result<Option<NaiveDate>, String> {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| format!("Invalid {} '{}' for shipment {}", field, text, id)),
        _ => Ok(None),
    }
}

/// Convert a ShipmentCsvRecord to a Shipment
///
/// # Returns
///
/// Result containing either:
/// - Ok(Shipment) - Converted shipment (possibly with empty fields)
/// - Err(String) - A present value could not be parsed
pub fn convert_shipment_record(record: ShipmentCsvRecord) -> Result<Shipment, String> {
    let id = record.id.unwrap_or_default();
    let weight = parse_decimal("weight", record.weight.as_deref(), &id)?;
    let requested_rate = parse_decimal("requested_rate", record.requested_rate.as_deref(), &id)?;
    let pickup_date = parse_date("pickup_date", record.pickup_date.as_deref(), &id)?;
    let delivery_date = parse_date("delivery_date", record.delivery_date.as_deref(), &id)?;

    Ok(Shipment {
        id,
        origin: record.origin.unwrap_or_default(),
        destination: record.destination.unwrap_or_default(),
        weight,
        equipment_type: record.equipment_type.unwrap_or_default(),
        requested_rate,
        pickup_date,
        delivery_date,
    })
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_flag(value: &str, id: &str) -> Result<bool, String> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        other => Err(format!(
            "Invalid auto_booking_enabled '{}' for carrier {}",
            other, id
        )),
    }
}

/// Convert a CarrierCsvRecord to a Carrier
///
/// Range checks (rating 0–5, non-negative base rate) are left to the registry.
pub fn convert_carrier_record(record: CarrierCsvRecord) -> Result<Carrier, String> {
    let rating = Decimal::from_str(record.rating.trim()).map_err(|_| {
        format!(
            "Invalid rating '{}' for carrier {}",
            record.rating, record.id
        )
    })?;
    let base_rate = Decimal::from_str(record.base_rate.trim()).map_err(|_| {
        format!(
            "Invalid base_rate '{}' for carrier {}",
            record.base_rate, record.id
        )
    })?;
    let auto_booking_enabled = parse_flag(&record.auto_booking_enabled, &record.id)?;

    Ok(Carrier {
        equipment_types: split_list(&record.equipment_types),
        coverage_regions: split_list(&record.coverage_regions),
        id: record.id,
        name: record.name,
        rating,
        auto_booking_enabled,
        base_rate,
    })
}

/// Write the dispatch report as CSV
///
/// One row per shipment, in the order given. Absent outcome fields are written
/// as empty columns.
pub fn write_report_csv(reports: &[DispatchReport], output: &mut dyn Write) -> Result<(), String> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer
        .write_record(REPORT_HEADER)
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    for report in reports {
        let outcome = &report.outcome;
        let final_rate = outcome
            .final_rate()
            .map(|rate| rate.normalize().to_string())
            .unwrap_or_default();
        writer
            .write_record([
                report.shipment_id.as_str(),
                if outcome.success() { "true" } else { "false" },
                outcome.carrier_id().unwrap_or_default(),
                outcome.carrier_name().unwrap_or_default(),
                final_rate.as_str(),
                outcome.booking_id().unwrap_or_default(),
                outcome.transaction_id().unwrap_or_default(),
                outcome.error_reason().unwrap_or_default(),
            ])
            .map_err(|e| format!("Failed to write report record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}

/// Write the dispatch report as a pretty-printed JSON array
pub fn write_report_json(reports: &[DispatchReport], output: &mut dyn Write) -> Result<(), String> {
    serde_json::to_writer_pretty(&mut *output, reports)
        .map_err(|e| format!("Failed to write JSON report: {}", e))?;
    writeln!(output).map_err(|e| format!("Failed to write JSON report: {}", e))?;
    output
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))
}
