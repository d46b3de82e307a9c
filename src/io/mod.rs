//! I/O module
//!
//! Handles CSV parsing and report output.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (record conversion, report serialization)
//! - `sync_reader` - Synchronous shipment reader and carrier seed loader
//! - `async_reader` - Asynchronous shipment reader with batch reading interface

pub mod async_reader;
pub mod csv_format;
pub mod sync_reader;

pub use async_reader::AsyncReader;
pub use csv_format::{
    convert_carrier_record, convert_shipment_record, write_report_csv, write_report_json,
    CarrierCsvRecord, DispatchReport, ShipmentCsvRecord,
};
pub use sync_reader::{read_carriers, SyncReader};
