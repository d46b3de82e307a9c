//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over shipments from a CSV file, and a loader
//! for the carrier seed file. Delegates CSV format concerns to the csv_format
//! module.
//!
//! # Iterator Interface
//!
//! SyncReader implements the Iterator trait, yielding `Result<Shipment, String>`
//! for each CSV row:
//!
//! ```no_run
//! use freight_dispatch_engine::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("shipments.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(shipment) => println!("Dispatching: {}", shipment.id),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from `new()`
//! - Individual record parsing errors are yielded as Err variants in the iterator
//! - Line numbers are included in error messages for debugging

use crate::io::csv_format::{
    convert_carrier_record, convert_shipment_record, CarrierCsvRecord, ShipmentCsvRecord,
};
use crate::types::{Carrier, DispatchError, Shipment};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::path::Path;
use tracing::warn;

fn open_csv(path: &Path) -> Result<csv::Reader<File>, String> {
    let file = File::open(path).map_err(|e| {
        format!(
            "Failed to open file '{}': {}",
            path.display(),
            DispatchError::from(e)
        )
    })?;

    Ok(ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .buffer_capacity(8 * 1024)
        .from_reader(file))
}

/// Synchronous shipment CSV reader
///
/// Reads one record at a time; memory use does not grow with the file.
#[derive(Debug)]
pub struct SyncReader {
    reader: csv::Reader<File>,
    line_num: usize,
}

impl SyncReader {
    /// Open a shipment CSV file
    ///
    /// The CSV reader trims whitespace from all fields and tolerates short rows
    /// (missing trailing columns deserialize as empty).
    ///
    /// # Errors
    ///
    /// Returns `Err(String)` if the file could not be opened.
    pub fn new(path: &Path) -> Result<Self, String> {
        Ok(Self {
            reader: open_csv(path)?,
            line_num: 0,
        })
    }
}

impl Iterator for SyncReader {
    type Item = Result<Shipment, String>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<ShipmentCsvRecord>();
        let result = deserializer.next()?;
        self.line_num += 1;

        // +1 for the header row
        let line = self.line_num + 1;
        Some(match result {
            Ok(record) => {
                convert_shipment_record(record).map_err(|e| format!("Line {}: {}", line, e))
            }
            Err(e) => Err(format!("Line {}: CSV parse error: {}", line, e)),
        })
    }
}

/// Load every carrier from a carrier seed CSV file
///
/// Malformed rows are logged and skipped. Range and duplicate checks happen
/// when the carriers are inserted into a registry.
///
/// # Errors
///
/// Returns `Err(String)` if the file could not be opened.
pub fn read_carriers(path: &Path) -> Result<Vec<Carrier>, String> {
    let mut reader = open_csv(path)?;
    let mut carriers = Vec::new();

    for result in reader.deserialize::<CarrierCsvRecord>() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %DispatchError::from(e), "Skipping carrier record");
                continue;
            }
        };
        match convert_carrier_record(record) {
            Ok(carrier) => carriers.push(carrier),
            Err(e) => warn!(error = %e, "Skipping carrier record"),
        }
    }

    Ok(carriers)
}
