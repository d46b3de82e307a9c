//! Asynchronous CSV reader with batch interface
//!
//! Reads shipments from any `futures::io::AsyncRead` source in batches, so the
//! async strategy can dispatch a batch concurrently while the rest of the file
//! stays unread.
//!
//! ```text
//! CSV Reader → AsyncReader → Batches of Shipments
//!                  ↓
//!           csv_format module
//!   (ShipmentCsvRecord, convert_shipment_record)
//! ```

use crate::io::csv_format::{convert_shipment_record, ShipmentCsvRecord};
use crate::types::Shipment;
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use tracing::warn;

/// Asynchronous shipment CSV reader
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    line_num: usize,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self {
            csv_reader,
            line_num: 0,
        }
    }

    /// Read up to `batch_size` shipments
    ///
    /// Records that fail to parse are logged and skipped. Returns an empty
    /// vector once the input is exhausted.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<Shipment> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<ShipmentCsvRecord>();

        while batch.len() < batch_size {
            let Some(result) = records.next().await else {
                break;
            };
            self.line_num += 1;
            let line = self.line_num + 1;

            match result {
                Ok(record) => match convert_shipment_record(record) {
                    Ok(shipment) => batch.push(shipment),
                    Err(e) => warn!(line, error = %e, "Skipping shipment record"),
                },
                Err(e) => warn!(line, error = %e, "CSV parse error"),
            }
        }

        batch
    }
}
