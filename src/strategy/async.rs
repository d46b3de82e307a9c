//! Concurrent batch processing strategy
//!
//! Reads shipments in batches and dispatches each batch concurrently. Dispatch
//! tasks only yield at the simulated payment delay, so a single-threaded
//! runtime overlaps those waits and a batch finishes in roughly
//! `ceil(batch / max_concurrent) × processing_delay`.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent)
//!     ├── AsyncReader (batch CSV reading)
//!     └── DispatchEngine (shared by every in-flight dispatch)
//!             └── CarrierRegistry (read-only during dispatch)
//! ```
//!
//! # Ordering
//!
//! Batches are processed one after another and `buffered` yields results in
//! input order, so the report lists shipments exactly as the file does.

use crate::cli::OutputFormat;
use crate::core::DispatchEngine;
use crate::io::async_reader::AsyncReader;
use crate::io::csv_format::DispatchReport;
use crate::strategy::{build_runtime, log_summary, write_reports, ProcessingStrategy};
use futures::stream::{self, StreamExt};
use std::io::Write;
use std::path::Path;
use tracing::{debug, warn};

/// Configuration for batch processing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    /// Number of shipments read per batch
    pub batch_size: usize,
    /// Maximum number of dispatches in flight at once
    pub max_concurrent: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 100,
            max_concurrent: 16,
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig with custom values
    ///
    /// Zero values fall back to the defaults.
    pub fn new(batch_size: usize, max_concurrent: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(
                value = batch_size,
                default = default.batch_size,
                "Invalid batch_size, using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent = if max_concurrent == 0 {
            warn!(
                value = max_concurrent,
                default = default.max_concurrent,
                "Invalid max_concurrent, using default"
            );
            default.max_concurrent
        } else {
            max_concurrent
        };

        Self {
            batch_size,
            max_concurrent,
        }
    }
}

/// Concurrent batch processing strategy
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
}

impl AsyncProcessingStrategy {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    fn process(
        &self,
        input_path: &Path,
        engine: &DispatchEngine,
        format: OutputFormat,
        output: &mut dyn Write,
    ) -> Result<(), String> {
        let runtime = build_runtime()?;

        let reports = runtime.block_on(async {
            let file = tokio::fs::File::open(input_path)
                .await
                .map_err(|e| format!("Failed to open file '{}': {}", input_path.display(), e))?;

            // Wrap tokio file in a compatibility layer for csv-async
            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
            let mut reader = AsyncReader::new(compat_file);
            let mut reports = Vec::new();

            loop {
                let batch = reader.read_batch(self.config.batch_size).await;
                if batch.is_empty() {
                    break;
                }
                debug!(size = batch.len(), "Dispatching batch");

                let outcomes: Vec<_> = stream::iter(batch.iter().map(|s| engine.dispatch(s)))
                    .buffered(self.config.max_concurrent)
                    .collect()
                    .await;

                reports.extend(batch.into_iter().zip(outcomes).map(|(shipment, outcome)| {
                    DispatchReport {
                        shipment_id: shipment.id,
                        outcome,
                    }
                }));
            }

            Ok::<_, String>(reports)
        })?;

        log_summary(engine);
        write_reports(&reports, format, output)
    }
}
