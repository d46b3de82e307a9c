//! Sequential processing strategy
//!
//! Dispatches shipments one at a time in file order. Each dispatch runs to
//! completion (including the simulated payment delay) before the next record
//! is read, so a run takes roughly `shipments × processing_delay`.
//!
//! The SyncProcessingStrategy focuses on orchestration, delegating:
//! - CSV parsing to `SyncReader` (iterator interface)
//! - Dispatch to `DispatchEngine`
//! - Report output to the `csv_format` module

use crate::cli::OutputFormat;
use crate::core::DispatchEngine;
use crate::io::csv_format::DispatchReport;
use crate::io::sync_reader::SyncReader;
use crate::strategy::{build_runtime, log_summary, write_reports, ProcessingStrategy};
use std::io::Write;
use std::path::Path;
use tracing::warn;

/// Sequential processing strategy
///
/// # Examples
///
/// ```no_run
/// use freight_dispatch_engine::cli::OutputFormat;
/// use freight_dispatch_engine::core::{CarrierRegistry, DispatchConfig, DispatchEngine, SeededRandom};
/// use freight_dispatch_engine::strategy::{ProcessingStrategy, SyncProcessingStrategy};
/// use std::path::Path;
/// use std::sync::Arc;
///
/// let engine = DispatchEngine::new(
///     Arc::new(CarrierRegistry::with_default_carriers()),
///     Arc::new(SeededRandom::from_seed(7)),
///     DispatchConfig::default(),
/// );
/// let mut output = std::io::stdout();
///
/// SyncProcessingStrategy
///     .process(Path::new("shipments.csv"), &engine, OutputFormat::Csv, &mut output)
///     .expect("Processing failed");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SyncProcessingStrategy;

impl ProcessingStrategy for SyncProcessingStrategy {
    fn process(
        &self,
        input_path: &Path,
        engine: &DispatchEngine,
        format: OutputFormat,
        output: &mut dyn Write,
    ) -> Result<(), String> {
        let reader = SyncReader::new(input_path)?;
        let runtime = build_runtime()?;
        let mut reports = Vec::new();

        for result in reader {
            match result {
                Ok(shipment) => {
                    let outcome = runtime.block_on(engine.dispatch(&shipment));
                    reports.push(DispatchReport {
                        shipment_id: shipment.id,
                        outcome,
                    });
                }
                Err(e) => warn!(error = %e, "Skipping shipment record"),
            }
        }

        log_summary(engine);
        write_reports(&reports, format, output)
    }
}
