//! Processing strategy module for shipment dispatch runs
//!
//! This module defines the Strategy pattern for complete dispatch pipelines,
//! encompassing CSV parsing, dispatching through the engine and writing the
//! report. This allows different processing implementations (sequential,
//! concurrent batch) to be selected at runtime.

use crate::cli::{OutputFormat, StrategyType};
use crate::core::DispatchEngine;
use crate::io::csv_format::{write_report_csv, write_report_json, DispatchReport};
use std::io::Write;
use std::path::Path;
use tracing::info;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Processing strategy trait for complete dispatch pipelines
pub trait ProcessingStrategy: Send + Sync {
    /// Dispatch every shipment in the input file and write the report
    ///
    /// # Arguments
    ///
    /// * `input_path` - Path to the shipment CSV file
    /// * `engine` - Engine that runs each dispatch
    /// * `format` - Report format
    /// * `output` - Writer receiving the report, one entry per dispatched shipment
    ///   in input order
    ///
    /// # Errors
    ///
    /// Returns an error if the input file cannot be opened, the runtime cannot
    /// be created or the report cannot be written.
    ///
    /// Malformed records are logged and skipped. Failed dispatches are not
    /// errors; they appear in the report with their reason.
    fn process(
        &self,
        input_path: &Path,
        engine: &DispatchEngine,
        format: OutputFormat,
        output: &mut dyn Write,
    ) -> Result<(), String>;
}

/// Create a processing strategy based on the specified strategy type
///
/// `config` is ignored by the sync strategy.
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config))
        }
    }
}

/// Write the collected reports in the requested format
pub(crate) fn write_reports(
    reports: &[DispatchReport],
    format: OutputFormat,
    output: &mut dyn Write,
) -> Result<(), String> {
    match format {
        OutputFormat::Csv => write_report_csv(reports, output),
        OutputFormat::Json => write_report_json(reports, output),
    }
}

/// Log the engine's counters at the end of a run
pub(crate) fn log_summary(engine: &DispatchEngine) {
    let summary = engine.stats();
    info!(
        total = summary.total_processed,
        successful = summary.successful,
        invalid_input = summary.invalid_input,
        no_match = summary.no_match,
        booking_rejected = summary.booking_rejected,
        transaction_failed = summary.transaction_failed,
        internal = summary.internal,
        success_rate = summary.success_rate,
        booked_volume = %summary.booked_volume,
        fees_collected = %summary.fees_collected,
        "Dispatch run complete"
    );
}

/// Build a current-thread runtime with timers enabled
///
/// Dispatch tasks only yield at the payment delay, so a single thread is
/// enough to interleave them.
pub(crate) fn build_runtime() -> Result<tokio::runtime::Runtime, String> {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .map_err(|e| format!("Failed to create tokio runtime: {}", e))
}
