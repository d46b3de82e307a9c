//! Freight Dispatch Engine CLI
//!
//! Command-line interface for dispatching freight shipments from CSV files.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- shipments.csv > report.csv
//! cargo run -- --strategy sync --seed 7 shipments.csv > report.csv
//! cargo run -- --carriers carriers.csv --format json shipments.csv > report.json
//! cargo run -- --batch-size 50 --max-concurrent 8 --processing-delay-ms 200 shipments.csv
//! ```
//!
//! The program reads shipments from the input CSV file, dispatches each one
//! against the carrier registry using the selected processing strategy, and
//! writes one report entry per shipment to stdout. Logs go to stderr; set
//! `RUST_LOG` (default `info`) to change the level.
//!
//! # Exit Codes
//!
//! - 0: Success (individual dispatch failures are reported, not fatal)
//! - 1: Error (file not found, invalid carrier file, output not writable, etc.)

use freight_dispatch_engine::cli::{self, CliArgs};
use freight_dispatch_engine::core::{
    CarrierRegistry, DispatchEngine, RandomSource, SeededRandom,
};
use freight_dispatch_engine::io::read_carriers;
use freight_dispatch_engine::strategy;
use std::process;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = cli::parse_args();

    if let Err(e) = run(&args) {
        error!("{}", e);
        process::exit(1);
    }
}

fn run(args: &CliArgs) -> Result<(), String> {
    let registry = match &args.carriers_file {
        Some(path) => {
            let carriers = read_carriers(path)?;
            CarrierRegistry::from_carriers(carriers).map_err(|e| e.to_string())?
        }
        None => CarrierRegistry::with_default_carriers(),
    };
    info!(carriers = registry.len(), "Carrier registry loaded");

    let random: Arc<dyn RandomSource> = match args.seed {
        Some(seed) => Arc::new(SeededRandom::from_seed(seed)),
        None => Arc::new(SeededRandom::from_entropy()),
    };
    let engine = DispatchEngine::new(Arc::new(registry), random, args.to_dispatch_config());

    let strategy = {
        let config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy, config)
    };

    let mut output = std::io::stdout();
    strategy.process(&args.input_file, &engine, args.format, &mut output)
}
