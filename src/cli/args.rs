use crate::core::DispatchConfig;
use crate::strategy::BatchConfig;
use clap::{Parser, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::time::Duration;

/// Match freight shipments to carriers and book them automatically
#[derive(Parser, Debug)]
#[command(name = "dispatch-engine")]
#[command(about = "Match freight shipments to carriers and book them automatically", long_about = None)]
pub struct CliArgs {
    /// Input CSV file path containing shipments
    #[arg(value_name = "SHIPMENTS", help = "Path to the shipment CSV file")]
    pub input_file: PathBuf,

    /// Carrier seed file
    #[arg(
        long = "carriers",
        value_name = "FILE",
        help = "Carrier CSV file (default: built-in demo carriers)"
    )]
    pub carriers_file: Option<PathBuf>,

    /// Processing strategy to use for dispatching shipments
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "async",
        help = "Processing strategy: 'sync' for one at a time or 'async' for concurrent batches"
    )]
    pub strategy: StrategyType,

    /// Number of shipments per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of shipments per batch (default: 100)"
    )]
    pub batch_size: Option<usize>,

    /// Maximum number of concurrent dispatches (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Maximum number of dispatches in flight (default: 16)"
    )]
    pub max_concurrent: Option<usize>,

    /// Seed for a reproducible run
    #[arg(long = "seed", value_name = "SEED", help = "Random seed (default: entropy)")]
    pub seed: Option<u64>,

    #[arg(
        long = "booking-success",
        value_name = "PROBABILITY",
        help = "Probability that the selected carrier accepts (default: 0.9)"
    )]
    pub booking_success: Option<f64>,

    #[arg(
        long = "payment-success",
        value_name = "PROBABILITY",
        help = "Probability that the payment goes through (default: 0.95)"
    )]
    pub payment_success: Option<f64>,

    #[arg(
        long = "market-variance",
        value_name = "AMOUNT",
        help = "Largest market adjustment during negotiation (default: 200)"
    )]
    pub market_variance: Option<Decimal>,

    #[arg(
        long = "platform-fee",
        value_name = "RATIO",
        help = "Share of each payment kept as platform fee (default: 0.03)"
    )]
    pub platform_fee: Option<Decimal>,

    #[arg(
        long = "processing-delay-ms",
        value_name = "MILLIS",
        help = "Simulated payment gateway latency (default: 1000)"
    )]
    pub processing_delay_ms: Option<u64>,

    /// Report format written to stdout
    #[arg(long = "format", value_name = "FORMAT", default_value = "csv")]
    pub format: OutputFormat,
}

/// Available processing strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

/// Dispatch report formats
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Json,
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments
    ///
    /// Missing values use the defaults; zero values are replaced by the
    /// defaults with a warning.
    pub fn to_batch_config(&self) -> BatchConfig {
        let default = BatchConfig::default();
        BatchConfig::new(
            self.batch_size.unwrap_or(default.batch_size),
            self.max_concurrent.unwrap_or(default.max_concurrent),
        )
    }

    /// Create a DispatchConfig from CLI arguments
    ///
    /// Out-of-range values are replaced by the defaults with a warning.
    pub fn to_dispatch_config(&self) -> DispatchConfig {
        let default = DispatchConfig::default();
        DispatchConfig::new(
            self.booking_success
                .unwrap_or(default.booking_success_probability),
            self.payment_success
                .unwrap_or(default.payment_success_probability),
            self.market_variance
                .unwrap_or(default.max_market_adjustment),
            default.rate_floor_ratio,
            self.platform_fee.unwrap_or(default.platform_fee_ratio),
            self.processing_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(default.processing_delay),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::MARKET_ADJUSTMENT_CAP;
    use rstest::rstest;

    #[rstest]
    #[case::default_strategy(&["program", "shipments.csv"], StrategyType::Async)]
    #[case::explicit_sync(&["program", "--strategy", "sync", "shipments.csv"], StrategyType::Sync)]
    #[case::explicit_async(&["program", "--strategy", "async", "shipments.csv"], StrategyType::Async)]
    fn test_strategy_parsing(#[case] args: &[&str], #[case] expected: StrategyType) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.strategy, expected);
    }

    #[rstest]
    #[case::default_format(&["program", "shipments.csv"], OutputFormat::Csv)]
    #[case::json(&["program", "--format", "json", "shipments.csv"], OutputFormat::Json)]
    fn test_format_parsing(#[case] args: &[&str], #[case] expected: OutputFormat) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.format, expected);
    }

    #[rstest]
    #[case::all_defaults(&["program", "shipments.csv"], 100, 16)]
    #[case::custom_batch_size(&["program", "--batch-size", "500", "shipments.csv"], 500, 16)]
    #[case::custom_max_concurrent(&["program", "--max-concurrent", "4", "shipments.csv"], 100, 4)]
    #[case::zero_batch_size(&["program", "--batch-size", "0", "shipments.csv"], 100, 16)]
    #[case::zero_max_concurrent(&["program", "--max-concurrent", "0", "shipments.csv"], 100, 16)]
    fn test_batch_config_conversion(
        #[case] args: &[&str],
        #[case] expected_batch_size: usize,
        #[case] expected_max_concurrent: usize,
    ) {
        let config = CliArgs::try_parse_from(args).unwrap().to_batch_config();

        assert_eq!(config.batch_size, expected_batch_size);
        assert_eq!(config.max_concurrent, expected_max_concurrent);
    }

    #[test]
    fn test_dispatch_config_defaults() {
        let parsed = CliArgs::try_parse_from(["program", "shipments.csv"]).unwrap();
        assert_eq!(parsed.to_dispatch_config(), DispatchConfig::default());
        assert!(parsed.seed.is_none());
        assert!(parsed.carriers_file.is_none());
    }

    #[test]
    fn test_dispatch_config_overrides() {
        let parsed = CliArgs::try_parse_from([
            "program",
            "--booking-success",
            "1",
            "--payment-success",
            "0.5",
            "--market-variance",
            "0",
            "--platform-fee",
            "0.05",
            "--processing-delay-ms",
            "0",
            "--seed",
            "42",
            "--carriers",
            "carriers.csv",
            "shipments.csv",
        ])
        .unwrap();

        let config = parsed.to_dispatch_config();

        assert_eq!(config.booking_success_probability, 1.0);
        assert_eq!(config.payment_success_probability, 0.5);
        assert_eq!(config.max_market_adjustment, Decimal::ZERO);
        assert_eq!(config.platform_fee_ratio, Decimal::new(5, 2));
        assert_eq!(config.processing_delay, Duration::ZERO);
        assert_eq!(parsed.seed, Some(42));
        assert_eq!(parsed.carriers_file, Some(PathBuf::from("carriers.csv")));
    }

    #[rstest]
    #[case::probability_above_one(&["program", "--booking-success", "1.5", "shipments.csv"])]
    #[case::negative_variance(&["program", "--market-variance=-10", "shipments.csv"])]
    #[case::fee_above_one(&["program", "--platform-fee", "1.5", "shipments.csv"])]
    fn test_out_of_range_values_fall_back(#[case] args: &[&str]) {
        let config = CliArgs::try_parse_from(args).unwrap().to_dispatch_config();
        assert_eq!(config, DispatchConfig::default());
    }

    #[test]
    fn test_huge_market_variance_is_capped() {
        let config = CliArgs::try_parse_from([
            "program",
            "--market-variance",
            "100000000000000000000",
            "shipments.csv",
        ])
        .unwrap()
        .to_dispatch_config();
        assert_eq!(config.max_market_adjustment, MARKET_ADJUSTMENT_CAP);
    }

    #[rstest]
    #[case::missing_input(&["program"])]
    #[case::invalid_strategy(&["program", "--strategy", "invalid", "shipments.csv"])]
    #[case::invalid_format(&["program", "--format", "xml", "shipments.csv"])]
    #[case::invalid_seed(&["program", "--seed", "abc", "shipments.csv"])]
    fn test_parsing_errors(#[case] args: &[&str]) {
        assert!(CliArgs::try_parse_from(args).is_err());
    }
}
