//! Command-line arguments of the `factory-bench` binary.

use clap::builder::RangedU64ValueParser;
use clap::Parser;

use crate::config::{BenchConfig, DEFAULT_ITERATIONS};
use crate::error::Result;
use crate::factory::Strategy;
use crate::utils::{OutputFormat, PinStrategy};

#[derive(Debug, Parser)]
#[command(name = "factory-bench")]
#[command(about = "Times object-factory strategies and reflective-style lookups")]
#[command(version)]
pub struct Cli {
    /// Suites to run (all when omitted)
    pub suites: Vec<String>,

    /// Body invocations per trial
    #[arg(short = 'n', long, default_value_t = DEFAULT_ITERATIONS,
          value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub iterations: usize,

    /// Restrict the construction suite to a strategy (repeatable)
    #[arg(short, long = "strategy", value_name = "TAG")]
    pub strategies: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Shuffle trial order within each suite with this seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// CPU pinning around trials
    #[arg(long, value_enum, default_value_t = PinStrategy::None)]
    pub pin: PinStrategy,

    /// Verify that all variants agree instead of timing them
    #[arg(long)]
    pub verify: bool,

    /// List available suites
    #[arg(short, long)]
    pub list: bool,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Log directive used when `RUST_LOG` is unset. Scoped to this crate so
    /// dependency logs (JIT listings included) stay off unless asked for.
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            concat!(env!("CARGO_CRATE_NAME"), "=debug")
        } else {
            concat!(env!("CARGO_CRATE_NAME"), "=info")
        }
    }

    /// Resolve arguments into a configuration. Strategy tags are parsed
    /// here so an unknown tag fails before anything runs.
    pub fn into_config(self) -> Result<BenchConfig> {
        let strategies = if self.strategies.is_empty() {
            Strategy::ALL.to_vec()
        } else {
            self.strategies
                .iter()
                .map(|tag| tag.parse())
                .collect::<Result<Vec<Strategy>>>()?
        };

        Ok(BenchConfig {
            iterations: self.iterations,
            suites: self.suites,
            strategies,
            format: self.format,
            seed: self.seed,
            pin: self.pin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BenchError;

    fn parse(args: &[&str]) -> std::result::Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("factory-bench").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults_match_config() {
        let config = parse(&[]).unwrap().into_config().unwrap();
        assert_eq!(config, BenchConfig::default());
    }

    #[test]
    fn test_full_invocation() {
        let cli = parse(&[
            "-n", "1000", "-s", "expression", "--strategy", "Generated", "-f", "csv", "--seed",
            "7", "--pin", "per-trial", "construction", "null_check",
        ])
        .unwrap();
        assert!(!cli.verify && !cli.list && !cli.verbose);

        let config = cli.into_config().unwrap();
        assert_eq!(config.iterations, 1000);
        assert_eq!(config.strategies, vec![Strategy::Expression, Strategy::Generated]);
        assert_eq!(config.format, OutputFormat::Csv);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.pin, PinStrategy::PerTrial);
        assert_eq!(config.suites, vec!["construction", "null_check"]);
    }

    #[test]
    fn test_zero_iterations_rejected() {
        assert!(parse(&["-n", "0"]).is_err());
    }

    #[test]
    fn test_unknown_strategy() {
        let err = parse(&["-s", "activator"]).unwrap().into_config().unwrap_err();
        assert!(matches!(err, BenchError::UnknownStrategy(tag) if tag == "activator"));
    }

    #[test]
    fn test_flags() {
        let cli = parse(&["--verify", "-l", "-v"]).unwrap();
        assert!(cli.verify && cli.list && cli.verbose);
    }

    #[test]
    fn test_log_filter_scoped_to_crate() {
        let quiet = parse(&[]).unwrap();
        let verbose = parse(&["-v"]).unwrap();
        assert_eq!(quiet.log_filter(), "factory_bench=info");
        assert_eq!(verbose.log_filter(), "factory_bench=debug");

        for cli in [quiet, verbose] {
            assert!(tracing_subscriber::EnvFilter::try_new(cli.log_filter()).is_ok());
        }
    }
}
