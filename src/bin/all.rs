//! CLI for running the benchmark suites.
//!
//! Usage:
//!   factory-bench                          # Run every suite
//!   factory-bench --list                   # List available suites
//!   factory-bench construction -s generated -f table
//!   factory-bench --verify                 # Check that variants agree
//!   factory-bench --help                   # Show help

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use factory_bench::cli::Cli;
use factory_bench::error::Result;
use factory_bench::harness::Harness;
use factory_bench::tui;
use factory_bench::utils::make_reporter;

fn setup_tracing(directive: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let list = cli.list;
    let verify = cli.verify;
    let mut harness = Harness::new(cli.into_config()?)?;

    if list {
        tui::print_available_suites(harness.suites());
        return Ok(());
    }

    if verify {
        let checked = harness.verify()?;
        println!("✅ {} suites passed verification", checked);
        return Ok(());
    }

    let stdout = io::stdout();
    let mut reporter = make_reporter(harness.config().format, stdout.lock());
    harness.run(reporter.as_mut())?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_tracing(cli.log_filter());

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
