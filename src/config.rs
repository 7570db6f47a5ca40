//! Benchmark configuration.

use crate::factory::Strategy;
use crate::utils::{OutputFormat, PinStrategy};

/// Iterations per trial unless told otherwise
pub const DEFAULT_ITERATIONS: usize = 100_000;

/// Everything a [`Harness`](crate::harness::Harness) run depends on
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BenchConfig {
    /// Body invocations per trial
    pub iterations: usize,
    /// Suite names to run; empty means all, in registry order
    pub suites: Vec<String>,
    /// Strategies timed by the construction suite
    pub strategies: Vec<Strategy>,
    pub format: OutputFormat,
    /// Shuffle trials within each suite when set
    pub seed: Option<u64>,
    pub pin: PinStrategy,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            suites: Vec::new(),
            strategies: Strategy::ALL.to_vec(),
            format: OutputFormat::Text,
            seed: None,
            pin: PinStrategy::None,
        }
    }
}

impl BenchConfig {
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_suites<I, S>(mut self, suites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suites = suites.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_strategies(mut self, strategies: &[Strategy]) -> Self {
        self.strategies = strategies.to_vec();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
