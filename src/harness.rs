//! The benchmark entry point.
//!
//! A [`Harness`] owns the shape catalog, the factory registries and the
//! suite registry. Nothing is global: two harnesses never share a cache.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::config::BenchConfig;
use crate::error::{BenchError, Result};
use crate::factory::FactoryRegistry;
use crate::registry::{build_registry, SuiteContext, SuiteRegistry, SuiteRunner, Trial};
use crate::shape::ShapeCatalog;
use crate::utils::{Reporter, TrialResult, TrialRunner};

pub struct Harness {
    config: BenchConfig,
    suites: SuiteRegistry,
    factories: FactoryRegistry,
}

impl Harness {
    /// Harness over every built-in suite
    pub fn new(config: BenchConfig) -> Result<Self> {
        Self::with_registry(config, build_registry())
    }

    /// Harness over a custom suite registry. Unknown suite names in the
    /// configuration are rejected here.
    pub fn with_registry(config: BenchConfig, suites: SuiteRegistry) -> Result<Self> {
        select_suites(&suites, &config.suites)?;
        let catalog = Arc::new(ShapeCatalog::with_samples()?);
        debug!(shapes = catalog.len(), "Shape catalog ready");

        Ok(Self {
            config,
            suites,
            factories: FactoryRegistry::new(catalog),
        })
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    pub fn suites(&self) -> &SuiteRegistry {
        &self.suites
    }

    pub fn factories(&self) -> &FactoryRegistry {
        &self.factories
    }

    /// Run the selected suites in registry order, reporting each trial as it
    /// completes. The first failing trial stops the run and is returned.
    /// The reporter is finished either way.
    pub fn run(&mut self, reporter: &mut dyn Reporter) -> Result<Vec<TrialResult>> {
        let mut results = Vec::new();
        let outcome = self.run_suites(reporter, &mut results);
        let finished = reporter.finish();

        if let Err(e) = &outcome {
            debug!(trials = results.len(), error = %e, "Run aborted");
        }
        outcome?;
        finished?;

        info!(trials = results.len(), "Run complete");
        Ok(results)
    }

    fn run_suites(
        &mut self,
        reporter: &mut dyn Reporter,
        results: &mut Vec<TrialResult>,
    ) -> Result<()> {
        let Self {
            config,
            suites,
            factories,
        } = self;

        let runner = TrialRunner::new(config.pin);
        let mut rng = config.seed.map(StdRng::seed_from_u64);

        for suite in select_suites(suites, &config.suites)? {
            info!(
                suite = suite.name(),
                iterations = config.iterations,
                "Running suite"
            );

            let mut ctx = SuiteContext {
                factories: &mut *factories,
                strategies: &config.strategies,
            };
            let mut trials = suite.trials(&mut ctx)?;
            if let Some(rng) = rng.as_mut() {
                trials.shuffle(rng);
            }

            reporter.begin_suite(suite, config.iterations)?;
            for Trial { label, body } in trials {
                let result = runner.run(label, config.iterations, body)?;
                debug!(
                    trial = %result.label,
                    elapsed_ns = result.nanos() as u64,
                    "Trial complete"
                );
                reporter.report(&result)?;
                results.push(result);
            }
        }

        Ok(())
    }

    /// Verify every selected suite; returns how many were checked.
    pub fn verify(&mut self) -> Result<usize> {
        let Self {
            config,
            suites,
            factories,
        } = self;

        let selected = select_suites(suites, &config.suites)?;
        for suite in &selected {
            info!(suite = suite.name(), "Verifying suite");
            let mut ctx = SuiteContext {
                factories: &mut *factories,
                strategies: &config.strategies,
            };
            suite.verify(&mut ctx)?;
        }
        Ok(selected.len())
    }
}

/// Suites named in `names`, in registry order; all of them when `names` is
/// empty.
pub fn select_suites<'r>(
    registry: &'r SuiteRegistry,
    names: &[String],
) -> Result<Vec<&'r dyn SuiteRunner>> {
    if let Some(unknown) = names.iter().find(|name| registry.find(name).is_none()) {
        return Err(BenchError::UnknownSuite(unknown.clone()));
    }

    Ok(registry
        .all()
        .iter()
        .map(|suite| suite.as_ref())
        .filter(|suite| names.is_empty() || names.iter().any(|name| name == suite.name()))
        .collect())
}
