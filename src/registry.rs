//! Suite registry for dynamic suite discovery and execution.
//!
//! A suite turns into a list of [`Trial`]s, each a label plus a body the
//! trial runner calls once per iteration.

use std::hint::black_box;
use std::sync::Arc;

use crate::error::{BenchError, Result};
use crate::factory::{FactoryRegistry, Strategy};
use crate::utils::VariantInfo;

/// One timed trial: the runner calls `body` once per iteration.
pub struct Trial<'a> {
    pub label: String,
    pub body: Box<dyn FnMut() -> Result<()> + 'a>,
}

impl<'a> Trial<'a> {
    pub fn new<F>(label: impl Into<String>, body: F) -> Self
    where
        F: FnMut() -> Result<()> + 'a,
    {
        Self {
            label: label.into(),
            body: Box::new(body),
        }
    }
}

/// State a suite may draw on while building its trials.
pub struct SuiteContext<'r> {
    pub factories: &'r mut FactoryRegistry,
    /// Strategies selected for the construction suite
    pub strategies: &'r [Strategy],
}

/// Trait that all benchmark suites must implement
pub trait SuiteRunner: Send + Sync {
    /// Name of the suite (e.g., "construction")
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// Category (e.g., "factory", "reflection")
    fn category(&self) -> &'static str;

    /// Get list of available variant names
    fn available_variants(&self) -> Vec<&'static str>;

    /// Build the trials of this suite, in their natural order.
    /// Factories needed by the bodies are resolved here, before timing.
    fn trials<'a>(&'a self, ctx: &mut SuiteContext<'_>) -> Result<Vec<Trial<'a>>>;

    /// Verify that all variants agree
    fn verify(&self, ctx: &mut SuiteContext<'_>) -> Result<()>;
}

/// Registry of all suites
pub struct SuiteRegistry {
    suites: Vec<Box<dyn SuiteRunner>>,
}

impl SuiteRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self { suites: Vec::new() }
    }

    /// Register a suite
    pub fn register<S: SuiteRunner + 'static>(&mut self, suite: S) {
        self.suites.push(Box::new(suite));
    }

    /// Get all registered suites
    pub fn all(&self) -> &[Box<dyn SuiteRunner>] {
        &self.suites
    }

    /// Find suite by name
    pub fn find(&self, name: &str) -> Option<&dyn SuiteRunner> {
        self.suites
            .iter()
            .find(|s| s.name() == name)
            .map(|s| s.as_ref())
    }

    /// List suite names
    pub fn list_names(&self) -> Vec<&'static str> {
        self.suites.iter().map(|s| s.name()).collect()
    }

    /// List suites by category
    pub fn by_category(&self, category: &str) -> Vec<&dyn SuiteRunner> {
        self.suites
            .iter()
            .filter(|s| s.category() == category)
            .map(|s| s.as_ref())
            .collect()
    }
}

impl Default for SuiteRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Probe variant over a shared fixture; the returned value keeps the work
/// observable.
pub type ProbeFn<T> = fn(&T) -> u64;

/// One trial per variant, labelled `<suite>/<variant>`.
pub fn variant_trials<T>(
    suite: &str,
    fixture: Arc<T>,
    variants: Vec<VariantInfo<ProbeFn<T>>>,
) -> Vec<Trial<'static>>
where
    T: Send + Sync + 'static,
{
    variants
        .into_iter()
        .map(|v| {
            let fixture = Arc::clone(&fixture);
            let func = v.function;
            Trial::new(format!("{}/{}", suite, v.name), move || {
                black_box(func(black_box(&*fixture)));
                Ok(())
            })
        })
        .collect()
}

/// Check that every variant returns the same value as the first one.
pub fn verify_variants<T>(
    suite: &'static str,
    fixture: &T,
    variants: &[VariantInfo<ProbeFn<T>>],
) -> Result<()> {
    let Some(reference) = variants.first() else {
        return Ok(());
    };
    let expected = (reference.function)(fixture);

    for variant in &variants[1..] {
        let actual = (variant.function)(fixture);
        if actual != expected {
            return Err(BenchError::Verification {
                suite,
                reason: format!(
                    "variant '{}' returned {}, '{}' returned {}",
                    variant.name, actual, reference.name, expected
                ),
            });
        }
    }

    Ok(())
}

/// Build the default registry with all suites
pub fn build_registry() -> SuiteRegistry {
    let mut registry = SuiteRegistry::new();

    // Register all suites here
    registry.register(crate::construction::ConstructionRunner);
    registry.register(crate::reflection::invocation::InvocationRunner);
    registry.register(crate::reflection::enum_lookup::EnumLookupRunner);
    registry.register(crate::reflection::scene_lookup::SceneLookupRunner);
    registry.register(crate::reflection::null_check::NullCheckRunner);
    registry.register(crate::reflection::type_compare::TypeCompareRunner);

    registry
}
