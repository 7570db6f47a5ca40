//! Tests for the construction suite

use crate::error::{BenchError, Result};
use crate::factory::{FactoryRegistry, Strategy};
use crate::shape::{PinnedHandle, ShapeId};

use super::sample_shapes;

const SUITE: &str = "construction";

fn mismatch(reason: String) -> BenchError {
    BenchError::Verification {
        suite: SUITE,
        reason,
    }
}

/// Verify every selected strategy produces all-zero instances that agree
/// with direct construction, and that shapes without a default path are
/// refused by all of them.
pub fn verify_all(factories: &mut FactoryRegistry, strategies: &[Strategy]) -> Result<()> {
    for shape in sample_shapes() {
        let descriptor = factories.catalog().descriptor(shape)?;
        let zeros = vec![0; descriptor.fields().len()];
        let reference = descriptor.field_values(&descriptor.default_fn()());

        if reference.as_ref() != Some(&zeros) {
            return Err(mismatch(format!(
                "direct construction of '{}' is not zeroed: {:?}",
                shape, reference
            )));
        }

        for &strategy in strategies {
            let factory = factories.get_or_create(strategy, shape)?;
            let instance = factory.create()?;
            let values = factories.catalog().descriptor(shape)?.field_values(&instance);

            if values != reference {
                return Err(mismatch(format!(
                    "'{}' built {:?} for '{}', expected {:?}",
                    strategy, values, shape, reference
                )));
            }
        }
    }

    let pinned = ShapeId::of::<PinnedHandle>();
    for &strategy in strategies {
        match factories.get_or_create(strategy, pinned) {
            Err(BenchError::ConstructionUnavailable { .. }) => {}
            Err(other) => return Err(other),
            Ok(_) => {
                return Err(mismatch(format!(
                    "'{}' built '{}' without a default path",
                    strategy, pinned
                )))
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::construction::ConstructionRunner;
    use crate::registry::{SuiteContext, SuiteRunner};
    use crate::shape::{ShapeCatalog, SixInts, SixIntsObject};
    use std::sync::Arc;

    fn factories() -> FactoryRegistry {
        FactoryRegistry::new(Arc::new(ShapeCatalog::with_samples().unwrap()))
    }

    #[test]
    fn test_all_strategies() {
        let mut factories = factories();
        verify_all(&mut factories, &Strategy::ALL).expect("All strategies should agree");
    }

    #[test]
    fn test_trial_order_and_labels() {
        let mut factories = factories();
        let mut ctx = SuiteContext {
            factories: &mut factories,
            strategies: &Strategy::ALL,
        };
        let runner = ConstructionRunner;
        let labels: Vec<String> = runner
            .trials(&mut ctx)
            .unwrap()
            .into_iter()
            .map(|t| t.label)
            .collect();

        assert_eq!(
            labels,
            vec![
                "generated/SixInts",
                "generated/SixIntsObject",
                "expression/SixInts",
                "expression/SixIntsObject",
                "expression-uncached/SixInts",
                "expression-uncached/SixIntsObject",
                "reflective/SixInts",
                "reflective/SixIntsObject",
                "direct/SixInts",
                "direct/SixIntsObject",
            ]
        );
    }

    #[test]
    fn test_strategy_filter() {
        let mut factories = factories();
        let mut ctx = SuiteContext {
            factories: &mut factories,
            strategies: &[Strategy::Reflective],
        };
        let runner = ConstructionRunner;
        let trials = runner.trials(&mut ctx).unwrap();
        assert_eq!(trials.len(), 2);
        assert!(trials.iter().all(|t| t.label.starts_with("reflective/")));
        assert_eq!(factories.cached(Strategy::Expression), 0);
    }

    #[test]
    fn test_trials_compile_once() {
        let mut factories = factories();
        let runner = ConstructionRunner;
        for _ in 0..3 {
            let mut ctx = SuiteContext {
                factories: &mut factories,
                strategies: &Strategy::ALL,
            };
            let mut trials = runner.trials(&mut ctx).unwrap();
            for trial in &mut trials {
                (trial.body)().unwrap();
            }
        }
        assert_eq!(factories.insertions(Strategy::Expression), 2);
        assert_eq!(factories.insertions(Strategy::Generated), 2);
    }

    #[test]
    fn test_expression_compiled_end_to_end() {
        let mut factories = factories();
        for shape in [ShapeId::of::<SixInts>(), ShapeId::of::<SixIntsObject>()] {
            let factory = factories.get_or_create(Strategy::Expression, shape).unwrap();
            let instance = factory.create().unwrap();
            let values = factories.catalog().descriptor(shape).unwrap().field_values(&instance);
            assert_eq!(values, Some(vec![0; 6]));
        }
    }
}
