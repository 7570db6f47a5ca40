//! # Construction suite
//!
//! Times default construction of the sample shapes through every selected
//! factory strategy. Trials run strategy by strategy, value shape before
//! reference shape:
//!
//! 1. `generated`: native init routine, compiled once per shape
//! 2. `expression`: compiled construction closure, cached per shape
//! 3. `expression-uncached`: the same expression recompiled on every call
//! 4. `reflective`: catalog lookup and field-list construction on every call
//! 5. `direct`: the shape's own default construction, as baseline

pub mod test;

use std::hint::black_box;

use crate::error::Result;
use crate::factory::expr::{self, Expr};
use crate::factory::Strategy;
use crate::registry::{SuiteContext, SuiteRunner, Trial};
use crate::shape::{ShapeId, SixInts, SixIntsObject};

/// Label of the trial that recompiles the expression every iteration
pub const EXPRESSION_UNCACHED: &str = "expression-uncached";

/// Strategies in trial order
pub const TRIAL_ORDER: [Strategy; 4] = [
    Strategy::Generated,
    Strategy::Expression,
    Strategy::Reflective,
    Strategy::Direct,
];

/// Shapes every strategy is timed on
pub fn sample_shapes() -> [ShapeId; 2] {
    [ShapeId::of::<SixInts>(), ShapeId::of::<SixIntsObject>()]
}

pub struct ConstructionRunner;

impl SuiteRunner for ConstructionRunner {
    fn name(&self) -> &'static str {
        "construction"
    }

    fn description(&self) -> &'static str {
        "Default construction of six-int shapes through each factory strategy"
    }

    fn category(&self) -> &'static str {
        "factory"
    }

    fn available_variants(&self) -> Vec<&'static str> {
        let mut variants = Vec::new();
        for strategy in TRIAL_ORDER {
            variants.push(strategy.tag());
            if strategy == Strategy::Expression {
                variants.push(EXPRESSION_UNCACHED);
            }
        }
        variants
    }

    fn trials<'a>(&'a self, ctx: &mut SuiteContext<'_>) -> Result<Vec<Trial<'a>>> {
        let mut trials = Vec::new();

        for strategy in TRIAL_ORDER {
            if !ctx.strategies.contains(&strategy) {
                continue;
            }

            for shape in sample_shapes() {
                // Resolved outside the timed loop so compilation is paid here
                let factory = ctx.factories.get_or_create(strategy, shape)?;
                trials.push(Trial::new(
                    format!("{}/{}", strategy, shape),
                    move || {
                        black_box(factory.create()?);
                        Ok(())
                    },
                ));
            }

            if strategy == Strategy::Expression {
                for shape in sample_shapes() {
                    trials.push(uncached_expression_trial(ctx, shape));
                }
            }
        }

        Ok(trials)
    }

    fn verify(&self, ctx: &mut SuiteContext<'_>) -> Result<()> {
        test::verify_all(ctx.factories, ctx.strategies)
    }
}

fn uncached_expression_trial(ctx: &SuiteContext<'_>, shape: ShapeId) -> Trial<'static> {
    let catalog = ctx.factories.catalog_handle();
    Trial::new(format!("{}/{}", EXPRESSION_UNCACHED, shape), move || {
        let expr = Expr::default_of(catalog.descriptor(shape)?)?;
        let compiled = expr::compile(&expr, &catalog)?;
        black_box(compiled());
        Ok(())
    })
}
