//! # Null check
//!
//! An object can be absent (`None`) or destroyed while still referenced
//! (a `Weak` whose owner is gone). The probe times the plain emptiness test
//! against the two ways of asking a weak handle whether its target lives.

pub mod code;
pub mod test;

use std::sync::Arc;

use crate::error::Result;
use crate::registry::{variant_trials, SuiteContext, SuiteRunner, Trial};

pub struct NullCheckRunner;

impl SuiteRunner for NullCheckRunner {
    fn name(&self) -> &'static str {
        "null_check"
    }

    fn description(&self) -> &'static str {
        "Option emptiness vs liveness through weak handles"
    }

    fn category(&self) -> &'static str {
        "reflection"
    }

    fn available_variants(&self) -> Vec<&'static str> {
        code::get_variants().iter().map(|v| v.name).collect()
    }

    fn trials<'a>(&'a self, _ctx: &mut SuiteContext<'_>) -> Result<Vec<Trial<'a>>> {
        let fixture = Arc::new(code::Fixture::new(code::SLOTS, 2));
        Ok(variant_trials(self.name(), fixture, code::get_variants()))
    }

    fn verify(&self, _ctx: &mut SuiteContext<'_>) -> Result<()> {
        test::verify_all()
    }
}
