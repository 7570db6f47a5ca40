//! # Method invocation
//!
//! Calling the same method directly, through a function pointer, through a
//! trait object, and through a name-keyed method table (looked up on every
//! call, or resolved once up front).

pub mod code;
pub mod test;

use std::sync::Arc;

use crate::error::Result;
use crate::registry::{variant_trials, SuiteContext, SuiteRunner, Trial};

pub struct InvocationRunner;

impl SuiteRunner for InvocationRunner {
    fn name(&self) -> &'static str {
        "invocation"
    }

    fn description(&self) -> &'static str {
        "Direct call vs function pointer vs trait object vs method lookup by name"
    }

    fn category(&self) -> &'static str {
        "reflection"
    }

    fn available_variants(&self) -> Vec<&'static str> {
        code::get_variants().iter().map(|v| v.name).collect()
    }

    fn trials<'a>(&'a self, _ctx: &mut SuiteContext<'_>) -> Result<Vec<Trial<'a>>> {
        let fixture = Arc::new(code::Fixture::new(7, 35));
        Ok(variant_trials(self.name(), fixture, code::get_variants()))
    }

    fn verify(&self, _ctx: &mut SuiteContext<'_>) -> Result<()> {
        test::verify_all()
    }
}
