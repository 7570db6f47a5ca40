//! # Type comparison
//!
//! Is this erased value a `String`? Asked by comparing `TypeId`s and by
//! comparing type-name strings.

pub mod code;
pub mod test;

use std::sync::Arc;

use crate::error::Result;
use crate::registry::{variant_trials, SuiteContext, SuiteRunner, Trial};

pub struct TypeCompareRunner;

impl SuiteRunner for TypeCompareRunner {
    fn name(&self) -> &'static str {
        "type_compare"
    }

    fn description(&self) -> &'static str {
        "Type identity by TypeId vs by type-name string"
    }

    fn category(&self) -> &'static str {
        "reflection"
    }

    fn available_variants(&self) -> Vec<&'static str> {
        code::get_variants().iter().map(|v| v.name).collect()
    }

    fn trials<'a>(&'a self, _ctx: &mut SuiteContext<'_>) -> Result<Vec<Trial<'a>>> {
        let fixture = Arc::new(code::Fixture::mixed(64));
        Ok(variant_trials(self.name(), fixture, code::get_variants()))
    }

    fn verify(&self, _ctx: &mut SuiteContext<'_>) -> Result<()> {
        test::verify_all()
    }
}
