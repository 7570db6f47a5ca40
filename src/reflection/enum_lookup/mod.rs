//! # Enum lookup
//!
//! Resolving a variant name to its underlying discriminant: scanning the
//! variant table on every call, a map built once, and a plain cast when the
//! variant is already known.

pub mod code;
pub mod test;

use std::sync::Arc;

use crate::error::Result;
use crate::registry::{variant_trials, SuiteContext, SuiteRunner, Trial};

pub struct EnumLookupRunner;

impl SuiteRunner for EnumLookupRunner {
    fn name(&self) -> &'static str {
        "enum_lookup"
    }

    fn description(&self) -> &'static str {
        "Enum name to discriminant by table scan, cached map or direct cast"
    }

    fn category(&self) -> &'static str {
        "reflection"
    }

    fn available_variants(&self) -> Vec<&'static str> {
        code::get_variants().iter().map(|v| v.name).collect()
    }

    fn trials<'a>(&'a self, _ctx: &mut SuiteContext<'_>) -> Result<Vec<Trial<'a>>> {
        let fixture = Arc::new(code::Fixture::all_layers());
        Ok(variant_trials(self.name(), fixture, code::get_variants()))
    }

    fn verify(&self, _ctx: &mut SuiteContext<'_>) -> Result<()> {
        test::verify_all()
    }
}
