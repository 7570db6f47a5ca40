//! # Scene lookup
//!
//! Finding an object by name and one of its components by type on every
//! call, against keeping the object handle or the component slot around.

pub mod code;
pub mod test;

use std::sync::Arc;

use crate::error::Result;
use crate::registry::{variant_trials, SuiteContext, SuiteRunner, Trial};

pub struct SceneLookupRunner;

impl SuiteRunner for SceneLookupRunner {
    fn name(&self) -> &'static str {
        "scene_lookup"
    }

    fn description(&self) -> &'static str {
        "Scene object and component lookup per call vs cached handles"
    }

    fn category(&self) -> &'static str {
        "reflection"
    }

    fn available_variants(&self) -> Vec<&'static str> {
        code::get_variants().iter().map(|v| v.name).collect()
    }

    fn trials<'a>(&'a self, _ctx: &mut SuiteContext<'_>) -> Result<Vec<Trial<'a>>> {
        let fixture = Arc::new(code::Fixture::new(code::SCENE_SIZE, code::SCENE_SIZE - 56));
        Ok(variant_trials(self.name(), fixture, code::get_variants()))
    }

    fn verify(&self, _ctx: &mut SuiteContext<'_>) -> Result<()> {
        test::verify_all()
    }
}
