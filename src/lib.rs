//! # factory-bench
//!
//! Micro-benchmarks for ways of producing a default instance of a data
//! shape: direct construction, reflective construction from a type
//! descriptor, a compiled construction expression, and a natively generated
//! init routine. A few reflective-style lookups are timed alongside.

pub mod cli;
pub mod config;
pub mod construction;
pub mod error;
pub mod factory;
pub mod harness;
pub mod reflection;
pub mod registry;
pub mod shape;
pub mod utils;

/// Re-export tui from utils
pub use utils::tui;

/// Re-export commonly used items
pub mod prelude {
    pub use crate::config::BenchConfig;
    pub use crate::error::{BenchError, Result};
    pub use crate::factory::{CompiledFactory, FactoryRegistry, Strategy};
    pub use crate::harness::Harness;
    pub use crate::registry::{build_registry, SuiteRegistry, SuiteRunner};
    pub use crate::shape::{Instance, Shape, ShapeCatalog, ShapeId};
    pub use crate::utils::{make_reporter, OutputFormat, Reporter, TrialResult};
}
