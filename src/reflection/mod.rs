//! Reflective-style lookups timed against their direct counterparts.
//!
//! Each probe is a suite of interchangeable variants over one fixture: the
//! variants compute the same value, only the way they get there differs.

pub mod enum_lookup;
pub mod invocation;
pub mod null_check;
pub mod scene_lookup;
pub mod type_compare;
