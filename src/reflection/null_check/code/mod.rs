//! Null check variants

use std::sync::{Arc, Weak};

use crate::registry::ProbeFn;
use crate::utils::VariantInfo;

/// Slots per fixture
pub const SLOTS: usize = 64;

pub struct Entity {
    pub id: usize,
}

/// Every `every`-th slot is empty (or destroyed, for the weak handles).
pub struct Fixture {
    optional: Vec<Option<Arc<Entity>>>,
    handles: Vec<Weak<Entity>>,
    // Keeps the live half of `handles` alive
    _owners: Vec<Arc<Entity>>,
}

impl Fixture {
    pub fn new(slots: usize, every: usize) -> Self {
        let every = every.max(1);
        let mut optional = Vec::with_capacity(slots);
        let mut handles = Vec::with_capacity(slots);
        let mut owners = Vec::new();

        for id in 0..slots {
            let entity = Arc::new(Entity { id });
            handles.push(Arc::downgrade(&entity));
            if id % every == 0 {
                optional.push(None);
            } else {
                optional.push(Some(Arc::clone(&entity)));
                owners.push(entity);
            }
        }

        Self {
            optional,
            handles,
            _owners: owners,
        }
    }
}

pub fn option_is_some(f: &Fixture) -> u64 {
    f.optional.iter().filter(|slot| slot.is_some()).count() as u64
}

pub fn weak_upgrade(f: &Fixture) -> u64 {
    f.handles.iter().filter(|h| h.upgrade().is_some()).count() as u64
}

pub fn weak_strong_count(f: &Fixture) -> u64 {
    f.handles.iter().filter(|h| h.strong_count() > 0).count() as u64
}

/// Returns all available variants
pub fn get_variants() -> Vec<VariantInfo<ProbeFn<Fixture>>> {
    vec![
        VariantInfo {
            name: "option-is-some",
            description: "Emptiness test on an Option",
            function: option_is_some,
        },
        VariantInfo {
            name: "weak-upgrade",
            description: "Liveness by upgrading a Weak handle",
            function: weak_upgrade,
        },
        VariantInfo {
            name: "weak-strong-count",
            description: "Liveness by reading the strong count",
            function: weak_strong_count,
        },
    ]
}
