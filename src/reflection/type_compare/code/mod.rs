//! Type comparison variants

use std::any::{type_name, Any, TypeId};

use crate::registry::ProbeFn;
use crate::shape::SixInts;
use crate::utils::VariantInfo;

/// Erased value that can report its type both ways
pub trait Typed: Send + Sync {
    fn type_key(&self) -> TypeId;
    fn type_label(&self) -> &'static str;
}

/// Wrapper giving any value a [`Typed`] view
pub struct Erased<T>(pub T);

impl<T: Any + Send + Sync> Typed for Erased<T> {
    fn type_key(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn type_label(&self) -> &'static str {
        type_name::<T>()
    }
}

pub struct Fixture {
    items: Vec<Box<dyn Typed>>,
}

impl Fixture {
    /// `len` values cycling through four types, one in four a `String`
    pub fn mixed(len: usize) -> Self {
        let items = (0..len)
            .map(|i| -> Box<dyn Typed> {
                match i % 4 {
                    0 => Box::new(Erased(i as u32)),
                    1 => Box::new(Erased(format!("item-{}", i))),
                    2 => Box::new(Erased(i as f64)),
                    _ => Box::new(Erased(SixInts::default())),
                }
            })
            .collect();
        Self { items }
    }
}

pub fn by_type_id(f: &Fixture) -> u64 {
    let wanted = TypeId::of::<String>();
    f.items.iter().filter(|item| item.type_key() == wanted).count() as u64
}

pub fn by_type_name(f: &Fixture) -> u64 {
    let wanted = type_name::<String>();
    f.items
        .iter()
        .filter(|item| item.type_label() == wanted)
        .count() as u64
}

/// Returns all available variants
pub fn get_variants() -> Vec<VariantInfo<ProbeFn<Fixture>>> {
    vec![
        VariantInfo {
            name: "type-id",
            description: "TypeId equality",
            function: by_type_id,
        },
        VariantInfo {
            name: "type-name",
            description: "Type-name string equality",
            function: by_type_name,
        },
    ]
}
