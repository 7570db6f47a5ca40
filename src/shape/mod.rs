//! Shapes: the data layouts whose construction is benchmarked.
//!
//! A shape is a plain record of `i32` fields with either value semantics
//! (erased by boxing) or reference semantics (erased as a shared handle).
//! The [`catalog`] holds one erased [`ShapeDescriptor`] per registered shape
//! and plays the role of runtime type metadata for the factory strategies.

pub mod catalog;
pub mod samples;

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

pub use catalog::{DefaultPath, InitRoutine, ShapeCatalog, ShapeDescriptor};
pub use samples::{PinnedHandle, SixInts, SixIntsObject};

/// Upper bound on the number of fields a registered shape may declare.
pub const MAX_FIELDS: usize = 16;

/// How instances of a shape are handed out once erased
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// Copied by value, boxed when erased
    Value,
    /// Shared by reference, wrapped in an `Arc` when erased
    Reference,
}

/// One `i32` field of a shape
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    /// Byte offset from the start of the shape
    pub offset: usize,
}

impl Field {
    pub const fn new(name: &'static str, offset: usize) -> Self {
        Self { name, offset }
    }
}

/// Opaque identity of a shape, usable as a map key.
///
/// Equality and hashing only look at the underlying `TypeId`; the name is
/// carried for labels and error messages.
#[derive(Clone, Copy)]
pub struct ShapeId {
    type_id: TypeId,
    name: &'static str,
}

impl ShapeId {
    pub fn of<T: Shape>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: T::NAME,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }
}

impl PartialEq for ShapeId {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ShapeId {}

impl Hash for ShapeId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ShapeId({})", self.name)
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A record of `i32` fields that the factory strategies know how to build.
///
/// # Safety
///
/// `FIELDS` must list every field of the type with its exact byte offset,
/// every field must be an `i32`, and together the fields must cover the whole
/// value (no padding, no other members). Generated routines initialize a
/// value purely by writing those fields, so any other layout is undefined
/// behavior.
pub unsafe trait Shape: Any + Send + Sync + Sized {
    /// Name used in labels
    const NAME: &'static str;
    const KIND: ShapeKind;
    const FIELDS: &'static [Field];
    /// Zero-argument constructor, if the shape has one
    const CONSTRUCTOR: Option<fn() -> Self>;

    /// The all-zero value, built in place without touching the heap.
    fn zeroed() -> Self;

    /// Build a value from its field values in declaration order.
    /// `values` has exactly `FIELDS.len()` entries.
    fn from_fields(values: &[i32]) -> Self;

    /// Field values in declaration order
    fn field_values(&self) -> Vec<i32>;

    /// Move the value into the common erased representation.
    fn erase(self) -> Instance {
        match Self::KIND {
            ShapeKind::Value => Instance::Boxed(Box::new(self)),
            ShapeKind::Reference => Instance::Shared(Arc::new(self)),
        }
    }
}

/// Erased handle to a freshly constructed shape
pub enum Instance {
    /// A boxed value-semantics instance
    Boxed(Box<dyn Any + Send + Sync>),
    /// A shared reference-semantics instance
    Shared(Arc<dyn Any + Send + Sync>),
}

impl Instance {
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Instance::Boxed(value) => (**value).downcast_ref::<T>(),
            Instance::Shared(handle) => (**handle).downcast_ref::<T>(),
        }
    }

    pub fn is_shared(&self) -> bool {
        matches!(self, Instance::Shared(_))
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instance::Boxed(_) => f.write_str("Instance::Boxed(..)"),
            Instance::Shared(_) => f.write_str("Instance::Shared(..)"),
        }
    }
}
