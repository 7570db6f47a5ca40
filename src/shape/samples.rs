//! Sample shapes used by the construction suite.

use std::mem::offset_of;

use super::{Field, Shape, ShapeKind};

fn six(values: &[i32]) -> [i32; 6] {
    let mut out = [0; 6];
    out.copy_from_slice(&values[..6]);
    out
}

/// Six integer fields with value semantics.
///
/// Like a plain struct in most runtimes it has no constructor of its own;
/// its default instance is the all-zero value.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SixInts {
    pub a: i32,
    pub b: i32,
    pub c: i32,
    pub d: i32,
    pub e: i32,
    pub f: i32,
}

unsafe impl Shape for SixInts {
    const NAME: &'static str = "SixInts";
    const KIND: ShapeKind = ShapeKind::Value;
    const FIELDS: &'static [Field] = &[
        Field::new("a", offset_of!(SixInts, a)),
        Field::new("b", offset_of!(SixInts, b)),
        Field::new("c", offset_of!(SixInts, c)),
        Field::new("d", offset_of!(SixInts, d)),
        Field::new("e", offset_of!(SixInts, e)),
        Field::new("f", offset_of!(SixInts, f)),
    ];
    const CONSTRUCTOR: Option<fn() -> Self> = None;

    fn zeroed() -> Self {
        Self::default()
    }

    fn from_fields(values: &[i32]) -> Self {
        let [a, b, c, d, e, f] = six(values);
        Self { a, b, c, d, e, f }
    }

    fn field_values(&self) -> Vec<i32> {
        vec![self.a, self.b, self.c, self.d, self.e, self.f]
    }
}

/// Six integer fields with reference semantics and a public
/// zero-argument constructor.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub struct SixIntsObject {
    pub a: i32,
    pub b: i32,
    pub c: i32,
    pub d: i32,
    pub e: i32,
    pub f: i32,
}

impl SixIntsObject {
    pub fn new() -> Self {
        Self {
            a: 0,
            b: 0,
            c: 0,
            d: 0,
            e: 0,
            f: 0,
        }
    }
}

impl Default for SixIntsObject {
    fn default() -> Self {
        Self::new()
    }
}

unsafe impl Shape for SixIntsObject {
    const NAME: &'static str = "SixIntsObject";
    const KIND: ShapeKind = ShapeKind::Reference;
    const FIELDS: &'static [Field] = &[
        Field::new("a", offset_of!(SixIntsObject, a)),
        Field::new("b", offset_of!(SixIntsObject, b)),
        Field::new("c", offset_of!(SixIntsObject, c)),
        Field::new("d", offset_of!(SixIntsObject, d)),
        Field::new("e", offset_of!(SixIntsObject, e)),
        Field::new("f", offset_of!(SixIntsObject, f)),
    ];
    const CONSTRUCTOR: Option<fn() -> Self> = Some(SixIntsObject::new);

    fn zeroed() -> Self {
        Self::new()
    }

    fn from_fields(values: &[i32]) -> Self {
        let [a, b, c, d, e, f] = six(values);
        Self { a, b, c, d, e, f }
    }

    fn field_values(&self) -> Vec<i32> {
        vec![self.a, self.b, self.c, self.d, self.e, self.f]
    }
}

/// Reference shape that can only be built from an explicit id, so it has
/// no default-construction path at all.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub struct PinnedHandle {
    pub id: i32,
    pub generation: i32,
}

impl PinnedHandle {
    pub fn new(id: i32) -> Self {
        Self { id, generation: 1 }
    }
}

unsafe impl Shape for PinnedHandle {
    const NAME: &'static str = "PinnedHandle";
    const KIND: ShapeKind = ShapeKind::Reference;
    const FIELDS: &'static [Field] = &[
        Field::new("id", offset_of!(PinnedHandle, id)),
        Field::new("generation", offset_of!(PinnedHandle, generation)),
    ];
    const CONSTRUCTOR: Option<fn() -> Self> = None;

    fn zeroed() -> Self {
        Self { id: 0, generation: 0 }
    }

    fn from_fields(values: &[i32]) -> Self {
        Self {
            id: values[0],
            generation: values[1],
        }
    }

    fn field_values(&self) -> Vec<i32> {
        vec![self.id, self.generation]
    }
}
