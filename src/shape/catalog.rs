//! Shape catalog: erased runtime descriptors keyed by shape identity.

use std::collections::HashMap;
use std::mem::{size_of, MaybeUninit};

use tracing::debug;

use super::{
    Field, Instance, PinnedHandle, Shape, ShapeId, ShapeKind, SixInts, SixIntsObject, MAX_FIELDS,
};
use crate::error::{BenchError, Result};

/// Native routine that initializes a shape in place through an out pointer.
pub type InitRoutine = unsafe extern "C" fn(*mut u8);

/// How a default instance of a shape is obtained
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DefaultPath {
    /// Call the shape's zero-argument constructor
    Constructor,
    /// Set every field to zero (value shapes only)
    Zeroed,
}

/// Erased description of a registered shape.
///
/// Built once per shape by [`ShapeDescriptor::of`]. Every entry point is a
/// monomorphized function pointer, so the descriptor needs no generic
/// parameter.
pub struct ShapeDescriptor {
    id: ShapeId,
    kind: ShapeKind,
    fields: &'static [Field],
    size: usize,
    constructor: Option<fn() -> Instance>,
    construct_into: Option<InitRoutine>,
    default_instance: fn() -> Instance,
    from_fields: fn(&[i32]) -> Instance,
    field_values: fn(&Instance) -> Option<Vec<i32>>,
    assemble: unsafe fn(InitRoutine) -> Instance,
}

impl ShapeDescriptor {
    /// Describe `T`, checking that its field table matches its layout.
    pub fn of<T: Shape>() -> Result<Self> {
        validate_layout::<T>()?;

        Ok(Self {
            id: ShapeId::of::<T>(),
            kind: T::KIND,
            fields: T::FIELDS,
            size: size_of::<T>(),
            constructor: T::CONSTRUCTOR.map(|_| construct_erased::<T> as fn() -> Instance),
            construct_into: T::CONSTRUCTOR.map(|_| construct_into::<T> as InitRoutine),
            default_instance: construct_erased::<T>,
            from_fields: from_fields_erased::<T>,
            field_values: field_values_of::<T>,
            assemble: assemble::<T>,
        })
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.id.name()
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn fields(&self) -> &'static [Field] {
        self.fields
    }

    /// Size of the shape in bytes
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn has_constructor(&self) -> bool {
        self.constructor.is_some()
    }

    /// Resolve how a default instance is produced.
    ///
    /// Constructor if there is one, zero-initialization for value shapes,
    /// otherwise `ConstructionUnavailable`.
    pub fn default_path(&self) -> Result<DefaultPath> {
        if self.constructor.is_some() {
            Ok(DefaultPath::Constructor)
        } else if self.kind == ShapeKind::Value {
            Ok(DefaultPath::Zeroed)
        } else {
            Err(BenchError::ConstructionUnavailable { shape: self.name() })
        }
    }

    /// Build a default instance the slow way: resolve the path, then either
    /// call the constructor or materialize a zeroed field list.
    pub fn instantiate(&self) -> Result<Instance> {
        match self.default_path()? {
            DefaultPath::Constructor => Ok((self.default_instance)()),
            DefaultPath::Zeroed => self.from_fields(&vec![0; self.fields.len()]),
        }
    }

    pub fn from_fields(&self, values: &[i32]) -> Result<Instance> {
        if values.len() != self.fields.len() {
            return Err(BenchError::FieldCount {
                shape: self.name(),
                expected: self.fields.len(),
                actual: values.len(),
            });
        }
        Ok((self.from_fields)(values))
    }

    /// Read an instance's field values back, `None` if it is not this shape.
    pub fn field_values(&self, instance: &Instance) -> Option<Vec<i32>> {
        (self.field_values)(instance)
    }

    /// Monomorphized default construction; `None` without a constructor.
    pub fn constructor(&self) -> Option<fn() -> Instance> {
        self.constructor
    }

    /// Direct default construction, valid once [`default_path`] succeeded.
    ///
    /// [`default_path`]: ShapeDescriptor::default_path
    pub fn default_fn(&self) -> fn() -> Instance {
        self.default_instance
    }

    pub fn from_fields_fn(&self) -> fn(&[i32]) -> Instance {
        self.from_fields
    }

    /// Out-pointer constructor thunk for native routines to call
    pub fn construct_into(&self) -> Option<InitRoutine> {
        self.construct_into
    }

    /// Typed finisher for a native init routine. Calling it is only sound
    /// with a routine that fully initializes this shape through its pointer.
    pub fn assembler(&self) -> unsafe fn(InitRoutine) -> Instance {
        self.assemble
    }
}

fn validate_layout<T: Shape>() -> Result<()> {
    let invalid = |reason: String| BenchError::InvalidShape {
        shape: T::NAME,
        reason,
    };

    if T::FIELDS.is_empty() {
        return Err(invalid("no fields".to_string()));
    }
    if T::FIELDS.len() > MAX_FIELDS {
        return Err(invalid(format!(
            "{} fields exceeds the limit of {}",
            T::FIELDS.len(),
            MAX_FIELDS
        )));
    }

    let size = size_of::<T>();
    if T::FIELDS.len() * size_of::<i32>() != size {
        return Err(invalid(format!(
            "{} i32 fields do not cover {} bytes",
            T::FIELDS.len(),
            size
        )));
    }

    let mut offsets: Vec<usize> = T::FIELDS.iter().map(|f| f.offset).collect();
    offsets.sort_unstable();
    for (slot, offset) in offsets.iter().enumerate() {
        if *offset != slot * size_of::<i32>() {
            return Err(invalid(format!("unexpected field offset {}", offset)));
        }
    }

    Ok(())
}

fn construct_erased<T: Shape>() -> Instance {
    match T::CONSTRUCTOR {
        Some(ctor) => ctor().erase(),
        None => T::zeroed().erase(),
    }
}

/// Only handed out for shapes with a constructor.
unsafe extern "C" fn construct_into<T: Shape>(out: *mut u8) {
    let value = match T::CONSTRUCTOR {
        Some(ctor) => ctor(),
        None => T::zeroed(),
    };
    unsafe { out.cast::<T>().write(value) }
}

fn from_fields_erased<T: Shape>(values: &[i32]) -> Instance {
    T::from_fields(values).erase()
}

fn field_values_of<T: Shape>(instance: &Instance) -> Option<Vec<i32>> {
    instance.downcast_ref::<T>().map(T::field_values)
}

unsafe fn assemble<T: Shape>(routine: InitRoutine) -> Instance {
    let mut slot = MaybeUninit::<T>::uninit();
    let value = unsafe {
        routine(slot.as_mut_ptr().cast());
        slot.assume_init()
    };
    value.erase()
}

/// Registry of shape descriptors, immutable once the harness is built.
#[derive(Default)]
pub struct ShapeCatalog {
    shapes: HashMap<ShapeId, ShapeDescriptor>,
}

impl ShapeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog holding the sample shapes
    pub fn with_samples() -> Result<Self> {
        let mut catalog = Self::new();
        catalog.register::<SixInts>()?;
        catalog.register::<SixIntsObject>()?;
        catalog.register::<PinnedHandle>()?;
        Ok(catalog)
    }

    /// Register `T`. Registering the same shape twice is a no-op.
    pub fn register<T: Shape>(&mut self) -> Result<ShapeId> {
        let id = ShapeId::of::<T>();
        if !self.shapes.contains_key(&id) {
            let descriptor = ShapeDescriptor::of::<T>()?;
            debug!(shape = id.name(), fields = descriptor.fields().len(), "Registered shape");
            self.shapes.insert(id, descriptor);
        }
        Ok(id)
    }

    pub fn descriptor(&self, id: ShapeId) -> Result<&ShapeDescriptor> {
        self.shapes
            .get(&id)
            .ok_or_else(|| BenchError::UnknownShape(id.name().to_string()))
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.shapes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::offset_of;

    #[repr(C)]
    struct Padded {
        a: i32,
        b: i64,
    }

    unsafe impl Shape for Padded {
        const NAME: &'static str = "Padded";
        const KIND: ShapeKind = ShapeKind::Value;
        const FIELDS: &'static [Field] = &[Field::new("a", offset_of!(Padded, a))];
        const CONSTRUCTOR: Option<fn() -> Self> = None;

        fn zeroed() -> Self {
            Self { a: 0, b: 0 }
        }

        fn from_fields(values: &[i32]) -> Self {
            Self { a: values[0], b: 0 }
        }

        fn field_values(&self) -> Vec<i32> {
            vec![self.a, self.b as i32]
        }
    }

    #[test]
    fn test_default_paths() {
        let catalog = ShapeCatalog::with_samples().unwrap();

        let value = catalog.descriptor(ShapeId::of::<SixInts>()).unwrap();
        let object = catalog.descriptor(ShapeId::of::<SixIntsObject>()).unwrap();
        let handle = catalog.descriptor(ShapeId::of::<PinnedHandle>()).unwrap();

        assert_eq!(value.default_path().unwrap(), DefaultPath::Zeroed);
        assert_eq!(object.default_path().unwrap(), DefaultPath::Constructor);
        assert!(matches!(
            handle.default_path(),
            Err(BenchError::ConstructionUnavailable { shape: "PinnedHandle" })
        ));
    }

    #[test]
    fn test_instantiate_reads_back_zeroes() {
        let catalog = ShapeCatalog::with_samples().unwrap();
        for id in [ShapeId::of::<SixInts>(), ShapeId::of::<SixIntsObject>()] {
            let descriptor = catalog.descriptor(id).unwrap();
            let instance = descriptor.instantiate().unwrap();
            assert_eq!(descriptor.field_values(&instance), Some(vec![0; 6]));
        }
    }

    #[test]
    fn test_from_fields_checks_arity() {
        let catalog = ShapeCatalog::with_samples().unwrap();
        let descriptor = catalog.descriptor(ShapeId::of::<SixInts>()).unwrap();

        let instance = descriptor.from_fields(&[1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(
            instance.downcast_ref::<SixInts>(),
            Some(&SixInts { a: 1, b: 2, c: 3, d: 4, e: 5, f: 6 })
        );
        assert!(matches!(
            descriptor.from_fields(&[1, 2]),
            Err(BenchError::FieldCount {
                shape: "SixInts",
                expected: 6,
                actual: 2,
            })
        ));
    }

    #[test]
    fn test_rejects_padded_layout() {
        let mut catalog = ShapeCatalog::new();
        let err = catalog.register::<Padded>().unwrap_err();
        assert!(matches!(err, BenchError::InvalidShape { shape: "Padded", .. }));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_unknown_shape() {
        let catalog = ShapeCatalog::new();
        assert!(matches!(
            catalog.descriptor(ShapeId::of::<SixInts>()),
            Err(BenchError::UnknownShape(name)) if name == "SixInts"
        ));
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut catalog = ShapeCatalog::with_samples().unwrap();
        let before = catalog.len();
        catalog.register::<SixInts>().unwrap();
        assert_eq!(catalog.len(), before);
    }
}
