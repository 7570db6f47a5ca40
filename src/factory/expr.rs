//! Construction expressions and their compilation to closures.
//!
//! An [`Expr`] describes how to produce an instance declaratively
//! ("call the constructor of X", "initialize X member-wise from these
//! values"). [`compile`] resolves every shape reference against the catalog
//! and folds field initializers once, leaving a closure that only performs
//! the construction itself.

use crate::error::{BenchError, Result};
use crate::shape::{DefaultPath, Instance, ShapeCatalog, ShapeDescriptor, ShapeId};

/// Expression tree for constructing an instance
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    /// Invoke the shape's zero-argument constructor
    New(ShapeId),
    /// Member-wise initialization, one initializer per field in order
    Init { shape: ShapeId, fields: Vec<Expr> },
    /// Integer literal, only valid as a field initializer
    Int(i32),
}

impl Expr {
    /// "A new default instance of this shape"
    pub fn default_of(descriptor: &ShapeDescriptor) -> Result<Self> {
        match descriptor.default_path()? {
            DefaultPath::Constructor => Ok(Expr::New(descriptor.id())),
            DefaultPath::Zeroed => Ok(Expr::Init {
                shape: descriptor.id(),
                fields: vec![Expr::Int(0); descriptor.fields().len()],
            }),
        }
    }
}

/// A compiled construction expression
pub type CompiledExpr = Box<dyn Fn() -> Instance + Send + Sync>;

/// Compile an instance-producing expression.
pub fn compile(expr: &Expr, catalog: &ShapeCatalog) -> Result<CompiledExpr> {
    match expr {
        Expr::New(shape) => {
            let descriptor = catalog.descriptor(*shape)?;
            let ctor = descriptor
                .constructor()
                .ok_or(BenchError::ConstructionUnavailable {
                    shape: descriptor.name(),
                })?;
            Ok(Box::new(move || ctor()))
        }
        Expr::Init { shape, fields } => {
            let descriptor = catalog.descriptor(*shape)?;
            if fields.len() != descriptor.fields().len() {
                return Err(BenchError::InvalidExpression(format!(
                    "'{}' has {} fields, initializer lists {}",
                    descriptor.name(),
                    descriptor.fields().len(),
                    fields.len()
                )));
            }
            let values = fields
                .iter()
                .map(fold_scalar)
                .collect::<Result<Vec<i32>>>()?;
            let from_fields = descriptor.from_fields_fn();
            Ok(Box::new(move || from_fields(&values)))
        }
        Expr::Int(value) => Err(BenchError::InvalidExpression(format!(
            "literal {} does not produce an instance",
            value
        ))),
    }
}

fn fold_scalar(expr: &Expr) -> Result<i32> {
    match expr {
        Expr::Int(value) => Ok(*value),
        other => Err(BenchError::InvalidExpression(format!(
            "field initializer must be a literal, got {:?}",
            other
        ))),
    }
}
