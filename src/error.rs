//! Error types for factory-bench.

use thiserror::Error;

/// Main error type for catalog, factory and harness operations.
#[derive(Debug, Error)]
pub enum BenchError {
    /// The shape has no usable default-construction path
    #[error("No default construction path for shape '{shape}'")]
    ConstructionUnavailable { shape: &'static str },

    /// A strategy tag that no factory technique answers to
    #[error("Unknown strategy '{0}' (expected one of: direct, reflective, expression, generated)")]
    UnknownStrategy(String),

    /// The shape identity was never registered in the catalog
    #[error("Shape '{0}' is not registered in the catalog")]
    UnknownShape(String),

    #[error("Unknown suite '{0}'")]
    UnknownSuite(String),

    /// The shape's field table does not describe its memory layout
    #[error("Invalid shape '{shape}': {reason}")]
    InvalidShape { shape: &'static str, reason: String },

    /// Field values handed to a shape do not match its field count
    #[error("Shape '{shape}' has {expected} fields, got {actual} values")]
    FieldCount {
        shape: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid expression: {0}")]
    InvalidExpression(String),

    /// Native routine generation failed
    #[error("Codegen error: {0}")]
    Codegen(String),

    /// A variant disagreed with the reference result
    #[error("Verification failed in '{suite}': {reason}")]
    Verification { suite: &'static str, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for factory-bench operations
pub type Result<T> = std::result::Result<T, BenchError>;
