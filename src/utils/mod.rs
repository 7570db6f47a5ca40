//! Utility modules for timing, reporting and terminal output.

pub mod cpu_affinity;
pub mod report;
pub mod timer;
pub mod tui;

// Re-export commonly used items
pub use cpu_affinity::CpuPinGuard;
pub use report::{format_elapsed, make_reporter, OutputFormat, Reporter};
pub use timer::{PinStrategy, TrialResult, TrialRunner};

/// Information about a probe variant.
/// Generic over F which is the function signature.
pub struct VariantInfo<F> {
    /// Unique identifier for this variant (e.g., "direct", "trait-object")
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// The specific implementation function
    pub function: F,
}
