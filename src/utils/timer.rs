//! Timed trial execution.
//!
//! A trial runs its body a fixed number of times back to back and measures
//! the whole loop with the monotonic clock. There is no warmup, no sampling
//! and no statistics: one trial, one duration.

use std::time::{Duration, Instant};

use clap::ValueEnum;

pub use super::cpu_affinity::CpuPinGuard;

/// CPU pinning strategy during trials
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum PinStrategy {
    /// Leave scheduling to the OS
    #[default]
    None,
    /// Pin once before the first trial, unpin after the last
    Global,
    /// Pin/unpin around each trial
    PerTrial,
}

/// Outcome of one trial
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrialResult {
    pub label: String,
    /// Wall-clock time for all iterations
    pub elapsed: Duration,
    pub iterations: usize,
}

impl TrialResult {
    pub fn nanos(&self) -> u128 {
        self.elapsed.as_nanos()
    }

    /// Average nanoseconds per iteration (0 for an empty trial)
    pub fn nanos_per_iteration(&self) -> f64 {
        if self.iterations == 0 {
            0.0
        } else {
            self.elapsed.as_nanos() as f64 / self.iterations as f64
        }
    }
}

/// Run `body` exactly `iterations` times and time the whole loop.
///
/// The first error returned by `body` aborts the trial and is propagated
/// as is; no result is produced for an aborted trial.
pub fn run<E, F>(label: impl Into<String>, iterations: usize, mut body: F) -> Result<TrialResult, E>
where
    F: FnMut() -> Result<(), E>,
{
    let label = label.into();
    let start = Instant::now();
    for _ in 0..iterations {
        body()?;
    }
    let elapsed = start.elapsed();

    Ok(TrialResult {
        label,
        elapsed,
        iterations,
    })
}

/// Trial runner applying a pinning strategy around [`run`].
pub struct TrialRunner {
    pin: PinStrategy,
    _global_pin: Option<CpuPinGuard>,
}

impl TrialRunner {
    pub fn new(pin: PinStrategy) -> Self {
        Self {
            pin,
            _global_pin: (pin == PinStrategy::Global).then(CpuPinGuard::new),
        }
    }

    pub fn pin_strategy(&self) -> PinStrategy {
        self.pin
    }

    pub fn run<E, F>(&self, label: impl Into<String>, iterations: usize, body: F) -> Result<TrialResult, E>
    where
        F: FnMut() -> Result<(), E>,
    {
        let _per_trial_pin = (self.pin == PinStrategy::PerTrial).then(CpuPinGuard::new);
        run(label, iterations, body)
    }
}

impl Default for TrialRunner {
    fn default() -> Self {
        Self::new(PinStrategy::None)
    }
}
