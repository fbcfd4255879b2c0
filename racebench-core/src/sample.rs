//! Samples
//!
//! A sample is one timed batch: `iterations` back-to-back invocations of a
//! candidate's work and the wall-clock time they took together.

use serde::{Deserialize, Serialize};

/// One measurement batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    /// Invocations in this batch
    pub iterations: u64,
    /// Wall-clock nanoseconds for the whole batch
    pub elapsed_nanos: u64,
    /// Hardware ticks for the whole batch (0 where unavailable)
    pub cycles: u64,
}

impl Sample {
    /// Create a sample
    #[inline]
    pub fn new(iterations: u64, elapsed_nanos: u64, cycles: u64) -> Self {
        Self {
            iterations,
            elapsed_nanos,
            cycles,
        }
    }

    /// Timing-only sample
    #[inline]
    pub fn timing_only(iterations: u64, elapsed_nanos: u64) -> Self {
        Self::new(iterations, elapsed_nanos, 0)
    }

    /// Operations per second for this batch.
    ///
    /// A batch that read 0 ns is treated as 1 ns so the value stays finite.
    pub fn ops_per_sec(&self) -> f64 {
        self.iterations as f64 / (self.elapsed_nanos.max(1) as f64 / 1e9)
    }

    /// Mean nanoseconds per invocation
    pub fn nanos_per_iteration(&self) -> f64 {
        self.elapsed_nanos as f64 / self.iterations.max(1) as f64
    }
}
