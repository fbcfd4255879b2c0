#![warn(missing_docs)]
//! racebench Core - Measurement Runtime
//!
//! This crate provides everything needed to measure one candidate:
//! - [`Suite`] / [`Case`] registration with name and reference invariants
//! - the [`Work`] capability trait implemented by candidates
//! - the adaptive batch [`Sampler`] producing raw [`Sample`]s
//! - high-precision timing with optional hardware tick counts

mod error;
mod measure;
mod sample;
mod sampler;
mod suite;
mod work;

pub use error::{ConfigurationError, ExecutionError, MeasureError};
/// Whether this platform provides hardware tick counters (x86_64 RDTSCP or AArch64 CNTVCT_EL0).
/// When `false`, sample cycle counts are 0.
pub use measure::HAS_CYCLE_COUNTER;
pub use measure::{CpuPin, Elapsed, Instant, Timer, pin_to_cpu};
pub use sample::Sample;
pub use sampler::{
    DEFAULT_BATCH_TARGET, DEFAULT_MIN_SAMPLES, MAX_BATCH_ITERATIONS, MIN_BATCH_NS, Measurement,
    Sampler, SamplerConfig, measure,
};
pub use suite::{Case, CaseRole, Suite};
pub use work::{FromFn, TryFn, Work, from_fn, try_fn};
