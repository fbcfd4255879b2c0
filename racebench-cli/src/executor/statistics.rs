//! Statistics Computation
//!
//! Parallel summarization of raw measurements.
//!
//! Runs after every case of a suite has been measured, so Rayon never
//! competes with a running candidate for CPU time. Each case's samples are
//! processed independently into a [`CaseResult`].

use racebench_core::Measurement;
use racebench_report::{CaseResult, FailureInfo};
use racebench_stats::summarize;
use rayon::prelude::*;

/// What the scheduler recorded for one case, before statistics
#[derive(Debug, Clone)]
pub enum RawOutcome {
    /// Samples collected
    Measured(Measurement),
    /// Measurement ended early
    Failed(FailureInfo),
    /// Never executed
    Skipped,
}

/// Raw record of one case
#[derive(Debug, Clone)]
pub struct CaseMeasurement {
    /// Case name
    pub name: String,
    /// Registration index
    pub index: usize,
    /// Whether the case is the reference
    pub is_reference: bool,
    /// What happened
    pub outcome: RawOutcome,
}

/// Summarize measurements (parallelized with Rayon).
///
/// A measurement without samples becomes a failed result.
pub fn compute_statistics(
    measurements: Vec<CaseMeasurement>,
    confidence_level: f64,
) -> Vec<CaseResult> {
    measurements
        .into_par_iter()
        .map(|m| match m.outcome {
            RawOutcome::Measured(measurement) => {
                match summarize(&measurement.samples, confidence_level) {
                    Some(summary) => CaseResult::measured(m.name, m.index, m.is_reference, summary),
                    None => CaseResult::failed(
                        m.name,
                        m.index,
                        m.is_reference,
                        FailureInfo::new("execution", "no samples recorded"),
                    ),
                }
            }
            RawOutcome::Failed(failure) => {
                CaseResult::failed(m.name, m.index, m.is_reference, failure)
            }
            RawOutcome::Skipped => CaseResult::skipped(m.name, m.index, m.is_reference),
        })
        .collect()
}
