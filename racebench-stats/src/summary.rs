//! Throughput Summary
//!
//! Reduces raw batch samples to the numbers a ranking needs:
//! - mean throughput: arithmetic mean of per-batch ops/sec
//! - dispersion: sample standard deviation (n - 1) and standard error
//! - margin of error: Student-t confidence half-width, as a fraction of the mean
//!
//! Min, median and max throughput and a Tukey outlier count are carried along
//! for display and noise diagnostics.

use crate::outliers::count_outliers;
use crate::percentiles::{percentile_of_sorted, sorted};
use crate::{IQR_MULTIPLIER, NOISY_OUTLIER_PCT};
use racebench_core::Sample;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal, StudentsT};

/// Summary statistics for one measured case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThroughputSummary {
    /// Mean operations per second
    pub ops_per_sec: f64,
    /// Sample standard deviation of per-batch ops/sec
    pub std_dev: f64,
    /// Standard error of the mean
    pub standard_error: f64,
    /// Confidence half-width divided by the mean
    pub margin_of_error: f64,
    /// Confidence level the margin was computed at
    pub confidence_level: f64,
    /// Number of batches
    pub sample_count: usize,

    /// Slowest batch
    pub min_ops_per_sec: f64,
    /// Median batch
    pub median_ops_per_sec: f64,
    /// Fastest batch
    pub max_ops_per_sec: f64,

    /// Invocations across all batches
    pub total_iterations: u64,
    /// Measured nanoseconds across all batches
    pub total_elapsed_nanos: u64,
    /// Hardware ticks per invocation, when a tick counter exists
    pub cycles_per_iteration: Option<f64>,

    /// Batches outside the Tukey fences
    pub outlier_count: usize,
    /// Reliability caveats (single sample, noisy machine)
    pub warning: Option<String>,
}

impl ThroughputSummary {
    /// Margin of error as a percentage of the mean
    pub fn margin_of_error_pct(&self) -> f64 {
        self.margin_of_error * 100.0
    }

    /// Confidence interval on mean ops/sec
    pub fn confidence_interval(&self) -> (f64, f64) {
        let half = self.ops_per_sec * self.margin_of_error;
        (self.ops_per_sec - half, self.ops_per_sec + half)
    }

    /// Aggregate nanoseconds per invocation
    pub fn nanos_per_iteration(&self) -> f64 {
        self.total_elapsed_nanos as f64 / self.total_iterations.max(1) as f64
    }

    /// Whether the relative margin is below `max_pct`
    pub fn is_stable(&self, max_pct: f64) -> bool {
        self.margin_of_error_pct() < max_pct
    }
}

/// Whether `level` can be used as a confidence level, i.e. lies in (0, 1)
pub fn is_valid_confidence(level: f64) -> bool {
    level > 0.0 && level < 1.0
}

/// Two-sided critical value for `confidence_level` with `df` degrees of freedom.
///
/// Student-t for finite `df`; `None` when `df == 0` or the level is outside (0, 1).
pub fn critical_value(confidence_level: f64, df: usize) -> Option<f64> {
    if df == 0 || !is_valid_confidence(confidence_level) {
        return None;
    }
    let p = 0.5 + confidence_level / 2.0;
    match StudentsT::new(0.0, 1.0, df as f64) {
        Ok(t) => Some(t.inverse_cdf(p)),
        // Degenerate parameters: the normal quantile is the df -> inf limit
        Err(_) => Normal::new(0.0, 1.0).ok().map(|n| n.inverse_cdf(p)),
    }
}

/// Summarize the samples of one case.
///
/// Returns `None` when there are no samples: the case never produced a
/// measurement and must be reported as failed.
pub fn summarize(samples: &[Sample], confidence_level: f64) -> Option<ThroughputSummary> {
    if samples.is_empty() {
        return None;
    }

    let n = samples.len();
    let throughputs: Vec<f64> = samples.iter().map(Sample::ops_per_sec).collect();
    let mean = throughputs.iter().sum::<f64>() / n as f64;

    let std_dev = if n < 2 {
        0.0
    } else {
        let var = throughputs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        var.sqrt()
    };
    let standard_error = std_dev / (n as f64).sqrt();

    let mut warnings = Vec::new();
    let margin_of_error = match critical_value(confidence_level, n - 1) {
        Some(t) if mean > 0.0 => (t * standard_error) / mean,
        _ => {
            if !is_valid_confidence(confidence_level) {
                warnings.push(format!(
                    "confidence level {confidence_level} outside (0, 1); margin of error unavailable"
                ));
            } else if n < 2 {
                warnings.push("single sample; margin of error unavailable".to_string());
            }
            0.0
        }
    };

    let ordered = sorted(&throughputs);
    let outliers = count_outliers(&ordered, IQR_MULTIPLIER);
    let outlier_pct = outliers.percentage_of(n);
    if outlier_pct > NOISY_OUTLIER_PCT {
        warnings.push(format!(
            "{:.0}% of batches are outliers; results may be noisy",
            outlier_pct
        ));
    }

    let total_iterations: u64 = samples.iter().map(|s| s.iterations).sum();
    let total_elapsed_nanos: u64 = samples.iter().map(|s| s.elapsed_nanos).sum();
    let total_cycles: u64 = samples.iter().map(|s| s.cycles).sum();
    let cycles_per_iteration = (total_cycles > 0 && total_iterations > 0)
        .then(|| total_cycles as f64 / total_iterations as f64);

    Some(ThroughputSummary {
        ops_per_sec: mean,
        std_dev,
        standard_error,
        margin_of_error,
        confidence_level,
        sample_count: n,
        min_ops_per_sec: ordered[0],
        median_ops_per_sec: percentile_of_sorted(&ordered, 50.0),
        max_ops_per_sec: ordered[n - 1],
        total_iterations,
        total_elapsed_nanos,
        cycles_per_iteration,
        outlier_count: outliers.total(),
        warning: (!warnings.is_empty()).then(|| warnings.join("; ")),
    })
}
