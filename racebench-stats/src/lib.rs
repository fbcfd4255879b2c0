#![warn(missing_docs)]
//! racebench Statistical Engine
//!
//! Turns raw batch samples into a [`ThroughputSummary`]:
//! - mean throughput over batches
//! - Student-t margin of error at a configurable confidence level
//! - percentiles and a Tukey outlier count for noise diagnostics

mod outliers;
mod percentiles;
mod summary;

pub use outliers::{OutlierCount, count_outliers};
pub use percentiles::{compute_percentile, percentile_of_sorted, sorted};
pub use summary::{ThroughputSummary, critical_value, is_valid_confidence, summarize};

/// Default confidence level (95%)
pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;

/// Tukey fence multiplier
pub const IQR_MULTIPLIER: f64 = 1.5;

/// Outlier share (percent) above which a summary is flagged as noisy
pub const NOISY_OUTLIER_PCT: f64 = 10.0;
