//! Outlier Counting
//!
//! Tukey fences: values outside `[Q1 - k*IQR, Q3 + k*IQR]`. Throughput
//! batches far from the bulk usually mean the machine was busy (interrupts,
//! frequency scaling, other processes). Outliers are counted and reported as
//! a noise signal; they are never removed from the mean.

use crate::percentiles::percentile_of_sorted;
use serde::{Deserialize, Serialize};

/// Outlier counts for one set of samples
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OutlierCount {
    /// Values below the lower fence
    pub low: usize,
    /// Values above the upper fence
    pub high: usize,
    /// Lower fence
    pub lower_fence: f64,
    /// Upper fence
    pub upper_fence: f64,
}

impl OutlierCount {
    /// Total outliers on both sides
    pub fn total(&self) -> usize {
        self.low + self.high
    }

    /// Outliers as a percentage of `n` values
    pub fn percentage_of(&self, n: usize) -> f64 {
        if n == 0 {
            0.0
        } else {
            self.total() as f64 / n as f64 * 100.0
        }
    }
}

/// Count Tukey outliers in an ascending slice with fence multiplier `k`
pub fn count_outliers(sorted: &[f64], k: f64) -> OutlierCount {
    if sorted.len() < 4 {
        return OutlierCount {
            lower_fence: f64::NEG_INFINITY,
            upper_fence: f64::INFINITY,
            ..Default::default()
        };
    }

    let q1 = percentile_of_sorted(sorted, 25.0);
    let q3 = percentile_of_sorted(sorted, 75.0);
    let iqr = q3 - q1;
    let lower_fence = q1 - k * iqr;
    let upper_fence = q3 + k * iqr;

    OutlierCount {
        low: sorted.iter().take_while(|&&v| v < lower_fence).count(),
        high: sorted.iter().rev().take_while(|&&v| v > upper_fence).count(),
        lower_fence,
        upper_fence,
    }
}
