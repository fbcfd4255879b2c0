//! Ranker
//!
//! Orders the results of one suite run:
//! 1. successful rows, fastest first (ties keep registration order)
//! 2. failed rows, in registration order
//! 3. skipped rows, in registration order
//!
//! Relative numbers are only computed for successful rows. Relative-to-reference
//! is absent everywhere when the suite has no reference or the reference did
//! not succeed.

use crate::result::{CaseOutcome, CaseResult, FailureInfo};
use racebench_stats::ThroughputSummary;
use serde::{Deserialize, Serialize};

/// Row status as emitted in reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowStatus {
    /// Measured
    Ok,
    /// Failed, timed out or cancelled
    Failed,
    /// Never executed
    Skipped,
}

impl RowStatus {
    /// Lowercase label
    pub fn as_str(&self) -> &'static str {
        match self {
            RowStatus::Ok => "ok",
            RowStatus::Failed => "failed",
            RowStatus::Skipped => "skipped",
        }
    }
}

/// One row of a ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRow {
    /// 1-based position among successful rows
    pub rank: Option<usize>,
    /// Case name
    pub name: String,
    /// Registration index
    pub index: usize,
    /// Whether this is the suite's reference
    pub is_reference: bool,
    /// Row status
    pub status: RowStatus,
    /// Mean ops/sec
    pub ops_per_sec: Option<f64>,
    /// Margin of error as a percentage of the mean
    pub margin_of_error_pct: Option<f64>,
    /// Signed percentage against the fastest row
    pub relative_to_fastest_pct: Option<f64>,
    /// Signed percentage against the reference row
    pub relative_to_reference_pct: Option<f64>,
    /// Full statistics, for successful rows
    pub summary: Option<ThroughputSummary>,
    /// Failure details, for failed rows
    pub failure: Option<FailureInfo>,
}

impl RankedRow {
    /// Whether the row was measured
    pub fn is_ok(&self) -> bool {
        self.status == RowStatus::Ok
    }
}

/// Ranked comparison for one suite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    /// Suite name
    pub suite: String,
    /// Rows: successes by throughput, then failures, then skipped
    pub rows: Vec<RankedRow>,
    /// Name of the registered reference case, if any
    pub reference: Option<String>,
    /// Set when no case was measured successfully
    pub no_successful_candidates: bool,
}

impl Ranking {
    /// Number of rows (one per case)
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the ranking has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Successful rows, fastest first
    pub fn successful(&self) -> impl Iterator<Item = &RankedRow> {
        self.rows.iter().filter(|r| r.is_ok())
    }

    /// Failed rows
    pub fn failed(&self) -> impl Iterator<Item = &RankedRow> {
        self.rows.iter().filter(|r| r.status == RowStatus::Failed)
    }

    /// Fastest successful row
    pub fn fastest(&self) -> Option<&RankedRow> {
        self.successful().next()
    }

    /// Row by case name
    pub fn row(&self, name: &str) -> Option<&RankedRow> {
        self.rows.iter().find(|r| r.name == name)
    }
}

/// Rank the results of one suite run. Never fails; an empty or all-failed
/// input yields `no_successful_candidates`.
pub fn rank(suite_name: &str, results: &[CaseResult]) -> Ranking {
    let mut by_index: Vec<&CaseResult> = results.iter().collect();
    by_index.sort_by_key(|r| r.index);

    let mut successes: Vec<(&CaseResult, &ThroughputSummary)> = by_index
        .iter()
        .filter(|r| r.is_success())
        .filter_map(|r| r.summary().map(|s| (*r, s)))
        .collect();
    // Stable: equal throughput keeps registration order
    successes.sort_by(|a, b| b.1.ops_per_sec.total_cmp(&a.1.ops_per_sec));

    let fastest = successes.first().map(|(_, s)| s.ops_per_sec);
    let reference = by_index.iter().find(|r| r.is_reference);
    let reference_ops = reference
        .filter(|r| r.is_success())
        .and_then(|r| r.summary())
        .map(|s| s.ops_per_sec);

    let mut rows = Vec::with_capacity(results.len());

    for (position, (result, summary)) in successes.iter().enumerate() {
        let ops = summary.ops_per_sec;
        rows.push(RankedRow {
            rank: Some(position + 1),
            name: result.name.clone(),
            index: result.index,
            is_reference: result.is_reference,
            status: RowStatus::Ok,
            ops_per_sec: Some(ops),
            margin_of_error_pct: Some(summary.margin_of_error_pct()),
            relative_to_fastest_pct: fastest.map(|f| relative_pct(ops, f)),
            relative_to_reference_pct: reference_ops.map(|r| {
                if result.is_reference {
                    0.0
                } else {
                    relative_pct(ops, r)
                }
            }),
            summary: Some((*summary).clone()),
            failure: None,
        });
    }

    for result in by_index.iter().filter(|r| !r.is_success() && !r.is_skipped()) {
        let failure = match &result.outcome {
            CaseOutcome::Failed(f) => f.clone(),
            _ => FailureInfo::new("execution", "no positive throughput measured"),
        };
        rows.push(unranked_row(result, RowStatus::Failed, Some(failure)));
    }

    for result in by_index.iter().filter(|r| r.is_skipped()) {
        rows.push(unranked_row(result, RowStatus::Skipped, None));
    }

    Ranking {
        suite: suite_name.to_string(),
        rows,
        reference: reference.map(|r| r.name.clone()),
        no_successful_candidates: successes.is_empty(),
    }
}

fn unranked_row(result: &CaseResult, status: RowStatus, failure: Option<FailureInfo>) -> RankedRow {
    RankedRow {
        rank: None,
        name: result.name.clone(),
        index: result.index,
        is_reference: result.is_reference,
        status,
        ops_per_sec: None,
        margin_of_error_pct: None,
        relative_to_fastest_pct: None,
        relative_to_reference_pct: None,
        summary: None,
        failure,
    }
}

/// `(value / base - 1) * 100`
pub fn relative_pct(value: f64, base: f64) -> f64 {
    (value / base - 1.0) * 100.0
}
