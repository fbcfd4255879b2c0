//! Report Data Structures

use crate::ranking::Ranking;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Version of the JSON layout
pub const SCHEMA_VERSION: u32 = 1;

/// Complete run report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub meta: ReportMeta,
    pub suites: Vec<SuiteReport>,
    pub summary: ReportSummary,
}

impl Report {
    /// Assemble a report and compute its summary
    pub fn new(meta: ReportMeta, suites: Vec<SuiteReport>) -> Self {
        let summary = ReportSummary::from_suites(&suites);
        Self {
            meta,
            suites,
            summary,
        }
    }

    /// Whether any suite ended without a single successful case
    pub fn has_unsuccessful_suite(&self) -> bool {
        self.suites.iter().any(|s| s.ranking.no_successful_candidates)
    }
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    pub schema_version: u32,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    /// Seed of the ordering generator
    pub seed: u64,
    pub system: SystemInfo,
    pub config: ReportConfig,
}

/// Runner settings captured in report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub time_budget_ms: u64,
    pub min_samples: usize,
    pub max_wall_clock_ms: u64,
    pub batch_target_ms: u64,
    pub warmup_batches: u32,
    pub suite_timeout_ms: Option<u64>,
    pub confidence_level: f64,
    pub pin_cpu: Option<usize>,
}

/// System information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    pub os: String,
    pub arch: String,
    pub cpu: String,
    pub cpu_cores: u32,
    pub memory_gb: f64,
}

/// Outcome of one suite run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Suite name
    pub name: String,
    /// Case names in the order they were executed
    pub execution_order: Vec<String>,
    /// Ranked results
    pub ranking: Ranking,
    /// Wall-clock time of the whole suite
    pub duration_ms: f64,
}

/// Totals across suites
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_suites: usize,
    pub total_cases: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Suites without any successful case
    pub suites_without_success: usize,
    pub total_duration_ms: f64,
}

impl ReportSummary {
    /// Count rows by status across `suites`
    pub fn from_suites(suites: &[SuiteReport]) -> Self {
        let mut summary = ReportSummary {
            total_suites: suites.len(),
            ..Default::default()
        };
        for suite in suites {
            summary.total_cases += suite.ranking.len();
            summary.succeeded += suite.ranking.successful().count();
            summary.failed += suite.ranking.failed().count();
            summary.total_duration_ms += suite.duration_ms;
            if suite.ranking.no_successful_candidates {
                summary.suites_without_success += 1;
            }
        }
        summary.skipped = summary.total_cases - summary.succeeded - summary.failed;
        summary
    }
}
