#![warn(missing_docs)]
//! racebench Report - Ranking and Output
//!
//! Turns per-case results into a [`Ranking`] and renders full reports:
//! - JSON (machine-readable)
//! - CSV (spreadsheet-compatible)
//! - Markdown (PR comments, `$GITHUB_STEP_SUMMARY`)
//!
//! Human terminal output lives in the CLI crate.

mod csv;
mod format;
mod json;
mod markdown;
mod ranking;
mod report;
mod result;

pub use csv::generate_csv_report;
pub use format::{format_ops, format_pct};
pub use json::{generate_json_ranking, generate_json_report};
pub use markdown::generate_markdown_report;
pub use ranking::{RankedRow, Ranking, RowStatus, rank, relative_pct};
pub use report::{
    Report, ReportConfig, ReportMeta, ReportSummary, SCHEMA_VERSION, SuiteReport, SystemInfo,
};
pub use result::{CaseOutcome, CaseResult, FailureInfo};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable terminal output
    #[default]
    Human,
    /// JSON with full schema
    Json,
    /// CSV for spreadsheets
    Csv,
    /// Markdown tables
    Markdown,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "text" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "markdown" | "md" | "github" => Ok(OutputFormat::Markdown),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}
