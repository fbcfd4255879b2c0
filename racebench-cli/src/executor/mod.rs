//! Suite Executor
//!
//! Runs suites and turns raw measurements into reports.
//!
//! ## Pipeline Overview
//!
//! ```text
//! Suite (built in code)
//!       │
//!       ▼
//! ┌─────────────┐
//! │  execution  │  Shuffle, run cases sequentially, collect samples
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ statistics  │  Summarize samples (parallel)
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │   report    │  Rank suites, attach metadata
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ formatting  │  Human-readable output
//! └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`execution`] - Scheduler and run options
//! - [`statistics`] - Parallel statistics computation
//! - [`report`] - Multi-suite runs and report assembly
//! - [`formatting`] - Human-readable output formatting
//! - [`metadata`] - System metadata collection and banner

mod execution;
mod formatting;
mod metadata;
mod report;
mod statistics;

// Re-export public API
pub use execution::{RunOptions, Scheduler, SuiteRun};
pub use formatting::format_human_output;
pub use metadata::{build_report_meta, format_banner};
pub use report::{build_report, run_suites};
pub use statistics::{CaseMeasurement, RawOutcome, compute_statistics};
