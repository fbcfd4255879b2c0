#![warn(missing_docs)]
//! # racebench
//!
//! Randomized, statistically sound throughput races between interchangeable
//! implementations of one operation.
//!
//! racebench measures every candidate of a suite and ranks them:
//! - **Adaptive batching**: iteration counts grow until one batch clears clock-resolution noise
//! - **Randomized order**: cases run sequentially in a seeded random permutation
//! - **Statistical rigor**: Student-t margin of error on mean throughput
//! - **Reference baseline**: every row is compared to a designated reference case
//! - **Failure isolation**: a candidate that errors, panics or times out is reported as failed,
//!   the rest of the suite still runs
//! - **Multiple outputs**: human table, JSON, CSV and Markdown
//!
//! ## Quick Start
//!
//! ```ignore
//! use racebench::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let input = "12345";
//!     let suite = Suite::new("parse u32")
//!         .reference("str::parse", move || input.parse::<u32>().map_err(ExecutionError::raised))?
//!         .case("fold", from_fn(move || input.bytes().fold(0u32, |n, b| n * 10 + (b - b'0') as u32)))?;
//!
//!     racebench::run(vec![suite])
//! }
//! ```
//!
//! ## Library Use
//!
//! ```ignore
//! let mut scheduler = Scheduler::new(42);
//! let report = suite.run(&mut scheduler, &RunOptions::default());
//! for row in &report.ranking.rows {
//!     println!("{} {:?}", row.name, row.relative_to_reference_pct);
//! }
//! ```

// Re-export core types
pub use racebench_core::{
    Case, CaseRole, ConfigurationError, ExecutionError, MeasureError, Measurement, Sample,
    SamplerConfig, Suite, Work, from_fn, measure, try_fn,
};

// Re-export stats
pub use racebench_stats::{DEFAULT_CONFIDENCE_LEVEL, ThroughputSummary, summarize};

// Re-export report types
pub use racebench_report::{
    CaseOutcome, CaseResult, FailureInfo, OutputFormat, RankedRow, Ranking, Report, RowStatus,
    SuiteReport, generate_csv_report, generate_json_report, generate_markdown_report, rank,
};

// Re-export the scheduler and harness
pub use racebench_cli::{Cli, RaceConfig, RunOptions, RunStatus, Scheduler, SuiteRun, run_suites};

/// Run suites with a scheduler, method-style
pub trait SuiteExt {
    /// Execute every case in a randomized order and rank the results
    fn run(&mut self, scheduler: &mut Scheduler, options: &RunOptions) -> SuiteReport;
}

impl SuiteExt for Suite {
    fn run(&mut self, scheduler: &mut Scheduler, options: &RunOptions) -> SuiteReport {
        scheduler.run_suite(self, options)
    }
}

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        ExecutionError, RunOptions, Scheduler, Suite, SuiteExt, SuiteReport, Work, from_fn,
        try_fn,
    };
}

/// Run the racebench CLI harness over the given suites.
///
/// Call this from your benchmark binary's `main()`:
/// ```ignore
/// fn main() -> anyhow::Result<()> {
///     racebench::run(build_suites()?)
/// }
/// ```
pub use racebench_cli::run;
